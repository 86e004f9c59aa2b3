//! Host collaborator error types.

use core::fmt;

/// Errors reported by host collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    /// The host could not build its device-info snapshot.
    DeviceInfoUnavailable,
    /// The driver-matching subsystem rejected the catalog.
    CatalogRejected,
    /// The host cannot intercept shared-cache page validation.
    SharedCacheUnavailable,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceInfoUnavailable => f.write_str("device info unavailable"),
            Self::CatalogRejected => f.write_str("driver catalog rejected"),
            Self::SharedCacheUnavailable => f.write_str("shared-cache routing unavailable"),
        }
    }
}

impl core::error::Error for HostError {}
