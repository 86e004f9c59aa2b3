//! Fatal conditions.
//!
//! Nothing in the shim retries. Every precondition is checked once and a
//! failure is reported as [`Fatal`], propagated synchronously up to the
//! lifecycle callback. Soft failures never reach this type; they are logged
//! where they happen.

use alloc::string::String;

use rdna_host_api::{HostError, KernelVersion, PatchError};
use thiserror::Error;

use crate::chip::ChipType;

/// A condition that must stop the boot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Fatal {
    /// No external video device matched an RDNA 2 ID block.
    #[error("failed to find GPU")]
    GpuNotFound,
    /// The GPU's device ID is not a known Navi 2x part.
    #[error("unknown device ID {0:#06x}")]
    UnknownDevice(u16),
    /// The host kernel is older than the chip family supports.
    #[error("unsupported kernel version {found}; {chip} requires {required} or newer")]
    UnsupportedHost {
        /// The classified chip family.
        chip: ChipType,
        /// Minimum kernel version for `chip`.
        required: KernelVersion,
        /// Kernel version the host reported.
        found: KernelVersion,
    },
    /// BAR 5 could not be mapped, or mapped with zero length.
    #[error("failed to map RMMIO")]
    RegisterMap,
    /// A register read fell outside the mapped aperture.
    #[error("register {0:#x} lies outside the RMMIO window")]
    RegisterOutOfRange(u32),
    /// A resource the shim bundles was not found in the firmware table.
    #[error("resource `{0}` is not bundled")]
    MissingResource(&'static str),
    /// The driver catalog could not be deserialized.
    #[error("failed to deserialize {name}: {reason}")]
    CatalogDecode {
        /// Resource name.
        name: &'static str,
        /// Deserializer diagnostic.
        reason: String,
    },
    /// The driver catalog deserialized to the wrong shape.
    #[error("failed to cast {name} data: {what}")]
    CatalogShape {
        /// Resource name.
        name: &'static str,
        /// What was expected.
        what: &'static str,
    },
    /// The host refused the driver catalog.
    #[error("failed to add drivers: {0}")]
    CatalogRegister(#[source] HostError),
    /// The host refused the shared-cache patches.
    #[error("failed to route shared-cache patches: {0}")]
    SharedCacheRoute(#[source] HostError),
    /// A lookup patch could not be applied.
    #[error("failed to apply {module} patch {index}: {source}")]
    Patch {
        /// Short name of the target module.
        module: &'static str,
        /// Position of the patch in its table.
        index: usize,
        /// Error from the patcher.
        #[source]
        source: PatchError,
    },
    /// A lookup patch matched a different number of times than expected.
    #[error("{module} patch {index} applied {applied} times, expected {expected}")]
    PatchCount {
        /// Short name of the target module.
        module: &'static str,
        /// Position of the patch in its table.
        index: usize,
        /// Occurrences rewritten.
        applied: usize,
        /// Occurrences the table expects.
        expected: usize,
    },
}

/// Stops the boot with the fatal diagnostic.
///
/// This is the only place the shim panics on purpose; embedding layers call
/// it on the `Err` arm of a lifecycle callback.
#[cold]
pub fn halt(fatal: &Fatal) -> ! {
    log::error!(target: "rdna", "{fatal}");
    panic!("rdna-shim: {fatal}")
}
