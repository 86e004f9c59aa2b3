//! Foreign-module registration and load events.
//!
//! Before the host starts loading modules, the shim registers every module it
//! wants to patch. The host answers with a [`ModuleId`] and later reports each
//! load of that module as a [`ModuleLoad`] carrying the same identity.

use core::fmt;

/// Static description of a foreign kernel module the shim patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Bundle identifier, e.g. `com.apple.kext.AMDRadeonX6000Framebuffer`.
    pub bundle_id: &'static str,
    /// Candidate on-disk paths of the module binary.
    pub paths: &'static [&'static str],
}

impl ModuleInfo {
    /// Returns the last component of the bundle identifier.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.bundle_id.rsplit('.').next().unwrap_or(self.bundle_id)
    }
}

/// Host-assigned identity of a registered module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(pub usize);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered module has finished loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleLoad {
    /// Identity returned at registration.
    pub id: ModuleId,
    /// Load slide (base address of the in-memory image).
    pub slide: u64,
    /// Size of the in-memory image in bytes.
    pub size: usize,
}
