//! Host service contracts.
//!
//! The shim uses [`HostServices`] to query the machine and register drivers,
//! [`DeviceInfo`] to discover the external GPU, and [`KernelPatcher`] to
//! register foreign modules and rewrite them once they load. None of these
//! are reached through globals: the embedding layer passes them into every
//! lifecycle callback.

use alloc::boxed::Box;
use alloc::vec::Vec;

use bitflags::bitflags;
use rdna_lookup::{LookupPatch, PatchError};

use crate::catalog::DriverPersonality;
use crate::error::HostError;
use crate::node::NodeRef;
use crate::registration::{ModuleId, ModuleInfo, ModuleLoad};
use crate::version::KernelVersion;

bitflags! {
    /// Execution mode the host booted in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RunMode: u32 {
        /// Regular boot.
        const NORMAL = 1 << 0;
        /// Installer or recovery environment.
        const INSTALLER_RECOVERY = 1 << 1;
        /// Safe mode.
        const SAFE_MODE = 1 << 2;
    }
}

/// One entry of the host's external video device list.
#[derive(Clone, Default)]
pub struct VideoEntry {
    /// The PCI device node, or `None` when the entry is not a PCI device.
    pub pci: Option<NodeRef>,
}

/// Snapshot of the host's video devices.
pub trait DeviceInfo {
    /// Applies the switch-off hint, disabling secondary GPU paths so the
    /// external GPU is preferred.
    fn process_switch_off(&mut self);

    /// Returns the external (discrete) video devices, in host order.
    fn external_video(&self) -> &[VideoEntry];
}

/// Services the host provides to the shim.
pub trait HostServices {
    /// Builds a fresh device-info snapshot.
    fn device_info(&self) -> Result<Box<dyn DeviceInfo>, HostError>;

    /// Returns the board identifier of the machine (e.g. `Mac-27AD2F918AE68F61`).
    fn board_identifier(&self) -> &str;

    /// Returns the running kernel's major version.
    fn kernel_version(&self) -> KernelVersion;

    /// Returns the execution mode flags.
    fn run_mode(&self) -> RunMode;

    /// Returns `true` if `arg` was passed on the kernel command line.
    fn has_boot_arg(&self, arg: &str) -> bool;

    /// Registers driver-matching personalities with the host catalogue.
    fn add_drivers(&self, drivers: Vec<DriverPersonality>) -> Result<(), HostError>;
}

/// The host's module loader and patching primitive.
pub trait KernelPatcher {
    /// Asks to be told when `info` loads; returns the identity load events
    /// for it will carry.
    fn register_module(&mut self, info: &'static ModuleInfo) -> ModuleId;

    /// Applies `patch` inside the image described by `load`.
    ///
    /// Returns the number of occurrences rewritten.
    fn apply_lookup_patch(
        &mut self,
        load: &ModuleLoad,
        patch: &LookupPatch<'_>,
    ) -> Result<usize, PatchError>;

    /// Queues `patches` for the shared user-space library cache.
    ///
    /// The host applies them to every cache code page it validates from
    /// then on; a pattern missing from a page is not an error.
    fn route_shared_cache(&mut self, patches: &[LookupPatch<'static>]) -> Result<(), HostError>;
}
