//! External-GPU probe.
//!
//! Walks the host's external video list and claims the first AMD function in
//! the `0x73xx` or `0x74xx` device block. The claimed node is renamed and
//! published exactly once; enumeration stops there.

use log::{debug, info};
use rdna_host_api::pci::{regs, vendor};
use rdna_host_api::{DeviceInfo, NodeRef, PciDeviceId};

use crate::error::Fatal;

/// Device blocks the probe claims.
pub static ID_TABLE: &[PciDeviceId] = &[
    PciDeviceId::masked(vendor::ATI_AMD, 0x7300, 0xFF00),
    PciDeviceId::masked(vendor::ATI_AMD, 0x7400, 0xFF00),
];

/// Device-tree name given to the claimed GPU. Discovery stops at the first
/// match, so it is always the first external GPU.
pub const GPU_NAME: &str = "GFX0";

/// Returns `true` if `(vendor, device)` falls in [`ID_TABLE`].
#[must_use]
pub fn is_candidate(vendor: u16, device: u16) -> bool {
    ID_TABLE.iter().any(|id| id.matches(vendor, device))
}

/// Finds, renames and publishes the external GPU.
///
/// The switch-off hint is processed first. Entries that are not PCI devices
/// are skipped. Fails with [`Fatal::GpuNotFound`] when nothing matches.
pub fn find_gpu(info: &mut dyn DeviceInfo) -> Result<NodeRef, Fatal> {
    info.process_switch_off();

    for entry in info.external_video() {
        let Some(node) = &entry.pci else {
            continue;
        };
        let vendor_id = node.read_config_u16(regs::VENDOR_ID);
        let device_id = node.read_config_u16(regs::DEVICE_ID);
        if !is_candidate(vendor_id, device_id) {
            debug!(target: "rdna::pci", "skipping {vendor_id:04x}:{device_id:04x}");
            continue;
        }

        node.rename(GPU_NAME);
        node.await_publishing();
        match node.address() {
            Some(addr) => {
                info!(target: "rdna::pci", "{addr}: {vendor_id:04x}:{device_id:04x} published as {GPU_NAME}");
            }
            None => info!(target: "rdna::pci", "{vendor_id:04x}:{device_id:04x} published as {GPU_NAME}"),
        }
        return Ok(node.clone());
    }

    Err(Fatal::GpuNotFound)
}
