//! The discovered GPU: node handle, identity, classification, registers.

use rdna_host_api::pci::regs;
use rdna_host_api::{DeviceNode, NodeRef};

use crate::chip::{ChipType, Classification};
use crate::error::Fatal;
use crate::rmmio::Rmmio;

/// Identifiers captured from configuration space at probe time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// PCI vendor ID.
    pub vendor_id: u16,
    /// PCI device ID.
    pub device_id: u16,
    /// PCI revision ID.
    pub pci_revision: u8,
}

impl DeviceIdentity {
    /// Reads the identifiers of `node`.
    #[must_use]
    pub fn read(node: &dyn DeviceNode) -> Self {
        Self {
            vendor_id: node.read_config_u16(regs::VENDOR_ID),
            device_id: node.read_config_u16(regs::DEVICE_ID),
            pci_revision: node.read_config_u8(regs::REVISION),
        }
    }
}

/// The single external GPU the shim drives.
///
/// Identity and classification are fixed once constructed; only the register
/// window mutates.
pub struct Gpu {
    node: NodeRef,
    identity: DeviceIdentity,
    classification: Classification,
    rmmio: Rmmio,
}

impl Gpu {
    /// Wraps a probed and classified node.
    #[must_use]
    pub fn new(node: NodeRef, identity: DeviceIdentity, classification: Classification) -> Self {
        Self {
            node,
            identity,
            classification,
            rmmio: Rmmio::new(),
        }
    }

    /// The device node.
    #[must_use]
    pub fn node(&self) -> &dyn DeviceNode {
        &*self.node
    }

    /// Configuration-space identifiers.
    #[must_use]
    pub fn identity(&self) -> DeviceIdentity {
        self.identity
    }

    /// Chip family and enumeration revision.
    #[must_use]
    pub fn classification(&self) -> Classification {
        self.classification
    }

    /// Shorthand for `classification().chip`.
    #[must_use]
    pub fn chip(&self) -> ChipType {
        self.classification.chip
    }

    /// Maps the register window if needed. See [`Rmmio::ensure_mapped`].
    pub fn ensure_mapped(&mut self) -> Result<(), Fatal> {
        self.rmmio.ensure_mapped(&*self.node)
    }

    /// Reads a 32-bit register through the mapped window.
    pub fn read_reg32(&self, reg: u32) -> Result<u32, Fatal> {
        self.rmmio.read_reg32(reg)
    }

    /// Silicon sub-revision, mapping the register window first if needed.
    pub fn hardware_revision(&mut self) -> Result<u8, Fatal> {
        self.ensure_mapped()?;
        Ok(self.rmmio.revision())
    }

    /// Revision the stock hardware libraries identify the ASIC by:
    /// the family's enumeration revision plus the hardware revision.
    pub fn external_revision(&mut self) -> Result<u8, Fatal> {
        let hw = self.hardware_revision()?;
        Ok(self.classification.enum_revision.wrapping_add(hw))
    }
}

impl core::fmt::Debug for Gpu {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Gpu")
            .field("address", &self.node.address())
            .field("identity", &self.identity)
            .field("classification", &self.classification)
            .field("rmmio", &self.rmmio)
            .finish()
    }
}
