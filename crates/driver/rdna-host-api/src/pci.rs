//! PCI configuration-space layout and device-ID matching.

/// Location of a PCI function, printed as `bus:slot.function`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PciAddress {
    /// Bus number.
    pub bus: u8,
    /// Slot on the bus (0-31).
    pub device: u8,
    /// Function within the slot (0-7).
    pub function: u8,
}

impl core::fmt::Display for PciAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02x}:{:02x}.{}", self.bus, self.device, self.function)
    }
}

/// Configuration-space offsets the shim reads.
pub mod regs {
    /// Vendor ID (u16).
    pub const VENDOR_ID: u8 = 0x00;
    /// Device ID (u16).
    pub const DEVICE_ID: u8 = 0x02;
    /// Revision ID (u8).
    pub const REVISION: u8 = 0x08;
}

/// Well-known vendor IDs.
pub mod vendor {
    /// ATI Technologies / AMD graphics.
    pub const ATI_AMD: u16 = 0x1002;
}

/// Base address register index holding the GPU's register aperture.
pub const RMMIO_BAR: u8 = 5;

/// Vendor/device pattern for driver-to-device matching.
///
/// The device ID is compared under `device_mask`, so a single entry can claim
/// a whole family block (for example every `0x73xx` part).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PciDeviceId {
    /// Vendor ID, compared exactly.
    pub vendor: u16,
    /// Device ID, compared under `device_mask`.
    pub device: u16,
    /// Bits of the device ID that participate in the comparison.
    pub device_mask: u16,
}

impl PciDeviceId {
    /// Creates an ID entry matching every device whose masked ID equals `device`.
    #[must_use]
    pub const fn masked(vendor: u16, device: u16, device_mask: u16) -> Self {
        Self {
            vendor,
            device: device & device_mask,
            device_mask,
        }
    }

    /// Returns `true` if this entry matches the given identifiers.
    #[must_use]
    pub const fn matches(&self, vendor: u16, device: u16) -> bool {
        self.vendor == vendor && (device & self.device_mask) == self.device
    }
}
