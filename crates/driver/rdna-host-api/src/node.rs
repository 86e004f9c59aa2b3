//! Device node and register-window contracts.
//!
//! A [`DeviceNode`] is the host's handle to a PCI function in its device
//! tree. Nodes are shared host objects: the host keeps them alive and
//! synchronises their internal state, so every method takes `&self` and the
//! shim holds them through a reference-counted [`NodeRef`].

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::pci::PciAddress;

/// Shared handle to a host device node.
pub type NodeRef = Arc<dyn DeviceNode>;

/// A device in the host's device tree.
pub trait DeviceNode {
    /// Returns the PCI address of the node, if the host knows it.
    fn address(&self) -> Option<PciAddress>;

    /// Reads an 8-bit configuration-space register.
    fn read_config_u8(&self, offset: u8) -> u8;

    /// Reads a 16-bit configuration-space register.
    fn read_config_u16(&self, offset: u8) -> u16;

    /// Maps the memory window behind base address register `bar`.
    ///
    /// Returns `None` when the host cannot map it.
    fn map_register_window(&self, bar: u8) -> Option<Box<dyn RegisterWindow>>;

    /// Returns a copy of the named property's raw bytes.
    fn property(&self, name: &str) -> Option<Vec<u8>>;

    /// Returns `true` if the named property is present.
    fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Sets (or replaces) the named property.
    fn set_property(&self, name: &str, value: &[u8]);

    /// Renames the node in the device tree.
    fn rename(&self, name: &str);

    /// Blocks until the host has finished publishing the node.
    fn await_publishing(&self);
}

/// A mapped register aperture.
pub trait RegisterWindow {
    /// Returns the length of the window in bytes.
    fn len(&self) -> u64;

    /// Returns `true` if the window has zero length.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads a 32-bit value at byte `offset`.
    ///
    /// Returns `None` if the read would leave the window.
    fn read_u32(&self, offset: u64) -> Option<u32>;
}
