//! Fake device nodes and register windows.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rdna_host_api::pci::{regs, RMMIO_BAR};
use rdna_host_api::{DeviceNode, NodeRef, PciAddress, RegisterWindow};

/// A register aperture backed by a sparse word map.
///
/// Clones share their length, so a test can shrink a window the shim already
/// holds to zero and watch it get remapped.
#[derive(Debug, Clone)]
pub struct FakeWindow {
    len: Arc<AtomicU64>,
    words: Arc<BTreeMap<u64, u32>>,
}

impl FakeWindow {
    /// Creates a window of `len` bytes where every register reads as zero.
    #[must_use]
    pub fn new(len: u64) -> Self {
        Self {
            len: Arc::new(AtomicU64::new(len)),
            words: Arc::new(BTreeMap::new()),
        }
    }

    /// Creates a window large enough for the GPU register file, with the
    /// hardware-revision register (0xD31) reporting `revision`.
    #[must_use]
    pub fn with_hw_revision(revision: u8) -> Self {
        Self::new(0x8_0000).with_register(0xD31, u32::from(revision & 0xF) << 24)
    }

    /// Sets 32-bit register `reg` (word index) to `value`.
    #[must_use]
    pub fn with_register(mut self, reg: u32, value: u32) -> Self {
        Arc::make_mut(&mut self.words).insert(u64::from(reg) * 4, value);
        self
    }

    /// Changes the reported length of this window and all its clones.
    pub fn set_len(&self, len: u64) {
        self.len.store(len, Ordering::SeqCst);
    }
}

impl RegisterWindow for FakeWindow {
    fn len(&self) -> u64 {
        self.len.load(Ordering::SeqCst)
    }

    fn read_u32(&self, offset: u64) -> Option<u32> {
        if offset.checked_add(4)? > self.len() {
            return None;
        }
        Some(self.words.get(&offset).copied().unwrap_or(0))
    }
}

/// A PCI function with scripted identifiers.
#[derive(Debug)]
pub struct FakeNode {
    address: PciAddress,
    vendor_id: u16,
    device_id: u16,
    revision: u8,
    window: Mutex<Option<FakeWindow>>,
    map_calls: AtomicUsize,
    properties: Mutex<BTreeMap<String, Vec<u8>>>,
    name: Mutex<Option<String>>,
    published: AtomicBool,
}

impl FakeNode {
    /// Creates a node on bus 3 with the given identifiers and no aperture.
    #[must_use]
    pub fn new(vendor_id: u16, device_id: u16, revision: u8) -> Self {
        Self {
            address: PciAddress {
                bus: 3,
                device: 0,
                function: 0,
            },
            vendor_id,
            device_id,
            revision,
            window: Mutex::new(None),
            map_calls: AtomicUsize::new(0),
            properties: Mutex::new(BTreeMap::new()),
            name: Mutex::new(None),
            published: AtomicBool::new(false),
        }
    }

    /// Gives the node a BAR 5 aperture.
    #[must_use]
    pub fn with_window(self, window: FakeWindow) -> Self {
        *self.window.lock().unwrap() = Some(window);
        self
    }

    /// Pre-populates a property.
    #[must_use]
    pub fn with_property(self, name: &str, value: &[u8]) -> Self {
        self.properties
            .lock()
            .unwrap()
            .insert(name.to_owned(), value.to_vec());
        self
    }

    /// Wraps the node in a shared handle.
    #[must_use]
    pub fn into_ref(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Replaces the aperture returned by subsequent mappings.
    pub fn set_window(&self, window: Option<FakeWindow>) {
        *self.window.lock().unwrap() = window;
    }

    /// Number of times the shim asked for the BAR 5 mapping.
    pub fn map_calls(&self) -> usize {
        self.map_calls.load(Ordering::SeqCst)
    }

    /// Returns the name given by `rename`, if any.
    pub fn name(&self) -> Option<String> {
        self.name.lock().unwrap().clone()
    }

    /// Returns `true` once `await_publishing` was called.
    pub fn published(&self) -> bool {
        self.published.load(Ordering::SeqCst)
    }

    /// Returns a snapshot of every property.
    pub fn properties(&self) -> BTreeMap<String, Vec<u8>> {
        self.properties.lock().unwrap().clone()
    }

    /// Returns the named property decoded as a NUL-terminated string.
    pub fn string_property(&self, name: &str) -> Option<String> {
        let bytes = self.property(name)?;
        let text = bytes.strip_suffix(&[0]).unwrap_or(&bytes[..]);
        Some(String::from_utf8_lossy(text).into_owned())
    }

    /// Upcasts a shared fake into the handle type the shim consumes.
    pub fn node_ref(this: &Arc<Self>) -> NodeRef {
        this.clone()
    }
}

impl DeviceNode for FakeNode {
    fn address(&self) -> Option<PciAddress> {
        Some(self.address)
    }

    fn read_config_u8(&self, offset: u8) -> u8 {
        match offset {
            regs::REVISION => self.revision,
            _ => 0xFF,
        }
    }

    fn read_config_u16(&self, offset: u8) -> u16 {
        match offset {
            regs::VENDOR_ID => self.vendor_id,
            regs::DEVICE_ID => self.device_id,
            _ => 0xFFFF,
        }
    }

    fn map_register_window(&self, bar: u8) -> Option<Box<dyn RegisterWindow>> {
        self.map_calls.fetch_add(1, Ordering::SeqCst);
        if bar != RMMIO_BAR {
            return None;
        }
        let window = self.window.lock().unwrap().clone()?;
        Some(Box::new(window))
    }

    fn property(&self, name: &str) -> Option<Vec<u8>> {
        self.properties.lock().unwrap().get(name).cloned()
    }

    fn set_property(&self, name: &str, value: &[u8]) {
        self.properties
            .lock()
            .unwrap()
            .insert(name.to_owned(), value.to_vec());
    }

    fn rename(&self, name: &str) {
        *self.name.lock().unwrap() = Some(name.to_owned());
    }

    fn await_publishing(&self) {
        self.published.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_space_reads() {
        let node = FakeNode::new(0x1002, 0x73BF, 0xC1);
        assert_eq!(node.read_config_u16(regs::VENDOR_ID), 0x1002);
        assert_eq!(node.read_config_u16(regs::DEVICE_ID), 0x73BF);
        assert_eq!(node.read_config_u8(regs::REVISION), 0xC1);
    }

    #[test]
    fn window_clones_share_length() {
        let window = FakeWindow::with_hw_revision(2);
        let held = window.clone();
        window.set_len(0);
        assert!(held.is_empty());
    }

    #[test]
    fn window_reads_revision_register() {
        let window = FakeWindow::with_hw_revision(0xA);
        assert_eq!(window.read_u32(0xD31 * 4), Some(0x0A00_0000));
        assert_eq!(window.read_u32(0x8_0000), None);
    }

    #[test]
    fn string_property_strips_nul() {
        let node = FakeNode::new(0x1002, 0x73BF, 0xC1).with_property("model", b"X\0");
        assert_eq!(node.string_property("model").as_deref(), Some("X"));
    }
}
