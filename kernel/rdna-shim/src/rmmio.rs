//! Lazily mapped GPU register aperture (RMMIO, BAR 5).
//!
//! The window is mapped on first use and re-validated on every
//! [`Rmmio::ensure_mapped`] call: a mapping that is absent or reports zero
//! length is dropped and requested again. A valid mapping is never touched.

use alloc::boxed::Box;

use log::debug;
use rdna_host_api::pci::RMMIO_BAR;
use rdna_host_api::{DeviceNode, RegisterWindow};

use crate::error::Fatal;

/// Word index of the register carrying the silicon sub-revision.
pub const REVISION_REG: u32 = 0xD31;

const REVISION_MASK: u32 = 0x0F00_0000;
const REVISION_SHIFT: u32 = 24;

/// The RMMIO window of the GPU and the revision read through it.
#[derive(Default)]
pub struct Rmmio {
    window: Option<Box<dyn RegisterWindow>>,
    revision: u8,
}

impl Rmmio {
    /// Creates an accessor with nothing mapped yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a window of non-zero length is held.
    #[must_use]
    pub fn is_mapped(&self) -> bool {
        self.window.as_ref().is_some_and(|w| !w.is_empty())
    }

    /// Maps BAR 5 of `node` unless a valid window is already held.
    ///
    /// On a fresh mapping the hardware revision is re-read from
    /// [`REVISION_REG`].
    pub fn ensure_mapped(&mut self, node: &dyn DeviceNode) -> Result<(), Fatal> {
        if self.is_mapped() {
            return Ok(());
        }

        // Release the stale mapping before asking for a new one.
        self.window = None;
        let window = node
            .map_register_window(RMMIO_BAR)
            .filter(|w| !w.is_empty())
            .ok_or(Fatal::RegisterMap)?;
        debug!(target: "rdna::rmmio", "mapped BAR{RMMIO_BAR}, {:#x} bytes", window.len());

        let raw = read(&*window, REVISION_REG)?;
        self.revision = ((raw & REVISION_MASK) >> REVISION_SHIFT) as u8;
        self.window = Some(window);
        debug!(target: "rdna::rmmio", "hardware revision {:#x}", self.revision);
        Ok(())
    }

    /// Reads 32-bit register `reg` (a word index, byte offset `reg * 4`).
    pub fn read_reg32(&self, reg: u32) -> Result<u32, Fatal> {
        read(self.window.as_deref().ok_or(Fatal::RegisterMap)?, reg)
    }

    /// Hardware revision from the last successful mapping (0 before any).
    #[must_use]
    pub fn revision(&self) -> u8 {
        self.revision
    }
}

fn read(window: &dyn RegisterWindow, reg: u32) -> Result<u32, Fatal> {
    window
        .read_u32(u64::from(reg) * 4)
        .ok_or(Fatal::RegisterOutOfRange(reg))
}

impl core::fmt::Debug for Rmmio {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Rmmio")
            .field("len", &self.window.as_ref().map(|w| w.len()))
            .field("revision", &self.revision)
            .finish()
    }
}
