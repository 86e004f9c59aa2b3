//! Chip-family classification.
//!
//! Maps a PCI device ID onto one of the four Navi 2x families and the
//! enumeration revision the stock drivers key their tables on. An ID outside
//! the known blocks is fatal; there is no default family.

use core::fmt;

use bitflags::bitflags;
use log::info;
use rdna_host_api::KernelVersion;

use crate::error::Fatal;

/// Navi 2x chip family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChipType {
    /// Navi 21 (RX 6800/6900 series).
    Navi21,
    /// Navi 22 (RX 6700 series).
    Navi22,
    /// Navi 23 (RX 6600 series).
    Navi23,
    /// Navi 24 (RX 6400/6500 series).
    Navi24,
}

impl ChipType {
    /// Returns the family for `device_id`, or `None` for an unknown part.
    #[must_use]
    pub const fn from_device_id(device_id: u16) -> Option<Self> {
        match device_id {
            0x73A2..=0x73A3 | 0x73A5 | 0x73AB | 0x73AF | 0x73BF => Some(Self::Navi21),
            0x73DF => Some(Self::Navi22),
            0x73E0..=0x73E1 | 0x73E3 | 0x73EF | 0x73FF => Some(Self::Navi23),
            0x7421..=0x7423 | 0x743F => Some(Self::Navi24),
            _ => None,
        }
    }

    /// Enumeration revision the stock drivers expect for this family.
    #[must_use]
    pub const fn enum_revision(self) -> u8 {
        match self {
            Self::Navi21 => 0x28,
            Self::Navi22 => 0x32,
            Self::Navi23 => 0x3C,
            Self::Navi24 => 0x46,
        }
    }

    /// Oldest host kernel the family works on, if gated.
    #[must_use]
    pub const fn min_kernel(self) -> Option<KernelVersion> {
        match self {
            Self::Navi21 => None,
            Self::Navi22 | Self::Navi23 | Self::Navi24 => Some(KernelVersion::MONTEREY),
        }
    }

    /// The single-bit mask for this family.
    #[must_use]
    pub const fn mask(self) -> ChipMask {
        match self {
            Self::Navi21 => ChipMask::NAVI21,
            Self::Navi22 => ChipMask::NAVI22,
            Self::Navi23 => ChipMask::NAVI23,
            Self::Navi24 => ChipMask::NAVI24,
        }
    }
}

impl fmt::Display for ChipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Navi21 => "Navi 21",
            Self::Navi22 => "Navi 22",
            Self::Navi23 => "Navi 23",
            Self::Navi24 => "Navi 24",
        })
    }
}

bitflags! {
    /// Set of chip families a patch applies to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChipMask: u8 {
        /// Navi 21.
        const NAVI21 = 1 << 0;
        /// Navi 22.
        const NAVI22 = 1 << 1;
        /// Navi 23.
        const NAVI23 = 1 << 2;
        /// Navi 24.
        const NAVI24 = 1 << 3;
        /// Every family.
        const ALL = Self::NAVI21.bits() | Self::NAVI22.bits() | Self::NAVI23.bits() | Self::NAVI24.bits();
    }
}

impl ChipMask {
    /// Returns `true` if `chip` is in the set.
    #[must_use]
    pub const fn covers(self, chip: ChipType) -> bool {
        self.contains(chip.mask())
    }
}

/// Result of classifying the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Chip family.
    pub chip: ChipType,
    /// Enumeration revision for `chip`.
    pub enum_revision: u8,
}

/// Classifies `device_id` on a host running `kernel`.
///
/// Fails with [`Fatal::UnknownDevice`] for IDs outside every family and with
/// [`Fatal::UnsupportedHost`] when the family needs a newer kernel.
pub fn classify(device_id: u16, kernel: KernelVersion) -> Result<Classification, Fatal> {
    let chip = ChipType::from_device_id(device_id).ok_or(Fatal::UnknownDevice(device_id))?;
    if let Some(required) = chip.min_kernel().filter(|&required| kernel < required) {
        return Err(Fatal::UnsupportedHost {
            chip,
            required,
            found: kernel,
        });
    }

    let classification = Classification {
        chip,
        enum_revision: chip.enum_revision(),
    };
    info!(
        target: "rdna::chip",
        "device {device_id:#06x} is {chip}, enum revision {:#04x}",
        classification.enum_revision
    );
    Ok(classification)
}
