//! Marketing names for Navi 2x boards.
//!
//! Every name starts with [`MODEL_PREFIX`]; the metadata injector relies on
//! that to derive the short device name.

/// Prefix shared by every model string.
pub const MODEL_PREFIX: &str = "AMD Radeon RX ";

struct Brand {
    device_id: u16,
    /// `None` matches any revision of the device.
    revision: Option<u8>,
    name: &'static str,
}

const fn exact(device_id: u16, revision: u8, name: &'static str) -> Brand {
    Brand {
        device_id,
        revision: Some(revision),
        name,
    }
}

const fn any(device_id: u16, name: &'static str) -> Brand {
    Brand {
        device_id,
        revision: None,
        name,
    }
}

// Revision-specific entries come before the device fallback.
static BRANDS: &[Brand] = &[
    // Navi 21
    any(0x73A5, "AMD Radeon RX 6950 XT"),
    any(0x73AF, "AMD Radeon RX 6900 XT"),
    exact(0x73BF, 0xC0, "AMD Radeon RX 6900 XT"),
    exact(0x73BF, 0xC1, "AMD Radeon RX 6800 XT"),
    exact(0x73BF, 0xC3, "AMD Radeon RX 6800"),
    any(0x73BF, "AMD Radeon RX 6800 XT"),
    any(0x73A2, "AMD Radeon RX 6800 Series"),
    any(0x73A3, "AMD Radeon RX 6800 Series"),
    any(0x73AB, "AMD Radeon RX 6800 Series"),
    // Navi 22
    exact(0x73DF, 0xC3, "AMD Radeon RX 6800M"),
    exact(0x73DF, 0xC5, "AMD Radeon RX 6700 XT"),
    exact(0x73DF, 0xCF, "AMD Radeon RX 6700M"),
    exact(0x73DF, 0xFF, "AMD Radeon RX 6700"),
    any(0x73DF, "AMD Radeon RX 6700 XT"),
    // Navi 23
    exact(0x73EF, 0xC0, "AMD Radeon RX 6800S"),
    exact(0x73EF, 0xC1, "AMD Radeon RX 6650 XT"),
    exact(0x73EF, 0xC3, "AMD Radeon RX 6650M"),
    exact(0x73EF, 0xC4, "AMD Radeon RX 6700S"),
    any(0x73EF, "AMD Radeon RX 6650 XT"),
    exact(0x73FF, 0xC3, "AMD Radeon RX 6600M"),
    exact(0x73FF, 0xC7, "AMD Radeon RX 6600"),
    exact(0x73FF, 0xCB, "AMD Radeon RX 6600S"),
    any(0x73FF, "AMD Radeon RX 6600 XT"),
    any(0x73E0, "AMD Radeon RX 6600 Series"),
    any(0x73E1, "AMD Radeon RX 6600 Series"),
    any(0x73E3, "AMD Radeon RX 6600 Series"),
    // Navi 24
    exact(0x743F, 0xC3, "AMD Radeon RX 6500M"),
    exact(0x743F, 0xC7, "AMD Radeon RX 6400"),
    exact(0x743F, 0xCF, "AMD Radeon RX 6300M"),
    any(0x743F, "AMD Radeon RX 6500 XT"),
    any(0x7421, "AMD Radeon RX 6500 Series"),
    any(0x7422, "AMD Radeon RX 6500 Series"),
    any(0x7423, "AMD Radeon RX 6500 Series"),
];

/// Returns the marketing name of `(device_id, revision)`, if known.
#[must_use]
pub fn model_name(device_id: u16, revision: u8) -> Option<&'static str> {
    BRANDS
        .iter()
        .find(|b| b.device_id == device_id && b.revision.is_none_or(|r| r == revision))
        .map(|b| b.name)
}
