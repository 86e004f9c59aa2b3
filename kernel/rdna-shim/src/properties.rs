//! Device-tree properties describing the GPU to the stock drivers.
//!
//! String properties are stored NUL-terminated, the way the host's property
//! parser expects them.

use alloc::vec::Vec;

use log::{debug, warn};
use rdna_host_api::DeviceNode;

use crate::branding::{self, MODEL_PREFIX};
use crate::chip::ChipType;
use crate::gpu::DeviceIdentity;

/// Marketing model string.
pub const MODEL: &str = "model";
/// Family label.
pub const FAMILY_NAME: &str = "ATY,FamilyName";
/// Model string without the vendor prefix.
pub const DEVICE_NAME: &str = "ATY,DeviceName";
/// Non-removable marker.
pub const BUILT_IN: &str = "built-in";
/// Frame-buffer personality alias.
pub const FRAMEBUFFER_NAME: &str = "@0,name";

/// Fixed value of [`FAMILY_NAME`].
pub const FAMILY_LABEL: &str = "Radeon RX";

/// Length of the vendor prefix every model string starts with.
pub const MODEL_PREFIX_LEN: usize = MODEL_PREFIX.len();

const _: () = assert!(MODEL_PREFIX_LEN == 14);

/// Returns the part of `model` after the fixed vendor prefix.
///
/// `None` if the model is too short or the cut would split a character.
#[must_use]
pub fn device_name(model: &str) -> Option<&str> {
    model.get(MODEL_PREFIX_LEN..).filter(|rest| !rest.is_empty())
}

/// Frame-buffer alias for `chip` at `pci_revision`.
///
/// Navi 22 and Navi 24 have no named frame-buffer and get no alias.
#[must_use]
pub fn framebuffer_alias(chip: ChipType, pci_revision: u8) -> Option<&'static str> {
    match chip {
        ChipType::Navi21 if matches!(pci_revision, 0xC1 | 0xC3) => Some("ATY,Belknap"),
        ChipType::Navi21 => Some("ATY,Carswell"),
        ChipType::Navi23 => Some("ATY,Henbury"),
        ChipType::Navi22 | ChipType::Navi24 => None,
    }
}

fn c_string(value: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(value.len() + 1);
    bytes.extend_from_slice(value.as_bytes());
    bytes.push(0);
    bytes
}

fn set_string(node: &dyn DeviceNode, name: &str, value: &str) {
    node.set_property(name, &c_string(value));
}

/// Attaches the descriptive properties to the GPU node.
///
/// The model, family and device names are only written when the node has no
/// `model` yet and the branding table knows the board. `built-in` is always
/// written. The frame-buffer alias follows [`framebuffer_alias`].
pub fn inject(node: &dyn DeviceNode, identity: DeviceIdentity, chip: ChipType) {
    if node.has_property(MODEL) {
        debug!(target: "rdna::props", "keeping existing model");
    } else if let Some(model) = branding::model_name(identity.device_id, identity.pci_revision) {
        set_string(node, MODEL, model);
        set_string(node, FAMILY_NAME, FAMILY_LABEL);
        if let Some(short) = device_name(model) {
            set_string(node, DEVICE_NAME, short);
        }
        debug!(target: "rdna::props", "model set to {model}");
    } else {
        warn!(
            target: "rdna::props",
            "no model name for {:04x} rev {:02x}",
            identity.device_id,
            identity.pci_revision
        );
    }

    node.set_property(BUILT_IN, &[0x00]);

    if let Some(alias) = framebuffer_alias(chip, identity.pci_revision) {
        set_string(node, FRAMEBUFFER_NAME, alias);
        debug!(target: "rdna::props", "frame-buffer alias {alias}");
    }
}
