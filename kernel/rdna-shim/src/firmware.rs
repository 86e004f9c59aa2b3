//! Resources compiled into the shim, looked up by name.

/// A named blob in the bundle.
#[derive(Debug, Clone, Copy)]
pub struct FirmwareDesc {
    /// Resource name.
    pub name: &'static str,
    /// Raw contents.
    pub data: &'static [u8],
}

/// Every resource the shim ships.
pub static BUNDLED: &[FirmwareDesc] = &[FirmwareDesc {
    name: "Drivers.json",
    data: include_bytes!("../resources/Drivers.json"),
}];

/// Finds `name` in `bundle`.
#[must_use]
pub fn find<'a>(bundle: &'a [FirmwareDesc], name: &str) -> Option<&'a FirmwareDesc> {
    bundle.iter().find(|desc| desc.name == name)
}
