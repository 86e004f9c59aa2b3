//! Compiled-in configuration.
//!
//! Everything the shim consults besides the host's own answers lives in one
//! [`ShimConfig`]. [`ShimConfig::default`] is what a real boot uses; tests and
//! the replay tool build variants with their own patch tables.

use rdna_host_api::LookupPatch;

use crate::chip::{ChipMask, ChipType};
use crate::firmware::{self, FirmwareDesc};

/// A lookup patch restricted to a set of chip families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatedPatch {
    /// Families the patch applies to.
    pub chips: ChipMask,
    /// The substitution.
    pub patch: LookupPatch<'static>,
}

impl GatedPatch {
    /// A patch for every family.
    #[must_use]
    pub const fn all(patch: LookupPatch<'static>) -> Self {
        Self {
            chips: ChipMask::ALL,
            patch,
        }
    }

    /// A patch for the families in `chips` only.
    #[must_use]
    pub const fn only(chips: ChipMask, patch: LookupPatch<'static>) -> Self {
        Self { chips, patch }
    }

    /// Returns `true` if the patch applies to `chip`.
    #[must_use]
    pub const fn applies_to(&self, chip: ChipType) -> bool {
        self.chips.covers(chip)
    }
}

/// Per-module patch tables for the stock graphics drivers.
///
/// The byte patterns depend on the exact driver build the host ships, so
/// the defaults are empty and an embedding supplies its own tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchTables {
    /// Display/framebuffer driver.
    pub framebuffer: &'static [GatedPatch],
    /// Hardware-services libraries (both variants).
    pub hwlibs: &'static [GatedPatch],
    /// Graphics accelerator driver.
    pub accel: &'static [GatedPatch],
    /// Shared user-space library cache, routed once at readiness.
    pub shared_cache: &'static [GatedPatch],
}

/// Compiled-in shim configuration.
#[derive(Debug, Clone, Copy)]
pub struct ShimConfig {
    /// Name of the bundled driver catalog.
    pub catalog_resource: &'static str,
    /// Boot argument that disables the driver catalog.
    pub fb_only_arg: &'static str,
    /// Boards whose graphics policy already accepts any GPU.
    pub compatible_boards: &'static [&'static str],
    /// Resource bundle the catalog is read from.
    pub firmware: &'static [FirmwareDesc],
    /// Foreign-module patch tables.
    pub patches: PatchTables,
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self {
            catalog_resource: "Drivers.json",
            fb_only_arg: "-rdnafbonly",
            compatible_boards: &[
                "Mac-27AD2F918AE68F61", // MacPro7,1
                "Mac-7BA5B2D9E42DDD94", // iMacPro1,1
            ],
            firmware: firmware::BUNDLED,
            patches: PatchTables::default(),
        }
    }
}

impl ShimConfig {
    /// Returns `true` if `board_id` is on the compatible-board list.
    #[must_use]
    pub fn is_compatible_board(&self, board_id: &str) -> bool {
        self.compatible_boards.contains(&board_id)
    }
}
