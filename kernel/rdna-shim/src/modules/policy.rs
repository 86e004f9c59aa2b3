//! Graphics device policy.
//!
//! The policy module looks up a per-board GPU whitelist under the
//! `board-id` key. Renaming the key makes the lookup miss, which leaves any
//! GPU allowed. Boards that already allow any GPU are not touched.

use log::info;
use rdna_host_api::{LookupPatch, ModuleInfo, ModuleLoad};

use crate::error::Fatal;
use crate::patch;
use crate::router::{Disposition, HandlerContext, ModuleHandler};

/// `AppleGraphicsDevicePolicy`.
pub static MODULE: ModuleInfo = ModuleInfo {
    bundle_id: "com.apple.driver.AppleGraphicsDevicePolicy",
    paths: &["/System/Library/Extensions/AppleGraphicsControl.kext/Contents/PlugIns/\
              AppleGraphicsDevicePolicy.kext/Contents/MacOS/AppleGraphicsDevicePolicy"],
};

static MODULES: &[&ModuleInfo] = &[&MODULE];

/// Renames the board-id lookup key.
pub const BOARD_ID_PATCH: LookupPatch<'static> =
    LookupPatch::new(b"board-id\0", b"applehax\0", 1);

/// Skip reason for boards on the compatible list.
pub const COMPATIBLE_BOARD: &str = "compatible board";

/// Handler for [`MODULE`].
#[derive(Debug, Clone, Copy)]
pub struct GraphicsPolicy;

impl ModuleHandler for GraphicsPolicy {
    fn name(&self) -> &'static str {
        "graphics-policy"
    }

    fn modules(&self) -> &'static [&'static ModuleInfo] {
        MODULES
    }

    fn process(
        &self,
        ctx: &mut HandlerContext<'_>,
        module: &'static ModuleInfo,
        load: &ModuleLoad,
    ) -> Result<Disposition, Fatal> {
        let board = ctx.host.board_identifier();
        if ctx.config.is_compatible_board(board) {
            info!(
                target: "rdna::policy",
                "{board} is compatible, leaving {} alone",
                module.short_name()
            );
            return Ok(Disposition::Skipped(COMPATIBLE_BOARD));
        }
        let applied =
            patch::apply_all(&mut *ctx.patcher, module.short_name(), load, &[BOARD_ID_PATCH])?;
        Ok(Disposition::Patched(applied))
    }
}
