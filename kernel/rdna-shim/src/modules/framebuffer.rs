//! Display/framebuffer driver.

use rdna_host_api::{ModuleInfo, ModuleLoad};

use crate::error::Fatal;
use crate::router::{Disposition, HandlerContext, ModuleHandler};

/// `AMDRadeonX6000Framebuffer`.
pub static MODULE: ModuleInfo = ModuleInfo {
    bundle_id: "com.apple.kext.AMDRadeonX6000Framebuffer",
    paths: &["/System/Library/Extensions/AMDRadeonX6000Framebuffer.kext/Contents/MacOS/\
              AMDRadeonX6000Framebuffer"],
};

static MODULES: &[&ModuleInfo] = &[&MODULE];

/// Handler for [`MODULE`]; applies `PatchTables::framebuffer`.
#[derive(Debug, Clone, Copy)]
pub struct Framebuffer;

impl ModuleHandler for Framebuffer {
    fn name(&self) -> &'static str {
        "framebuffer"
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
        let table = ctx.config.patches.framebuffer;
        super::patch_for_gpu(ctx, module, load, table)
    }
}
