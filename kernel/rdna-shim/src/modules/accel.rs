//! Graphics accelerator driver.

use rdna_host_api::{ModuleInfo, ModuleLoad};

use crate::error::Fatal;
use crate::router::{Disposition, HandlerContext, ModuleHandler};

/// `AMDRadeonX6000`.
pub static MODULE: ModuleInfo = ModuleInfo {
    bundle_id: "com.apple.kext.AMDRadeonX6000",
    paths: &["/System/Library/Extensions/AMDRadeonX6000.kext/Contents/MacOS/AMDRadeonX6000"],
};

static MODULES: &[&ModuleInfo] = &[&MODULE];

/// Handler for [`MODULE`]; applies `PatchTables::accel`.
#[derive(Debug, Clone, Copy)]
pub struct Accelerator;

impl ModuleHandler for Accelerator {
    fn name(&self) -> &'static str {
        "accelerator"
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
        let table = ctx.config.patches.accel;
        super::patch_for_gpu(ctx, module, load, table)
    }
}
