//! Hardware-services libraries.
//!
//! The host ships two variants: X6800 for Navi 21 and X6810 for the smaller
//! parts. Only the variant matching the GPU is patched. Its ASIC tables are
//! keyed by the external revision, so the register window is mapped here
//! before any patch runs.

use log::info;
use rdna_host_api::{ModuleInfo, ModuleLoad};

use crate::chip::ChipType;
use crate::error::Fatal;
use crate::router::{Disposition, HandlerContext, ModuleHandler};

/// `AMDRadeonX6800HWLibs`, used by Navi 21.
pub static X6800: ModuleInfo = ModuleInfo {
    bundle_id: "com.apple.kext.AMDRadeonX6800HWLibs",
    paths: &["/System/Library/Extensions/AMDRadeonX6000HWServices.kext/Contents/PlugIns/\
              AMDRadeonX6800HWLibs.kext/Contents/MacOS/AMDRadeonX6800HWLibs"],
};

/// `AMDRadeonX6810HWLibs`, used by Navi 22, 23 and 24.
pub static X6810: ModuleInfo = ModuleInfo {
    bundle_id: "com.apple.kext.AMDRadeonX6810HWLibs",
    paths: &["/System/Library/Extensions/AMDRadeonX6000HWServices.kext/Contents/PlugIns/\
              AMDRadeonX6810HWLibs.kext/Contents/MacOS/AMDRadeonX6810HWLibs"],
};

static MODULES: &[&ModuleInfo] = &[&X6800, &X6810];

/// Skip reason for the variant the GPU does not use.
pub const OTHER_VARIANT: &str = "library for another chip";

/// The library variant `chip` loads.
#[must_use]
pub fn library_for(chip: ChipType) -> &'static ModuleInfo {
    match chip {
        ChipType::Navi21 => &X6800,
        ChipType::Navi22 | ChipType::Navi23 | ChipType::Navi24 => &X6810,
    }
}

/// Handler for [`X6800`] and [`X6810`]; applies `PatchTables::hwlibs`.
///
/// Resolving the external revision is what maps the register window before
/// the library initialises. The value itself is only logged.
#[derive(Debug, Clone, Copy)]
pub struct HwLibs;

impl ModuleHandler for HwLibs {
    fn name(&self) -> &'static str {
        "hwlibs"
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
        let Some(gpu) = ctx.gpu.as_deref_mut() else {
            return Ok(Disposition::Skipped(super::NO_GPU));
        };
        if library_for(gpu.chip()).bundle_id != module.bundle_id {
            return Ok(Disposition::Skipped(OTHER_VARIANT));
        }

        let external = gpu.external_revision()?;
        info!(
            target: "rdna::hwlibs",
            "{}: {}, external revision {external:#04x}",
            module.short_name(),
            gpu.chip()
        );

        let table = ctx.config.patches.hwlibs;
        super::patch_for_gpu(ctx, module, load, table)
    }
}
