//! Handlers for the foreign modules the shim patches.
//!
//! | Handler           | Module(s)                                   |
//! |-------------------|---------------------------------------------|
//! | `graphics-policy` | `AppleGraphicsDevicePolicy`                 |
//! | `framebuffer`     | `AMDRadeonX6000Framebuffer`                 |
//! | `hwlibs`          | `AMDRadeonX6800HWLibs`, `AMDRadeonX6810HWLibs` |
//! | `accelerator`     | `AMDRadeonX6000`                            |
//!
//! The `shared-cache` hook has no module; it routes its table into the
//! shared library cache when the patcher comes up.

use alloc::boxed::Box;
use alloc::vec::Vec;

use rdna_host_api::{ModuleInfo, ModuleLoad};

use crate::config::GatedPatch;
use crate::error::Fatal;
use crate::patch;
use crate::router::{Disposition, HandlerContext, ModuleHandler, ReadyHandler};

pub mod accel;
pub mod framebuffer;
pub mod hwlibs;
pub mod policy;
pub mod shared_cache;

/// The stock handlers in precedence order.
#[must_use]
pub fn default_handlers() -> Vec<Box<dyn ModuleHandler>> {
    let handlers: [Box<dyn ModuleHandler>; 4] = [
        Box::new(policy::GraphicsPolicy),
        Box::new(framebuffer::Framebuffer),
        Box::new(hwlibs::HwLibs),
        Box::new(accel::Accelerator),
    ];
    Vec::from(handlers)
}

/// The stock readiness hooks in run order.
#[must_use]
pub fn default_hooks() -> Vec<Box<dyn ReadyHandler>> {
    let hooks: [Box<dyn ReadyHandler>; 1] = [Box::new(shared_cache::SharedCache)];
    Vec::from(hooks)
}

/// Skip reason for GPU-specific handlers when no GPU was found.
pub const NO_GPU: &str = "no GPU";

/// Applies the entries of `table` matching the GPU's chip.
pub(crate) fn patch_for_gpu(
    ctx: &mut HandlerContext<'_>,
    module: &'static ModuleInfo,
    load: &ModuleLoad,
    table: &[GatedPatch],
) -> Result<Disposition, Fatal> {
    let Some(gpu) = ctx.gpu.as_deref() else {
        return Ok(Disposition::Skipped(NO_GPU));
    };
    let applied = patch::apply_gated(
        &mut *ctx.patcher,
        module.short_name(),
        load,
        gpu.chip(),
        table,
    )?;
    Ok(Disposition::Patched(applied))
}
