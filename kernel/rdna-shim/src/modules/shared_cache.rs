//! Shared user-space library cache.
//!
//! The user-space graphics stack lives in the host's shared library cache,
//! which is never loaded as a module. Its patches are handed to the host
//! once at readiness and applied as cache pages are validated.

use alloc::vec::Vec;

use log::info;
use rdna_host_api::LookupPatch;

use crate::error::Fatal;
use crate::router::{Disposition, HandlerContext, ReadyHandler};

/// Skip reason when no table entry covers the GPU's chip.
pub const NOTHING_TO_ROUTE: &str = "no shared-cache patches for this chip";

/// Routes `PatchTables::shared_cache` for the GPU's chip.
#[derive(Debug, Clone, Copy)]
pub struct SharedCache;

impl ReadyHandler for SharedCache {
    fn name(&self) -> &'static str {
        "shared-cache"
    }

    fn on_patcher_ready(&self, ctx: &mut HandlerContext<'_>) -> Result<Disposition, Fatal> {
        let Some(gpu) = ctx.gpu.as_deref() else {
            return Ok(Disposition::Skipped(super::NO_GPU));
        };
        let chip = gpu.chip();
        let patches: Vec<LookupPatch<'static>> = ctx
            .config
            .patches
            .shared_cache
            .iter()
            .filter(|gated| gated.applies_to(chip))
            .map(|gated| gated.patch)
            .collect();
        if patches.is_empty() {
            return Ok(Disposition::Skipped(NOTHING_TO_ROUTE));
        }

        ctx.patcher
            .route_shared_cache(&patches)
            .map_err(Fatal::SharedCacheRoute)?;
        info!(target: "rdna::cache", "routed {} shared-cache patches for {chip}", patches.len());
        Ok(Disposition::Routed(patches.len()))
    }
}
