//! Module-load dispatch.
//!
//! Each [`ModuleHandler`] names the foreign modules it patches. When the
//! patcher comes up, [`Router::install`] registers every one of them with the
//! host and records which handler owns the returned [`ModuleId`]. A load
//! event is then routed to the first handler owning its identity; no other
//! handler sees it.
//!
//! Work that has no module to wait for runs in a [`ReadyHandler`] instead,
//! once, from [`Router::ready`].

use alloc::boxed::Box;
use alloc::vec::Vec;

use log::{debug, trace};
use rdna_host_api::{HostServices, KernelPatcher, ModuleId, ModuleInfo, ModuleLoad};

use crate::config::ShimConfig;
use crate::error::Fatal;
use crate::gpu::Gpu;

/// Everything a handler may touch while processing a load.
pub struct HandlerContext<'a> {
    /// Host services (board identity, boot arguments, ...).
    pub host: &'a dyn HostServices,
    /// The module patcher.
    pub patcher: &'a mut dyn KernelPatcher,
    /// The GPU, if the readiness callback found one.
    pub gpu: Option<&'a mut Gpu>,
    /// Shim configuration.
    pub config: &'a ShimConfig,
}

/// What a handler did with a load it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Patch tables were applied; carries the occurrences rewritten.
    Patched(usize),
    /// Patches were queued with the host; carries the entry count.
    Routed(usize),
    /// The module was deliberately left alone.
    Skipped(&'static str),
}

/// Outcome of routing one load event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// No handler owns the module.
    Unclaimed,
    /// Exactly one handler processed the module.
    Handled {
        /// Handler name.
        handler: &'static str,
        /// Its result.
        disposition: Disposition,
    },
}

/// Patches one family of foreign modules.
pub trait ModuleHandler {
    /// Short name used in logs and [`Dispatch`].
    fn name(&self) -> &'static str;

    /// Modules this handler wants load events for.
    fn modules(&self) -> &'static [&'static ModuleInfo];

    /// Processes a load of `module`, one of [`Self::modules`].
    fn process(
        &self,
        ctx: &mut HandlerContext<'_>,
        module: &'static ModuleInfo,
        load: &ModuleLoad,
    ) -> Result<Disposition, Fatal>;
}

/// Runs once when the patcher comes up.
///
/// Hooks see the GPU (if one was found) and run before the driver catalog
/// is registered.
pub trait ReadyHandler {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Does the readiness work.
    fn on_patcher_ready(&self, ctx: &mut HandlerContext<'_>) -> Result<Disposition, Fatal>;
}

struct Route {
    id: ModuleId,
    handler: usize,
    module: &'static ModuleInfo,
}

/// Registry from module identity to handler.
#[derive(Default)]
pub struct Router {
    handlers: Vec<Box<dyn ModuleHandler>>,
    hooks: Vec<Box<dyn ReadyHandler>>,
    routes: Vec<Route>,
}

impl Router {
    /// Creates a router with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router with the stock graphics-driver handlers.
    #[must_use]
    pub fn with_default_handlers() -> Self {
        let mut router = Self::new();
        for handler in crate::modules::default_handlers() {
            router.register(handler);
        }
        for hook in crate::modules::default_hooks() {
            router.register_hook(hook);
        }
        router
    }

    /// Appends `handler`. Earlier handlers take precedence.
    pub fn register(&mut self, handler: Box<dyn ModuleHandler>) {
        self.handlers.push(handler);
    }

    /// Appends a readiness hook. Hooks run in registration order.
    pub fn register_hook(&mut self, hook: Box<dyn ReadyHandler>) {
        self.hooks.push(hook);
    }

    /// Names of the registered hooks, in run order.
    pub fn hook_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.hooks.iter().map(|h| h.name())
    }

    /// Names of the registered handlers, in precedence order.
    pub fn handler_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.iter().map(|h| h.name())
    }

    /// Registers every handler's modules with `patcher`.
    ///
    /// Calling it again rebuilds the routes from scratch.
    pub fn install(&mut self, patcher: &mut dyn KernelPatcher) {
        self.routes.clear();
        for (index, handler) in self.handlers.iter().enumerate() {
            for &module in handler.modules() {
                let id = patcher.register_module(module);
                trace!(target: "rdna::router", "{} -> {id} ({})", module.bundle_id, handler.name());
                self.routes.push(Route {
                    id,
                    handler: index,
                    module,
                });
            }
        }
    }

    /// Runs every readiness hook, stopping at the first fatal one.
    pub fn ready(&self, ctx: &mut HandlerContext<'_>) -> Result<(), Fatal> {
        for hook in &self.hooks {
            let disposition = hook.on_patcher_ready(ctx)?;
            debug!(target: "rdna::router", "ready hook {}: {disposition:?}", hook.name());
        }
        Ok(())
    }

    /// Routes `load` to the handler that owns it.
    pub fn dispatch(
        &self,
        ctx: &mut HandlerContext<'_>,
        load: &ModuleLoad,
    ) -> Result<Dispatch, Fatal> {
        let Some(route) = self.routes.iter().find(|r| r.id == load.id) else {
            return Ok(Dispatch::Unclaimed);
        };
        let handler = &self.handlers[route.handler];
        let disposition = handler.process(ctx, route.module, load)?;
        debug!(
            target: "rdna::router",
            "processed {} ({}): {disposition:?}",
            route.module.short_name(),
            handler.name()
        );
        Ok(Dispatch::Handled {
            handler: handler.name(),
            disposition,
        })
    }
}

impl core::fmt::Debug for Router {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Router")
            .field("handlers", &self.handler_names().collect::<Vec<_>>())
            .field("hooks", &self.hook_names().collect::<Vec<_>>())
            .field("routes", &self.routes.len())
            .finish()
    }
}
