//! The shim's context handle and lifecycle callbacks.

use log::{info, warn};
use rdna_host_api::{HostServices, KernelPatcher, ModuleLoad};

use crate::catalog;
use crate::chip;
use crate::config::ShimConfig;
use crate::error::Fatal;
use crate::gpu::{DeviceIdentity, Gpu};
use crate::pci;
use crate::properties;
use crate::router::{Dispatch, HandlerContext, Router};

/// State owned by one shim instance for the lifetime of the boot.
///
/// The embedding layer creates exactly one, calls [`Shim::init`] while the
/// host still accepts module registrations, and then forwards the two host
/// callbacks to [`Shim::on_patcher_ready`] and [`Shim::on_module_loaded`].
#[derive(Debug)]
pub struct Shim {
    config: ShimConfig,
    router: Router,
    gpu: Option<Gpu>,
    ready: bool,
}

impl Shim {
    /// Creates a shim with the stock module handlers.
    #[must_use]
    pub fn new(config: ShimConfig) -> Self {
        Self::with_router(config, Router::with_default_handlers())
    }

    /// Creates a shim dispatching through `router`.
    #[must_use]
    pub fn with_router(config: ShimConfig, router: Router) -> Self {
        Self {
            config,
            router,
            gpu: None,
            ready: false,
        }
    }

    /// Registers every patched module with the host loader.
    pub fn init(&mut self, patcher: &mut dyn KernelPatcher) {
        self.router.install(patcher);
        info!(target: "rdna", "rdna-shim {} initialised", env!("CARGO_PKG_VERSION"));
    }

    /// Handles the patcher-ready callback.
    ///
    /// Probes, classifies and describes the GPU, runs the readiness hooks,
    /// then registers the driver catalog. A host that cannot produce a
    /// device list is logged and the GPU steps are skipped; the hooks and
    /// the catalog step still run. Only the first call does anything.
    pub fn on_patcher_ready(
        &mut self,
        host: &dyn HostServices,
        patcher: &mut dyn KernelPatcher,
    ) -> Result<(), Fatal> {
        if self.ready {
            warn!(target: "rdna", "patcher-ready delivered twice, ignoring");
            return Ok(());
        }
        self.ready = true;

        match host.device_info() {
            Ok(mut info) => {
                let node = pci::find_gpu(info.as_mut())?;
                let identity = DeviceIdentity::read(&*node);
                let classification = chip::classify(identity.device_id, host.kernel_version())?;
                properties::inject(&*node, identity, classification.chip);
                self.gpu = Some(Gpu::new(node, identity, classification));
            }
            Err(err) => warn!(target: "rdna", "failed to create device info: {err}"),
        }

        let mut ctx = HandlerContext {
            host,
            patcher,
            gpu: self.gpu.as_mut(),
            config: &self.config,
        };
        self.router.ready(&mut ctx)?;

        catalog::load(host, &self.config)?;
        Ok(())
    }

    /// Handles one module-load event.
    pub fn on_module_loaded(
        &mut self,
        host: &dyn HostServices,
        patcher: &mut dyn KernelPatcher,
        load: &ModuleLoad,
    ) -> Result<Dispatch, Fatal> {
        let mut ctx = HandlerContext {
            host,
            patcher,
            gpu: self.gpu.as_mut(),
            config: &self.config,
        };
        self.router.dispatch(&mut ctx, load)
    }

    /// The GPU found by [`Shim::on_patcher_ready`], if any.
    #[must_use]
    pub fn gpu(&self) -> Option<&Gpu> {
        self.gpu.as_ref()
    }
}

impl Default for Shim {
    fn default() -> Self {
        Self::new(ShimConfig::default())
    }
}
