//! Device identification and foreign-module patching for AMD RDNA 2 GPUs.
//!
//! The shim runs inside a host kernel that ships no support for Navi 2x
//! parts. It finds the GPU, classifies it, describes it to the host's stock
//! drivers, and rewrites those drivers' hard-coded tables as they load.
//!
//! Two host callbacks drive everything, both through a [`Shim`] handle:
//!
//! 1. [`Shim::on_patcher_ready`] (once): [`pci::find_gpu`] →
//!    [`chip::classify`] → [`properties::inject`] → [`router::Router::ready`]
//!    (shared-cache routing) → [`catalog::load`].
//! 2. [`Shim::on_module_loaded`] (per foreign module): [`router::Router`]
//!    hands the load to exactly one [`router::ModuleHandler`], which applies
//!    its lookup patches through [`patch::apply_all`].
//!
//! Every unrecoverable condition surfaces as [`Fatal`]. The embedding layer
//! decides what to do with it; on a real boot that is [`halt`].

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod branding;
pub mod catalog;
pub mod chip;
pub mod config;
pub mod error;
pub mod firmware;
pub mod gpu;
pub mod modules;
pub mod patch;
pub mod pci;
pub mod properties;
pub mod rmmio;
pub mod router;
pub mod shim;

pub use catalog::CatalogOutcome;
pub use chip::{ChipMask, ChipType, Classification};
pub use config::{GatedPatch, PatchTables, ShimConfig};
pub use error::{halt, Fatal};
pub use gpu::{DeviceIdentity, Gpu};
pub use router::{Dispatch, Disposition, HandlerContext, ModuleHandler, ReadyHandler, Router};
pub use shim::Shim;
