//! Host collaborator traits and types for the RDNA 2 enablement shim.
//!
//! The shim never talks to the host kernel directly. Everything it needs is
//! expressed here as a small set of traits the embedding layer implements:
//!
//! - **Devices** -- [`DeviceNode`] (config space, properties, publication) and
//!   [`RegisterWindow`] (a mapped BAR) for the discovered GPU.
//! - **Discovery** -- [`DeviceInfo`], the host's list of external video devices.
//! - **Services** -- [`HostServices`] for board identity, kernel version, run
//!   mode, boot arguments and driver registration.
//! - **Patching** -- [`KernelPatcher`] for module registration, the
//!   lookup-patch primitive applied to loaded modules, and patch routing into
//!   the shared user-space library cache.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod catalog;
pub mod error;
pub mod node;
pub mod pci;
pub mod registration;
pub mod services;
pub mod version;

// Re-export all public types at the crate root for ergonomic imports.
pub use catalog::DriverPersonality;
pub use error::HostError;
pub use node::{DeviceNode, NodeRef, RegisterWindow};
pub use pci::{PciAddress, PciDeviceId};
pub use registration::{ModuleId, ModuleInfo, ModuleLoad};
pub use services::{DeviceInfo, HostServices, KernelPatcher, RunMode, VideoEntry};
pub use version::KernelVersion;

pub use rdna_lookup::{LookupPatch, PatchError};
