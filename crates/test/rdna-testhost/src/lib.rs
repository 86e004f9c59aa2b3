//! In-memory host for running the RDNA 2 shim off-target.
//!
//! Every collaborator trait from `rdna-host-api` has a fake here:
//!
//! - [`FakeNode`] / [`FakeWindow`] -- a PCI function with scripted config
//!   space, a property table and an optional BAR 5 aperture.
//! - [`FakeHost`] -- board identity, kernel version, run mode, boot arguments,
//!   the external video list and a recording driver catalogue.
//! - [`FakePatcher`] -- a module loader that keeps module images in memory
//!   and applies lookup patches to them with `rdna_lookup::apply`, plus a
//!   record of the patches routed into the shared library cache.
//!
//! Used by unit and integration tests and by the `rdna-replay` tool.

mod host;
mod node;
mod patcher;

pub use host::{FakeDeviceInfo, FakeHost};
pub use node::{FakeNode, FakeWindow};
pub use patcher::FakePatcher;
