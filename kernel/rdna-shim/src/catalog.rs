//! Driver catalog loading.
//!
//! The catalog is a JSON array of driver-matching dictionaries bundled with
//! the shim. It is handed to the host as-is so the stock drivers match the
//! newly described GPU.

use alloc::string::ToString;
use alloc::vec::Vec;

use log::info;
use rdna_host_api::{DriverPersonality, HostServices, RunMode};
use serde_json::Value;

use crate::config::ShimConfig;
use crate::error::Fatal;
use crate::firmware;

/// Result of [`load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOutcome {
    /// The host is running the installer or recovery.
    SkippedRecovery,
    /// The framebuffer-only boot argument was given.
    SkippedByArgument,
    /// The catalog was registered; carries the personality count.
    Registered(usize),
}

/// Deserializes catalog `data`, named `name` in diagnostics.
pub fn decode(name: &'static str, data: &[u8]) -> Result<Vec<DriverPersonality>, Fatal> {
    let value: Value = serde_json::from_slice(data).map_err(|err| Fatal::CatalogDecode {
        name,
        reason: err.to_string(),
    })?;
    let Value::Array(entries) = value else {
        return Err(Fatal::CatalogShape {
            name,
            what: "expected an array",
        });
    };
    entries
        .into_iter()
        .map(|entry| match entry {
            Value::Object(map) => Ok(DriverPersonality::from(map)),
            _ => Err(Fatal::CatalogShape {
                name,
                what: "expected an array of dictionaries",
            }),
        })
        .collect()
}

/// Registers the bundled catalog with the host, unless the boot opted out.
pub fn load(host: &dyn HostServices, config: &ShimConfig) -> Result<CatalogOutcome, Fatal> {
    if host.run_mode().contains(RunMode::INSTALLER_RECOVERY) {
        info!(target: "rdna::catalog", "installer/recovery boot, not registering drivers");
        return Ok(CatalogOutcome::SkippedRecovery);
    }
    if host.has_boot_arg(config.fb_only_arg) {
        info!(target: "rdna::catalog", "{} given, not registering drivers", config.fb_only_arg);
        return Ok(CatalogOutcome::SkippedByArgument);
    }

    let name = config.catalog_resource;
    let desc = firmware::find(config.firmware, name).ok_or(Fatal::MissingResource(name))?;
    let drivers = decode(name, desc.data)?;
    let count = drivers.len();
    host.add_drivers(drivers).map_err(Fatal::CatalogRegister)?;
    info!(target: "rdna::catalog", "registered {count} driver personalities from {name}");
    Ok(CatalogOutcome::Registered(count))
}
