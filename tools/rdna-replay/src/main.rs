//! Host-side replay of an RDNA 2 shim boot.
//!
//! Usage:
//!   rdna-replay run <scenario.toml>      - Boot the scenario and load its modules
//!   rdna-replay run --halt <scenario>    - Same, but panic on a fatal condition
//!   rdna-replay classify 0x73BF          - Classify a device ID

mod scenario;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use rdna_host_api::{DeviceNode, KernelVersion};
use rdna_shim::{chip, Fatal, Shim, ShimConfig};
use rdna_testhost::{FakeNode, FakePatcher};

use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "rdna-replay")]
#[command(about = "Replay a boot scenario through rdna-shim")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Boot a scenario and deliver its module loads
    Run {
        /// Scenario file
        scenario: PathBuf,

        /// Halt (panic) on a fatal condition, as a real boot would
        #[arg(long)]
        halt: bool,
    },

    /// Classify a PCI device ID
    Classify {
        /// Device ID, decimal or 0x-prefixed hex
        #[arg(value_parser = parse_u16)]
        device_id: u16,

        /// Darwin major version of the host
        #[arg(short, long, default_value_t = KernelVersion::SEQUOIA.0)]
        kernel: u8,
    },
}

fn parse_u16(value: &str) -> Result<u16, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|err| format!("invalid device ID `{value}`: {err}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Run { scenario, halt } => {
            let loaded = Scenario::load(&scenario)?;
            let base = scenario.parent().unwrap_or_else(|| Path::new("."));
            run(&loaded, base, halt)?;
        }
        Commands::Classify { device_id, kernel } => {
            let class = chip::classify(device_id, KernelVersion(kernel))
                .map_err(|fatal| anyhow!(fatal))
                .with_context(|| format!("Failed to classify {device_id:#06x}"))?;
            println!(
                "{device_id:#06x}: {} (enum revision {:#04x})",
                class.chip, class.enum_revision
            );
        }
    }

    Ok(())
}

/// Surfaces a fatal condition: panics with `--halt`, otherwise an error.
fn surface(step: &str, fatal: Fatal, halt: bool) -> anyhow::Error {
    if halt {
        rdna_shim::halt(&fatal);
    }
    anyhow!(fatal).context(format!("{step} failed"))
}

fn run(scenario: &Scenario, base: &Path, halt: bool) -> Result<()> {
    let (host, nodes) = scenario.build_host();
    let mut patcher = FakePatcher::new();
    let mut shim = Shim::new(ShimConfig::default());
    shim.init(&mut patcher);

    shim.on_patcher_ready(&host, &mut patcher)
        .map_err(|f| surface("patcher-ready", f, halt))?;

    match shim.gpu() {
        Some(gpu) => {
            let identity = gpu.identity();
            let node = gpu.node();
            println!(
                "GPU at {}: {:04x}:{:04x} rev {:02x}: {} (enum revision {:#04x})",
                node.address().map_or_else(|| "?".to_string(), |a| a.to_string()),
                identity.vendor_id,
                identity.device_id,
                identity.pci_revision,
                gpu.chip(),
                gpu.classification().enum_revision
            );
        }
        None => println!("no GPU"),
    }
    for node in &nodes {
        print_properties(node);
    }
    println!("{} driver personalities registered", host.registered_drivers().len());

    for module in &scenario.modules {
        let image = module.image(base)?;
        let load = match patcher.id_of(&module.bundle) {
            Some(_) => patcher.load(&module.bundle, image),
            None => patcher.load_unregistered(image),
        };
        let dispatch = shim
            .on_module_loaded(&host, &mut patcher, &load)
            .map_err(|f| surface(&module.bundle, f, halt))?;
        println!("{} {}: {dispatch:?}", module.bundle, load.id);
    }

    let applied: usize = patcher.applied().iter().map(|&(_, n)| n).sum();
    println!("{applied} occurrences patched");
    println!("{} shared-cache patches routed", patcher.routed().len());
    Ok(())
}

fn print_properties(node: &FakeNode) {
    let properties = node.properties();
    if properties.is_empty() {
        return;
    }
    let address = node
        .address()
        .map_or_else(|| "?".to_string(), |a| a.to_string());
    let name = node.name().unwrap_or_default();
    println!("{address} {name}");
    for (key, value) in properties {
        match value.strip_suffix(&[0]).map(std::str::from_utf8) {
            Some(Ok(text)) if !text.is_empty() => println!("  {key} = \"{text}\""),
            _ => println!("  {key} = {value:02x?}"),
        }
    }
}
