//! Boot scenario files.
//!
//! A scenario is a TOML document describing the machine the shim boots on:
//!
//! ```toml
//! [host]
//! kernel = 21
//! board = "Mac-AA95B1DDAB278B95"
//!
//! [[device]]
//! device = 0x73BF
//! revision = 0xC1
//! hw-revision = 1
//!
//! [[module]]
//! bundle = "com.apple.driver.AppleGraphicsDevicePolicy"
//! text = "...board-id\u0000..."
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use rdna_host_api::{KernelVersion, RunMode};
use rdna_testhost::{FakeHost, FakeNode, FakeWindow};
use serde::Deserialize;

/// Top-level scenario document.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Host description.
    #[serde(default)]
    pub host: HostSection,
    /// External video devices, in host order.
    #[serde(default, rename = "device")]
    pub devices: Vec<DeviceSection>,
    /// Module loads, in load order.
    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleSection>,
}

/// `[host]`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct HostSection {
    /// Darwin major version.
    #[serde(default = "default_kernel")]
    pub kernel: u8,
    /// Board identifier.
    #[serde(default = "default_board")]
    pub board: String,
    /// Boot into installer/recovery.
    #[serde(default)]
    pub recovery: bool,
    /// Kernel command-line arguments.
    #[serde(default)]
    pub boot_args: Vec<String>,
    /// Whether the host can build a device list.
    #[serde(default = "default_true")]
    pub device_info: bool,
    /// Make driver registration fail.
    #[serde(default)]
    pub reject_catalog: bool,
}

impl Default for HostSection {
    fn default() -> Self {
        Self {
            kernel: default_kernel(),
            board: default_board(),
            recovery: false,
            boot_args: Vec::new(),
            device_info: true,
            reject_catalog: false,
        }
    }
}

/// `[[device]]`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DeviceSection {
    /// PCI vendor ID.
    #[serde(default = "default_vendor")]
    pub vendor: u16,
    /// PCI device ID.
    pub device: u16,
    /// PCI revision ID.
    #[serde(default)]
    pub revision: u8,
    /// Hardware revision reported through BAR 5. No BAR 5 when absent.
    pub hw_revision: Option<u8>,
    /// Pre-existing `model` property.
    pub model: Option<String>,
    /// `false` for an entry that is not a PCI device.
    #[serde(default = "default_true")]
    pub pci: bool,
}

/// `[[module]]`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ModuleSection {
    /// Bundle identifier of the loaded module.
    pub bundle: String,
    /// Image file, relative to the scenario file.
    pub file: Option<PathBuf>,
    /// Inline image contents.
    pub text: Option<String>,
}

fn default_kernel() -> u8 {
    KernelVersion::VENTURA.0
}

fn default_board() -> String {
    "Mac-AA95B1DDAB278B95".to_string()
}

fn default_vendor() -> u16 {
    0x1002
}

fn default_true() -> bool {
    true
}

impl Scenario {
    /// Loads and parses the scenario at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parses a scenario document.
    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Self = toml::from_str(content)?;
        for module in &scenario.modules {
            if module.file.is_some() == module.text.is_some() {
                bail!("module {} needs exactly one of `file` or `text`", module.bundle);
            }
        }
        Ok(scenario)
    }

    /// Builds the fake host and returns it with handles to its PCI devices.
    pub fn build_host(&self) -> (FakeHost, Vec<Arc<FakeNode>>) {
        let host_section = &self.host;
        let mut host = FakeHost::new()
            .kernel(KernelVersion(host_section.kernel))
            .board(&host_section.board);
        if host_section.recovery {
            host = host.run_mode(RunMode::NORMAL | RunMode::INSTALLER_RECOVERY);
        }
        for arg in &host_section.boot_args {
            host = host.boot_arg(arg);
        }
        if !host_section.device_info {
            host = host.without_device_info();
        }
        if host_section.reject_catalog {
            host = host.rejecting_catalog();
        }

        let mut nodes = Vec::new();
        for device in &self.devices {
            if !device.pci {
                host = host.non_pci_video();
                continue;
            }
            let node = device.build_node().into_ref();
            host = host.video(FakeNode::node_ref(&node));
            nodes.push(node);
        }
        (host, nodes)
    }
}

impl DeviceSection {
    fn build_node(&self) -> FakeNode {
        let mut node = FakeNode::new(self.vendor, self.device, self.revision);
        if let Some(rev) = self.hw_revision {
            node = node.with_window(FakeWindow::with_hw_revision(rev));
        }
        if let Some(model) = &self.model {
            let mut bytes = model.clone().into_bytes();
            bytes.push(0);
            node = node.with_property("model", &bytes);
        }
        node
    }
}

impl ModuleSection {
    /// Reads the module image, resolving files against `base`.
    pub fn image(&self, base: &Path) -> Result<Vec<u8>> {
        match (&self.file, &self.text) {
            (Some(file), _) => {
                let path = base.join(file);
                std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))
            }
            (None, Some(text)) => Ok(text.as_bytes().to_vec()),
            (None, None) => bail!("module {} has no image", self.bundle),
        }
    }
}
