//! Fake host services and device-info snapshot.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rdna_host_api::{
    DeviceInfo, DriverPersonality, HostError, HostServices, KernelVersion, NodeRef, RunMode,
    VideoEntry,
};

/// Device-info snapshot handed out by [`FakeHost::device_info`].
pub struct FakeDeviceInfo {
    entries: Vec<VideoEntry>,
    switch_offs: Arc<AtomicUsize>,
}

impl DeviceInfo for FakeDeviceInfo {
    fn process_switch_off(&mut self) {
        self.switch_offs.fetch_add(1, Ordering::SeqCst);
    }

    fn external_video(&self) -> &[VideoEntry] {
        &self.entries
    }
}

/// Configurable in-memory host.
pub struct FakeHost {
    board_id: String,
    kernel: KernelVersion,
    run_mode: RunMode,
    boot_args: Vec<String>,
    video: Vec<VideoEntry>,
    device_info_fails: bool,
    reject_catalog: bool,
    switch_offs: Arc<AtomicUsize>,
    registered: Mutex<Vec<DriverPersonality>>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            board_id: "Mac-AA95B1DDAB278B95".to_owned(),
            kernel: KernelVersion::VENTURA,
            run_mode: RunMode::NORMAL,
            boot_args: Vec::new(),
            video: Vec::new(),
            device_info_fails: false,
            reject_catalog: false,
            switch_offs: Arc::new(AtomicUsize::new(0)),
            registered: Mutex::new(Vec::new()),
        }
    }
}

impl FakeHost {
    /// Creates a Ventura host on a generic board with no video devices.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the board identifier.
    #[must_use]
    pub fn board(mut self, board_id: &str) -> Self {
        board_id.clone_into(&mut self.board_id);
        self
    }

    /// Sets the kernel version.
    #[must_use]
    pub fn kernel(mut self, kernel: KernelVersion) -> Self {
        self.kernel = kernel;
        self
    }

    /// Sets the run-mode flags.
    #[must_use]
    pub fn run_mode(mut self, mode: RunMode) -> Self {
        self.run_mode = mode;
        self
    }

    /// Adds a boot argument.
    #[must_use]
    pub fn boot_arg(mut self, arg: &str) -> Self {
        self.boot_args.push(arg.to_owned());
        self
    }

    /// Appends a PCI device to the external video list.
    #[must_use]
    pub fn video(mut self, node: NodeRef) -> Self {
        self.video.push(VideoEntry { pci: Some(node) });
        self
    }

    /// Appends a non-PCI entry to the external video list.
    #[must_use]
    pub fn non_pci_video(mut self) -> Self {
        self.video.push(VideoEntry { pci: None });
        self
    }

    /// Makes `device_info` fail.
    #[must_use]
    pub fn without_device_info(mut self) -> Self {
        self.device_info_fails = true;
        self
    }

    /// Makes the driver catalogue reject registrations.
    #[must_use]
    pub fn rejecting_catalog(mut self) -> Self {
        self.reject_catalog = true;
        self
    }

    /// Number of times the switch-off hint was processed.
    pub fn switch_offs(&self) -> usize {
        self.switch_offs.load(Ordering::SeqCst)
    }

    /// Personalities registered so far.
    pub fn registered_drivers(&self) -> Vec<DriverPersonality> {
        self.registered.lock().unwrap().clone()
    }
}

impl HostServices for FakeHost {
    fn device_info(&self) -> Result<Box<dyn DeviceInfo>, HostError> {
        if self.device_info_fails {
            return Err(HostError::DeviceInfoUnavailable);
        }
        Ok(Box::new(FakeDeviceInfo {
            entries: self.video.clone(),
            switch_offs: Arc::clone(&self.switch_offs),
        }))
    }

    fn board_identifier(&self) -> &str {
        &self.board_id
    }

    fn kernel_version(&self) -> KernelVersion {
        self.kernel
    }

    fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    fn has_boot_arg(&self, arg: &str) -> bool {
        self.boot_args.iter().any(|a| a == arg)
    }

    fn add_drivers(&self, drivers: Vec<DriverPersonality>) -> Result<(), HostError> {
        if self.reject_catalog {
            return Err(HostError::CatalogRejected);
        }
        self.registered.lock().unwrap().extend(drivers);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_info_failure_is_reported() {
        let host = FakeHost::new().without_device_info();
        assert_eq!(
            host.device_info().err(),
            Some(HostError::DeviceInfoUnavailable)
        );
    }

    #[test]
    fn switch_off_is_counted() {
        let host = FakeHost::new().non_pci_video();
        let mut info = host.device_info().unwrap();
        info.process_switch_off();
        assert_eq!(host.switch_offs(), 1);
        assert_eq!(info.external_video().len(), 1);
    }

    #[test]
    fn boot_args() {
        let host = FakeHost::new().boot_arg("-v");
        assert!(host.has_boot_arg("-v"));
        assert!(!host.has_boot_arg("-s"));
    }
}
