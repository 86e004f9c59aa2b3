//! Driver-matching personalities handed to the host catalogue.

use serde_json::{Map, Value};

/// One driver-matching dictionary (an `IOKitPersonalities`-style entry).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DriverPersonality(pub Map<alloc::string::String, Value>);

impl DriverPersonality {
    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the `IOClass` the personality instantiates.
    #[must_use]
    pub fn io_class(&self) -> Option<&str> {
        self.get("IOClass").and_then(Value::as_str)
    }

    /// Returns the `IOPCIMatch` pattern list, if any.
    #[must_use]
    pub fn pci_match(&self) -> Option<&str> {
        self.get("IOPCIMatch").and_then(Value::as_str)
    }
}

impl From<Map<alloc::string::String, Value>> for DriverPersonality {
    fn from(map: Map<alloc::string::String, Value>) -> Self {
        Self(map)
    }
}
