//! Host kernel version.

use core::fmt;

/// Major version of the host kernel (Darwin numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KernelVersion(pub u8);

impl KernelVersion {
    /// macOS 10.15.
    pub const CATALINA: Self = Self(19);
    /// macOS 11.
    pub const BIG_SUR: Self = Self(20);
    /// macOS 12.
    pub const MONTEREY: Self = Self(21);
    /// macOS 13.
    pub const VENTURA: Self = Self(22);
    /// macOS 14.
    pub const SONOMA: Self = Self(23);
    /// macOS 15.
    pub const SEQUOIA: Self = Self(24);

    /// Returns the release name, if this is a known version.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            19 => Some("Catalina"),
            20 => Some("Big Sur"),
            21 => Some("Monterey"),
            22 => Some("Ventura"),
            23 => Some("Sonoma"),
            24 => Some("Sequoia"),
            _ => None,
        }
    }
}

impl fmt::Display for KernelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} (Darwin {})", self.0),
            None => write!(f, "Darwin {}", self.0),
        }
    }
}
