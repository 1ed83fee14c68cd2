use std::fmt;

use serde::{Deserialize, Serialize};

/// A Linux distribution family a mission or scenario is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Distro {
    /// Debian and its derivatives (apt).
    #[serde(rename = "Ubuntu/Debian")]
    UbuntuDebian,
    /// Fedora, RHEL and their rebuilds (dnf).
    #[serde(rename = "Fedora/RHEL")]
    FedoraRhel,
    /// Arch Linux (pacman).
    #[serde(rename = "Arch")]
    Arch,
    /// openSUSE Leap and Tumbleweed (zypper).
    #[serde(rename = "openSUSE")]
    OpenSuse,
}

impl Distro {
    /// Every family, in display order.
    pub const ALL: [Distro; 4] = [
        Distro::UbuntuDebian,
        Distro::FedoraRhel,
        Distro::Arch,
        Distro::OpenSuse,
    ];

    /// Parse a family from its display name or a common short alias.
    ///
    /// Matching is case-insensitive; unknown names return `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ubuntu/debian" | "ubuntu" | "debian" => Some(Self::UbuntuDebian),
            "fedora/rhel" | "fedora" | "rhel" | "centos" => Some(Self::FedoraRhel),
            "arch" | "archlinux" => Some(Self::Arch),
            "opensuse" | "suse" => Some(Self::OpenSuse),
            _ => None,
        }
    }

    /// The package manager command used on this family.
    pub fn package_manager(self) -> &'static str {
        match self {
            Self::UbuntuDebian => "apt",
            Self::FedoraRhel => "dnf",
            Self::Arch => "pacman",
            Self::OpenSuse => "zypper",
        }
    }
}

impl fmt::Display for Distro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UbuntuDebian => write!(f, "Ubuntu/Debian"),
            Self::FedoraRhel => write!(f, "Fedora/RHEL"),
            Self::Arch => write!(f, "Arch"),
            Self::OpenSuse => write!(f, "openSUSE"),
        }
    }
}
