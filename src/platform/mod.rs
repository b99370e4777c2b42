//! CLI platform identification over SSH

pub mod autodetect;
pub mod session;

pub use autodetect::{DetectionOutcome, DetectionState, PlatformAutodetector};
pub use session::{ProbeConnector, ProbeSession, SshCliConnector, SshCliSession, SshCredentials};

use crate::FactError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Network operating systems the autodetector can tell apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    CiscoIos,
    CiscoXe,
    CiscoNxos,
    DellOs10,
    Fortinet,
    JuniperJunos,
    MikrotikRouteros,
    HuaweiVrp,
}

lazy_static! {
    static ref SIGNATURES: HashMap<Platform, Vec<Regex>> = Platform::ALL
        .into_iter()
        .map(|platform| {
            let compiled = signature_sources(platform)
                .iter()
                .map(|source| Regex::new(&format!("(?i){}", source)).unwrap())
                .collect();
            (platform, compiled)
        })
        .collect();
}

/// Probe output patterns, matched case-insensitively
fn signature_sources(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::CiscoIos => &["Cisco IOS"],
        Platform::CiscoXe => &["IOS-XE"],
        Platform::CiscoNxos => &["NX-OS"],
        Platform::DellOs10 => &["OS10", "Dell"],
        Platform::Fortinet => &["FortiGate|FortiOS"],
        Platform::JuniperJunos => &["JUNOS"],
        Platform::MikrotikRouteros => &["RouterOS|MikroTik|architecture-name|board-name"],
        Platform::HuaweiVrp => &["VRP"],
    }
}

impl Platform {
    pub const ALL: [Platform; 8] = [
        Platform::CiscoIos,
        Platform::CiscoXe,
        Platform::CiscoNxos,
        Platform::DellOs10,
        Platform::Fortinet,
        Platform::JuniperJunos,
        Platform::MikrotikRouteros,
        Platform::HuaweiVrp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::CiscoIos => "cisco_ios",
            Platform::CiscoXe => "cisco_xe",
            Platform::CiscoNxos => "cisco_nxos",
            Platform::DellOs10 => "dell_os10",
            Platform::Fortinet => "fortinet",
            Platform::JuniperJunos => "juniper_junos",
            Platform::MikrotikRouteros => "mikrotik_routeros",
            Platform::HuaweiVrp => "huawei_vrp",
        }
    }

    /// Read-only command whose output identifies the platform
    pub fn probe_command(&self) -> &'static str {
        match self {
            Platform::Fortinet => "get system status",
            Platform::MikrotikRouteros => "/system resource print",
            Platform::HuaweiVrp => "display version",
            _ => "show version",
        }
    }

    pub fn signatures(&self) -> &'static [Regex] {
        SIGNATURES.get(self).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether probe output carries any of this platform's signatures
    pub fn matches(&self, output: &str) -> bool {
        self.signatures().iter().any(|signature| signature.is_match(output))
    }

    /// Ordered candidates guessed from sysDescr; never empty
    pub fn candidates_for(sys_descr: &str) -> Vec<Platform> {
        keyword_candidates(sys_descr).unwrap_or_else(|| vec![Platform::CiscoIos])
    }

    /// The platform sysDescr names unambiguously, if any. `None` when the
    /// keywords leave more than one candidate or none matched at all.
    pub fn passive(sys_descr: &str) -> Option<Platform> {
        match keyword_candidates(sys_descr)?.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Whether SSH sessions are needed to settle the platform
    pub fn needs_active_detection(sys_descr: &str) -> bool {
        Self::passive(sys_descr).is_none()
    }
}

/// Candidates selected by sysDescr keywords, first rule wins
fn keyword_candidates(sys_descr: &str) -> Option<Vec<Platform>> {
    let descr = sys_descr.to_lowercase();
    let has = |keyword: &str| descr.contains(keyword);

    let candidates = if has("routeros") || has("mikrotik") {
        vec![Platform::MikrotikRouteros]
    } else if has("nx-os") {
        vec![Platform::CiscoNxos]
    } else if has("cisco") {
        vec![Platform::CiscoIos, Platform::CiscoXe]
    } else if has("os10") || has("dell") {
        vec![Platform::DellOs10]
    } else if has("fortigate") || has("fortios") {
        vec![Platform::Fortinet]
    } else if has("junos") || has("juniper") {
        vec![Platform::JuniperJunos]
    } else if has("huawei") || has("vrp") {
        vec![Platform::HuaweiVrp]
    } else {
        return None;
    };
    Some(candidates)
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = FactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Platform::ALL
            .into_iter()
            .find(|platform| platform.as_str() == wanted)
            .ok_or_else(|| FactError::ParseError(format!("Unknown platform: {}", s)))
    }
}
