//! Plain data produced by the collectors

use super::fingerprint::InterfaceSetFingerprint;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// ifAdminStatus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdminStatus {
    /// Not reported by the agent
    #[default]
    Unset,
    Up,
    Down,
    Testing,
    Other(i64),
}

impl AdminStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => AdminStatus::Unset,
            1 => AdminStatus::Up,
            2 => AdminStatus::Down,
            3 => AdminStatus::Testing,
            n => AdminStatus::Other(n),
        }
    }

    /// Numeric MIB code; 0 when unset
    pub fn code(&self) -> i64 {
        match self {
            AdminStatus::Unset => 0,
            AdminStatus::Up => 1,
            AdminStatus::Down => 2,
            AdminStatus::Testing => 3,
            AdminStatus::Other(n) => *n,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdminStatus::Unset => "",
            AdminStatus::Up => "up",
            AdminStatus::Down => "down",
            AdminStatus::Testing => "testing",
            AdminStatus::Other(_) => "other",
        }
    }
}

/// ifOperStatus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperStatus {
    #[default]
    Unset,
    Up,
    Down,
    Testing,
    Unknown,
    Dormant,
    NotPresent,
    LowerLayerDown,
    Other(i64),
}

impl OperStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => OperStatus::Unset,
            1 => OperStatus::Up,
            2 => OperStatus::Down,
            3 => OperStatus::Testing,
            4 => OperStatus::Unknown,
            5 => OperStatus::Dormant,
            6 => OperStatus::NotPresent,
            7 => OperStatus::LowerLayerDown,
            n => OperStatus::Other(n),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            OperStatus::Unset => 0,
            OperStatus::Up => 1,
            OperStatus::Down => 2,
            OperStatus::Testing => 3,
            OperStatus::Unknown => 4,
            OperStatus::Dormant => 5,
            OperStatus::NotPresent => 6,
            OperStatus::LowerLayerDown => 7,
            OperStatus::Other(n) => *n,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperStatus::Unset => "",
            OperStatus::Up => "up",
            OperStatus::Down => "down",
            OperStatus::Testing => "testing",
            OperStatus::Unknown => "unknown",
            OperStatus::Dormant => "dormant",
            OperStatus::NotPresent => "notPresent",
            OperStatus::LowerLayerDown => "lowerLayerDown",
            OperStatus::Other(_) => "other",
        }
    }
}

impl fmt::Display for AdminStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminStatus::Other(n) => write!(f, "other({})", n),
            status => f.write_str(status.as_str()),
        }
    }
}

impl fmt::Display for OperStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperStatus::Other(n) => write!(f, "other({})", n),
            status => f.write_str(status.as_str()),
        }
    }
}

impl Serialize for AdminStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for OperStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One IPv4 address bound to an interface
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IpBinding {
    pub ip: String,
    pub mask: String,
}

impl IpBinding {
    pub fn new<I: Into<String>, M: Into<String>>(ip: I, mask: M) -> Self {
        Self {
            ip: ip.into(),
            mask: mask.into(),
        }
    }
}

impl fmt::Display for IpBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ip, self.mask)
    }
}

/// One network interface, keyed by ifIndex
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct InterfaceRecord {
    pub if_index: u32,
    pub name: String,
    pub descr: String,
    /// Operator-assigned description (ifAlias)
    pub alias: String,
    /// Lower-case colon-separated six octets, or empty
    pub mac: String,
    pub admin_status: AdminStatus,
    pub oper_status: OperStatus,
    pub speed_mbps: u64,
    /// Sorted by (ip, mask), no duplicates
    pub ips: Vec<IpBinding>,
}

impl InterfaceRecord {
    pub fn new(if_index: u32) -> Self {
        Self {
            if_index,
            ..Default::default()
        }
    }

    /// Display name: ifName, else ifDescr, else the index
    pub fn label(&self) -> String {
        if !self.name.is_empty() {
            self.name.clone()
        } else if !self.descr.is_empty() {
            self.descr.clone()
        } else {
            format!("if{}", self.if_index)
        }
    }
}

/// 64-bit octet counters of one interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OctetCounters {
    pub in_octets: u64,
    pub out_octets: u64,
}

/// Per-poll counters, kept apart from the fingerprinted records
pub type InterfaceCounters = BTreeMap<u32, OctetCounters>;

/// Everything one interface collection produced
#[derive(Debug, Clone, Serialize)]
pub struct InterfaceSet {
    pub interfaces: Vec<InterfaceRecord>,
    pub fingerprint: InterfaceSetFingerprint,
    pub counters: InterfaceCounters,
    /// OID roots that yielded nothing
    pub failed_subtrees: Vec<String>,
}

impl InterfaceSet {
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn get(&self, if_index: u32) -> Option<&InterfaceRecord> {
        self.interfaces.iter().find(|record| record.if_index == if_index)
    }
}

/// Passive identity and role signals of one device
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceSignals {
    pub sys_descr: String,
    pub sys_object_id: String,
    pub sys_name: String,
    pub sys_location: String,
    /// sysServices layer bitmask
    pub sys_services: Option<i64>,
    /// 1 = forwarding, 2 = not forwarding
    pub ip_forwarding: Option<i64>,
    pub if_number: Option<i64>,
    pub bridge_address_present: bool,
    pub vlan_aware: bool,
    pub model_name: String,
    pub serial_number: String,
}

impl DeviceSignals {
    /// Vendor derived from sysObjectID
    pub fn vendor(&self) -> String {
        super::signals::vendor_from_sys_object_id(&self.sys_object_id)
    }
}
