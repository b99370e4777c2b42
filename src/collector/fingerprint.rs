//! Content fingerprint of an interface set
//!
//! One line per interface in ascending ifIndex order:
//! `index|name|descr|alias|mac|admin|oper|speed|ip/mask,ip/mask`, joined with
//! newlines and hashed with SHA-256. Counters are not part of it.

use super::model::InterfaceRecord;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Lower-case hex SHA-256 digest of the canonical interface serialization
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterfaceSetFingerprint(String);

impl InterfaceSetFingerprint {
    /// Fingerprint `records` regardless of the order they are given in
    pub fn compute(records: &[InterfaceRecord]) -> Self {
        let digest = Sha256::digest(canonical_form(records).as_bytes());
        Self(digest.iter().map(|b| format!("{:02x}", b)).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InterfaceSetFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The exact text that gets hashed
pub fn canonical_form(records: &[InterfaceRecord]) -> String {
    let mut sorted: Vec<&InterfaceRecord> = records.iter().collect();
    sorted.sort_by_key(|record| record.if_index);

    sorted
        .into_iter()
        .map(canonical_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn canonical_line(record: &InterfaceRecord) -> String {
    let mut ips = record.ips.clone();
    ips.sort();
    ips.dedup();
    let ips = ips.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");

    format!(
        "{}|{}|{}|{}|{}|{}|{}|{}|{}",
        record.if_index,
        record.name,
        record.descr,
        record.alias,
        record.mac,
        record.admin_status.code(),
        record.oper_status.code(),
        record.speed_mbps,
        ips
    )
}
