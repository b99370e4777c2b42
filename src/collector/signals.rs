//! Device Signal Collector - passive identity and role signals
//!
//! Every field is an independent GET; a field that cannot be fetched keeps
//! its default and never stops the others.

use super::model::DeviceSignals;
use crate::snmp::decoder::{decode, decode_scalar, ScalarValue};
use crate::snmp::oids;
use crate::snmp::SnmpWalker;
use lazy_static::lazy_static;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

lazy_static! {
    static ref ENTERPRISE_NUMBER: Regex = Regex::new(r"(?:^|[.:])(?:1\.3\.6\.1\.4\.1|enterprises)\.(\d+)").unwrap();
}

/// IANA private enterprise numbers of the vendors we recognise
static VENDORS: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (9, "cisco"),
        (11, "hp"),
        (674, "dell"),
        (2011, "huawei"),
        (2620, "checkpoint"),
        (2636, "juniper"),
        (8072, "net-snmp"),
        (12356, "fortinet"),
        (14988, "mikrotik"),
        (25461, "paloalto"),
        (41112, "ubiquiti"),
    ])
});

/// Serial numbers agents report when they have none
const PLACEHOLDER_SERIALS: &[&str] = &["", "0", "unknown", "not specified"];

/// Vendor name for a sysObjectID: a known name, `enterprise-<N>`, or `unknown`
pub fn vendor_from_sys_object_id(sys_object_id: &str) -> String {
    let Some(caps) = ENTERPRISE_NUMBER.captures(sys_object_id.trim()) else {
        return "unknown".to_string();
    };
    match caps[1].parse::<u32>() {
        Ok(number) => VENDORS
            .get(&number)
            .map(|vendor| vendor.to_string())
            .unwrap_or_else(|| format!("enterprise-{}", number)),
        Err(_) => "unknown".to_string(),
    }
}

/// Signals plus how many of them could actually be fetched
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignalSet {
    pub signals: DeviceSignals,
    pub fetched: usize,
    pub attempted: usize,
}

impl SignalSet {
    /// False when the agent answered none of the requests
    pub fn reachable(&self) -> bool {
        self.fetched > 0
    }
}

/// Collects `DeviceSignals` over single-OID GETs
#[derive(Debug, Clone)]
pub struct DeviceSignalCollector {
    walker: SnmpWalker,
}

impl DeviceSignalCollector {
    pub fn new(walker: SnmpWalker) -> Self {
        Self { walker }
    }

    pub async fn collect(&self, host: &str, community: &str, timeout: Duration) -> SignalSet {
        let mut set = SignalSet::default();
        let mut fetch = Fetcher {
            walker: &self.walker,
            host,
            community,
            timeout,
            set: &mut set,
        };

        let sys_descr = fetch.scalar(oids::SYS_DESCR).await;
        let sys_object_id = fetch.scalar(oids::SYS_OBJECT_ID).await;
        let sys_name = fetch.scalar(oids::SYS_NAME).await;
        let sys_location = fetch.scalar(oids::SYS_LOCATION).await;
        let sys_services = fetch.scalar(oids::SYS_SERVICES).await;
        let ip_forwarding = fetch.scalar(oids::IP_FORWARDING).await;
        let if_number = fetch.scalar(oids::IF_NUMBER).await;
        let bridge_address = fetch.scalar(oids::DOT1D_BASE_BRIDGE_ADDRESS).await;
        let vlan_version = fetch.scalar(oids::DOT1Q_VLAN_VERSION_NUMBER).await;
        let model_name = fetch.model_name().await;
        let serial_number = fetch.serial_number().await;

        let text = |value: &Option<ScalarValue>| value.as_ref().map(|v| v.text().trim().to_string()).unwrap_or_default();
        let integer = |value: &Option<ScalarValue>| value.as_ref().and_then(ScalarValue::integer);

        set.signals = DeviceSignals {
            sys_descr: text(&sys_descr),
            sys_object_id: text(&sys_object_id),
            sys_name: text(&sys_name),
            sys_location: text(&sys_location),
            sys_services: integer(&sys_services),
            ip_forwarding: integer(&ip_forwarding),
            if_number: integer(&if_number),
            bridge_address_present: bridge_address.is_some(),
            vlan_aware: integer(&vlan_version).is_some(),
            model_name,
            serial_number,
        };

        debug!(
            "{}: fetched {}/{} signals, vendor {}",
            host,
            set.fetched,
            set.attempted,
            set.signals.vendor()
        );
        set
    }
}

struct Fetcher<'a> {
    walker: &'a SnmpWalker,
    host: &'a str,
    community: &'a str,
    timeout: Duration,
    set: &'a mut SignalSet,
}

impl Fetcher<'_> {
    fn record(&mut self, fetched: bool) {
        self.set.attempted += 1;
        if fetched {
            self.set.fetched += 1;
        }
    }

    async fn scalar(&mut self, oid: &str) -> Option<ScalarValue> {
        let value = match self.walker.get(self.host, self.community, oid, self.timeout).await {
            Ok(raw) => decode_scalar(&raw, oid),
            Err(e) => {
                debug!("{}: {} not fetched: {}", self.host, oid, e);
                None
            }
        };
        self.record(value.is_some());
        value
    }

    /// entPhysicalModelName.1, else the first model name in the table
    async fn model_name(&mut self) -> String {
        if let Some(value) = self.scalar(oids::ENT_PHYSICAL_MODEL_NAME_1).await {
            let model = value.text().trim().to_string();
            if !model.is_empty() {
                return model;
            }
        }

        match self
            .walker
            .walk_first(self.host, self.community, oids::ENT_PHYSICAL_MODEL_NAME, self.timeout)
            .await
        {
            Ok(model) => model.unwrap_or_default(),
            Err(e) => {
                debug!("{}: entity model walk failed: {}", self.host, e);
                String::new()
            }
        }
    }

    /// First meaningful entPhysicalSerialNum by ascending entity index
    async fn serial_number(&mut self) -> String {
        let raw = match self
            .walker
            .walk(self.host, self.community, oids::ENT_PHYSICAL_SERIAL_NUM, self.timeout)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                debug!("{}: entity serial walk failed: {}", self.host, e);
                self.record(false);
                return String::new();
            }
        };

        let serial = first_meaningful_serial(&raw);
        self.record(!serial.is_empty());
        serial
    }
}

/// Pick the chassis serial out of an entPhysicalSerialNum walk
pub fn first_meaningful_serial(raw: &str) -> String {
    decode(raw, &oids::ENTITY_TABLE)
        .text_by_index("entPhysicalSerialNum")
        .into_values()
        .map(|serial| serial.trim().to_string())
        .find(|serial| !PLACEHOLDER_SERIALS.contains(&serial.to_ascii_lowercase().as_str()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vendor() {
        assert_eq!(vendor_from_sys_object_id("1.3.6.1.4.1.12356.101.1.3002"), "fortinet");
        assert_eq!(vendor_from_sys_object_id(".1.3.6.1.4.1.9.1.2066"), "cisco");
        assert_eq!(vendor_from_sys_object_id("SNMPv2-SMI::enterprises.14988.1"), "mikrotik");
    }

    #[test]
    fn test_unmapped_and_missing_vendor() {
        assert_eq!(vendor_from_sys_object_id("1.3.6.1.4.1.99999.1"), "enterprise-99999");
        assert_eq!(vendor_from_sys_object_id(""), "unknown");
        assert_eq!(vendor_from_sys_object_id("1.3.6.1.2.1.1"), "unknown");
    }

    #[test]
    fn test_enterprise_arc_must_start_on_a_component() {
        // 11.3.6.1.4.1.9 is not under the enterprises arc
        assert_eq!(vendor_from_sys_object_id("11.3.6.1.4.1.9"), "unknown");
    }

    #[test]
    fn test_serial_skips_placeholders() {
        let raw = "\
.1.3.6.1.2.1.47.1.1.1.1.11.1 = STRING: \"\"
.1.3.6.1.2.1.47.1.1.1.1.11.2 = STRING: \"Not Specified\"
.1.3.6.1.2.1.47.1.1.1.1.11.10 = STRING: \"FOC1234X0AB\"
.1.3.6.1.2.1.47.1.1.1.1.11.3 = STRING: \"0\"
";
        assert_eq!(first_meaningful_serial(raw), "FOC1234X0AB");
        assert_eq!(first_meaningful_serial(""), "");
    }

    #[test]
    fn test_signal_set_reachability() {
        let mut set = SignalSet::default();
        assert!(!set.reachable());
        set.fetched = 1;
        assert!(set.reachable());
    }
}
