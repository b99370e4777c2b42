//! Interface Collector - parallel subtree walks merged into one interface set
//!
//! The four subtrees (ifTable, ifXTable, ipAdEntIfIndex, ipAdEntNetMask) are
//! walked concurrently under a small semaphore; each task owns its output and
//! hands it back through its join handle. The merge runs afterwards on the
//! caller and is keyed by ifIndex, so arrival order never matters.

use super::fingerprint::InterfaceSetFingerprint;
use super::model::{AdminStatus, InterfaceCounters, InterfaceRecord, InterfaceSet, IpBinding, OctetCounters, OperStatus};
use crate::config::SnmpSettings;
use crate::snmp::decoder::{decode, DecodedTable};
use crate::snmp::oids::{column_root, IF_TABLE, IF_X_TABLE, IP_ADDR_TABLE};
use crate::snmp::SnmpWalker;
use crate::FactError;
use futures::future::join_all;
use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Mask reported for addresses whose mask row is missing
pub const DEFAULT_MASK: &str = "0.0.0.0";

const IF_PHYS_ADDRESS_COLUMN: u32 = 6;
const IP_AD_ENT_IF_INDEX_COLUMN: u32 = 2;
const IP_AD_ENT_NET_MASK_COLUMN: u32 = 3;

/// The subtrees one collection walks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subtree {
    IfTable,
    IfXTable,
    IpIndex,
    IpMask,
    /// ifPhysAddress alone, walked only when ifTable came back without MACs
    IfPhysAddress,
}

impl Subtree {
    pub const PARALLEL: [Subtree; 4] = [Subtree::IfTable, Subtree::IfXTable, Subtree::IpIndex, Subtree::IpMask];

    pub fn root(&self) -> String {
        match self {
            Subtree::IfTable => IF_TABLE.prefix.to_string(),
            Subtree::IfXTable => IF_X_TABLE.prefix.to_string(),
            Subtree::IpIndex => column_root(&IP_ADDR_TABLE, IP_AD_ENT_IF_INDEX_COLUMN),
            Subtree::IpMask => column_root(&IP_ADDR_TABLE, IP_AD_ENT_NET_MASK_COLUMN),
            Subtree::IfPhysAddress => column_root(&IF_TABLE, IF_PHYS_ADDRESS_COLUMN),
        }
    }
}

/// Raw walk output per subtree; `None` when that walk failed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSubtrees {
    pub if_table: Option<String>,
    pub if_x_table: Option<String>,
    pub ip_index: Option<String>,
    pub ip_mask: Option<String>,
    pub if_phys_address: Option<String>,
}

impl RawSubtrees {
    pub fn set(&mut self, subtree: Subtree, raw: String) {
        let slot = match subtree {
            Subtree::IfTable => &mut self.if_table,
            Subtree::IfXTable => &mut self.if_x_table,
            Subtree::IpIndex => &mut self.ip_index,
            Subtree::IpMask => &mut self.ip_mask,
            Subtree::IfPhysAddress => &mut self.if_phys_address,
        };
        *slot = Some(raw);
    }

    /// True when ifTable carried no usable MAC at all, including when the
    /// ifTable walk itself failed
    pub fn needs_mac_fallback(&self) -> bool {
        !has_any_mac(&decode(self.if_table.as_deref().unwrap_or_default(), &IF_TABLE))
    }
}

fn has_any_mac(table: &DecodedTable) -> bool {
    table
        .column("ifPhysAddress")
        .map_or(false, |cells| cells.values().any(|v| !v.as_text().is_empty()))
}

/// Walks the interface subtrees of one host and merges them
#[derive(Debug, Clone)]
pub struct InterfaceCollector {
    walker: SnmpWalker,
    workers: usize,
}

impl InterfaceCollector {
    pub fn new(walker: SnmpWalker, settings: &SnmpSettings) -> Self {
        Self {
            walker,
            workers: settings.walk_workers(),
        }
    }

    /// Collect the interface set of `host`; never fails, missing subtrees
    /// only leave fields at their defaults
    pub async fn collect(&self, host: &str, community: &str, timeout: Duration) -> InterfaceSet {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = Vec::with_capacity(Subtree::PARALLEL.len());

        for subtree in Subtree::PARALLEL {
            let semaphore = Arc::clone(&semaphore);
            let walker = self.walker.clone();
            let host = host.to_string();
            let community = community.to_string();

            tasks.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| FactError::ProcessError(e.to_string()))?;
                walker.walk(&host, &community, &subtree.root(), timeout).await
            }));
        }

        let mut raw = RawSubtrees::default();
        let mut failed_subtrees = Vec::new();

        for (subtree, joined) in Subtree::PARALLEL.into_iter().zip(join_all(tasks).await) {
            match joined {
                Ok(Ok(output)) => raw.set(subtree, output),
                Ok(Err(e)) => {
                    warn!("{}: {:?} yielded nothing: {}", host, subtree, e);
                    failed_subtrees.push(subtree.root());
                }
                Err(e) => {
                    warn!("{}: {:?} walk task failed: {}", host, subtree, e);
                    failed_subtrees.push(subtree.root());
                }
            }
        }

        if raw.needs_mac_fallback() {
            info!("{}: ifTable had no MAC addresses, walking ifPhysAddress alone", host);
            let root = Subtree::IfPhysAddress.root();
            match self.walker.walk(host, community, &root, timeout).await {
                Ok(output) => raw.set(Subtree::IfPhysAddress, output),
                Err(e) => {
                    debug!("{}: ifPhysAddress fallback failed: {}", host, e);
                    failed_subtrees.push(root);
                }
            }
        }

        let (interfaces, counters) = merge(&raw);
        let fingerprint = InterfaceSetFingerprint::compute(&interfaces);
        debug!("{}: {} interfaces, fingerprint {}", host, interfaces.len(), fingerprint);

        InterfaceSet {
            interfaces,
            fingerprint,
            counters,
            failed_subtrees,
        }
    }
}

/// Join raw subtrees into interface records (ascending ifIndex) and counters
pub fn merge(raw: &RawSubtrees) -> (Vec<InterfaceRecord>, InterfaceCounters) {
    let mut if_table = decode(raw.if_table.as_deref().unwrap_or_default(), &IF_TABLE);
    if let Some(mac_raw) = raw.if_phys_address.as_deref() {
        if !has_any_mac(&if_table) {
            let fallback = decode(mac_raw, &IF_TABLE);
            if let Some(cells) = fallback.column("ifPhysAddress") {
                if_table.replace_column("ifPhysAddress", cells.clone());
            }
        }
    }
    let if_x_table = decode(raw.if_x_table.as_deref().unwrap_or_default(), &IF_X_TABLE);

    let descrs = if_table.text_by_index("ifDescr");
    let macs = if_table.text_by_index("ifPhysAddress");
    let admin = if_table.integer_by_index("ifAdminStatus");
    let oper = if_table.integer_by_index("ifOperStatus");
    let if_speeds = if_table.counter_by_index("ifSpeed");

    let names = if_x_table.text_by_index("ifName");
    let aliases = if_x_table.text_by_index("ifAlias");
    let high_speeds = if_x_table.counter_by_index("ifHighSpeed");
    let in_octets = if_x_table.counter_by_index("ifHCInOctets");
    let out_octets = if_x_table.counter_by_index("ifHCOutOctets");

    let ips = ip_bindings(raw.ip_index.as_deref(), raw.ip_mask.as_deref());

    let mut indices: BTreeSet<u32> = BTreeSet::new();
    indices.extend(descrs.keys());
    indices.extend(macs.keys());
    indices.extend(admin.keys());
    indices.extend(oper.keys());
    indices.extend(if_speeds.keys());
    indices.extend(names.keys());
    indices.extend(aliases.keys());
    indices.extend(high_speeds.keys());
    indices.extend(ips.keys());

    let records = indices
        .iter()
        .map(|&index| {
            let speed_mbps = match high_speeds.get(&index) {
                Some(&high) => high,
                None => if_speeds.get(&index).map_or(0, |bps| bps / 1_000_000),
            };

            InterfaceRecord {
                if_index: index,
                name: names.get(&index).cloned().unwrap_or_default(),
                descr: descrs.get(&index).cloned().unwrap_or_default(),
                alias: aliases.get(&index).cloned().unwrap_or_default(),
                mac: macs.get(&index).cloned().unwrap_or_default(),
                admin_status: AdminStatus::from_code(admin.get(&index).copied().unwrap_or(0)),
                oper_status: OperStatus::from_code(oper.get(&index).copied().unwrap_or(0)),
                speed_mbps,
                ips: ips.get(&index).cloned().unwrap_or_default(),
            }
        })
        .collect();

    let counter_indices: BTreeSet<u32> = in_octets.keys().chain(out_octets.keys()).copied().collect();
    let counters = counter_indices
        .into_iter()
        .map(|index| {
            let counters = OctetCounters {
                in_octets: in_octets.get(&index).copied().unwrap_or(0),
                out_octets: out_octets.get(&index).copied().unwrap_or(0),
            };
            (index, counters)
        })
        .collect();

    (records, counters)
}

/// Group ipAddrTable rows by ifIndex as sorted, deduplicated (ip, mask) pairs
fn ip_bindings(ip_index: Option<&str>, ip_mask: Option<&str>) -> BTreeMap<u32, Vec<IpBinding>> {
    let index_table = decode(ip_index.unwrap_or_default(), &IP_ADDR_TABLE);
    let mask_table = decode(ip_mask.unwrap_or_default(), &IP_ADDR_TABLE);

    let mut grouped: BTreeMap<u32, BTreeSet<IpBinding>> = BTreeMap::new();
    let Some(owners) = index_table.column("ipAdEntIfIndex") else {
        return BTreeMap::new();
    };
    let masks = mask_table.column("ipAdEntNetMask");

    for (ip, owner) in owners {
        let Ok(if_index) = u32::try_from(owner.as_i64()) else {
            continue;
        };
        let mask = masks
            .and_then(|m| m.get(ip))
            .map(|m| m.as_text())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MASK.to_string());

        grouped.entry(if_index).or_default().insert(IpBinding::new(ip.clone(), mask));
    }

    grouped
        .into_iter()
        .map(|(index, bindings)| (index, bindings.into_iter().collect()))
        .collect()
}
