//! Vendor/Role Classifier
//!
//! Role classification is an ordered rule table evaluated top to bottom; the
//! first rule whose predicate holds decides the role. The last rule always
//! applies, so every input gets a role.

use crate::collector::DeviceSignals;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// sysServices bit for layer 2 (datalink/subnetwork)
const SERVICES_L2: i64 = 2;
/// sysServices bit for layer 3 (internet)
const SERVICES_L3: i64 = 4;

/// Device role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Router,
    Switch,
    Firewall,
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Router => "router",
            Role::Switch => "switch",
            Role::Firewall => "firewall",
            Role::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunable parts of the classification heuristics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierPolicy {
    /// Vendors whose devices are treated as firewalls outright
    pub firewall_vendors: Vec<String>,
    /// An L2+L3 device with more interfaces than this is a switch
    pub l3_switch_min_interfaces: i64,
    /// An L2+L3 device with 802.1Q support is a switch
    pub vlan_implies_switch: bool,
}

impl Default for ClassifierPolicy {
    fn default() -> Self {
        Self {
            firewall_vendors: vec!["fortinet".to_string(), "paloalto".to_string(), "checkpoint".to_string()],
            l3_switch_min_interfaces: 16,
            vlan_implies_switch: true,
        }
    }
}

impl ClassifierPolicy {
    pub fn is_firewall_vendor(&self, vendor: &str) -> bool {
        self.firewall_vendors.iter().any(|v| v.eq_ignore_ascii_case(vendor))
    }
}

/// Booleans the rules are evaluated against
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleEvidence {
    pub vendor: String,
    pub l3: bool,
    pub l2: bool,
    pub vlan_aware: bool,
    pub if_number: Option<i64>,
}

impl RoleEvidence {
    pub fn from_signals(signals: &DeviceSignals) -> Self {
        let services = signals.sys_services.unwrap_or(0);
        Self {
            vendor: signals.vendor(),
            l3: services & SERVICES_L3 != 0 || signals.ip_forwarding == Some(1),
            l2: services & SERVICES_L2 != 0 || signals.bridge_address_present,
            vlan_aware: signals.vlan_aware,
            if_number: signals.if_number,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "vendor={} l3={} l2={} vlan={} ifNumber={}",
            self.vendor,
            self.l3,
            self.l2,
            self.vlan_aware,
            self.if_number.map_or_else(|| "-".to_string(), |n| n.to_string())
        )
    }
}

/// One (predicate, role, justification) entry of the rule table
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&RoleEvidence, &ClassifierPolicy) -> bool,
    pub role: Role,
    pub reason: &'static str,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("role", &self.role)
            .finish()
    }
}

fn firewall_vendor(evidence: &RoleEvidence, policy: &ClassifierPolicy) -> bool {
    policy.is_firewall_vendor(&evidence.vendor)
}

fn l3_only(evidence: &RoleEvidence, _: &ClassifierPolicy) -> bool {
    evidence.l3 && !evidence.l2
}

fn l3_switch(evidence: &RoleEvidence, policy: &ClassifierPolicy) -> bool {
    let vlan = policy.vlan_implies_switch && evidence.vlan_aware;
    let many_ports = evidence.if_number.map_or(false, |n| n > policy.l3_switch_min_interfaces);
    evidence.l3 && evidence.l2 && (vlan || many_ports)
}

fn l3_with_bridge(evidence: &RoleEvidence, _: &ClassifierPolicy) -> bool {
    evidence.l3 && evidence.l2
}

fn l2_only(evidence: &RoleEvidence, _: &ClassifierPolicy) -> bool {
    evidence.l2
}

fn always(_: &RoleEvidence, _: &ClassifierPolicy) -> bool {
    true
}

/// The built-in rule table, in precedence order
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            name: "firewall-vendor",
            applies: firewall_vendor,
            role: Role::Firewall,
            reason: "vendor builds firewalls",
        },
        Rule {
            name: "l3-only",
            applies: l3_only,
            role: Role::Router,
            reason: "routes IP without bridging",
        },
        Rule {
            name: "l3-switch",
            applies: l3_switch,
            role: Role::Switch,
            reason: "routes and bridges with VLANs or many ports",
        },
        Rule {
            name: "l3-with-bridge",
            applies: l3_with_bridge,
            role: Role::Router,
            reason: "routes and bridges without switch indicators",
        },
        Rule {
            name: "l2-only",
            applies: l2_only,
            role: Role::Switch,
            reason: "bridges without routing",
        },
        Rule {
            name: "no-signals",
            applies: always,
            role: Role::Unknown,
            reason: "no usable L2/L3 signals",
        },
    ]
}

/// Outcome of classifying one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub vendor: String,
    pub role: Role,
    /// Name of the rule that fired
    pub rule: String,
    /// Evidence summary followed by the fired rule's justification
    pub reasons: Vec<String>,
}

/// Rule-table classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    policy: ClassifierPolicy,
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierPolicy::default())
    }
}

impl Classifier {
    pub fn new(policy: ClassifierPolicy) -> Self {
        Self {
            policy,
            rules: default_rules(),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn policy(&self) -> &ClassifierPolicy {
        &self.policy
    }

    pub fn classify(&self, signals: &DeviceSignals) -> ClassificationResult {
        let evidence = RoleEvidence::from_signals(signals);
        let mut reasons = vec![evidence.summary()];

        let fired = self.rules.iter().find(|rule| (rule.applies)(&evidence, &self.policy));
        let (role, rule) = match fired {
            Some(rule) => {
                debug!("Rule {} fired: {}", rule.name, evidence.summary());
                reasons.push(format!("{}: {}", rule.name, rule.reason));
                (rule.role, rule.name.to_string())
            }
            None => (Role::Unknown, String::new()),
        };

        ClassificationResult {
            vendor: evidence.vendor,
            role,
            rule,
            reasons,
        }
    }
}

/// Classify with the default policy
pub fn classify(signals: &DeviceSignals) -> ClassificationResult {
    Classifier::default().classify(signals)
}
