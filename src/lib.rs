//! netfacts - SNMP fact collection and device classification
//!
//! Walks interface and identity data out of heterogeneous SNMP agents,
//! fingerprints the interface inventory for change detection, classifies
//! vendor and role from weak signals, and optionally identifies the CLI
//! platform over SSH.

pub mod classify;
pub mod collector;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod platform;
pub mod snmp;
pub mod utils;

// Re-export commonly used types
pub use classify::{classify, ClassificationResult, Classifier, ClassifierPolicy, Role};
pub use collector::{
    DeviceSignalCollector, DeviceSignals, InterfaceCollector, InterfaceRecord, InterfaceSet, InterfaceSetFingerprint,
};
pub use config::CollectorConfig;
pub use engine::{DeviceReport, FactEngine};
pub use error::FactError;
pub use platform::{Platform, PlatformAutodetector};
pub use snmp::{SnmpBackend, SnmpWalker, StrategyLadder, WalkStrategy};

pub type Result<T> = std::result::Result<T, FactError>;
