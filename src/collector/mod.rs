//! SNMP fact collectors: interface inventory and device signals

pub mod fingerprint;
pub mod interfaces;
pub mod model;
pub mod signals;

pub use fingerprint::InterfaceSetFingerprint;
pub use interfaces::{merge, InterfaceCollector, RawSubtrees, Subtree};
pub use model::{
    AdminStatus, DeviceSignals, InterfaceCounters, InterfaceRecord, InterfaceSet, IpBinding, OctetCounters, OperStatus,
};
pub use signals::{vendor_from_sys_object_id, DeviceSignalCollector, SignalSet};
