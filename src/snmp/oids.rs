//! Numeric OIDs and MIB table layouts used by the collectors.
//!
//! Everything is numeric; no MIB files are loaded.

use super::decoder::{ColumnKind, ColumnSpec, TableSpec};

// -- SNMPv2-MIB system group (scalars) --

pub const SYS_DESCR: &str = "1.3.6.1.2.1.1.1.0";
pub const SYS_OBJECT_ID: &str = "1.3.6.1.2.1.1.2.0";
pub const SYS_NAME: &str = "1.3.6.1.2.1.1.5.0";
pub const SYS_LOCATION: &str = "1.3.6.1.2.1.1.6.0";
/// Bitmask of OSI layers the device offers services at
pub const SYS_SERVICES: &str = "1.3.6.1.2.1.1.7.0";

// -- IF-MIB / IP-MIB / BRIDGE-MIB scalars --

pub const IF_NUMBER: &str = "1.3.6.1.2.1.2.1.0";
/// 1 = forwarding, 2 = not forwarding
pub const IP_FORWARDING: &str = "1.3.6.1.2.1.4.1.0";
pub const DOT1D_BASE_BRIDGE_ADDRESS: &str = "1.3.6.1.2.1.17.1.1.0";
pub const DOT1Q_VLAN_VERSION_NUMBER: &str = "1.3.6.1.2.1.17.7.1.1.1.0";

// -- ENTITY-MIB --

/// entPhysicalModelName of the first (usually chassis) entity
pub const ENT_PHYSICAL_MODEL_NAME_1: &str = "1.3.6.1.2.1.47.1.1.1.1.13.1";
pub const ENT_PHYSICAL_MODEL_NAME: &str = "1.3.6.1.2.1.47.1.1.1.1.13";
pub const ENT_PHYSICAL_SERIAL_NUM: &str = "1.3.6.1.2.1.47.1.1.1.1.11";

/// Private enterprise arc; the next component is the IANA enterprise number
pub const ENTERPRISES: &str = "1.3.6.1.4.1";

// -- Table layouts --

/// IF-MIB::ifTable
pub static IF_TABLE: TableSpec = TableSpec {
    name: "ifTable",
    prefix: "1.3.6.1.2.1.2.2.1",
    columns: &[
        ColumnSpec::new(2, "ifDescr", ColumnKind::Text),
        ColumnSpec::new(5, "ifSpeed", ColumnKind::Counter),
        ColumnSpec::new(6, "ifPhysAddress", ColumnKind::MacAddress),
        ColumnSpec::new(7, "ifAdminStatus", ColumnKind::Integer),
        ColumnSpec::new(8, "ifOperStatus", ColumnKind::Integer),
    ],
};

/// IF-MIB::ifXTable
pub static IF_X_TABLE: TableSpec = TableSpec {
    name: "ifXTable",
    prefix: "1.3.6.1.2.1.31.1.1.1",
    columns: &[
        ColumnSpec::new(1, "ifName", ColumnKind::Text),
        ColumnSpec::new(6, "ifHCInOctets", ColumnKind::Counter),
        ColumnSpec::new(10, "ifHCOutOctets", ColumnKind::Counter),
        ColumnSpec::new(15, "ifHighSpeed", ColumnKind::Counter),
        ColumnSpec::new(18, "ifAlias", ColumnKind::Text),
    ],
};

/// IP-MIB::ipAddrTable, indexed by the address itself
pub static IP_ADDR_TABLE: TableSpec = TableSpec {
    name: "ipAddrTable",
    prefix: "1.3.6.1.2.1.4.20.1",
    columns: &[
        ColumnSpec::new(2, "ipAdEntIfIndex", ColumnKind::Integer),
        ColumnSpec::new(3, "ipAdEntNetMask", ColumnKind::Text),
    ],
};

/// ENTITY-MIB::entPhysicalTable (identity columns only)
pub static ENTITY_TABLE: TableSpec = TableSpec {
    name: "entPhysicalTable",
    prefix: "1.3.6.1.2.1.47.1.1.1.1",
    columns: &[
        ColumnSpec::new(11, "entPhysicalSerialNum", ColumnKind::Text),
        ColumnSpec::new(13, "entPhysicalModelName", ColumnKind::Text),
    ],
};

/// Root of a single column of a table, e.g. ifPhysAddress alone
pub fn column_root(table: &TableSpec, column: u32) -> String {
    format!("{}.{}", table.prefix, column)
}
