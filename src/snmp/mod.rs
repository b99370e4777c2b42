//! SNMP access: adaptive transport, numeric OID catalogue and output decoding

pub mod decoder;
pub mod oids;
pub mod transport;

pub use decoder::{decode, decode_scalar, DecodedTable, DecodedValue, OidTableRow, TableDecoder, ValueType};
pub use transport::{NetSnmpBackend, SnmpBackend, SnmpVersion, SnmpWalker, StrategyLadder, WalkStrategy};
