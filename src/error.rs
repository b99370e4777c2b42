//! Error handling for the netfacts collectors
//!
//! Failures are scoped to the smallest unit of work: one OID root, one probe
//! candidate, one host. Malformed agent output is never an error; the decoder
//! degrades to defaults instead.

use thiserror::Error;

/// Main error type for collection operations
#[derive(Debug, Error)]
pub enum FactError {
    /// Every negotiation strategy failed for one OID root
    #[error("SNMP transport failed for {oid}: {reason}")]
    TransportError { oid: String, reason: String },

    /// Management port closed or unreachable
    #[error("Port {port} closed on {host}")]
    ConnectivityError { host: String, port: u16 },

    /// No platform candidate matched
    #[error("Could not detect platform for {host}, sysDescr={sys_descr}")]
    DetectionError { host: String, sys_descr: String },

    #[error("Host unreachable: {0}")]
    Unreachable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Process error: {0}")]
    ProcessError(String),

    #[error("Timeout error")]
    TimeoutError,

    #[error("Output error: {0}")]
    OutputError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FactError {
    /// Build a transport error for one OID root
    pub fn transport<O: Into<String>, R: Into<String>>(oid: O, reason: R) -> Self {
        FactError::TransportError {
            oid: oid.into(),
            reason: reason.into(),
        }
    }

    /// Whether the failure only concerns a single attempt or subtree and the
    /// caller can carry on with the rest of the host
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FactError::TransportError { .. }
                | FactError::TimeoutError
                | FactError::ProcessError(_)
                | FactError::DetectionError { .. }
        )
    }
}

/// Convert common errors to FactError
impl From<std::net::AddrParseError> for FactError {
    fn from(e: std::net::AddrParseError) -> Self {
        FactError::InvalidTarget(e.to_string())
    }
}

impl From<std::num::ParseIntError> for FactError {
    fn from(e: std::num::ParseIntError) -> Self {
        FactError::ParseError(e.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for FactError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        FactError::TimeoutError
    }
}

impl From<serde_json::Error> for FactError {
    fn from(e: serde_json::Error) -> Self {
        FactError::OutputError(e.to_string())
    }
}
