//! Transport Adapter - adaptive SNMP retrieval
//!
//! A walk against one OID root is retried down a ladder of increasingly
//! conservative protocol parameters. Field agents differ in GETBULK support
//! and in whether they return indexes in lexicographic order, so the first
//! strategy that produces usable output wins. Individual attempt failures are
//! never surfaced; only an exhausted ladder is.

use crate::config::SnmpSettings;
use crate::utils::process::run_with_timeout;
use crate::{FactError, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Output fragments the net-snmp tools print instead of data
const ERROR_MARKERS: &[&str] = &[
    "No Such Object",
    "No Such Instance",
    "No more variables left",
    "Timeout: No Response",
];

/// Community-based protocol versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnmpVersion {
    V1,
    V2c,
}

impl SnmpVersion {
    /// Version flag understood by the net-snmp tools
    pub fn flag(&self) -> &'static str {
        match self {
            SnmpVersion::V1 => "-v1",
            SnmpVersion::V2c => "-v2c",
        }
    }
}

impl fmt::Display for SnmpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnmpVersion::V1 => write!(f, "v1"),
            SnmpVersion::V2c => write!(f, "v2c"),
        }
    }
}

/// One rung of the negotiation ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalkStrategy {
    /// GETBULK retrieval (always v2c)
    Bulk {
        max_repetitions: u32,
        tolerate_non_increasing: bool,
    },
    /// Sequential GETNEXT walk, always tolerant of out-of-order indexes
    Walk { version: SnmpVersion },
}

impl WalkStrategy {
    pub fn version(&self) -> SnmpVersion {
        match self {
            WalkStrategy::Bulk { .. } => SnmpVersion::V2c,
            WalkStrategy::Walk { version } => *version,
        }
    }

    pub fn is_bulk(&self) -> bool {
        matches!(self, WalkStrategy::Bulk { .. })
    }
}

impl fmt::Display for WalkStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalkStrategy::Bulk {
                max_repetitions,
                tolerate_non_increasing,
            } => {
                write!(f, "bulk r{}", max_repetitions)?;
                if *tolerate_non_increasing {
                    write!(f, " (non-increasing ok)")?;
                }
                Ok(())
            }
            WalkStrategy::Walk { version } => write!(f, "walk {}", version),
        }
    }
}

/// Ordered fallback list of walk strategies
#[derive(Debug, Clone)]
pub struct StrategyLadder {
    strategies: Vec<WalkStrategy>,
    current_index: usize,
}

impl Default for StrategyLadder {
    fn default() -> Self {
        let bulk = |max_repetitions, tolerate_non_increasing| WalkStrategy::Bulk {
            max_repetitions,
            tolerate_non_increasing,
        };

        Self::new(vec![
            bulk(128, false),
            bulk(64, false),
            bulk(32, false),
            bulk(64, true),
            bulk(32, true),
            bulk(16, true),
            WalkStrategy::Walk {
                version: SnmpVersion::V2c,
            },
            WalkStrategy::Walk {
                version: SnmpVersion::V1,
            },
        ])
    }
}

impl StrategyLadder {
    /// Create a ladder with a custom fallback order
    pub fn new(strategies: Vec<WalkStrategy>) -> Self {
        Self {
            strategies,
            current_index: 0,
        }
    }

    /// Get the next strategy to try
    pub fn next_strategy(&mut self) -> Option<WalkStrategy> {
        let strategy = self.strategies.get(self.current_index).copied();
        if strategy.is_some() {
            self.current_index += 1;
        }
        strategy
    }

    /// Reset to the first strategy
    pub fn reset(&mut self) {
        self.current_index = 0;
    }

    /// Check if there are more strategies left
    pub fn has_fallback(&self) -> bool {
        self.current_index < self.strategies.len()
    }

    pub fn strategies(&self) -> &[WalkStrategy] {
        &self.strategies
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

/// A single walk attempt
#[derive(Debug, Clone)]
pub struct WalkRequest {
    pub host: String,
    pub community: String,
    pub oid: String,
    pub timeout: Duration,
    pub strategy: WalkStrategy,
}

/// A single GET attempt
#[derive(Debug, Clone)]
pub struct GetRequest {
    pub host: String,
    pub community: String,
    pub oid: String,
    pub timeout: Duration,
    pub version: SnmpVersion,
}

/// One raw round of SNMP I/O. Implementations report every failure as
/// `Err`; the walker decides what to do next.
#[async_trait::async_trait]
pub trait SnmpBackend: Send + Sync {
    /// Run one walk attempt and return its raw line-oriented output
    async fn walk(&self, request: &WalkRequest) -> Result<String>;

    /// Run one GET and return its raw output
    async fn get(&self, request: &GetRequest) -> Result<String>;
}

/// Backend driving the net-snmp command-line tools
#[derive(Debug, Clone)]
pub struct NetSnmpBackend {
    settings: SnmpSettings,
}

impl NetSnmpBackend {
    pub fn new(settings: SnmpSettings) -> Self {
        Self { settings }
    }

    fn common_args(&self, version: SnmpVersion, community: &str, timeout: Duration) -> Vec<String> {
        vec![
            "-On".to_string(),
            "-m".to_string(),
            String::new(),
            "-M".to_string(),
            String::new(),
            version.flag().to_string(),
            "-c".to_string(),
            community.to_string(),
            "-t".to_string(),
            timeout.as_secs().max(1).to_string(),
            "-r".to_string(),
            self.settings.retries.to_string(),
        ]
    }

    /// Program and argument list for one walk attempt
    pub fn walk_command(&self, request: &WalkRequest) -> (String, Vec<String>) {
        let mut args = self.common_args(request.strategy.version(), &request.community, request.timeout);

        let program = match request.strategy {
            WalkStrategy::Bulk {
                max_repetitions,
                tolerate_non_increasing,
            } => {
                args.extend(["-C".to_string(), "n0".to_string()]);
                args.extend(["-C".to_string(), format!("r{}", max_repetitions)]);
                if tolerate_non_increasing {
                    args.extend(["-C".to_string(), "c".to_string()]);
                }
                self.settings.snmpbulkwalk_path.clone()
            }
            WalkStrategy::Walk { .. } => {
                args.extend(["-C".to_string(), "c".to_string()]);
                self.settings.snmpwalk_path.clone()
            }
        };

        args.push(request.host.clone());
        args.push(request.oid.clone());
        (program, args)
    }

    /// Program and argument list for one GET
    pub fn get_command(&self, request: &GetRequest) -> (String, Vec<String>) {
        let mut args = self.common_args(request.version, &request.community, request.timeout);
        args.push(request.host.clone());
        args.push(request.oid.clone());
        (self.settings.snmpget_path.clone(), args)
    }

    async fn run(&self, program: &str, args: &[String], oid: &str, deadline: Duration) -> Result<String> {
        let output = run_with_timeout(program, args, &[], deadline, self.settings.max_output_bytes).await?;

        if !output.success {
            return Err(FactError::transport(oid, output.diagnostic()));
        }
        if output.truncated {
            warn!("{} output for {} truncated at {} bytes", program, oid, self.settings.max_output_bytes);
        }
        if is_error_output(&output.stdout) {
            return Err(FactError::transport(oid, "empty or error-only output"));
        }

        Ok(output.stdout)
    }
}

#[async_trait::async_trait]
impl SnmpBackend for NetSnmpBackend {
    async fn walk(&self, request: &WalkRequest) -> Result<String> {
        let (program, args) = self.walk_command(request);
        let deadline = self.settings.walk_deadline_for(request.timeout);
        self.run(&program, &args, &request.oid, deadline).await
    }

    async fn get(&self, request: &GetRequest) -> Result<String> {
        let (program, args) = self.get_command(request);
        let deadline = self.settings.process_budget_for(request.timeout);
        self.run(&program, &args, &request.oid, deadline).await
    }
}

/// True when the output holds no data lines at all
pub fn is_error_output(stdout: &str) -> bool {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .all(|line| ERROR_MARKERS.iter().any(|marker| line.contains(marker)))
}

/// Adaptive walker on top of any backend
#[derive(Clone)]
pub struct SnmpWalker {
    backend: Arc<dyn SnmpBackend>,
    ladder: StrategyLadder,
}

impl SnmpWalker {
    pub fn new(backend: Arc<dyn SnmpBackend>) -> Self {
        Self {
            backend,
            ladder: StrategyLadder::default(),
        }
    }

    /// Walker over the net-snmp tools
    pub fn net_snmp(settings: &SnmpSettings) -> Self {
        Self::new(Arc::new(NetSnmpBackend::new(settings.clone())))
    }

    /// Replace the negotiation ladder
    pub fn with_ladder(mut self, ladder: StrategyLadder) -> Self {
        self.ladder = ladder;
        self
    }

    pub fn ladder(&self) -> &StrategyLadder {
        &self.ladder
    }

    /// Walk `oid` on `host`, returning the output of the first strategy that
    /// produced data
    pub async fn walk(&self, host: &str, community: &str, oid: &str, timeout: Duration) -> Result<String> {
        let mut ladder = self.ladder.clone();
        ladder.reset();

        let mut attempts = 0;
        let mut last_reason = String::from("no strategies configured");

        while let Some(strategy) = ladder.next_strategy() {
            attempts += 1;
            debug!("Walking {} on {} with {}", oid, host, strategy);

            let request = WalkRequest {
                host: host.to_string(),
                community: community.to_string(),
                oid: oid.to_string(),
                timeout,
                strategy,
            };

            match self.backend.walk(&request).await {
                Ok(output) => {
                    if attempts > 1 {
                        debug!("{} on {} succeeded with {} after {} attempts", oid, host, strategy, attempts);
                    }
                    return Ok(output);
                }
                Err(e) if !e.is_recoverable() => {
                    warn!("{} on {} aborted with {}: {}", oid, host, strategy, e);
                    return Err(e);
                }
                Err(e) => {
                    debug!("{} on {} failed with {}: {}", oid, host, strategy, e);
                    last_reason = e.to_string();
                }
            }
        }

        warn!("All {} strategies exhausted for {} on {}", attempts, oid, host);
        Err(FactError::transport(
            oid,
            format!("{} strategies exhausted, last: {}", attempts, last_reason),
        ))
    }

    /// GET a single OID, falling back from v2c to v1
    pub async fn get(&self, host: &str, community: &str, oid: &str, timeout: Duration) -> Result<String> {
        let mut last_reason = String::new();

        for version in [SnmpVersion::V2c, SnmpVersion::V1] {
            let request = GetRequest {
                host: host.to_string(),
                community: community.to_string(),
                oid: oid.to_string(),
                timeout,
                version,
            };

            match self.backend.get(&request).await {
                Ok(output) => return Ok(output),
                Err(e) => {
                    debug!("GET {} on {} failed with {}: {}", oid, host, version, e);
                    last_reason = e.to_string();
                }
            }
        }

        Err(FactError::transport(oid, last_reason))
    }

    /// First non-empty value under `root`, for table-rooted OIDs where a GET
    /// of instance 1 is unreliable
    pub async fn walk_first(&self, host: &str, community: &str, root: &str, timeout: Duration) -> Result<Option<String>> {
        let raw = self.walk(host, community, root, timeout).await?;
        Ok(super::decoder::subtree_values(&raw, root)
            .iter()
            .map(|value| value.text().trim().to_string())
            .find(|text| !text.is_empty()))
    }
}

impl fmt::Debug for SnmpWalker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnmpWalker").field("ladder", &self.ladder).finish()
    }
}
