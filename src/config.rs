//! Configuration module for the netfacts collectors

use crate::classify::ClassifierPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Upper bound on concurrent SNMP requests against one agent
pub const MAX_WALK_WORKERS: usize = 4;

/// Main configuration structure for one collection run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// SNMP transport settings
    pub snmp: SnmpSettings,

    /// Role classification policy
    pub classifier: ClassifierPolicy,

    /// SSH platform autodetection settings
    pub autodetect: AutodetectSettings,
}

/// SNMP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnmpSettings {
    /// Community string (v1/v2c)
    pub community: String,

    /// Per-request timeout in seconds, handed to the net-snmp tools
    pub timeout_secs: u64,

    /// Retries per request inside the net-snmp tools
    pub retries: u32,

    /// Concurrent subtree walks against one host
    pub max_concurrent_walks: usize,

    /// Wall-clock limit for one complete walk attempt, in seconds
    pub walk_deadline_secs: u64,

    pub snmpbulkwalk_path: String,
    pub snmpwalk_path: String,
    pub snmpget_path: String,

    /// Output cap per tool invocation
    pub max_output_bytes: usize,
}

impl Default for SnmpSettings {
    fn default() -> Self {
        Self {
            community: "public".to_string(),
            timeout_secs: 2,
            retries: 1,
            max_concurrent_walks: 3,
            walk_deadline_secs: 60,
            snmpbulkwalk_path: "snmpbulkwalk".to_string(),
            snmpwalk_path: "snmpwalk".to_string(),
            snmpget_path: "snmpget".to_string(),
            max_output_bytes: 4 * 1024 * 1024,
        }
    }
}

impl SnmpSettings {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Wall-clock budget for one tool invocation: every retry plus a grace second
    pub fn process_budget(&self) -> Duration {
        self.process_budget_for(self.timeout())
    }

    /// `process_budget` for a request carrying its own per-try timeout
    pub fn process_budget_for(&self, timeout: Duration) -> Duration {
        timeout * (self.retries + 1) + Duration::from_secs(1)
    }

    /// Wall-clock budget for one walk attempt; never shorter than a single request
    pub fn walk_deadline(&self) -> Duration {
        self.walk_deadline_for(self.timeout())
    }

    pub fn walk_deadline_for(&self, timeout: Duration) -> Duration {
        Duration::from_secs(self.walk_deadline_secs).max(self.process_budget_for(timeout))
    }

    /// Worker count clamped to what agents tolerate
    pub fn walk_workers(&self) -> usize {
        self.max_concurrent_walks.clamp(1, MAX_WALK_WORKERS)
    }
}

/// SSH platform autodetection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutodetectSettings {
    pub enabled: bool,
    pub ssh_port: u16,
    pub port_check_timeout_ms: u64,
    pub probe_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub ssh_path: String,
    pub sshpass_path: String,
}

impl Default for AutodetectSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            ssh_port: 22,
            port_check_timeout_ms: 2000,
            probe_timeout_secs: 8,
            connect_timeout_secs: 3,
            username: String::new(),
            password: None,
            ssh_path: "ssh".to_string(),
            sshpass_path: "sshpass".to_string(),
        }
    }
}

impl AutodetectSettings {
    pub fn port_check_timeout(&self) -> Duration {
        Duration::from_millis(self.port_check_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Whether there is enough to open a session at all
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }
}

impl CollectorConfig {
    /// Set the community string
    pub fn with_community<S: Into<String>>(mut self, community: S) -> Self {
        self.snmp.community = community.into();
        self
    }

    /// Set the per-request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.snmp.timeout_secs = timeout_secs;
        self
    }

    /// Set the concurrent walk limit
    pub fn with_max_concurrent_walks(mut self, workers: usize) -> Self {
        self.snmp.max_concurrent_walks = workers;
        self
    }

    /// Enable platform autodetection with the given login
    pub fn with_ssh_credentials<S: Into<String>>(mut self, username: S, password: Option<String>) -> Self {
        self.autodetect.enabled = true;
        self.autodetect.username = username.into();
        self.autodetect.password = password;
        self
    }

    /// Load configuration from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::FactError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let mut config: CollectorConfig = toml::from_str(content)
            .map_err(|e| crate::FactError::ConfigError(format!("Failed to parse TOML: {}", e)))?;

        if config.autodetect.password.is_none() {
            config.autodetect.password = std::env::var("NETFACTS_SSH_PASSWORD").ok();
        }

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default_config() -> Self {
        // Try to load from ~/.netfacts.toml
        let home_dir = dirs::home_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
        let config_path = home_dir.join(".netfacts.toml");

        if config_path.exists() {
            match Self::from_toml_file(&config_path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    return config;
                }
                Err(e) => log::warn!("Ignoring {}: {}", config_path.display(), e),
            }
        }

        let mut config = Self::default();
        config.autodetect.password = std::env::var("NETFACTS_SSH_PASSWORD").ok();
        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.snmp.community.is_empty() {
            return Err(crate::FactError::ConfigError("Community cannot be empty".to_string()));
        }

        if self.snmp.timeout_secs == 0 {
            return Err(crate::FactError::ConfigError("Timeout must be greater than 0".to_string()));
        }

        if self.snmp.max_concurrent_walks == 0 {
            return Err(crate::FactError::ConfigError(
                "Concurrent walk count must be greater than 0".to_string(),
            ));
        }

        if self.autodetect.enabled && !self.autodetect.has_credentials() {
            return Err(crate::FactError::ConfigError(
                "Platform autodetection needs an SSH username".to_string(),
            ));
        }

        Ok(())
    }
}
