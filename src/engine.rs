//! Per-host collection run: signals and interfaces in parallel, then
//! classification and optional platform detection

use crate::classify::{ClassificationResult, Classifier};
use crate::collector::{DeviceSignalCollector, DeviceSignals, InterfaceCollector, InterfaceSet};
use crate::config::CollectorConfig;
use crate::platform::{Platform, PlatformAutodetector};
use crate::snmp::SnmpWalker;
use crate::{FactError, Result};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;

/// Everything learned about one host
#[derive(Debug, Clone, Serialize)]
pub struct DeviceReport {
    pub host: String,
    pub collected_at: DateTime<Utc>,
    pub signals: DeviceSignals,
    pub vendor: String,
    pub classification: ClassificationResult,
    pub interfaces: InterfaceSet,
    pub platform: Option<Platform>,
    /// Raw output of the session command that identified the platform;
    /// `None` when sysDescr alone settled it
    pub platform_probe_output: Option<String>,
    pub platform_error: Option<String>,
}

/// Runs every collector against one host
#[derive(Clone)]
pub struct FactEngine {
    config: CollectorConfig,
    signals: DeviceSignalCollector,
    interfaces: InterfaceCollector,
    classifier: Classifier,
    autodetector: Option<PlatformAutodetector>,
}

impl FactEngine {
    /// Engine over the net-snmp tools and the system SSH client
    pub fn new(config: CollectorConfig) -> Self {
        let walker = SnmpWalker::net_snmp(&config.snmp);
        let autodetector = if config.autodetect.enabled && config.autodetect.has_credentials() {
            Some(PlatformAutodetector::ssh(&config.autodetect))
        } else {
            None
        };
        Self::with_parts(config, walker, autodetector)
    }

    /// Engine over caller-supplied transports
    pub fn with_parts(config: CollectorConfig, walker: SnmpWalker, autodetector: Option<PlatformAutodetector>) -> Self {
        Self {
            signals: DeviceSignalCollector::new(walker.clone()),
            interfaces: InterfaceCollector::new(walker, &config.snmp),
            classifier: Classifier::new(config.classifier.clone()),
            autodetector,
            config,
        }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub async fn run(&self, host: &str) -> Result<DeviceReport> {
        let community = &self.config.snmp.community;
        let timeout = self.config.snmp.timeout();

        info!("Collecting facts from {}", host);
        let (signal_set, interfaces) = tokio::join!(
            self.signals.collect(host, community, timeout),
            self.interfaces.collect(host, community, timeout)
        );

        if !signal_set.reachable() && interfaces.is_empty() {
            warn!("{}: no SNMP data at all", host);
            return Err(FactError::Unreachable(host.to_string()));
        }

        let signals = signal_set.signals;
        let classification = self.classifier.classify(&signals);

        let (platform, platform_probe_output, platform_error) = self.detect_platform(host, &signals.sys_descr).await;

        info!(
            "{}: vendor {}, role {}, {} interfaces",
            host,
            classification.vendor,
            classification.role,
            interfaces.len()
        );

        Ok(DeviceReport {
            host: host.to_string(),
            collected_at: Utc::now(),
            vendor: classification.vendor.clone(),
            signals,
            classification,
            interfaces,
            platform,
            platform_probe_output,
            platform_error,
        })
    }

    /// Platform, matching session output and failure, in that order. Sessions
    /// are only opened when sysDescr leaves the platform open.
    async fn detect_platform(&self, host: &str, sys_descr: &str) -> (Option<Platform>, Option<String>, Option<String>) {
        let Some(detector) = &self.autodetector else {
            return (None, None, None);
        };

        if let Some(platform) = Platform::passive(sys_descr) {
            info!("{}: sysDescr identifies {}", host, platform);
            return (Some(platform), None, None);
        }

        let (result, states) = detector.detect_traced(host, sys_descr).await;
        debug!("{}: detection went through {:?}", host, states);
        match result {
            Ok(outcome) => (Some(outcome.platform), Some(outcome.output), None),
            Err(e) => {
                warn!("{}: {}", host, e);
                (None, None, Some(e.to_string()))
            }
        }
    }
}
