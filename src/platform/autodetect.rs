//! Platform Autodetector
//!
//! `Idle -> PortCheck -> Probing -> {Matched, Exhausted}`, with a closed
//! management port ending the run at `ConnectivityFailed` before any session
//! is opened. Candidates are probed strictly one at a time.

use super::session::{ProbeConnector, SshCliConnector};
use super::Platform;
use crate::config::AutodetectSettings;
use crate::{FactError, Result};
use log::{debug, info};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

/// Steps the detector moved through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetectionState {
    Idle,
    PortCheck,
    Probing,
    Matched,
    Exhausted,
    ConnectivityFailed,
}

/// Successful detection
#[derive(Debug, Clone, Serialize)]
pub struct DetectionOutcome {
    pub platform: Platform,
    /// Raw output of the probe command that matched
    pub output: String,
    /// Candidates probed, including the matching one
    pub attempts: usize,
    pub states: Vec<DetectionState>,
}

/// Identifies the CLI platform of a host by probing candidate commands
#[derive(Clone)]
pub struct PlatformAutodetector {
    connector: Arc<dyn ProbeConnector>,
    port: u16,
    port_check_timeout: Duration,
    probe_timeout: Duration,
    connect_timeout: Duration,
}

impl PlatformAutodetector {
    pub fn new(connector: Arc<dyn ProbeConnector>, settings: &AutodetectSettings) -> Self {
        Self {
            connector,
            port: settings.ssh_port,
            port_check_timeout: settings.port_check_timeout(),
            probe_timeout: settings.probe_timeout(),
            connect_timeout: settings.connect_timeout(),
        }
    }

    /// Detector probing over the system SSH client
    pub fn ssh(settings: &AutodetectSettings) -> Self {
        Self::new(Arc::new(SshCliConnector::from_settings(settings)), settings)
    }

    pub async fn detect(&self, host: &str, sys_descr: &str) -> Result<DetectionOutcome> {
        self.detect_traced(host, sys_descr).await.0
    }

    /// `detect` plus the states visited, which survive a failed run
    pub async fn detect_traced(&self, host: &str, sys_descr: &str) -> (Result<DetectionOutcome>, Vec<DetectionState>) {
        let mut states = vec![DetectionState::Idle];
        let result = self.advance(host, sys_descr, &mut states).await;
        (result, states)
    }

    async fn advance(&self, host: &str, sys_descr: &str, states: &mut Vec<DetectionState>) -> Result<DetectionOutcome> {
        states.push(DetectionState::PortCheck);
        if !port_open(host, self.port, self.port_check_timeout).await {
            states.push(DetectionState::ConnectivityFailed);
            info!("{}: port {} closed, skipping platform detection", host, self.port);
            return Err(FactError::ConnectivityError {
                host: host.to_string(),
                port: self.port,
            });
        }

        let candidates = Platform::candidates_for(sys_descr);
        states.push(DetectionState::Probing);
        debug!("{}: probing candidates {:?}", host, candidates);

        for (attempt, platform) in candidates.iter().enumerate() {
            match self.probe(host, *platform).await {
                Ok(Some(output)) => {
                    states.push(DetectionState::Matched);
                    info!("{}: detected {}", host, platform);
                    return Ok(DetectionOutcome {
                        platform: *platform,
                        output,
                        attempts: attempt + 1,
                        states: states.clone(),
                    });
                }
                Ok(None) => debug!("{}: {} signature not found", host, platform),
                Err(e) => debug!("{}: {} probe failed: {}", host, platform, e),
            }
        }

        states.push(DetectionState::Exhausted);
        info!("{}: no candidate matched after {} probes", host, candidates.len());
        Err(FactError::DetectionError {
            host: host.to_string(),
            sys_descr: sys_descr.to_string(),
        })
    }

    /// One candidate: open, run the probe command, close. `Ok(None)` when
    /// the output does not carry the candidate's signature.
    async fn probe(&self, host: &str, platform: Platform) -> Result<Option<String>> {
        let mut session = tokio::time::timeout(self.connect_timeout, self.connector.open(host, self.port, platform))
            .await??;

        let result = session.execute(platform.probe_command(), self.probe_timeout).await;
        session.close().await;

        let output = result?;
        Ok(platform.matches(&output).then_some(output))
    }
}

/// TCP reachability of `host:port` within `deadline`
pub async fn port_open(host: &str, port: u16, deadline: Duration) -> bool {
    matches!(
        tokio::time::timeout(deadline, TcpStream::connect((host, port))).await,
        Ok(Ok(_))
    )
}
