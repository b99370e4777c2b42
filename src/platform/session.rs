//! Probe sessions: one management session per probe attempt
//!
//! The production connector drives the system OpenSSH client. Each
//! `execute` is one client process running one remote command, so a session
//! holds no live connection between calls.

use super::Platform;
use crate::config::AutodetectSettings;
use crate::utils::process::run_with_timeout;
use crate::{FactError, Result};
use log::debug;
use std::fmt;
use std::time::Duration;

/// Probe output cap
const MAX_PROBE_OUTPUT: usize = 1024 * 1024;

/// Login used for probing
#[derive(Clone, Default)]
pub struct SshCredentials {
    pub username: String,
    pub password: Option<String>,
}

impl SshCredentials {
    pub fn new<U: Into<String>>(username: U, password: Option<String>) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

impl fmt::Debug for SshCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshCredentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// An opened session able to run one command at a time
#[async_trait::async_trait]
pub trait ProbeSession: Send {
    /// Run `command` and return its output, bounded by `timeout`
    async fn execute(&mut self, command: &str, timeout: Duration) -> Result<String>;

    /// Tear the session down; called after every probe regardless of outcome
    async fn close(&mut self);
}

/// Opens probe sessions
#[async_trait::async_trait]
pub trait ProbeConnector: Send + Sync {
    async fn open(&self, host: &str, port: u16, platform: Platform) -> Result<Box<dyn ProbeSession>>;
}

/// Connector that shells out to `ssh`, through `sshpass -e` when a password is set
#[derive(Debug, Clone)]
pub struct SshCliConnector {
    credentials: SshCredentials,
    ssh_path: String,
    sshpass_path: String,
    connect_timeout: Duration,
}

impl SshCliConnector {
    pub fn new(credentials: SshCredentials, settings: &AutodetectSettings) -> Self {
        Self {
            credentials,
            ssh_path: settings.ssh_path.clone(),
            sshpass_path: settings.sshpass_path.clone(),
            connect_timeout: settings.connect_timeout(),
        }
    }

    pub fn from_settings(settings: &AutodetectSettings) -> Self {
        Self::new(
            SshCredentials::new(settings.username.clone(), settings.password.clone()),
            settings,
        )
    }
}

#[async_trait::async_trait]
impl ProbeConnector for SshCliConnector {
    async fn open(&self, host: &str, port: u16, platform: Platform) -> Result<Box<dyn ProbeSession>> {
        if self.credentials.username.is_empty() {
            return Err(FactError::ConfigError("SSH username is required for probing".to_string()));
        }
        debug!("Opening SSH probe session to {}:{} as {} for {}", host, port, self.credentials.username, platform);

        Ok(Box::new(SshCliSession {
            host: host.to_string(),
            port,
            credentials: self.credentials.clone(),
            ssh_path: self.ssh_path.clone(),
            sshpass_path: self.sshpass_path.clone(),
            connect_timeout: self.connect_timeout,
        }))
    }
}

/// Session backed by the OpenSSH client
#[derive(Debug, Clone)]
pub struct SshCliSession {
    host: String,
    port: u16,
    credentials: SshCredentials,
    ssh_path: String,
    sshpass_path: String,
    connect_timeout: Duration,
}

impl SshCliSession {
    /// Program, arguments and environment for one remote command
    pub fn command_line(&self, command: &str) -> (String, Vec<String>, Vec<(String, String)>) {
        let mut ssh_args = vec![
            "-T".to_string(),
            "-p".to_string(),
            self.port.to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.connect_timeout.as_secs().max(1)),
            "-o".to_string(),
            "StrictHostKeyChecking=accept-new".to_string(),
            "-o".to_string(),
            "LogLevel=ERROR".to_string(),
        ];

        match &self.credentials.password {
            Some(password) => {
                ssh_args.extend([
                    "-o".to_string(),
                    "PreferredAuthentications=password,keyboard-interactive".to_string(),
                    "-o".to_string(),
                    "NumberOfPasswordPrompts=1".to_string(),
                ]);
                ssh_args.push(format!("{}@{}", self.credentials.username, self.host));
                ssh_args.push(command.to_string());

                let mut args = vec!["-e".to_string(), self.ssh_path.clone()];
                args.extend(ssh_args);
                (
                    self.sshpass_path.clone(),
                    args,
                    vec![("SSHPASS".to_string(), password.clone())],
                )
            }
            None => {
                ssh_args.extend(["-o".to_string(), "BatchMode=yes".to_string()]);
                ssh_args.push(format!("{}@{}", self.credentials.username, self.host));
                ssh_args.push(command.to_string());
                (self.ssh_path.clone(), ssh_args, Vec::new())
            }
        }
    }
}

#[async_trait::async_trait]
impl ProbeSession for SshCliSession {
    async fn execute(&mut self, command: &str, timeout: Duration) -> Result<String> {
        let (program, args, envs) = self.command_line(command);
        let output = run_with_timeout(&program, &args, &envs, timeout, MAX_PROBE_OUTPUT).await?;

        // Some network CLIs exit non-zero after printing a full answer
        if !output.success && output.stdout.trim().is_empty() {
            return Err(FactError::ProcessError(format!(
                "{} on {}: {}",
                command,
                self.host,
                output.diagnostic()
            )));
        }
        Ok(output.stdout)
    }

    async fn close(&mut self) {
        debug!("Closed SSH probe session to {}:{}", self.host, self.port);
    }
}
