//! In-memory SNMP agent and probe sessions shared by the integration tests

#![allow(dead_code)]

use netfacts::platform::{Platform, ProbeConnector, ProbeSession};
use netfacts::snmp::transport::{GetRequest, SnmpBackend, SnmpVersion, WalkRequest, WalkStrategy};
use netfacts::{FactError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const IF_TABLE_RAW: &str = "\
.1.3.6.1.2.1.2.2.1.2.1 = STRING: \"GigabitEthernet1/0/1\"
.1.3.6.1.2.1.2.2.1.2.2 = STRING: \"GigabitEthernet1/0/2\"
.1.3.6.1.2.1.2.2.1.2.3 = STRING: \"Vlan10\"
.1.3.6.1.2.1.2.2.1.5.1 = Gauge32: 1000000000
.1.3.6.1.2.1.2.2.1.5.2 = Gauge32: 1000000000
.1.3.6.1.2.1.2.2.1.5.3 = Gauge32: 1000000000
.1.3.6.1.2.1.2.2.1.6.1 = Hex-STRING: B0 7D 47 F5 C7 31
.1.3.6.1.2.1.2.2.1.6.2 = Hex-STRING: B0 7D 47 F5 C7 32
.1.3.6.1.2.1.2.2.1.6.3 = Hex-STRING: B0 7D 47 F5 C7 40
.1.3.6.1.2.1.2.2.1.7.1 = INTEGER: up(1)
.1.3.6.1.2.1.2.2.1.7.2 = INTEGER: up(1)
.1.3.6.1.2.1.2.2.1.7.3 = INTEGER: up(1)
.1.3.6.1.2.1.2.2.1.8.1 = INTEGER: up(1)
.1.3.6.1.2.1.2.2.1.8.2 = INTEGER: down(2)
.1.3.6.1.2.1.2.2.1.8.3 = INTEGER: up(1)
";

pub const IF_X_TABLE_RAW: &str = "\
.1.3.6.1.2.1.31.1.1.1.1.1 = STRING: \"Gi1/0/1\"
.1.3.6.1.2.1.31.1.1.1.1.2 = STRING: \"Gi1/0/2\"
.1.3.6.1.2.1.31.1.1.1.1.3 = STRING: \"Vl10\"
.1.3.6.1.2.1.31.1.1.1.6.1 = Counter64: 123456789
.1.3.6.1.2.1.31.1.1.1.10.1 = Counter64: 987654321
.1.3.6.1.2.1.31.1.1.1.15.1 = Gauge32: 1000
.1.3.6.1.2.1.31.1.1.1.15.2 = Gauge32: 1000
.1.3.6.1.2.1.31.1.1.1.15.3 = Gauge32: 1000
.1.3.6.1.2.1.31.1.1.1.18.1 = STRING: \"uplink core-1\"
.1.3.6.1.2.1.31.1.1.1.18.2 = STRING: \"\"
.1.3.6.1.2.1.31.1.1.1.18.3 = STRING: \"users\"
";

pub const IP_INDEX_RAW: &str = "\
.1.3.6.1.2.1.4.20.1.2.10.10.0.1 = INTEGER: 3
.1.3.6.1.2.1.4.20.1.2.192.0.2.1 = INTEGER: 1
";

pub const IP_MASK_RAW: &str = "\
.1.3.6.1.2.1.4.20.1.3.10.10.0.1 = IpAddress: 255.255.255.0
.1.3.6.1.2.1.4.20.1.3.192.0.2.1 = IpAddress: 255.255.255.252
";

pub const IF_TABLE_ROOT: &str = "1.3.6.1.2.1.2.2.1";
pub const IF_X_TABLE_ROOT: &str = "1.3.6.1.2.1.31.1.1.1";
pub const IP_INDEX_ROOT: &str = "1.3.6.1.2.1.4.20.1.2";
pub const IP_MASK_ROOT: &str = "1.3.6.1.2.1.4.20.1.3";
pub const MAC_COLUMN_ROOT: &str = "1.3.6.1.2.1.2.2.1.6";

/// Scripted SNMP agent: answers walks by root and GETs by exact OID
pub struct FakeAgent {
    walks: HashMap<String, String>,
    gets: HashMap<String, String>,
    fails: fn(&WalkStrategy) -> bool,
    delay: Duration,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub walk_log: Mutex<Vec<(String, WalkStrategy)>>,
    pub get_log: Mutex<Vec<(String, SnmpVersion)>>,
}

fn never(_: &WalkStrategy) -> bool {
    false
}

impl FakeAgent {
    pub fn new() -> Self {
        Self {
            walks: HashMap::new(),
            gets: HashMap::new(),
            fails: never,
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            walk_log: Mutex::new(Vec::new()),
            get_log: Mutex::new(Vec::new()),
        }
    }

    /// Agent exposing the standard interface fixtures
    pub fn switch() -> Self {
        Self::new()
            .with_walk(IF_TABLE_ROOT, IF_TABLE_RAW)
            .with_walk(IF_X_TABLE_ROOT, IF_X_TABLE_RAW)
            .with_walk(IP_INDEX_ROOT, IP_INDEX_RAW)
            .with_walk(IP_MASK_ROOT, IP_MASK_RAW)
    }

    pub fn with_walk(mut self, root: &str, raw: &str) -> Self {
        self.walks.insert(root.to_string(), raw.to_string());
        self
    }

    /// `value` is the right-hand side of the response, e.g. `INTEGER: 6`
    pub fn with_get(mut self, oid: &str, value: &str) -> Self {
        self.gets.insert(oid.to_string(), value.to_string());
        self
    }

    pub fn with_failing(mut self, fails: fn(&WalkStrategy) -> bool) -> Self {
        self.fails = fails;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn walked_roots(&self) -> Vec<String> {
        self.walk_log.lock().unwrap().iter().map(|(root, _)| root.clone()).collect()
    }

    pub fn strategies_for(&self, root: &str) -> Vec<WalkStrategy> {
        self.walk_log
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| r == root)
            .map(|(_, strategy)| *strategy)
            .collect()
    }
}

#[async_trait::async_trait]
impl SnmpBackend for FakeAgent {
    async fn walk(&self, request: &WalkRequest) -> Result<String> {
        self.walk_log
            .lock()
            .unwrap()
            .push((request.oid.clone(), request.strategy));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if (self.fails)(&request.strategy) {
            return Err(FactError::transport(&request.oid, "exited with status 1"));
        }
        self.walks
            .get(&request.oid)
            .cloned()
            .ok_or_else(|| FactError::transport(&request.oid, "Timeout: No Response"))
    }

    async fn get(&self, request: &GetRequest) -> Result<String> {
        self.get_log
            .lock()
            .unwrap()
            .push((request.oid.clone(), request.version));

        self.gets
            .get(&request.oid)
            .map(|value| format!(".{} = {}\n", request.oid, value))
            .ok_or_else(|| FactError::transport(&request.oid, "Timeout: No Response"))
    }
}

/// How a fake probe session answers
#[derive(Debug, Clone)]
pub enum Reply {
    Output(String),
    AuthFailure,
    Hang,
}

/// Connector handing out scripted sessions, one per probe
pub struct FakeConnector {
    replies: HashMap<Platform, Reply>,
    pub opened: Mutex<Vec<Platform>>,
    pub closed: Arc<AtomicUsize>,
}

impl FakeConnector {
    pub fn new(replies: Vec<(Platform, Reply)>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            opened: Mutex::new(Vec::new()),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn opened(&self) -> Vec<Platform> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ProbeConnector for FakeConnector {
    async fn open(&self, _host: &str, _port: u16, platform: Platform) -> Result<Box<dyn ProbeSession>> {
        self.opened.lock().unwrap().push(platform);
        let reply = self
            .replies
            .get(&platform)
            .cloned()
            .unwrap_or_else(|| Reply::Output("% Invalid input detected at '^' marker.".to_string()));
        Ok(Box::new(FakeSession {
            reply,
            closed: Arc::clone(&self.closed),
        }))
    }
}

struct FakeSession {
    reply: Reply,
    closed: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl ProbeSession for FakeSession {
    async fn execute(&mut self, _command: &str, timeout: Duration) -> Result<String> {
        match &self.reply {
            Reply::Output(output) => Ok(output.clone()),
            Reply::AuthFailure => Err(FactError::ProcessError("Permission denied".to_string())),
            Reply::Hang => {
                tokio::time::sleep(timeout).await;
                Err(FactError::TimeoutError)
            }
        }
    }

    async fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}
