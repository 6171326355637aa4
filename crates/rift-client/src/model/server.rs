//! Read-only snapshots of the server itself: runtime configuration and logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server version, startup options and process information (`GET /config`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Semantic version of the server.
    pub version: String,
    pub options: ConfigOptions,
    pub process: ProcessInfo,
}

/// Command-line options the server was started with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigOptions {
    pub help: bool,
    pub no_parse: bool,
    #[serde(rename = "nologfile")]
    pub no_log_file: bool,
    pub allow_injection: bool,
    pub local_only: bool,
    pub mock: bool,
    pub debug: bool,
    pub port: u16,
    #[serde(rename = "pidfile")]
    pub pid_file: String,
    #[serde(rename = "logfile")]
    pub log_file: String,
    #[serde(rename = "loglevel")]
    pub log_level: String,
    pub ip_whitelist: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProcessInfo {
    pub node_version: String,
    pub architecture: String,
    pub platform: String,
    pub rss: i64,
    pub heap_total: i64,
    pub heap_used: i64,
    /// Seconds since the server started.
    pub uptime: f64,
    pub cwd: String,
}

/// One entry of the server log buffer (`GET /logs`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    pub level: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}
