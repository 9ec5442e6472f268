//! Service configuration (spec.md §8): a TOML file plus a handful of CLI
//! flags, grounded field-for-field on `config/Config.go` and
//! `cmd/attacker/rootcmd.go` so existing deployment config files parse
//! unchanged.

use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MysqlConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub http_port: u16,
    #[serde(default = "default_http_host")]
    pub http_host: String,
    /// Consumed execution-layer JSON-RPC endpoint; reserved for future
    /// execution-side hooks (spec.md Non-goals: not dispatched today).
    #[serde(default)]
    pub execute_rpc: String,
    /// Consumed beacon-node gateway endpoint (component "beacon_client").
    pub beacon_rpc: String,
    #[serde(default)]
    pub metrics_port: u16,
    pub strategy: PathBuf,
    #[serde(default, rename = "mysql")]
    pub db_config: Option<MysqlConfig>,
    #[serde(default)]
    pub swag_host: String,
    #[serde(default)]
    pub reward_file: Option<PathBuf>,
}

impl Config {
    /// The OpenAPI/REST side channel always runs one port above the
    /// JSON-RPC hook surface (spec.md §7).
    pub fn openapi_port(&self) -> u16 {
        self.http_port + 1
    }
}

fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

pub fn parse_config(path: &Path) -> Result<Config, ConfigError> {
    let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Parser)]
#[command(name = "attacker", about = "The attacker command-line interface")]
pub struct Cli {
    #[arg(long, default_value = "debug", global = true)]
    pub loglevel: String,
    #[arg(long, default_value = "", global = true)]
    pub logpath: String,
    #[arg(long, default_value = "", global = true)]
    pub config: String,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prints version information and exits.
    Version {
        #[arg(long)]
        detail: bool,
    },
}
