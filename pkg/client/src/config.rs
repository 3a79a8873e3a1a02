//! Client configuration
//!
//! Configuration is layered: the defaults, then an optional TOML file, then environment variables
//! prefixed with `ZKTIPS_`. Nested keys are separated with `__` in the environment, so
//! `ZKTIPS_PROVER__WORKERS=4` sets `prover.workers`.
//!
//! ```toml
//! [prover]
//! artifacts_dir = "circuits/build"
//! workers = 4
//!
//! [client]
//! stale_root_retries = 2
//!
//! [log]
//! level = "debug"
//! format = "json"
//! ```

use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// The prefix of the environment variables that override the configuration
pub const ENV_PREFIX: &str = "ZKTIPS_";

/// All of the client's configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How proofs are generated
    pub prover: ProverConfig,
    /// How operations are submitted
    pub client: ClientConfig,
    /// Where the local commitment tree is kept
    pub storage: StorageConfig,
    /// How logs are written
    pub log: LogConfig,
}

/// Configuration of the snarkjs prover pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProverConfig {
    /// The directory holding one subdirectory of artifacts per circuit
    pub artifacts_dir: PathBuf,
    /// The snarkjs executable
    pub snarkjs_bin: PathBuf,
    /// How many proofs can be generated at once
    pub workers: usize,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from("circuits"),
            snarkjs_bin: PathBuf::from("snarkjs"),
            workers: std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
        }
    }
}

/// Configuration of operation submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// How many times an operation rejected for a stale root is re-proved and resubmitted
    pub stale_root_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            stale_root_retries: 1,
        }
    }
}

/// Configuration of the local commitment tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// A rocksdb directory to persist the tree's leaves in
    ///
    /// If unset, the tree is kept in memory and rebuilt from the ledger's events on startup
    pub path: Option<PathBuf>,
}

/// Configuration of logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// An `EnvFilter` directive, used unless `RUST_LOG` is set
    pub level: String,
    /// The output format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Pretty,
        }
    }
}

/// How log lines are formatted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, multi-line output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl Config {
    /// The layered configuration sources, for callers that want to add their own
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let figment = Figment::from(Serialized::defaults(Config::default()));

        let figment = match file {
            Some(file) => figment.merge(Toml::file(file)),
            None => figment,
        };

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load the configuration from the defaults, `file` and the environment
    pub fn load(file: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(file).extract()
    }
}
