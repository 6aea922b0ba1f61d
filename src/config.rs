//! Configuration for ecusim
//!
//! Centralized configuration with sensible defaults, a builder, and an
//! optional TOML file.
//!
//! ## File format
//! ```toml
//! listen_addr = "0.0.0.0:5555"
//! workers = 4
//! read_buffer_size = 1024
//!
//! [[did]]
//! id = 0xF192
//! value = "DE AD BE EF"
//! ```
//!
//! Every key is optional. `[[did]]` entries are added on top of the built-in
//! seed table, replacing a seeded value with the same id.

use std::path::Path;

use serde::Deserialize;

use crate::error::{EcuError, Result};
use crate::protocol::{parse_hex, DEFAULT_READ_BUFFER_SIZE};
use crate::store::{default_seed, Did};

/// Default tester-facing address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5555";

/// Main configuration for a simulated ECU
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Connection worker threads
    ///
    /// `0` spawns one thread per accepted connection. Any other value caps
    /// concurrently served connections at that many pooled workers; further
    /// connections wait in the accept queue.
    pub workers: usize,

    /// Bytes taken by one socket read, which is one request
    pub read_buffer_size: usize,

    // -------------------------------------------------------------------------
    // Data Configuration
    // -------------------------------------------------------------------------
    /// Initial DID table
    pub seed: Vec<(Did, Vec<u8>)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            workers: 0,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            seed: default_seed(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load a config from a TOML file, starting from the defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            EcuError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse a config from TOML text, starting from the defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| EcuError::Config(e.to_string()))?;

        let mut builder = Config::builder();
        if let Some(addr) = file.listen_addr {
            builder = builder.listen_addr(addr);
        }
        if let Some(workers) = file.workers {
            builder = builder.workers(workers);
        }
        if let Some(size) = file.read_buffer_size {
            builder = builder.read_buffer_size(size);
        }
        for entry in file.dids {
            let value = parse_hex(&entry.value).map_err(|e| {
                EcuError::Config(format!("DID 0x{:04X}: {}", entry.id, e))
            })?;
            builder = builder.did(entry.id, value);
        }

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.listen_addr.trim().is_empty() {
            return Err(EcuError::Config("listen_addr is empty".to_string()));
        }
        if self.read_buffer_size == 0 {
            return Err(EcuError::Config(
                "read_buffer_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// On-disk shape of the config file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    listen_addr: Option<String>,
    workers: Option<usize>,
    read_buffer_size: Option<usize>,
    #[serde(default, rename = "did")]
    dids: Vec<DidEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DidEntry {
    id: Did,
    /// Hex bytes, e.g. "00 01 23"
    value: String,
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the worker count (0 = thread per connection)
    pub fn workers(mut self, count: usize) -> Self {
        self.config.workers = count;
        self
    }

    /// Set the per-read buffer size (in bytes)
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = size;
        self
    }

    /// Replace the whole seed table
    pub fn seed<I, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (Did, V)>,
        V: Into<Vec<u8>>,
    {
        self.config.seed = entries
            .into_iter()
            .map(|(did, value)| (did, value.into()))
            .collect();
        self
    }

    /// Add one seed DID, replacing an existing entry with the same id
    pub fn did(mut self, did: Did, value: impl Into<Vec<u8>>) -> Self {
        let value = value.into();
        match self.config.seed.iter_mut().find(|(id, _)| *id == did) {
            Some(entry) => entry.1 = value,
            None => self.config.seed.push((did, value)),
        }
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
