//! Worker and encoder configuration
//!
//! Defaults match what the chat client expects: 24 kbps with the Tencent
//! header byte. Environment variables override the defaults, and a JSON file
//! can replace them wholesale.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SilkWorkerError};

const MIN_BIT_RATE: u32 = 5_000;
const MAX_BIT_RATE: u32 = 100_000;

/// Parameters handed to the SILK encoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Target bit rate in bits per second
    pub bit_rate: u32,
    /// Prefix the stream with the 0x02 byte Tencent clients expect
    pub tencent: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            bit_rate: 24_000,
            tencent: true,
        }
    }
}

/// Worker thread settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Capacity of the inbound task channel
    pub queue_capacity: usize,
    /// Name prefix for spawned worker threads
    pub thread_name: String,
    pub encoder: EncoderConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        WorkerConfig {
            queue_capacity: 1,
            thread_name: "silk-worker".to_string(),
            encoder: EncoderConfig::default(),
        }
    }
}

impl WorkerConfig {
    /// Defaults overridden by `SILKWORKER_*` environment variables.
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = WorkerConfig::default();
        if let Some(bit_rate) = env::var("SILKWORKER_BIT_RATE")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.encoder.bit_rate = bit_rate;
        }
        if let Some(tencent) = env::var("SILKWORKER_TENCENT")
            .ok()
            .and_then(|s| parse_bool(&s))
        {
            config.encoder.tencent = tencent;
        }
        if let Some(capacity) = env::var("SILKWORKER_QUEUE_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.queue_capacity = capacity;
        }
        config
    }

    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SilkWorkerError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        let config: WorkerConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(SilkWorkerError::InvalidConfig {
                reason: "queue_capacity must be at least 1".to_string(),
            });
        }
        let bit_rate = self.encoder.bit_rate;
        if !(MIN_BIT_RATE..=MAX_BIT_RATE).contains(&bit_rate) {
            return Err(SilkWorkerError::InvalidConfig {
                reason: format!(
                    "bit_rate {} outside {}..={} bps",
                    bit_rate, MIN_BIT_RATE, MAX_BIT_RATE
                ),
            });
        }
        Ok(())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
