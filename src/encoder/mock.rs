//! Mock SILK encoder for testing
//!
//! Doesn't run the codec but produces a stream with the same outer shape:
//! header, then one length-prefixed payload per 20 ms frame. Each payload is
//! the frame's sample sum, so output depends deterministically on input.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::pcm::prepare_input;
use super::{stream_header, SilkEncoder};
use crate::config::EncoderConfig;
use crate::error::{Result, SilkWorkerError};
use crate::task::EncodeResult;

/// Mock SILK encoder
pub struct MockSilkEncoder {
    config: EncoderConfig,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockSilkEncoder {
    pub fn new() -> Self {
        Self::with_config(EncoderConfig::default())
    }

    pub fn with_config(config: EncoderConfig) -> Self {
        Self {
            config,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// An encoder whose every call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    /// Number of `encode` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockSilkEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SilkEncoder for MockSilkEncoder {
    fn name(&self) -> &str {
        "mock-silk"
    }

    fn encode(&self, input: &[u8], sample_rate: u32) -> Result<EncodeResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(SilkWorkerError::encoder(message.clone()));
        }

        let pcm = prepare_input(input, sample_rate)?;

        let mut data = stream_header(&self.config);
        for frame in pcm.samples.chunks(pcm.frame_len()) {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            data.extend_from_slice(&4u16.to_le_bytes());
            data.extend_from_slice(&sum.to_le_bytes());
        }

        Ok(EncodeResult {
            data,
            duration: pcm.duration_ms(),
        })
    }
}
