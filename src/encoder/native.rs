//! Native SILK encoder backed by the `silk-rs` bindings

use std::time::Instant;

use super::pcm::prepare_input;
use super::SilkEncoder;
use crate::config::EncoderConfig;
use crate::error::{Result, SilkWorkerError};
use crate::task::EncodeResult;

pub struct NativeSilkEncoder {
    config: EncoderConfig,
}

impl NativeSilkEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }
}

impl SilkEncoder for NativeSilkEncoder {
    fn name(&self) -> &str {
        "silk-rs"
    }

    fn encode(&self, input: &[u8], sample_rate: u32) -> Result<EncodeResult> {
        let start = Instant::now();
        let pcm = prepare_input(input, sample_rate)?;

        let data = silk_rs::encode_silk(
            pcm.to_le_bytes(),
            pcm.sample_rate as i32,
            self.config.bit_rate as i32,
            self.config.tencent,
        )
        .map_err(|e| SilkWorkerError::encoder(e.to_string()))?;

        tracing::debug!(
            samples = pcm.samples.len(),
            bytes = data.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "encoded SILK stream"
        );

        Ok(EncodeResult {
            data,
            duration: pcm.duration_ms(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_bypass_codec() {
        let encoder = NativeSilkEncoder::new(EncoderConfig::default());
        let err = encoder.encode(&[], 24000).unwrap_err();
        assert_eq!(err.to_string(), "Audio contains no samples");
    }

    #[test]
    fn test_encodes_silence() {
        let encoder = NativeSilkEncoder::new(EncoderConfig::default());
        let result = encoder.encode(&vec![0u8; 24000 * 2], 24000).unwrap();
        assert_eq!(result.duration, 1000);
        assert!(!result.data.is_empty());
    }
}
