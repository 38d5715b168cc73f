//! SILK encoder interfaces and implementations
//!
//! This module provides:
//! - `SilkEncoder` trait for anything that turns PCM into a SILK stream
//! - Input preparation shared by all encoders
//! - A mock encoder for testing, and the native encoder behind the `silk` feature

mod mock;
#[cfg(feature = "silk")]
mod native;
pub mod pcm;

use std::sync::Arc;

pub use mock::MockSilkEncoder;
#[cfg(feature = "silk")]
pub use native::NativeSilkEncoder;
pub use pcm::{prepare_input, PcmInput, SUPPORTED_SAMPLE_RATES};

use crate::config::EncoderConfig;
use crate::error::Result;
use crate::task::EncodeResult;

/// Magic that opens every SILK v3 stream
pub const SILK_MAGIC: &[u8] = b"#!SILK_V3";

/// Byte Tencent clients expect before the magic
pub const TENCENT_PREFIX: u8 = 0x02;

/// Trait that all SILK encoders must implement
pub trait SilkEncoder: Send + Sync {
    /// Encoder identifier, used in logs
    fn name(&self) -> &str;

    /// Encode WAV or raw s16le PCM into a SILK stream
    ///
    /// # Arguments
    /// * `input` - WAV file bytes or raw mono PCM
    /// * `sample_rate` - Sample rate of raw PCM input in Hz
    fn encode(&self, input: &[u8], sample_rate: u32) -> Result<EncodeResult>;
}

impl<E: SilkEncoder + ?Sized> SilkEncoder for Arc<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn encode(&self, input: &[u8], sample_rate: u32) -> Result<EncodeResult> {
        (**self).encode(input, sample_rate)
    }
}

/// Stream header for the given config
pub fn stream_header(config: &EncoderConfig) -> Vec<u8> {
    let mut header = Vec::with_capacity(SILK_MAGIC.len() + 1);
    if config.tencent {
        header.push(TENCENT_PREFIX);
    }
    header.extend_from_slice(SILK_MAGIC);
    header
}

/// The best encoder this build offers.
///
/// Falls back to the mock when the native encoder is not compiled in.
pub fn default_encoder(config: &EncoderConfig) -> Arc<dyn SilkEncoder> {
    #[cfg(feature = "silk")]
    {
        Arc::new(NativeSilkEncoder::new(config.clone()))
    }
    #[cfg(not(feature = "silk"))]
    {
        tracing::warn!("built without the `silk` feature, using the mock encoder");
        Arc::new(MockSilkEncoder::with_config(config.clone()))
    }
}
