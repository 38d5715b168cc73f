//! Input preparation for the SILK encoder
//!
//! Tasks carry either a complete WAV file or bare s16le mono PCM. Both are
//! normalised to a mono `i16` sample buffer plus the rate it was recorded at.

use std::io::Cursor;

use hound::{SampleFormat, WavReader};

use crate::error::{Result, SilkWorkerError};

/// Sample rates the SILK encoder accepts as input
pub const SUPPORTED_SAMPLE_RATES: [u32; 7] = [8000, 12000, 16000, 24000, 32000, 44100, 48000];

/// Mono 16-bit PCM ready for encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmInput {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl PcmInput {
    /// Duration in whole milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }

    /// Samples per 20 ms SILK frame at this rate
    pub fn frame_len(&self) -> usize {
        (self.sample_rate / 50) as usize
    }

    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}

/// Whether `input` starts with a RIFF/WAVE header
pub fn is_wav(input: &[u8]) -> bool {
    input.len() >= 12 && &input[0..4] == b"RIFF" && &input[8..12] == b"WAVE"
}

/// Normalise task input into mono PCM.
///
/// A WAV header's sample rate overrides `sample_rate`.
///
/// # Errors
/// * `EmptyAudio` - no samples after decoding
/// * `InvalidAudio` - malformed WAV or odd-length raw PCM
/// * `UnsupportedFormat` - WAV that is not 16-bit integer PCM
/// * `UnsupportedSampleRate` - rate SILK cannot encode
pub fn prepare_input(input: &[u8], sample_rate: u32) -> Result<PcmInput> {
    let pcm = if is_wav(input) {
        decode_wav(input)?
    } else {
        decode_raw(input, sample_rate)?
    };

    if !SUPPORTED_SAMPLE_RATES.contains(&pcm.sample_rate) {
        return Err(SilkWorkerError::UnsupportedSampleRate {
            sample_rate: pcm.sample_rate,
        });
    }
    if pcm.samples.is_empty() {
        return Err(SilkWorkerError::EmptyAudio);
    }

    Ok(pcm)
}

fn decode_raw(input: &[u8], sample_rate: u32) -> Result<PcmInput> {
    if input.len() % 2 != 0 {
        return Err(SilkWorkerError::InvalidAudio {
            reason: format!("raw PCM length {} is not a whole number of s16 samples", input.len()),
            source: None,
        });
    }
    let samples = input
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect();
    Ok(PcmInput {
        samples,
        sample_rate,
    })
}

fn decode_wav(input: &[u8]) -> Result<PcmInput> {
    let reader = WavReader::new(Cursor::new(input)).map_err(|e| SilkWorkerError::InvalidAudio {
        reason: format!("Failed to parse WAV header: {}", e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(SilkWorkerError::UnsupportedFormat {
            format: format!(
                "{}-bit {:?} WAV (only 16-bit integer PCM supported)",
                spec.bits_per_sample, spec.sample_format
            ),
        });
    }

    let interleaved = reader
        .into_samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| SilkWorkerError::InvalidAudio {
            reason: format!("Failed to read WAV samples: {}", e),
            source: Some(Box::new(e)),
        })?;

    let channels = spec.channels.max(1) as usize;
    let samples = if channels == 1 {
        interleaved
    } else {
        downmix(&interleaved, channels)
    };

    Ok(PcmInput {
        samples,
        sample_rate: spec.sample_rate,
    })
}

/// Average interleaved channels into one. A trailing partial frame is dropped.
fn downmix(interleaved: &[i16], channels: usize) -> Vec<i16> {
    interleaved
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};
    use pretty_assertions::assert_eq;

    fn wav_bytes(samples: &[i16], channels: u16, sample_rate: u32) -> Vec<u8> {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_raw_pcm() {
        let pcm = prepare_input(&[0x01, 0x00, 0xff, 0xff], 16000).unwrap();
        assert_eq!(pcm.samples, vec![1, -1]);
        assert_eq!(pcm.sample_rate, 16000);
    }

    #[test]
    fn test_raw_pcm_odd_length() {
        let err = prepare_input(&[0, 0, 0], 16000).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_AUDIO");
    }

    #[test]
    fn test_empty_input() {
        let err = prepare_input(&[], 24000).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_AUDIO");
    }

    #[test]
    fn test_unsupported_rate() {
        let err = prepare_input(&[0, 0], 22050).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported sample rate: 22050 Hz");
    }

    #[test]
    fn test_wav_rate_overrides_task_rate() {
        let bytes = wav_bytes(&[10, 20, 30], 1, 48000);
        assert!(is_wav(&bytes));

        let pcm = prepare_input(&bytes, 8000).unwrap();
        assert_eq!(pcm.sample_rate, 48000);
        assert_eq!(pcm.samples, vec![10, 20, 30]);
    }

    #[test]
    fn test_stereo_wav_downmixed() {
        let bytes = wav_bytes(&[100, 200, -50, 50], 2, 16000);
        let pcm = prepare_input(&bytes, 16000).unwrap();
        assert_eq!(pcm.samples, vec![150, 0]);
    }

    #[test]
    fn test_float_wav_rejected() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            writer.write_sample(0.5f32).unwrap();
            writer.finalize().unwrap();
        }
        let err = prepare_input(&cursor.into_inner(), 16000).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_duration_ms() {
        let pcm = PcmInput {
            samples: vec![0; 24000],
            sample_rate: 24000,
        };
        assert_eq!(pcm.duration_ms(), 1000);
        assert_eq!(pcm.frame_len(), 480);
    }
}
