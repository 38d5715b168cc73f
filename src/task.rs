//! Messages exchanged between the parent thread and an encode worker.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SilkWorkerError};

/// A single encode request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeTask {
    /// WAV file bytes or raw s16le mono PCM
    pub input: Vec<u8>,
    /// Sample rate of raw PCM input in Hz (a WAV header takes precedence)
    pub sample_rate: u32,
}

impl EncodeTask {
    pub fn new(input: impl Into<Vec<u8>>, sample_rate: u32) -> Self {
        Self {
            input: input.into(),
            sample_rate,
        }
    }
}

/// Output of a successful encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeResult {
    /// SILK bitstream
    pub data: Vec<u8>,
    /// Encoded audio duration in milliseconds
    pub duration: u64,
}

/// What a worker posts back for each task message.
///
/// Serialized untagged: a success is the transform's value as-is, a failure
/// is `{ "error": "<message>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply<T> {
    Err { error: String },
    Ok(T),
}

impl<T> Reply<T> {
    pub fn from_result<E: std::fmt::Display>(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(value) => Reply::Ok(value),
            Err(e) => Reply::Err {
                error: e.to_string(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok(_))
    }

    /// The error text, if this reply is a failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            Reply::Err { error } => Some(error),
            Reply::Ok(_) => None,
        }
    }

    /// Convert back into a `Result`, wrapping the error text as an encoder failure.
    pub fn into_result(self) -> Result<T> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Err { error } => Err(SilkWorkerError::EncoderFailure { reason: error }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_task_wire_format() {
        let task = EncodeTask::new(vec![1u8, 2], 24000);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json, serde_json::json!({ "input": [1, 2], "sampleRate": 24000 }));
    }

    #[test]
    fn test_error_reply_wire_format() {
        let reply: Reply<EncodeResult> = Reply::from_result(Err("boom"));
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "boom" }));
    }

    #[test]
    fn test_ok_reply_is_bare_value() {
        let reply = Reply::Ok(EncodeResult {
            data: vec![7],
            duration: 20,
        });
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json, serde_json::json!({ "data": [7], "duration": 20 }));

        let back: Reply<EncodeResult> = serde_json::from_value(json).unwrap();
        assert!(back.is_ok());
    }

    #[test]
    fn test_into_result_keeps_message() {
        let reply: Reply<u32> = Reply::Err {
            error: "nope".to_string(),
        };
        let err = reply.into_result().unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }
}
