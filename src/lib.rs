//! silkworker - SILK encoding in a background worker
//!
//! A worker thread listens on a port for encode tasks (`{ input, sampleRate }`),
//! hands each one to a SILK encoder, and posts back either the encoded stream
//! or `{ error }`.
//!
//! # Architecture
//!
//! - `worker`: thread spawning and the parent/worker port pair
//! - `relay`: the receive, transform, reply loop that runs inside the worker
//! - `encoder`: the `SilkEncoder` seam, input preparation, implementations

pub mod cli;
pub mod config;
pub mod encoder;
pub mod error;
pub mod relay;
pub mod task;
pub mod worker;

pub use config::{EncoderConfig, WorkerConfig};
pub use encoder::{default_encoder, MockSilkEncoder, SilkEncoder};
pub use error::{Result, SilkWorkerError};
pub use relay::recv_task;
pub use task::{EncodeResult, EncodeTask, Reply};
pub use worker::{channel_pair, encode_once, spawn_encode_worker, ParentPort, WorkerHandle, WorkerPort};
