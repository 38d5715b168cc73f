//! Task relay
//!
//! Listens on a worker port, hands each inbound message to a transform, and
//! posts exactly one reply per message. Failures and panics inside the
//! transform become `{ error }` replies; nothing escapes the loop.

use std::any::Any;
use std::fmt::Display;
use std::future::Future;

use tokio::task::JoinError;

use crate::task::Reply;
use crate::worker::WorkerPort;

/// Relay every message on `port` through `cb` until the parent hangs up.
///
/// Each transform runs as its own task and is awaited before the next message
/// is read, so at most one is in flight. Returns the number of messages
/// handled.
pub async fn recv_task<Req, T, E, F, Fut>(port: &mut WorkerPort<Req, Reply<T>>, cb: F) -> usize
where
    F: Fn(Req) -> Fut,
    Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    let mut handled = 0;

    while let Some(message) = port.recv().await {
        handled += 1;

        let reply = match tokio::spawn(cb(message)).await {
            Ok(result) => Reply::from_result(result),
            Err(e) => Reply::Err {
                error: join_error_message(e),
            },
        };

        if let Some(error) = reply.error() {
            tracing::debug!(task = handled, error, "task failed");
        } else {
            tracing::debug!(task = handled, "task completed");
        }

        if port.post_message(reply).is_err() {
            tracing::debug!("parent port closed, stopping relay");
            break;
        }
    }

    handled
}

/// Text for a transform that never returned
pub(crate) fn join_error_message(err: JoinError) -> String {
    if err.is_panic() {
        panic_message(err.into_panic())
    } else {
        "task was cancelled".to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}
