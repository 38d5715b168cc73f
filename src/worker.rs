//! Worker threads and the ports that connect them to their parent
//!
//! A worker is a dedicated OS thread running a single-threaded tokio runtime.
//! The parent holds a [`ParentPort`] and the worker a [`WorkerPort`]; tasks
//! flow one way over a bounded channel, replies the other way.

use std::sync::Arc;
use std::thread::JoinHandle;

use tokio::sync::mpsc;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::WorkerConfig;
use crate::encoder::SilkEncoder;
use crate::error::{Result, SilkWorkerError};
use crate::relay::{join_error_message, recv_task};
use crate::task::{EncodeResult, EncodeTask, Reply};

/// Worker-side end of a channel pair
pub struct WorkerPort<Req, Resp> {
    inbound: mpsc::Receiver<Req>,
    outbound: mpsc::UnboundedSender<Resp>,
}

impl<Req, Resp> WorkerPort<Req, Resp> {
    /// Next inbound message, or `None` once the parent has closed its side.
    pub async fn recv(&mut self) -> Option<Req> {
        self.inbound.recv().await
    }

    pub fn post_message(&self, message: Resp) -> Result<()> {
        self.outbound
            .send(message)
            .map_err(|_| SilkWorkerError::ChannelClosed)
    }
}

/// Parent-side end of a channel pair
pub struct ParentPort<Req, Resp> {
    sender: Option<mpsc::Sender<Req>>,
    receiver: mpsc::UnboundedReceiver<Resp>,
}

impl<Req, Resp> ParentPort<Req, Resp> {
    /// Queue a message for the worker, waiting if the queue is full.
    pub async fn post_task(&self, message: Req) -> Result<()> {
        let sender = self.sender.as_ref().ok_or(SilkWorkerError::ChannelClosed)?;
        sender
            .send(message)
            .await
            .map_err(|_| SilkWorkerError::ChannelClosed)
    }

    /// Next reply from the worker.
    ///
    /// Fails with `ChannelClosed` once the worker has exited and every
    /// pending reply has been read.
    pub async fn next_message(&mut self) -> Result<Resp> {
        self.receiver
            .recv()
            .await
            .ok_or(SilkWorkerError::ChannelClosed)
    }

    /// Post one message and wait for its reply.
    pub async fn request(&mut self, message: Req) -> Result<Resp> {
        self.post_task(message).await?;
        self.next_message().await
    }

    /// Stop sending. The worker drains what is queued, then exits.
    pub fn close(&mut self) {
        self.sender = None;
    }
}

/// Build a connected pair of ports
pub fn channel_pair<Req, Resp>(capacity: usize) -> (ParentPort<Req, Resp>, WorkerPort<Req, Resp>) {
    let (task_tx, task_rx) = mpsc::channel(capacity.max(1));
    let (reply_tx, reply_rx) = mpsc::unbounded_channel();
    (
        ParentPort {
            sender: Some(task_tx),
            receiver: reply_rx,
        },
        WorkerPort {
            inbound: task_rx,
            outbound: reply_tx,
        },
    )
}

/// Handle to a running encode worker
pub struct WorkerHandle {
    id: Uuid,
    port: ParentPort<EncodeTask, Reply<EncodeResult>>,
    thread: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn post_task(&self, task: EncodeTask) -> Result<()> {
        self.port.post_task(task).await
    }

    pub async fn next_message(&mut self) -> Result<Reply<EncodeResult>> {
        self.port.next_message().await
    }

    /// Send one task and wait for the reply
    pub async fn encode(&mut self, task: EncodeTask) -> Result<Reply<EncodeResult>> {
        self.port.request(task).await
    }

    /// Close the task channel and wait for the thread to exit
    pub async fn terminate(mut self) -> Result<()> {
        self.port.close();
        let thread = self.thread;
        match tokio::task::spawn_blocking(move || thread.join()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(SilkWorkerError::TaskPanicked {
                reason: "worker thread panicked".to_string(),
            }),
            Err(e) => Err(SilkWorkerError::TaskPanicked {
                reason: join_error_message(e),
            }),
        }
    }
}

/// Start a worker thread that relays encode tasks to `encoder`.
pub fn spawn_encode_worker(
    encoder: Arc<dyn SilkEncoder>,
    config: &WorkerConfig,
) -> Result<WorkerHandle> {
    config.validate()?;

    let id = Uuid::new_v4();
    let (parent, port) = channel_pair(config.queue_capacity);
    let thread_name = format!("{}-{}", config.thread_name, &id.simple().to_string()[..8]);

    let thread = std::thread::Builder::new()
        .name(thread_name)
        .spawn(move || run_worker(id, encoder, port))
        .map_err(SilkWorkerError::Spawn)?;

    tracing::debug!(worker = %id, "spawned encode worker");

    Ok(WorkerHandle {
        id,
        port: parent,
        thread,
    })
}

/// Spawn a worker, encode one task, and shut the worker down
pub async fn encode_once(
    encoder: Arc<dyn SilkEncoder>,
    config: &WorkerConfig,
    task: EncodeTask,
) -> Result<Reply<EncodeResult>> {
    let mut worker = spawn_encode_worker(encoder, config)?;
    let reply = worker.encode(task).await;
    worker.terminate().await?;
    reply
}

fn run_worker(
    id: Uuid,
    encoder: Arc<dyn SilkEncoder>,
    mut port: WorkerPort<EncodeTask, Reply<EncodeResult>>,
) {
    let span = tracing::info_span!("worker", id = %id, encoder = encoder.name());

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            // Dropping the port closes the reply channel; the parent sees ChannelClosed.
            tracing::error!(parent: &span, "failed to start worker runtime: {}", e);
            return;
        }
    };

    let handled = runtime.block_on(
        async {
            recv_task(&mut port, |task: EncodeTask| {
                let encoder = Arc::clone(&encoder);
                async move {
                    match tokio::task::spawn_blocking(move || {
                        encoder.encode(&task.input, task.sample_rate)
                    })
                    .await
                    {
                        Ok(result) => result,
                        // Same bare text the relay posts for a panicking transform
                        Err(e) => Err(SilkWorkerError::encoder(join_error_message(e))),
                    }
                }
            })
            .await
        }
        .instrument(span.clone()),
    );

    tracing::debug!(parent: &span, handled, "worker exiting");
}
