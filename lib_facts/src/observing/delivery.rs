//! # Delivery Context
//!
//! A single serialized context on which subscriber callbacks run, the
//! equivalent of "deliver on the UI thread". One tokio task drains an
//! unbounded queue in FIFO order, so jobs scheduled by one producer run in the
//! order they were scheduled.

use serde_json::json;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use crate::loggers::{LoggerLocal, ProjectLayer};

/// A unit of work run on the delivery context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

enum Delivery {
    Job(Job),
    Flush(oneshot::Sender<()>),
}

/// Handle to the delivery task. Clones share the same queue.
#[derive(Clone)]
pub struct DeliveryContext {
    sender: mpsc::UnboundedSender<Delivery>,
}

impl DeliveryContext {
    /// Spawns the delivery task on the current tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn spawn(logger: Arc<LoggerLocal>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Delivery>();

        tokio::spawn(async move {
            let log = logger.for_layer(ProjectLayer::Observing);
            while let Some(delivery) = receiver.recv().await {
                match delivery {
                    Delivery::Job(job) => {
                        // A failing callback must not stop the jobs queued behind it.
                        let outcome = catch_unwind(AssertUnwindSafe(job));
                        if let Err(panic) = outcome {
                            let message = panic_message(panic.as_ref());
                            log.error(
                                "Subscriber callback panicked during delivery",
                                Some(json!({ "panic": message })),
                            )
                            .await;
                        }
                    }
                    Delivery::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            log.debug("Delivery context closed", None).await;
        });

        Self { sender }
    }

    /// Queues a job. Returns `false` if the delivery task is gone.
    pub fn schedule(&self, job: Job) -> bool {
        self.sender.send(Delivery::Job(job)).is_ok()
    }

    /// Resolves once every job queued before this call has run.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.sender.send(Delivery::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
