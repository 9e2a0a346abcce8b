//! Progress channel
//!
//! The worker reports progress through a [`ProgressReporter`]; the offload
//! orchestrator relays every report onto a [`ProgressBus`] that any number of
//! observers subscribe to. Events carry a lazily evaluated message so an
//! observer that does not care never materializes the string.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

use shared::WorkerMessage;

/// Name every progress event is published under
pub const PROGRESS_EVENT: &str = "wasm-update";

type LazyMessage = Arc<dyn Fn() -> String + Send + Sync>;

/// Progress notification with a lazy message accessor
#[derive(Clone)]
pub struct ProgressEvent {
    name: &'static str,
    message: LazyMessage,
}

impl ProgressEvent {
    /// Event whose message is produced on demand by `accessor`
    pub fn lazy<F>(accessor: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self {
            name: PROGRESS_EVENT,
            message: Arc::new(accessor),
        }
    }

    /// Event wrapping an already received message
    pub fn from_message(message: String) -> Self {
        Self::lazy(move || message.clone())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Materialize the message
    pub fn message(&self) -> String {
        (self.message)()
    }
}

impl fmt::Debug for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressEvent").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Identifier returned by [`ProgressBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Receiving end of a bus subscription
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    receiver: mpsc::UnboundedReceiver<ProgressEvent>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Wait for the next event; `None` once unsubscribed
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        self.receiver.recv().await
    }

    /// Next already delivered event, if any
    pub fn try_recv(&mut self) -> Option<ProgressEvent> {
        self.receiver.try_recv().ok()
    }
}

/// Application-wide multi-subscriber progress bus
#[derive(Default)]
pub struct ProgressBus {
    next_id: AtomicU64,
    subscribers: RwLock<HashMap<SubscriptionId, mpsc::UnboundedSender<ProgressEvent>>>,
}

impl ProgressBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new observer
    pub fn subscribe(&self) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (tx, receiver) = mpsc::unbounded_channel();

        self.subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id, tx);

        Subscription { id, receiver }
    }

    /// Remove an observer; returns false when it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&id)
            .is_some()
    }

    /// Deliver `event` to every observer, returning how many received it
    ///
    /// Observers whose subscription was dropped are pruned.
    pub fn publish(&self, event: ProgressEvent) -> usize {
        let mut closed = Vec::new();
        let mut delivered = 0;

        {
            let subscribers = self.subscribers.read().unwrap_or_else(|poisoned| poisoned.into_inner());
            for (id, tx) in subscribers.iter() {
                if tx.send(event.clone()).is_ok() {
                    delivered += 1;
                } else {
                    closed.push(*id);
                }
            }
        }

        if !closed.is_empty() {
            let mut subscribers = self.subscribers.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            for id in closed {
                subscribers.remove(&id);
            }
        }

        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}

/// Handed to the engine so it can emit progress from the worker thread
#[derive(Clone, Debug)]
pub struct ProgressReporter {
    outbound: mpsc::UnboundedSender<WorkerMessage>,
}

impl ProgressReporter {
    pub fn new(outbound: mpsc::UnboundedSender<WorkerMessage>) -> Self {
        Self { outbound }
    }

    /// Emit a progress message; silently dropped if nobody is relaying
    pub fn report(&self, message: impl Into<String>) {
        let _ = self.outbound.send(WorkerMessage::Progress {
            message: message.into(),
        });
    }
}
