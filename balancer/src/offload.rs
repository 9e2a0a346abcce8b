//! Offload orchestrator
//!
//! Async client for the balancer worker. The worker is started on first use,
//! every call is correlated with its reply by request id, and progress
//! notifications from the worker are republished on the shared [`ProgressBus`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot, OnceCell};
use tokio::task::JoinHandle;
use uuid::Uuid;

use shared::{
    logging, process_debug, process_info, process_warn, AdjustSr, Balance, BalancerOptions, FinalBalanceArgs,
    FullBalanceArgs, HalfBalanceArgs, Players, ProcessId, Results, SharedError, Team, WorkerMessage, WorkerMethod,
    WorkerOutcome, WorkerRequest,
};

use crate::error::{BalancerError, BalancerResult};
use crate::progress::{ProgressBus, ProgressEvent};
use crate::traits::BalanceEngine;
use crate::worker::{spawn_worker, WorkerHandle, READY};

type PendingReplies = Arc<Mutex<HashMap<u64, oneshot::Sender<WorkerOutcome>>>>;

fn lock_pending(pending: &PendingReplies) -> MutexGuard<'_, HashMap<u64, oneshot::Sender<WorkerOutcome>>> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Live connection to a started worker
struct WorkerLink {
    worker: WorkerHandle,
    pending: PendingReplies,
    relay: JoinHandle<()>,
}

impl Drop for WorkerLink {
    fn drop(&mut self) {
        self.relay.abort();
    }
}

/// Request/response client over the single balancer worker
pub struct OffloadOrchestrator<E: BalanceEngine + 'static> {
    engine: Mutex<Option<E>>,
    link: OnceCell<WorkerLink>,
    bus: Arc<ProgressBus>,
    next_request_id: AtomicU64,
}

impl<E: BalanceEngine + 'static> OffloadOrchestrator<E> {
    /// Create the orchestrator; the engine is not touched until the first call
    pub fn new(engine: E, bus: Arc<ProgressBus>) -> Self {
        Self {
            engine: Mutex::new(Some(engine)),
            link: OnceCell::new(),
            bus,
            next_request_id: AtomicU64::new(1),
        }
    }

    pub fn progress_bus(&self) -> &Arc<ProgressBus> {
        &self.bus
    }

    /// Whether the worker has been started
    pub fn is_started(&self) -> bool {
        self.link.initialized()
    }

    /// Readiness probe; resolves once the engine has finished initializing
    pub async fn test(&self) -> BalancerResult<()> {
        let reply: String = self.call(WorkerMethod::Test, String::new()).await?;
        if reply == READY {
            Ok(())
        } else {
            Err(BalancerError::Engine {
                method: WorkerMethod::Test,
                message: format!("unexpected readiness reply: {reply}"),
            })
        }
    }

    /// Run a full balance over `players` with the given options
    pub async fn full_balance(&self, players: &Players, options: &BalancerOptions) -> BalancerResult<Results> {
        let args = FullBalanceArgs {
            players: players.clone(),
            range: options.range,
            low_rank_limiter: options.low_rank_limiter,
            disallow_secondary_roles: options.disallow_secondary_roles,
            adjust_sr: options.adjust_sr.clone(),
            disable_type: options.disable_type,
            dispersion_minimizer: options.dispersion_minimizer,
            tries_count: options.tries_count,
        };
        self.call(WorkerMethod::FullBalance, serde_json::to_string(&args)?).await
    }

    /// Run a partial balancing pass
    pub async fn half_balance(
        &self,
        players: &Players,
        range: u32,
        low_rank_limiter: bool,
        disallow_secondary_roles: bool,
        adjust_sr: &AdjustSr,
    ) -> BalancerResult<Balance> {
        let args = HalfBalanceArgs {
            players: players.clone(),
            range,
            low_rank_limiter,
            disallow_secondary_roles,
            adjust_sr: adjust_sr.clone(),
        };
        self.call(WorkerMethod::HalfBalance, serde_json::to_string(&args)?).await
    }

    /// Complete a balance starting from the given reserve and teams
    #[allow(clippy::too_many_arguments)]
    pub async fn final_balance(
        &self,
        players: &Players,
        range: u32,
        low_rank_limiter: bool,
        disallow_secondary_roles: bool,
        reserve_snapshot: &[Uuid],
        teams_snapshot: &[Team],
        adjust_sr: &AdjustSr,
    ) -> BalancerResult<Balance> {
        let args = FinalBalanceArgs {
            players: players.clone(),
            range,
            low_rank_limiter,
            disallow_secondary_roles,
            reserve_snapshot: reserve_snapshot.to_vec(),
            teams_snapshot: teams_snapshot.to_vec(),
            adjust_sr: adjust_sr.clone(),
        };
        self.call(WorkerMethod::FinalBalance, serde_json::to_string(&args)?).await
    }

    /// Send one request and wait for its reply
    async fn call<T>(&self, method: WorkerMethod, payload: String) -> BalancerResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let link = self.link.get_or_try_init(|| async { self.start() }).await?;
        let (reply_tx, reply_rx) = oneshot::channel();

        // Id allocation and submission happen under one lock so the worker
        // queue sees requests in invocation order.
        let request_id = {
            let mut pending = lock_pending(&link.pending);
            let request_id = self.next_request_id.fetch_add(1, Ordering::SeqCst);
            pending.insert(request_id, reply_tx);

            let request = WorkerRequest {
                request_id,
                method,
                payload,
            };
            if let Err(e) = link.worker.submit(request) {
                pending.remove(&request_id);
                return Err(e);
            }
            request_id
        };

        process_debug!(ProcessId::current(), "📤 Submitted {} as request {}", method, request_id);

        match reply_rx.await {
            Ok(WorkerOutcome::Ok(json)) => Ok(serde_json::from_str(&json)?),
            Ok(WorkerOutcome::Err(message)) => {
                process_warn!(ProcessId::current(), "⚠️ {} failed: {}", method, message);
                Err(BalancerError::Engine { method, message })
            }
            Err(_) => Err(BalancerError::WorkerUnavailable),
        }
    }

    fn start(&self) -> BalancerResult<WorkerLink> {
        let engine = self
            .engine
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
            .ok_or(BalancerError::WorkerUnavailable)?;

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let worker = spawn_worker(engine, outbound_tx)?;
        let pending: PendingReplies = Arc::new(Mutex::new(HashMap::new()));
        let relay = tokio::spawn(relay_messages(outbound_rx, pending.clone(), self.bus.clone()));

        process_info!(ProcessId::current(), "🚀 Balancer worker started");

        Ok(WorkerLink { worker, pending, relay })
    }
}

/// Hand `outcome` to the caller waiting on `request_id`
fn route_reply(pending: &PendingReplies, request_id: u64, outcome: WorkerOutcome) -> Result<(), SharedError> {
    let waiter = lock_pending(pending)
        .remove(&request_id)
        .ok_or_else(|| SharedError::ProtocolError {
            message: format!("reply for unknown request {request_id}"),
        })?;
    // The caller may have given up; nothing else is waiting for this reply
    let _ = waiter.send(outcome);
    Ok(())
}

/// Route worker output: replies to their callers, progress to the bus
async fn relay_messages(
    mut inbound: mpsc::UnboundedReceiver<WorkerMessage>,
    pending: PendingReplies,
    bus: Arc<ProgressBus>,
) {
    while let Some(message) = inbound.recv().await {
        match message {
            WorkerMessage::Reply { request_id, outcome } => {
                if let Err(e) = route_reply(&pending, request_id, outcome) {
                    logging::log_error(ProcessId::current(), "Reply routing", &e);
                }
            }
            WorkerMessage::Progress { message } => {
                bus.publish(ProgressEvent::from_message(message));
            }
        }
    }

    // Worker gone: dropping the senders fails every outstanding call
    lock_pending(&pending).clear();
    process_debug!(ProcessId::current(), "🔌 Balancer worker channel closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_reaches_waiting_caller() {
        let pending: PendingReplies = Arc::default();
        let (tx, mut rx) = oneshot::channel();
        lock_pending(&pending).insert(4, tx);

        route_reply(&pending, 4, WorkerOutcome::Ok("\"ok\"".to_string())).unwrap();

        assert!(matches!(rx.try_recv(), Ok(WorkerOutcome::Ok(json)) if json == "\"ok\""));
        assert!(lock_pending(&pending).is_empty());
    }

    #[test]
    fn test_reply_for_unknown_request_is_a_protocol_error() {
        let pending: PendingReplies = Arc::default();

        let result = route_reply(&pending, 9, WorkerOutcome::Err("late".to_string()));

        assert!(matches!(result, Err(SharedError::ProtocolError { .. })));
    }
}
