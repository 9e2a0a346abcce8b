//! Worker execution context
//!
//! A single OS thread owns the engine. Requests arrive over one queue and are
//! executed strictly one at a time in arrival order; replies and progress go
//! back over one outbound channel. Nothing but JSON crosses the boundary.

use std::panic::{self, AssertUnwindSafe};
use std::thread;
use tokio::sync::mpsc;

use shared::{
    logging, process_debug, process_error, process_info, FinalBalanceArgs, FullBalanceArgs, HalfBalanceArgs, ProcessId,
    WorkerMessage, WorkerMethod, WorkerOutcome, WorkerRequest,
};

use crate::error::{BalancerError, BalancerResult};
use crate::progress::ProgressReporter;
use crate::traits::BalanceEngine;

/// Reply sent for `test` once the engine is initialized
pub const READY: &str = "ok";

const WORKER: ProcessId = ProcessId::BalancerWorker;

/// Owning handle for the worker thread
#[derive(Debug)]
pub struct WorkerHandle {
    requests: mpsc::UnboundedSender<WorkerRequest>,
    thread: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Queue a request; fails only when the worker thread has exited
    pub fn submit(&self, request: WorkerRequest) -> BalancerResult<()> {
        self.requests.send(request).map_err(|_| BalancerError::WorkerUnavailable)
    }

    /// Close the request queue and wait for the in-flight request to finish
    pub fn shutdown(mut self) {
        let (closed, _) = mpsc::unbounded_channel();
        self.requests = closed;
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Start the worker thread for `engine`
pub fn spawn_worker<E>(engine: E, outbound: mpsc::UnboundedSender<WorkerMessage>) -> BalancerResult<WorkerHandle>
where
    E: BalanceEngine + 'static,
{
    let (requests, inbound) = mpsc::unbounded_channel();

    let thread = thread::Builder::new()
        .name("balancer-worker".to_string())
        .spawn(move || run_worker(engine, inbound, outbound))
        .map_err(|e| BalancerError::WorkerSpawnFailed {
            message: e.to_string(),
        })?;

    Ok(WorkerHandle {
        requests,
        thread: Some(thread),
    })
}

fn run_worker<E: BalanceEngine>(
    mut engine: E,
    mut inbound: mpsc::UnboundedReceiver<WorkerRequest>,
    outbound: mpsc::UnboundedSender<WorkerMessage>,
) {
    logging::log_startup(&WORKER, "balancer worker thread");
    let progress = ProgressReporter::new(outbound.clone());

    // Initialization runs before the first request is taken off the queue,
    // so a queued `test` only answers once it has finished.
    let readiness = match panic::catch_unwind(AssertUnwindSafe(|| engine.init())) {
        Ok(Ok(())) => {
            process_info!(WORKER, "✅ Balancer engine loaded");
            Ok(())
        }
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => Err(panic_message(payload.as_ref())),
    };

    if let Err(message) = &readiness {
        process_error!(WORKER, "❌ Balancer engine failed to initialize: {}", message);
    }

    while let Some(request) = inbound.blocking_recv() {
        process_debug!(WORKER, "⚙️ Running {} (request {})", request.method, request.request_id);

        let outcome = match &readiness {
            Ok(()) => execute(&mut engine, &request, &progress),
            Err(message) => WorkerOutcome::Err(format!("engine failed to initialize: {message}")),
        };

        let reply = WorkerMessage::Reply {
            request_id: request.request_id,
            outcome,
        };
        if outbound.send(reply).is_err() {
            break;
        }
    }

    logging::log_shutdown(&WORKER, "request queue closed");
}

/// Run one request, turning engine errors and panics into a failed outcome
fn execute<E: BalanceEngine>(engine: &mut E, request: &WorkerRequest, progress: &ProgressReporter) -> WorkerOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| dispatch(engine, request, progress))) {
        Ok(Ok(json)) => WorkerOutcome::Ok(json),
        Ok(Err(e)) => WorkerOutcome::Err(e.to_string()),
        Err(payload) => WorkerOutcome::Err(panic_message(payload.as_ref())),
    }
}

fn dispatch<E: BalanceEngine>(engine: &mut E, request: &WorkerRequest, progress: &ProgressReporter) -> BalancerResult<String> {
    let json = match request.method {
        WorkerMethod::Test => serde_json::to_string(READY)?,
        WorkerMethod::FullBalance => {
            let args: FullBalanceArgs = serde_json::from_str(&request.payload)?;
            serde_json::to_string(&engine.balance(args, progress)?)?
        }
        WorkerMethod::HalfBalance => {
            let args: HalfBalanceArgs = serde_json::from_str(&request.payload)?;
            serde_json::to_string(&engine.balance_half(args, progress)?)?
        }
        WorkerMethod::FinalBalance => {
            let args: FinalBalanceArgs = serde_json::from_str(&request.payload)?;
            serde_json::to_string(&engine.balance_final(args, progress)?)?
        }
    };

    Ok(json)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("engine panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("engine panicked: {message}")
    } else {
        "engine panicked".to_string()
    }
}
