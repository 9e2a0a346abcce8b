//! Test helpers and a scripted engine for orchestrator tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use balancer::{BalanceEngine, BalancerError, BalancerResult, OffloadOrchestrator, ProgressBus, ProgressReporter};
use shared::{Balance, FinalBalanceArgs, FullBalanceArgs, HalfBalanceArgs, Results, WorkerMethod};

/// One scripted engine reaction
pub enum Step {
    Succeed { delay: Duration, progress: Vec<String>, balance: Balance },
    Fail(String),
}

/// Engine that replays a fixed script of reactions, one per call
pub struct ScriptedEngine {
    steps: VecDeque<Step>,
    init_delay: Duration,
    init_calls: Arc<Mutex<usize>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            steps: VecDeque::new(),
            init_delay: Duration::ZERO,
            init_calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn then_succeed(mut self, delay_ms: u64, progress: &[&str], balance: Balance) -> Self {
        self.steps.push_back(Step::Succeed {
            delay: Duration::from_millis(delay_ms),
            progress: progress.iter().map(|message| message.to_string()).collect(),
            balance,
        });
        self
    }

    /// Make `init` block for `delay_ms` before it counts as done
    pub fn with_init_delay(mut self, delay_ms: u64) -> Self {
        self.init_delay = Duration::from_millis(delay_ms);
        self
    }

    pub fn then_fail(mut self, message: &str) -> Self {
        self.steps.push_back(Step::Fail(message.to_string()));
        self
    }

    /// Counter of `init` invocations, observable after the engine moved
    pub fn init_counter(&self) -> Arc<Mutex<usize>> {
        self.init_calls.clone()
    }

    fn next(&mut self, method: WorkerMethod, progress: &ProgressReporter) -> BalancerResult<Balance> {
        match self.steps.pop_front() {
            Some(Step::Succeed { delay, progress: messages, balance }) => {
                for message in messages {
                    progress.report(message);
                }
                std::thread::sleep(delay);
                Ok(balance)
            }
            Some(Step::Fail(message)) => Err(BalancerError::EngineProcess { message }),
            None => Err(BalancerError::EngineProcess {
                message: format!("no scripted step left for {method}"),
            }),
        }
    }
}

impl BalanceEngine for ScriptedEngine {
    fn init(&mut self) -> BalancerResult<()> {
        std::thread::sleep(self.init_delay);
        *self.init_calls.lock().unwrap() += 1;
        Ok(())
    }

    fn balance(&mut self, _args: FullBalanceArgs, progress: &ProgressReporter) -> BalancerResult<Results> {
        self.next(WorkerMethod::FullBalance, progress).map(|balance| vec![balance])
    }

    fn balance_half(&mut self, _args: HalfBalanceArgs, progress: &ProgressReporter) -> BalancerResult<Balance> {
        self.next(WorkerMethod::HalfBalance, progress)
    }

    fn balance_final(&mut self, _args: FinalBalanceArgs, progress: &ProgressReporter) -> BalancerResult<Balance> {
        self.next(WorkerMethod::FinalBalance, progress)
    }
}

pub struct TestHelpers;

impl TestHelpers {
    /// Orchestrator over `engine` with a fresh bus
    pub fn orchestrator<E: BalanceEngine + 'static>(engine: E) -> (Arc<OffloadOrchestrator<E>>, Arc<ProgressBus>) {
        let bus = Arc::new(ProgressBus::new());
        (Arc::new(OffloadOrchestrator::new(engine, bus.clone())), bus)
    }
}
