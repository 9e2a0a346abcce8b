//! External-command balancing engine
//!
//! Runs a configured executable once per request. The method name is passed
//! as the final argument, the JSON arguments are written to stdin and the JSON
//! result is read from stdout. Every stderr line is relayed as progress.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread;

use shared::{
    process_debug, Balance, FinalBalanceArgs, FullBalanceArgs, HalfBalanceArgs, ProcessId, Results, WorkerMethod,
};

use crate::error::{BalancerError, BalancerResult};
use crate::progress::ProgressReporter;
use crate::traits::BalanceEngine;
use crate::worker::READY;

/// Engine backed by an external program speaking the worker method table
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
}

impl CommandEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Parse a whitespace separated command line such as `node balance.js`
    pub fn from_command_line(command_line: &str) -> BalancerResult<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or_else(|| BalancerError::EngineProcess {
            message: "empty engine command".to_string(),
        })?;

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Add fixed arguments placed before the method name (fluent API)
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn invoke<A, R>(&self, method: WorkerMethod, args: &A, progress: &ProgressReporter) -> BalancerResult<R>
    where
        A: Serialize,
        R: DeserializeOwned,
    {
        let input = serde_json::to_vec(args)?;
        process_debug!(ProcessId::BalancerWorker, "🔧 Invoking {} {}", self.program, method);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(method.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BalancerError::EngineProcess {
                message: format!("failed to spawn {}: {}", self.program, e),
            })?;

        let stdin = child.stdin.take();
        let writer = thread::spawn(move || -> std::io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&input)?;
            }
            Ok(())
        });

        let stderr = child.stderr.take();
        let reporter = progress.clone();
        let relay = thread::spawn(move || {
            if let Some(stderr) = stderr {
                for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                    if !line.trim().is_empty() {
                        reporter.report(line);
                    }
                }
            }
        });

        let mut output = Vec::new();
        let collected = match child.stdout.take() {
            Some(mut stdout) => stdout.read_to_end(&mut output).map(|_| ()),
            None => Ok(()),
        };
        let status = match collected.and_then(|()| child.wait()) {
            Ok(status) => status,
            Err(e) => {
                terminate(&mut child);
                let _ = relay.join();
                let _ = writer.join();
                return Err(e.into());
            }
        };
        let _ = relay.join();
        match writer.join() {
            Ok(Ok(())) => {}
            // The program may exit without reading its input; its status decides.
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => {
                return Err(BalancerError::EngineProcess {
                    message: "stdin writer panicked".to_string(),
                })
            }
        }

        if !status.success() {
            return Err(BalancerError::EngineProcess {
                message: format!("{} {} exited with {}", self.program, method, status),
            });
        }

        Ok(serde_json::from_slice(&output)?)
    }
}

/// Kill `child` and reap it so no zombie is left behind
fn terminate(child: &mut Child) {
    if let Err(e) = child.kill() {
        process_debug!(ProcessId::BalancerWorker, "Engine process already gone: {}", e);
    }
    let _ = child.wait();
}

impl BalanceEngine for CommandEngine {
    fn init(&mut self) -> BalancerResult<()> {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let reply: String = self.invoke(WorkerMethod::Test, &(), &ProgressReporter::new(tx))?;

        if reply == READY {
            Ok(())
        } else {
            Err(BalancerError::EngineProcess {
                message: format!("engine answered {reply:?} to the readiness probe"),
            })
        }
    }

    fn balance(&mut self, args: FullBalanceArgs, progress: &ProgressReporter) -> BalancerResult<Results> {
        self.invoke(WorkerMethod::FullBalance, &args, progress)
    }

    fn balance_half(&mut self, args: HalfBalanceArgs, progress: &ProgressReporter) -> BalancerResult<Balance> {
        self.invoke(WorkerMethod::HalfBalance, &args, progress)
    }

    fn balance_final(&mut self, args: FinalBalanceArgs, progress: &ProgressReporter) -> BalancerResult<Balance> {
        self.invoke(WorkerMethod::FinalBalance, &args, progress)
    }
}
