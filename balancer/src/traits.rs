//! Trait definitions with mockall annotations for testing
//!
//! The balancing algorithm itself is not part of this crate. It is supplied
//! through [`BalanceEngine`] and only ever executes on the worker thread.

use shared::{Balance, FinalBalanceArgs, FullBalanceArgs, HalfBalanceArgs, Results};

use crate::error::BalancerResult;
use crate::progress::ProgressReporter;

/// External balancing engine hosted by the worker
///
/// Calls are synchronous and may take a long time; the worker serializes them
/// so an implementation never sees two calls at once.
#[mockall::automock]
pub trait BalanceEngine: Send {
    /// One-time initialization, run on the worker thread before any request
    fn init(&mut self) -> BalancerResult<()>;

    /// Produce a ranked set of candidate balances
    ///
    /// # Parameters
    /// - `args`: self-contained copy of players and options
    /// - `progress`: sink for intermediate progress messages
    fn balance(&mut self, args: FullBalanceArgs, progress: &ProgressReporter) -> BalancerResult<Results>;

    /// Partial balancing pass producing one intermediate balance
    fn balance_half(&mut self, args: HalfBalanceArgs, progress: &ProgressReporter) -> BalancerResult<Balance>;

    /// Complete a balance from partially fixed teams and reserve
    fn balance_final(&mut self, args: FinalBalanceArgs, progress: &ProgressReporter) -> BalancerResult<Balance>;
}
