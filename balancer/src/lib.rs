//! Balancer offload library
//!
//! Runs an external balancing engine on a single dedicated worker thread,
//! exposes it to async callers as an explicit request/response client, and
//! relays the engine's progress notifications onto an application-wide bus.

pub mod error;
pub mod offload;
pub mod progress;
pub mod services;
pub mod traits;
pub mod worker;

// Re-export commonly used types
pub use error::{BalancerError, BalancerResult};
pub use offload::OffloadOrchestrator;
pub use progress::{ProgressBus, ProgressEvent, ProgressReporter, Subscription, SubscriptionId, PROGRESS_EVENT};
pub use services::CommandEngine;
pub use traits::{BalanceEngine, MockBalanceEngine};
