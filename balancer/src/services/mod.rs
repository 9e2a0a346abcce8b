//! Service implementations
//!
//! Concrete engines that can be hosted by the balancer worker.

pub mod command_engine;

pub use command_engine::CommandEngine;
