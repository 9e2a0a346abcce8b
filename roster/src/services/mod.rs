//! Service implementations
//!
//! Real storage and the store subscribers that connect roster state to it.

pub mod command_log;
pub mod file_storage;
pub mod persistence;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use command_log::command_logger;
pub use file_storage::RealFileStorage;
pub use persistence::{PersistedState, PersistenceBridge, PersistenceWriter};
