//! Trait definitions with mockall annotations for testing

use crate::error::RosterResult;

/// Durable key/value storage for the serialized roster document
///
/// Implementations store opaque JSON blobs; the roster decides what goes in
/// them and how older documents are migrated.
#[mockall::automock]
#[async_trait::async_trait]
pub trait StateStorage: Send + Sync {
    /// Read the blob stored under `key`
    ///
    /// # Returns
    /// `None` when nothing has been stored yet
    async fn load(&self, key: &str) -> RosterResult<Option<String>>;

    /// Replace the blob stored under `key`
    async fn save(&self, key: &str, blob: &str) -> RosterResult<()>;
}
