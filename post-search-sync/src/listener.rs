//! Post-commit listener interface.

use async_trait::async_trait;

use post_search_shared::RecordOperation;

/// Receives records after their transaction committed.
///
/// The persistence layer invokes this once per committed create, update or
/// delete. Implementations must not fail the commit, so the method returns
/// nothing; problems are reported through logging.
#[async_trait]
pub trait RecordCommitListener<R>: Send + Sync
where
    R: Send + Sync,
{
    /// Handle one committed record.
    async fn on_record_committed(&self, record: &R, operation: RecordOperation);
}
