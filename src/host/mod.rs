#[cfg(test)]
pub mod memory;

use crate::bulk::model::{
    Account, AccountId, ContinuationId, FolderRef, MailFolder, MessageHeader, MessageId,
    MessagePage,
};
use crate::error::HostError;
use async_trait::async_trait;

#[async_trait]
pub trait MailHost: Send + Sync {
    async fn displayed_message(&self) -> Result<MessageHeader, HostError>;

    async fn list_accounts(&self) -> Result<Vec<Account>, HostError>;

    async fn folder_tree(&self, account: &AccountId) -> Result<Vec<MailFolder>, HostError>;

    async fn list_messages(&self, folder: &FolderRef) -> Result<MessagePage, HostError>;

    /// First page of messages, across every account, whose author is
    /// exactly `author` (see [`author_matches`]).
    async fn query_author(&self, author: &str) -> Result<MessagePage, HostError>;

    async fn continue_list(&self, cursor: &ContinuationId) -> Result<MessagePage, HostError>;

    /// Deletes all of `ids` without going through Trash. Either every
    /// message is removed or the call fails.
    async fn delete_permanently(&self, ids: &[MessageId]) -> Result<(), HostError>;
}

/// `query` is either `name <local@domain>` or a bare `local@domain`. The
/// author is trimmed, lower-cased and stripped of quotes before comparing;
/// a bare address query also matches an author whose angle-bracketed
/// address equals it.
pub fn author_matches(author: &str, query: &str) -> bool {
    let normalized = author.trim().to_lowercase().replace('"', "");
    let query = query.trim().to_lowercase();
    if normalized == query {
        return true;
    }
    if query.contains('<') {
        return false;
    }
    match (normalized.rfind('<'), normalized.rfind('>')) {
        (Some(open), Some(close)) if open < close => normalized[open + 1..close] == query,
        _ => false,
    }
}
