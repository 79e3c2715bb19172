use crate::bulk::model::MessageId;
use crate::host::MailHost;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { count: usize },
    NoMessagesFound,
    Error { message: String },
}

pub async fn execute<H: MailHost + ?Sized>(host: &H, ids: &[MessageId]) -> DeleteOutcome {
    if ids.is_empty() {
        tracing::info!("No messages found to delete.");
        return DeleteOutcome::NoMessagesFound;
    }

    tracing::info!("Deleting {} selected messages.", ids.len());
    match host.delete_permanently(ids).await {
        Ok(()) => DeleteOutcome::Deleted { count: ids.len() },
        Err(e) => {
            tracing::error!("Error deleting messages: {}", e);
            DeleteOutcome::Error {
                message: e.to_string(),
            }
        }
    }
}
