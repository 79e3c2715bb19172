use crate::bulk::executor::DeleteOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKey {
    Deleting,
    DeleteSuccess,
    DeleteError,
}

impl StatusKey {
    pub fn key(self) -> &'static str {
        match self {
            StatusKey::Deleting => "statusTextDeleting",
            StatusKey::DeleteSuccess => "statusTextDeleteSuccess",
            StatusKey::DeleteError => "statusTextDeleteError",
        }
    }
}

pub fn message(locale: &str, key: StatusKey) -> &'static str {
    let language = locale.split(['-', '_']).next().unwrap_or("en");
    match (language, key) {
        ("de", StatusKey::Deleting) => "Nachrichten werden gelöscht…",
        ("de", StatusKey::DeleteSuccess) => "Nachrichten gelöscht",
        ("de", StatusKey::DeleteError) => "Löschen fehlgeschlagen",
        ("fr", StatusKey::Deleting) => "Suppression des messages…",
        ("fr", StatusKey::DeleteSuccess) => "messages supprimés",
        ("fr", StatusKey::DeleteError) => "Échec de la suppression",
        (_, StatusKey::Deleting) => "Deleting messages…",
        (_, StatusKey::DeleteSuccess) => "messages deleted",
        (_, StatusKey::DeleteError) => "Delete failed",
    }
}

/// Status line for a finished delete. Anything but a successful delete is
/// shown as the generic failure text; details only go to the log.
pub fn outcome_text(locale: &str, outcome: &DeleteOutcome) -> String {
    match outcome {
        DeleteOutcome::Deleted { count } if *count > 0 => {
            format!("{} {}", count, message(locale, StatusKey::DeleteSuccess))
        }
        DeleteOutcome::Deleted { .. } => message(locale, StatusKey::DeleteSuccess).to_string(),
        DeleteOutcome::NoMessagesFound | DeleteOutcome::Error { .. } => {
            message(locale, StatusKey::DeleteError).to_string()
        }
    }
}
