use crate::bulk::address::AddressComponents;
use crate::bulk::collector::{collect, DeleteAction, DeleteCriteria};
use crate::bulk::executor::{execute, DeleteOutcome};
use crate::bulk::model::MessageHeader;
use crate::bulk::scope::{resolve_folders, FolderSet, ScopeSelection};
use crate::error::{BulkDeleteError, HostError};
use crate::host::MailHost;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug)]
pub struct PopupSession<H: ?Sized> {
    message: MessageHeader,
    address: AddressComponents,
    in_flight: AtomicBool,
    host: Arc<H>,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<H: MailHost + ?Sized> PopupSession<H> {
    pub async fn open(host: Arc<H>) -> Result<Self, BulkDeleteError> {
        let message = host.displayed_message().await?;
        tracing::info!("Message {}", message.id);
        tracing::info!("Author: {}", message.author);
        let address = AddressComponents::from_author(&message.author);
        Ok(Self {
            message,
            address,
            in_flight: AtomicBool::new(false),
            host,
        })
    }

    pub fn message(&self) -> &MessageHeader {
        &self.message
    }

    pub fn address(&self) -> &AddressComponents {
        &self.address
    }

    pub fn is_deleting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn button_detail(&self, action: DeleteAction) -> Option<String> {
        match action {
            DeleteAction::Message => None,
            DeleteAction::NameAndAddress => {
                Some(self.message.author.clone()).filter(|a| !a.is_empty())
            }
            DeleteAction::Address => self.address.address(),
            DeleteAction::Domain => {
                Some(self.address.domain.clone()).filter(|d| !d.is_empty())
            }
        }
    }

    /// Only one delete runs at a time; a second request made while the
    /// first is in flight is refused with [`BulkDeleteError::DeleteInProgress`].
    pub async fn delete(
        &self,
        action: DeleteAction,
        selection: ScopeSelection,
    ) -> Result<DeleteOutcome, BulkDeleteError> {
        let _guard = self.begin()?;
        let criteria_selection = action.selection(&self.address);
        tracing::info!("Deletion criteria: {:?} ({:?})", criteria_selection, selection);

        let folders = if criteria_selection.needs_folders() {
            match resolve_folders(self.host.as_ref(), &self.message, &selection).await {
                Ok(folders) if folders.is_empty() => {
                    tracing::warn!("No folders left in scope {}", selection.scope);
                    folders
                }
                Ok(folders) => folders,
                Err(e) => return Ok(self.failed(&e)),
            }
        } else {
            FolderSet::new()
        };

        let criteria = DeleteCriteria {
            message_id: self.message.id,
            folders,
            selection: criteria_selection,
        };
        let ids = match collect(self.host.as_ref(), &criteria).await {
            Ok(ids) => ids,
            Err(e) => return Ok(self.failed(&e)),
        };
        Ok(execute(self.host.as_ref(), &ids).await)
    }

    fn begin(&self) -> Result<InFlight<'_>, BulkDeleteError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| BulkDeleteError::DeleteInProgress)?;
        Ok(InFlight(&self.in_flight))
    }

    fn failed(&self, e: &HostError) -> DeleteOutcome {
        tracing::error!("Error processing deletion request: {}", e);
        DeleteOutcome::Error {
            message: e.to_string(),
        }
    }
}
