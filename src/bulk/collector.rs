use crate::bulk::address::AddressComponents;
use crate::bulk::model::{MessageHeader, MessageId};
use crate::bulk::scope::FolderSet;
use crate::bulk::stream::{all_messages, author_messages};
use crate::error::HostError;
use crate::host::MailHost;
use futures::{pin_mut, TryStreamExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAction {
    Message,
    NameAndAddress,
    Address,
    Domain,
}

impl DeleteAction {
    pub const ALL: [DeleteAction; 4] = [
        DeleteAction::Message,
        DeleteAction::NameAndAddress,
        DeleteAction::Address,
        DeleteAction::Domain,
    ];

    /// Criteria shape for this button. Components that are empty count as
    /// absent, so a button whose parts are missing narrows to a smaller
    /// shape, ultimately the displayed message alone.
    pub fn selection(self, address: &AddressComponents) -> Selection {
        let name = non_empty(&address.name);
        let sender = non_empty(&address.sender);
        let domain = non_empty(&address.domain);
        match (self, name, sender, domain) {
            (DeleteAction::NameAndAddress, Some(name), Some(sender), Some(domain)) => {
                Selection::NameAndAddress {
                    name: name.to_string(),
                    sender: sender.to_string(),
                    domain: domain.to_string(),
                }
            }
            (DeleteAction::NameAndAddress | DeleteAction::Address, _, Some(sender), Some(domain)) => {
                Selection::Address {
                    sender: sender.to_string(),
                    domain: domain.to_string(),
                }
            }
            (DeleteAction::NameAndAddress | DeleteAction::Address | DeleteAction::Domain, _, _, Some(domain)) => {
                Selection::Domain {
                    domain: domain.to_string(),
                }
            }
            _ => Selection::Message,
        }
    }

    pub fn available(self, address: &AddressComponents) -> bool {
        matches!(
            (self, self.selection(address)),
            (DeleteAction::Message, _)
                | (DeleteAction::NameAndAddress, Selection::NameAndAddress { .. })
                | (DeleteAction::Address, Selection::Address { .. })
                | (DeleteAction::Domain, Selection::Domain { .. })
        )
    }
}

fn non_empty(s: &str) -> Option<&str> {
    Some(s).filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Message,
    NameAndAddress {
        name: String,
        sender: String,
        domain: String,
    },
    Address {
        sender: String,
        domain: String,
    },
    Domain {
        domain: String,
    },
}

impl Selection {
    pub fn needs_folders(&self) -> bool {
        !matches!(self, Selection::Message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCriteria {
    pub message_id: MessageId,
    pub folders: FolderSet,
    pub selection: Selection,
}

fn normalize(part: &str) -> String {
    part.trim().to_lowercase()
}

/// Name and address selections go through the host's exact author query and
/// are then narrowed to the folder set. A domain cannot be expressed as an
/// exact author, so domain selections read every message of every folder in
/// the set; this is the slow path and scales with the size of the scope.
pub async fn collect<H: MailHost + ?Sized>(
    host: &H,
    criteria: &DeleteCriteria,
) -> Result<Vec<MessageId>, HostError> {
    let ids = match &criteria.selection {
        Selection::NameAndAddress {
            name,
            sender,
            domain,
        } => {
            let author = format!(
                "{} <{}@{}>",
                normalize(name),
                normalize(sender),
                normalize(domain)
            );
            tracing::info!("Selecting messages for: {}", author);
            collect_in_folders(host, author, &criteria.folders).await?
        }
        Selection::Address { sender, domain } => {
            let author = format!("{}@{}", normalize(sender), normalize(domain));
            tracing::info!("Selecting messages from sender: {}", author);
            collect_in_folders(host, author, &criteria.folders).await?
        }
        Selection::Domain { domain } => {
            let at_domain = format!("@{}", normalize(domain));
            tracing::info!(
                "Selecting messages from domain {} across {} folders",
                normalize(domain),
                criteria.folders.len()
            );
            let messages = all_messages(host, criteria.folders.iter().cloned().collect::<Vec<_>>());
            pin_mut!(messages);
            let mut ids = Vec::new();
            while let Some(message) = messages.try_next().await? {
                if from_domain(&message, &at_domain) {
                    ids.push(message.id);
                }
            }
            ids
        }
        Selection::Message => {
            tracing::info!("Selecting message with ID: {}", criteria.message_id);
            vec![criteria.message_id]
        }
    };
    tracing::info!("Selected {} messages", ids.len());
    Ok(ids)
}

async fn collect_in_folders<H: MailHost + ?Sized>(
    host: &H,
    author: String,
    folders: &FolderSet,
) -> Result<Vec<MessageId>, HostError> {
    author_messages(host, author)
        .try_filter(|message| futures::future::ready(folders.contains(&message.folder)))
        .map_ok(|message| message.id)
        .try_collect()
        .await
}

fn from_domain(message: &MessageHeader, at_domain: &str) -> bool {
    message.author.trim().to_lowercase().contains(at_domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bulk::address::parse_author;
    use crate::bulk::model::{AccountId, FolderId, FolderRef};
    use crate::host::memory::{Call, MemoryHost};

    fn jane() -> AddressComponents {
        AddressComponents {
            name: "Jane Doe".into(),
            sender: "Jane".into(),
            domain: "Example.com".into(),
        }
    }

    fn folder(account: &str, id: &str) -> FolderRef {
        FolderRef {
            account_id: AccountId(account.into()),
            id: FolderId(id.into()),
        }
    }

    fn host() -> MemoryHost {
        MemoryHost::new()
            .with_page_size(2)
            .with_account("acct")
            .with_folder("acct", "INBOX", None)
            .with_folder("acct", "Archive", None)
            .with_account("other")
            .with_folder("other", "INBOX", None)
            .with_message(1, "\"Jane Doe\" <jane@example.com>", "acct", "INBOX")
            .with_message(2, "jane@example.com", "acct", "INBOX")
            .with_message(3, "Jane Doe <JANE@example.com>", "acct", "Archive")
            .with_message(4, "bob@example.com", "acct", "INBOX")
            .with_message(5, "x@SUB.Example.com", "acct", "INBOX")
            .with_message(6, "spam@notexample.com", "acct", "INBOX")
            .with_message(7, "\"Jane Doe\" <jane@example.com>", "other", "INBOX")
            .with_message(8, "  Carol <carol@EXAMPLE.COM>  ", "acct", "Archive")
    }

    fn criteria(selection: Selection, folders: &[FolderRef]) -> DeleteCriteria {
        DeleteCriteria {
            message_id: MessageId(1),
            folders: folders.iter().cloned().collect(),
            selection,
        }
    }

    #[test]
    fn buttons_map_to_their_shapes() {
        let parts = jane();
        assert_eq!(DeleteAction::Message.selection(&parts), Selection::Message);
        assert!(matches!(
            DeleteAction::NameAndAddress.selection(&parts),
            Selection::NameAndAddress { .. }
        ));
        assert!(matches!(
            DeleteAction::Address.selection(&parts),
            Selection::Address { .. }
        ));
        assert_eq!(
            DeleteAction::Domain.selection(&parts),
            Selection::Domain {
                domain: "Example.com".into()
            }
        );
    }

    #[test]
    fn missing_parts_narrow_the_shape() {
        let no_name = AddressComponents {
            name: String::new(),
            ..jane()
        };
        assert_eq!(
            DeleteAction::NameAndAddress.selection(&no_name),
            Selection::Address {
                sender: "Jane".into(),
                domain: "Example.com".into()
            }
        );
        assert!(!DeleteAction::NameAndAddress.available(&no_name));
        assert!(DeleteAction::Address.available(&no_name));

        let unparsed = AddressComponents::default();
        for action in DeleteAction::ALL {
            assert_eq!(action.selection(&unparsed), Selection::Message);
        }
        assert!(DeleteAction::Message.available(&unparsed));
        assert!(!DeleteAction::Domain.available(&unparsed));
    }

    #[test]
    fn blank_display_name_disables_the_name_button() {
        let parts = parse_author("\" \" <jane@example.com>").unwrap();
        assert_eq!(parts.name.trim(), "");
        assert!(!DeleteAction::NameAndAddress.available(&parts));
        assert!(DeleteAction::Address.available(&parts));
        assert_eq!(
            DeleteAction::Address.selection(&parts),
            Selection::Address {
                sender: "jane".into(),
                domain: "example.com".into()
            }
        );
    }

    #[test]
    fn enabled_buttons_never_widen_or_narrow() {
        let authors = [
            "\"Jane Doe\" <jane@example.com>",
            "\" \" <jane@example.com>",
            "jane@example.com",
            "not an address",
        ];
        for author in authors {
            let parts = AddressComponents::from_author(author);
            for action in DeleteAction::ALL {
                if !action.available(&parts) {
                    continue;
                }
                let shape = action.selection(&parts);
                let expected = match action {
                    DeleteAction::Message => matches!(shape, Selection::Message),
                    DeleteAction::NameAndAddress => {
                        matches!(shape, Selection::NameAndAddress { .. })
                    }
                    DeleteAction::Address => matches!(shape, Selection::Address { .. }),
                    DeleteAction::Domain => matches!(shape, Selection::Domain { .. }),
                };
                assert!(expected, "{action:?} on {author} ran {shape:?}");
            }
        }
    }

    #[tokio::test]
    async fn name_and_address_uses_exact_author_query_within_folders() {
        let host = host();
        let ids = collect(
            &host,
            &criteria(
                DeleteAction::NameAndAddress.selection(&jane()),
                &[folder("acct", "INBOX"), folder("acct", "Archive")],
            ),
        )
        .await
        .unwrap();

        assert_eq!(ids, vec![MessageId(1), MessageId(3)]);
        assert!(host
            .calls()
            .contains(&Call::QueryAuthor("jane doe <jane@example.com>".into())));
    }

    #[tokio::test]
    async fn dropping_the_name_switches_to_address_query() {
        let host = host();
        let mut parts = jane();
        parts.name.clear();
        let ids = collect(
            &host,
            &criteria(
                DeleteAction::NameAndAddress.selection(&parts),
                &[folder("acct", "INBOX"), folder("acct", "Archive")],
            ),
        )
        .await
        .unwrap();

        assert_eq!(ids, vec![MessageId(1), MessageId(2), MessageId(3)]);
        assert!(host
            .calls()
            .contains(&Call::QueryAuthor("jane@example.com".into())));
    }

    #[tokio::test]
    async fn address_query_ignores_messages_outside_scope() {
        let host = host();
        let ids = collect(
            &host,
            &criteria(
                DeleteAction::Address.selection(&jane()),
                &[folder("other", "INBOX")],
            ),
        )
        .await
        .unwrap();
        assert_eq!(ids, vec![MessageId(7)]);
    }

    #[tokio::test]
    async fn domain_scan_matches_at_domain_case_insensitively() {
        let host = host();
        let ids = collect(
            &host,
            &criteria(
                DeleteAction::Domain.selection(&jane()),
                &[folder("acct", "INBOX"), folder("acct", "Archive")],
            ),
        )
        .await
        .unwrap();

        // sub.example.com and notexample.com do not contain "@example.com".
        assert_eq!(
            ids,
            vec![
                MessageId(1),
                MessageId(2),
                MessageId(4),
                MessageId(3),
                MessageId(8)
            ]
        );
        assert!(!host.calls().iter().any(|c| matches!(c, Call::QueryAuthor(_))));
    }

    #[tokio::test]
    async fn subdomain_matches_only_its_own_domain() {
        let host = host();
        let ids = collect(
            &host,
            &criteria(
                Selection::Domain {
                    domain: "sub.example.com".into(),
                },
                &[folder("acct", "INBOX")],
            ),
        )
        .await
        .unwrap();
        assert_eq!(ids, vec![MessageId(5)]);
    }

    #[tokio::test]
    async fn single_message_bypasses_scope() {
        let host = host();
        let selection = criteria(Selection::Message, &[]);
        let ids = collect(&host, &DeleteCriteria {
            message_id: MessageId(42),
            ..selection
        })
        .await
        .unwrap();
        assert_eq!(ids, vec![MessageId(42)]);
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn no_match_is_an_empty_list() {
        let host = host();
        let ids = collect(
            &host,
            &criteria(
                Selection::Domain {
                    domain: "nowhere.org".into(),
                },
                &[folder("acct", "INBOX")],
            ),
        )
        .await
        .unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn listing_failure_aborts_collection() {
        let host = host().failing("list");
        let result = collect(
            &host,
            &criteria(
                DeleteAction::Domain.selection(&jane()),
                &[folder("acct", "INBOX")],
            ),
        )
        .await;
        assert!(result.is_err());
    }
}
