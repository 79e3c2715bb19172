use crate::bulk::model::{
    flatten_folders, Account, AccountId, ContinuationId, FolderId, FolderRef, Identity, MailFolder,
    MessageHeader, MessageId, MessagePage,
};
use crate::error::HostError;
use crate::host::{author_matches, MailHost};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use tokio::sync::Mutex;

use super::{connect_imap, deleter, logout, scanner, ImapAccount, ImapSession};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MessageLocation {
    folder: FolderRef,
    uid: u32,
}

#[derive(Debug)]
enum PendingList {
    Folder { folder: FolderRef, uids: VecDeque<u32> },
    Ready(VecDeque<MessageHeader>),
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    ids: HashMap<MessageLocation, MessageId>,
    locations: HashMap<MessageId, MessageLocation>,
    next_cursor: u64,
    cursors: HashMap<String, PendingList>,
    unselectable: HashSet<FolderRef>,
}

impl Registry {
    fn register(&mut self, folder: &FolderRef, uid: u32, author: String) -> MessageHeader {
        let location = MessageLocation {
            folder: folder.clone(),
            uid,
        };
        let id = match self.ids.get(&location) {
            Some(id) => *id,
            None => {
                self.next_id += 1;
                let id = MessageId(self.next_id);
                self.ids.insert(location.clone(), id);
                self.locations.insert(id, location);
                id
            }
        };
        MessageHeader {
            id,
            author,
            folder: folder.clone(),
        }
    }

    fn forget(&mut self, id: MessageId) {
        if let Some(location) = self.locations.remove(&id) {
            self.ids.remove(&location);
        }
    }

    fn park(&mut self, pending: PendingList) -> ContinuationId {
        self.next_cursor += 1;
        let key = format!("list-{}", self.next_cursor);
        self.cursors.insert(key.clone(), pending);
        ContinuationId(key)
    }
}

/// Every call opens its own session and logs out afterwards. Message ids
/// are handed out per (account, mailbox, UID) and stay stable for the
/// lifetime of the host.
#[derive(Debug)]
pub struct ImapHost {
    accounts: Vec<(AccountId, ImapAccount)>,
    displayed_folder: String,
    page_size: usize,
    registry: Mutex<Registry>,
}

impl ImapHost {
    pub fn new(accounts: Vec<ImapAccount>, displayed_folder: &str, page_size: usize) -> Self {
        Self {
            accounts: accounts
                .into_iter()
                .enumerate()
                .map(|(i, account)| (AccountId(format!("account{}", i + 1)), account))
                .collect(),
            displayed_folder: displayed_folder.to_string(),
            page_size: page_size.max(1),
            registry: Mutex::new(Registry::default()),
        }
    }

    fn account(&self, id: &AccountId) -> Result<&ImapAccount, HostError> {
        self.accounts
            .iter()
            .find(|(account_id, _)| account_id == id)
            .map(|(_, account)| account)
            .ok_or_else(|| HostError::NotFound(format!("account {id}")))
    }

    async fn session(&self, id: &AccountId) -> Result<ImapSession, HostError> {
        connect_imap(self.account(id)?).await
    }

    async fn headers(
        &self,
        session: &mut ImapSession,
        folder: &FolderRef,
        uids: &[u32],
    ) -> Result<Vec<MessageHeader>, HostError> {
        let authors = scanner::fetch_authors(session, uids, self.page_size).await?;
        let mut registry = self.registry.lock().await;
        Ok(authors
            .into_iter()
            .map(|(uid, author)| registry.register(folder, uid, author))
            .collect())
    }

    async fn folder_page(
        &self,
        session: &mut ImapSession,
        folder: FolderRef,
        mut uids: VecDeque<u32>,
    ) -> Result<MessagePage, HostError> {
        let take = uids.len().min(self.page_size);
        let page: Vec<u32> = uids.drain(..take).collect();
        let messages = self.headers(session, &folder, &page).await?;
        let cursor = if uids.is_empty() {
            None
        } else {
            Some(
                self.registry
                    .lock()
                    .await
                    .park(PendingList::Folder { folder, uids }),
            )
        };
        Ok(MessagePage { messages, cursor })
    }

    async fn ready_page(&self, mut headers: VecDeque<MessageHeader>) -> MessagePage {
        let take = headers.len().min(self.page_size);
        let messages: Vec<MessageHeader> = headers.drain(..take).collect();
        let cursor = if headers.is_empty() {
            None
        } else {
            Some(self.registry.lock().await.park(PendingList::Ready(headers)))
        };
        MessagePage { messages, cursor }
    }

    async fn listed_tree(
        &self,
        session: &mut ImapSession,
        account_id: &AccountId,
    ) -> Result<Vec<MailFolder>, HostError> {
        let listed = scanner::list_folders(session).await?;
        let mut registry = self.registry.lock().await;
        for folder in listed.iter().filter(|f| !f.selectable) {
            registry.unselectable.insert(FolderRef {
                account_id: account_id.clone(),
                id: FolderId(folder.path.clone()),
            });
        }
        Ok(scanner::build_tree(account_id, &listed))
    }

    async fn is_selectable(&self, folder: &FolderRef) -> bool {
        !self.registry.lock().await.unselectable.contains(folder)
    }
}

fn search_address(author_query: &str) -> String {
    let address = match (author_query.rfind('<'), author_query.rfind('>')) {
        (Some(open), Some(close)) if open < close => &author_query[open + 1..close],
        _ => author_query,
    };
    address.trim().replace('"', "")
}

#[async_trait]
impl MailHost for ImapHost {
    async fn displayed_message(&self) -> Result<MessageHeader, HostError> {
        let (account_id, _) = self
            .accounts
            .first()
            .ok_or_else(|| HostError::NotFound("no account configured".to_string()))?;
        let mut session = self.session(account_id).await?;
        session.select(&self.displayed_folder).await?;
        let newest = scanner::search_uids(&mut session, "ALL").await?.last().copied();
        let folder = FolderRef {
            account_id: account_id.clone(),
            id: FolderId(self.displayed_folder.clone()),
        };
        let result = match newest {
            Some(uid) => self.headers(&mut session, &folder, &[uid]).await,
            None => Ok(Vec::new()),
        };
        logout(session, "reading displayed message").await;
        result?
            .into_iter()
            .next()
            .ok_or_else(|| HostError::NotFound(format!("no message in {}", self.displayed_folder)))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, HostError> {
        Ok(self
            .accounts
            .iter()
            .map(|(id, account)| Account {
                id: id.clone(),
                name: account.email.clone(),
                identities: vec![Identity {
                    id: format!("{id}-identity"),
                    account_id: id.clone(),
                    email: account.email.clone(),
                }],
            })
            .collect())
    }

    async fn folder_tree(&self, account: &AccountId) -> Result<Vec<MailFolder>, HostError> {
        let mut session = self.session(account).await?;
        let tree = self.listed_tree(&mut session, account).await;
        logout(session, "listing folders").await;
        tree
    }

    async fn list_messages(&self, folder: &FolderRef) -> Result<MessagePage, HostError> {
        if !self.is_selectable(folder).await {
            return Ok(MessagePage::default());
        }
        let mut session = self.session(&folder.account_id).await?;
        let page = async {
            session.select(&folder.id.0).await?;
            let uids = scanner::search_uids(&mut session, "ALL").await?;
            self.folder_page(&mut session, folder.clone(), uids.into()).await
        }
        .await;
        logout(session, "listing messages").await;
        page
    }

    async fn query_author(&self, author: &str) -> Result<MessagePage, HostError> {
        let query = format!("FROM \"{}\"", search_address(author));
        let mut matches = VecDeque::new();

        for (account_id, _) in &self.accounts {
            let mut session = self.session(account_id).await?;
            let found = async {
                let tree = self.listed_tree(&mut session, account_id).await?;
                let mut found = Vec::new();
                for folder in flatten_folders(&tree) {
                    let folder = folder.folder_ref();
                    if !self.is_selectable(&folder).await {
                        continue;
                    }
                    session.select(&folder.id.0).await?;
                    let uids = scanner::search_uids(&mut session, &query).await?;
                    let headers = self.headers(&mut session, &folder, &uids).await?;
                    found.extend(headers.into_iter().filter(|h| author_matches(&h.author, author)));
                }
                Ok::<_, HostError>(found)
            }
            .await;
            logout(session, "searching authors").await;
            matches.extend(found?);
        }

        tracing::info!("Author query {} matched {} messages", author, matches.len());
        Ok(self.ready_page(matches).await)
    }

    async fn continue_list(&self, cursor: &ContinuationId) -> Result<MessagePage, HostError> {
        let pending = self
            .registry
            .lock()
            .await
            .cursors
            .remove(&cursor.0)
            .ok_or_else(|| HostError::UnknownCursor(cursor.0.clone()))?;

        match pending {
            PendingList::Ready(headers) => Ok(self.ready_page(headers).await),
            PendingList::Folder { folder, uids } => {
                let mut session = self.session(&folder.account_id).await?;
                let page = async {
                    session.select(&folder.id.0).await?;
                    self.folder_page(&mut session, folder.clone(), uids).await
                }
                .await;
                logout(session, "continuing listing").await;
                page
            }
        }
    }

    async fn delete_permanently(&self, ids: &[MessageId]) -> Result<(), HostError> {
        // Resolve every id up front so an unknown id fails the whole batch.
        let mut by_folder: Vec<(FolderRef, Vec<u32>)> = Vec::new();
        {
            let registry = self.registry.lock().await;
            for id in ids {
                let location = registry
                    .locations
                    .get(id)
                    .ok_or(HostError::UnknownMessage(id.0))?;
                match by_folder.iter_mut().find(|(f, _)| *f == location.folder) {
                    Some((_, uids)) => uids.push(location.uid),
                    None => by_folder.push((location.folder.clone(), vec![location.uid])),
                }
            }
        }

        for (account_id, _) in &self.accounts {
            let folders: Vec<&(FolderRef, Vec<u32>)> = by_folder
                .iter()
                .filter(|(folder, _)| &folder.account_id == account_id)
                .collect();
            if folders.is_empty() {
                continue;
            }
            let mut session = self.session(account_id).await?;
            let result = async {
                for (folder, uids) in &folders {
                    deleter::expunge_uids(&mut session, &folder.id.0, uids).await?;
                }
                Ok::<_, HostError>(())
            }
            .await;
            logout(session, "deleting").await;
            result?;
        }

        let mut registry = self.registry.lock().await;
        for id in ids {
            registry.forget(*id);
        }
        Ok(())
    }
}
