use super::{author_matches, MailHost};
use crate::bulk::model::{
    flatten_folders, Account, AccountId, ContinuationId, FolderId, FolderRef, FolderType,
    Identity, MailFolder, MessageHeader, MessageId, MessagePage,
};
use crate::error::HostError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListAccounts,
    FolderTree(AccountId),
    ListMessages(FolderRef),
    QueryAuthor(String),
    ContinueList(ContinuationId),
    Delete(Vec<MessageId>),
}

#[derive(Debug, Default)]
struct MemoryState {
    messages: Vec<MessageHeader>,
    cursors: HashMap<String, VecDeque<MessageHeader>>,
    next_cursor: u64,
    calls: Vec<Call>,
}

#[derive(Debug)]
pub struct MemoryHost {
    displayed: Option<MessageId>,
    accounts: Vec<Account>,
    trees: HashMap<AccountId, Vec<MailFolder>>,
    page_size: usize,
    failing: HashSet<&'static str>,
    state: Mutex<MemoryState>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            displayed: None,
            accounts: Vec::new(),
            trees: HashMap::new(),
            page_size: 100,
            failing: HashSet::new(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_account(mut self, id: &str) -> Self {
        let account_id = AccountId(id.to_string());
        self.accounts.push(Account {
            id: account_id.clone(),
            name: id.to_string(),
            identities: vec![Identity {
                id: format!("{id}-identity"),
                account_id: account_id.clone(),
                email: format!("{id}@example.test"),
            }],
        });
        self.trees.entry(account_id).or_default();
        self
    }

    pub fn with_bare_account(mut self, id: &str) -> Self {
        let account_id = AccountId(id.to_string());
        self.accounts.push(Account {
            id: account_id.clone(),
            name: id.to_string(),
            identities: Vec::new(),
        });
        self.trees.entry(account_id).or_default();
        self
    }

    pub fn with_folder(self, account: &str, id: &str, folder_type: Option<FolderType>) -> Self {
        self.with_subfolder(account, None, id, folder_type)
    }

    pub fn with_subfolder(
        mut self,
        account: &str,
        parent: Option<&str>,
        id: &str,
        folder_type: Option<FolderType>,
    ) -> Self {
        let account_id = AccountId(account.to_string());
        let folder = MailFolder {
            account_id: account_id.clone(),
            id: FolderId(id.to_string()),
            name: id.rsplit('/').next().unwrap_or(id).to_string(),
            folder_type,
            subfolders: Vec::new(),
        };
        let tree = self.trees.entry(account_id).or_default();
        match parent {
            None => tree.push(folder),
            Some(parent) => find_folder_mut(tree, parent)
                .expect("parent folder must be added first")
                .subfolders
                .push(folder),
        }
        self
    }

    pub fn with_message(self, id: u64, author: &str, account: &str, folder: &str) -> Self {
        self.state
            .lock()
            .expect("memory host state poisoned")
            .messages
            .push(MessageHeader {
                id: MessageId(id),
                author: author.to_string(),
                folder: FolderRef {
                    account_id: AccountId(account.to_string()),
                    id: FolderId(folder.to_string()),
                },
            });
        self
    }

    pub fn displaying(mut self, id: u64) -> Self {
        self.displayed = Some(MessageId(id));
        self
    }

    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().expect("memory host state poisoned").calls.clone()
    }

    pub fn remaining_ids(&self) -> Vec<MessageId> {
        self.state
            .lock()
            .expect("memory host state poisoned")
            .messages
            .iter()
            .map(|m| m.id)
            .collect()
    }

    fn check(&self, operation: &'static str) -> Result<(), HostError> {
        if self.failing.contains(operation) {
            return Err(HostError::Imap(format!("{operation} failed")));
        }
        Ok(())
    }

    fn record(&self, call: Call) {
        self.state.lock().expect("memory host state poisoned").calls.push(call);
    }

    fn paginate(&self, mut items: VecDeque<MessageHeader>) -> MessagePage {
        let take = items.len().min(self.page_size);
        let messages: Vec<MessageHeader> = items.drain(..take).collect();
        if items.is_empty() {
            return MessagePage { messages, cursor: None };
        }
        let mut state = self.state.lock().expect("memory host state poisoned");
        state.next_cursor += 1;
        let key = format!("page-{}", state.next_cursor);
        state.cursors.insert(key.clone(), items);
        MessagePage {
            messages,
            cursor: Some(ContinuationId(key)),
        }
    }

    fn folder_exists(&self, folder: &FolderRef) -> bool {
        self.trees
            .get(&folder.account_id)
            .is_some_and(|tree| flatten_folders(tree).iter().any(|f| f.id == folder.id))
    }
}

fn find_folder_mut<'a>(tree: &'a mut [MailFolder], id: &str) -> Option<&'a mut MailFolder> {
    for folder in tree.iter_mut() {
        if folder.id.0 == id {
            return Some(folder);
        }
        if let Some(found) = find_folder_mut(&mut folder.subfolders, id) {
            return Some(found);
        }
    }
    None
}

#[async_trait]
impl MailHost for MemoryHost {
    async fn displayed_message(&self) -> Result<MessageHeader, HostError> {
        self.check("displayed")?;
        let id = self
            .displayed
            .ok_or_else(|| HostError::NotFound("no displayed message".to_string()))?;
        self.state
            .lock()
            .expect("memory host state poisoned")
            .messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(HostError::UnknownMessage(id.0))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, HostError> {
        self.record(Call::ListAccounts);
        self.check("accounts")?;
        Ok(self.accounts.clone())
    }

    async fn folder_tree(&self, account: &AccountId) -> Result<Vec<MailFolder>, HostError> {
        self.record(Call::FolderTree(account.clone()));
        self.check("folders")?;
        self.trees
            .get(account)
            .cloned()
            .ok_or_else(|| HostError::NotFound(format!("account {account}")))
    }

    async fn list_messages(&self, folder: &FolderRef) -> Result<MessagePage, HostError> {
        self.record(Call::ListMessages(folder.clone()));
        self.check("list")?;
        if !self.folder_exists(folder) {
            return Err(HostError::NotFound(format!("folder {folder}")));
        }
        let items: VecDeque<MessageHeader> = self
            .state
            .lock()
            .expect("memory host state poisoned")
            .messages
            .iter()
            .filter(|m| &m.folder == folder)
            .cloned()
            .collect();
        Ok(self.paginate(items))
    }

    async fn query_author(&self, author: &str) -> Result<MessagePage, HostError> {
        self.record(Call::QueryAuthor(author.to_string()));
        self.check("query")?;
        let items: VecDeque<MessageHeader> = self
            .state
            .lock()
            .expect("memory host state poisoned")
            .messages
            .iter()
            .filter(|m| author_matches(&m.author, author))
            .cloned()
            .collect();
        Ok(self.paginate(items))
    }

    async fn continue_list(&self, cursor: &ContinuationId) -> Result<MessagePage, HostError> {
        self.record(Call::ContinueList(cursor.clone()));
        self.check("continue")?;
        let items = self
            .state
            .lock()
            .expect("memory host state poisoned")
            .cursors
            .remove(&cursor.0)
            .ok_or_else(|| HostError::UnknownCursor(cursor.0.clone()))?;
        Ok(self.paginate(items))
    }

    async fn delete_permanently(&self, ids: &[MessageId]) -> Result<(), HostError> {
        self.record(Call::Delete(ids.to_vec()));
        self.check("delete")?;
        let mut state = self.state.lock().expect("memory host state poisoned");
        state.messages.retain(|m| !ids.contains(&m.id));
        Ok(())
    }
}
