use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(pub String);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FolderId(pub String);

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContinuationId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderRef {
    pub account_id: AccountId,
    pub id: FolderId,
}

impl fmt::Display for FolderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.account_id, self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderType {
    Inbox,
    Drafts,
    Sent,
    Trash,
    Archives,
    Junk,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailFolder {
    pub account_id: AccountId,
    pub id: FolderId,
    pub name: String,
    pub folder_type: Option<FolderType>,
    pub subfolders: Vec<MailFolder>,
}

impl MailFolder {
    pub fn folder_ref(&self) -> FolderRef {
        FolderRef {
            account_id: self.account_id.clone(),
            id: self.id.clone(),
        }
    }
}

pub fn flatten_folders(tree: &[MailFolder]) -> Vec<&MailFolder> {
    let mut out = Vec::new();
    let mut stack: Vec<&MailFolder> = tree.iter().rev().collect();
    while let Some(folder) = stack.pop() {
        out.push(folder);
        stack.extend(folder.subfolders.iter().rev());
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub account_id: AccountId,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub identities: Vec<Identity>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHeader {
    pub id: MessageId,
    pub author: String,
    pub folder: FolderRef,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePage {
    pub messages: Vec<MessageHeader>,
    pub cursor: Option<ContinuationId>,
}
