use crate::bulk::model::{flatten_folders, AccountId, FolderRef, FolderType, MailFolder, MessageHeader};
use crate::error::{BulkDeleteError, HostError};
use crate::host::MailHost;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    CurrentFolder,
    CurrentAccount,
    AllFolders,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::CurrentFolder, Scope::CurrentAccount, Scope::AllFolders];

    pub fn key(self) -> &'static str {
        match self {
            Scope::CurrentFolder => "currentFolder",
            Scope::CurrentAccount => "currentAccount",
            Scope::AllFolders => "allFolders",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Scope {
    type Err = BulkDeleteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BulkDeleteError::InvalidScope(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScopeSelection {
    pub scope: Scope,
    pub include_trash: bool,
    pub include_spam: bool,
}

impl ScopeSelection {
    pub fn admits(&self, folder: &MailFolder) -> bool {
        match folder.folder_type {
            Some(FolderType::Trash) => self.include_trash,
            Some(FolderType::Junk) => self.include_spam,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSet {
    order: Vec<FolderRef>,
    members: HashSet<FolderRef>,
}

impl FolderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, folder: FolderRef) -> bool {
        if !self.members.insert(folder.clone()) {
            return false;
        }
        self.order.push(folder);
        true
    }

    pub fn contains(&self, folder: &FolderRef) -> bool {
        self.members.contains(folder)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FolderRef> {
        self.order.iter()
    }
}

impl FromIterator<FolderRef> for FolderSet {
    fn from_iter<I: IntoIterator<Item = FolderRef>>(iter: I) -> Self {
        let mut set = FolderSet::new();
        for folder in iter {
            set.insert(folder);
        }
        set
    }
}

pub async fn resolve_folders<H: MailHost + ?Sized>(
    host: &H,
    message: &MessageHeader,
    selection: &ScopeSelection,
) -> Result<FolderSet, HostError> {
    let folders: FolderSet = match selection.scope {
        Scope::CurrentFolder => std::iter::once(message.folder.clone()).collect(),
        Scope::CurrentAccount => {
            let account_id = owning_account(host, message).await?;
            let tree = host.folder_tree(&account_id).await?;
            admitted(&tree, selection).collect()
        }
        Scope::AllFolders => {
            let mut set = FolderSet::new();
            for account in host.list_accounts().await? {
                tracing::info!("Collecting folders of {} ({})", account.name, account.id);
                let tree = host.folder_tree(&account.id).await?;
                for folder in admitted(&tree, selection) {
                    set.insert(folder);
                }
            }
            set
        }
    };
    tracing::info!("Resolved {} folders for scope {}", folders.len(), selection.scope);
    Ok(folders)
}

async fn owning_account<H: MailHost + ?Sized>(
    host: &H,
    message: &MessageHeader,
) -> Result<AccountId, HostError> {
    let accounts = host.list_accounts().await?;
    let identity = accounts
        .iter()
        .find(|account| account.id == message.folder.account_id)
        .and_then(|account| account.identities.first());
    Ok(match identity {
        Some(identity) => {
            tracing::info!(
                "Using identity {} ({}) of account {}",
                identity.email,
                identity.id,
                identity.account_id
            );
            identity.account_id.clone()
        }
        None => {
            tracing::warn!(
                "No identity for account {}, using folder account id",
                message.folder.account_id
            );
            message.folder.account_id.clone()
        }
    })
}

fn admitted<'a>(
    tree: &'a [MailFolder],
    selection: &'a ScopeSelection,
) -> impl Iterator<Item = FolderRef> + 'a {
    flatten_folders(tree)
        .into_iter()
        .filter(move |folder| {
            let admitted = selection.admits(folder);
            if !admitted {
                tracing::debug!("Skipping {:?} folder {}", folder.folder_type, folder.name);
            }
            admitted
        })
        .map(MailFolder::folder_ref)
}
