use crate::bulk::model::{AccountId, FolderId, FolderType, MailFolder};
use crate::error::HostError;
use async_imap::types::NameAttribute;
use futures::TryStreamExt;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use super::{uid_set, ImapSession};

static FROM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)From:\s*(.*)").unwrap());
static FOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r?\n[ \t]+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedFolder {
    pub path: String,
    pub delimiter: Option<String>,
    pub folder_type: Option<FolderType>,
    pub selectable: bool,
}

pub fn parse_from_header(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let unfolded = FOLD_RE.replace_all(&text, " ");
    FROM_RE
        .captures(&unfolded)
        .and_then(|m| m.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|author| !author.is_empty())
}

fn folder_type(path: &str, attributes: &[NameAttribute<'_>]) -> Option<FolderType> {
    let special = attributes.iter().find_map(|attr| match attr {
        NameAttribute::Trash => Some(FolderType::Trash),
        NameAttribute::Junk => Some(FolderType::Junk),
        NameAttribute::Sent => Some(FolderType::Sent),
        NameAttribute::Drafts => Some(FolderType::Drafts),
        NameAttribute::Archive => Some(FolderType::Archives),
        _ => None,
    });
    special.or_else(|| path.eq_ignore_ascii_case("INBOX").then_some(FolderType::Inbox))
}

pub async fn list_folders(session: &mut ImapSession) -> Result<Vec<ListedFolder>, HostError> {
    let names: Vec<_> = session.list(Some(""), Some("*")).await?.try_collect().await?;
    Ok(names
        .iter()
        .map(|name| ListedFolder {
            path: name.name().to_string(),
            delimiter: name.delimiter().map(str::to_string),
            folder_type: folder_type(name.name(), name.attributes()),
            selectable: !name
                .attributes()
                .iter()
                .any(|attr| matches!(attr, NameAttribute::NoSelect)),
        })
        .collect())
}

/// Nests listed mailboxes under their parents. Mailboxes whose parent was
/// not listed stay at the top level; INBOX sorts first.
pub fn build_tree(account_id: &AccountId, listed: &[ListedFolder]) -> Vec<MailFolder> {
    let parent_of = |folder: &ListedFolder| -> Option<String> {
        let delimiter = folder.delimiter.as_deref()?;
        folder
            .path
            .rsplit_once(delimiter)
            .map(|(parent, _)| parent.to_string())
    };

    let mut children: HashMap<Option<String>, Vec<&ListedFolder>> = HashMap::new();
    for folder in listed {
        let parent = parent_of(folder).filter(|p| listed.iter().any(|f| &f.path == p));
        children.entry(parent).or_default().push(folder);
    }

    fn assemble(
        account_id: &AccountId,
        parent: Option<String>,
        children: &HashMap<Option<String>, Vec<&ListedFolder>>,
    ) -> Vec<MailFolder> {
        let mut level: Vec<MailFolder> = children
            .get(&parent)
            .map(|folders| {
                folders
                    .iter()
                    .map(|folder| {
                        let name = match folder.delimiter.as_deref() {
                            Some(d) => folder.path.rsplit(d).next().unwrap_or(&folder.path),
                            None => &folder.path,
                        };
                        MailFolder {
                            account_id: account_id.clone(),
                            id: FolderId(folder.path.clone()),
                            name: name.to_string(),
                            folder_type: folder.folder_type,
                            subfolders: assemble(account_id, Some(folder.path.clone()), children),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();
        level.sort_by(|a, b| {
            let inbox = |f: &MailFolder| f.folder_type != Some(FolderType::Inbox);
            inbox(a).cmp(&inbox(b)).then_with(|| a.id.cmp(&b.id))
        });
        level
    }

    assemble(account_id, None, &children)
}

pub async fn search_uids(session: &mut ImapSession, query: &str) -> Result<Vec<u32>, HostError> {
    let uids = session.uid_search(query).await?;
    let mut uid_vec: Vec<u32> = uids.into_iter().collect();
    uid_vec.sort_unstable();
    Ok(uid_vec)
}

pub async fn fetch_authors(
    session: &mut ImapSession,
    uids: &[u32],
    batch_size: usize,
) -> Result<Vec<(u32, String)>, HostError> {
    let mut authors = Vec::with_capacity(uids.len());
    for batch in fetch_batches(uids, batch_size) {
        let fetches: Vec<_> = session
            .uid_fetch(&batch, "(UID BODY.PEEK[HEADER.FIELDS (FROM)])")
            .await?
            .try_collect()
            .await?;
        for fetch in fetches {
            // Unsolicited FETCH updates carry no UID.
            let Some(uid) = fetch.uid else {
                continue;
            };
            let author = fetch.header().and_then(parse_from_header).unwrap_or_default();
            authors.push((uid, author));
        }
    }
    authors.sort_by_key(|(uid, _)| *uid);
    Ok(authors)
}

fn fetch_batches(uids: &[u32], batch_size: usize) -> Vec<String> {
    uids.chunks(batch_size.max(1)).map(uid_set).collect()
}
