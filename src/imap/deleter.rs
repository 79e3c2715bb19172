use crate::error::HostError;
use futures::TryStreamExt;
use std::collections::HashSet;

use super::{scanner, uid_set, ImapSession};

const CHUNK_SIZE: usize = 1000;

/// Permanently removes exactly `uids` from `folder`. Nothing is moved to
/// Trash, and messages other clients flagged `\Deleted` are left alone.
pub async fn expunge_uids(
    session: &mut ImapSession,
    folder: &str,
    uids: &[u32],
) -> Result<usize, HostError> {
    if uids.is_empty() {
        return Ok(0);
    }

    let uidplus = session.capabilities().await?.has_str("UIDPLUS");
    session.select(folder).await?;

    for chunk in uids.chunks(CHUNK_SIZE) {
        let chunk_set = uid_set(chunk);
        session
            .uid_store(&chunk_set, "+FLAGS.SILENT (\\Deleted)")
            .await?
            .try_collect::<Vec<_>>()
            .await?;

        if uidplus {
            session
                .uid_expunge(&chunk_set)
                .await?
                .try_collect::<Vec<_>>()
                .await?;
        } else {
            expunge_only(session, chunk).await?;
        }
    }

    tracing::info!("Expunged {} messages from {}", uids.len(), folder);
    Ok(uids.len())
}

async fn expunge_only(session: &mut ImapSession, ours: &[u32]) -> Result<(), HostError> {
    let flagged = scanner::search_uids(session, "DELETED").await?;
    let foreign = foreign_deleted(&flagged, ours);
    if !foreign.is_empty() {
        tracing::warn!(
            "Server lacks UIDPLUS, shielding {} messages flagged by others",
            foreign.len()
        );
    }

    for chunk in foreign.chunks(CHUNK_SIZE) {
        session
            .uid_store(uid_set(chunk), "-FLAGS.SILENT (\\Deleted)")
            .await?
            .try_collect::<Vec<_>>()
            .await?;
    }

    let expunged = match session.expunge().await {
        Ok(responses) => responses.try_collect::<Vec<_>>().await,
        Err(e) => Err(e),
    };

    for chunk in foreign.chunks(CHUNK_SIZE) {
        session
            .uid_store(uid_set(chunk), "+FLAGS.SILENT (\\Deleted)")
            .await?
            .try_collect::<Vec<_>>()
            .await?;
    }

    expunged?;
    Ok(())
}

fn foreign_deleted(flagged: &[u32], ours: &[u32]) -> Vec<u32> {
    let ours: HashSet<u32> = ours.iter().copied().collect();
    flagged.iter().copied().filter(|uid| !ours.contains(uid)).collect()
}
