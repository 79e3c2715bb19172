use crate::bulk::model::{ContinuationId, FolderRef, MessageHeader, MessagePage};
use crate::error::HostError;
use crate::host::MailHost;
use futures::future::BoxFuture;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};

enum PageCursor<'a> {
    First(BoxFuture<'a, Result<MessagePage, HostError>>),
    Next(ContinuationId),
    Done,
}

fn paginate<'a, H: MailHost + ?Sized>(
    host: &'a H,
    first: BoxFuture<'a, Result<MessagePage, HostError>>,
) -> impl Stream<Item = Result<MessageHeader, HostError>> + Send + 'a {
    stream::try_unfold(PageCursor::First(first), move |cursor| async move {
        let page = match cursor {
            PageCursor::First(request) => request.await?,
            PageCursor::Next(id) => host.continue_list(&id).await?,
            PageCursor::Done => return Ok(None),
        };
        let next = match page.cursor {
            Some(id) => PageCursor::Next(id),
            None => PageCursor::Done,
        };
        Ok::<_, HostError>(Some((page.messages, next)))
    })
    .map_ok(|messages| stream::iter(messages.into_iter().map(Ok)))
    .try_flatten()
}

pub fn folder_messages<'a, H: MailHost + ?Sized>(
    host: &'a H,
    folder: FolderRef,
) -> impl Stream<Item = Result<MessageHeader, HostError>> + Send + 'a {
    let first: BoxFuture<'a, _> = Box::pin(async move { host.list_messages(&folder).await });
    paginate(host, first)
}

pub fn all_messages<'a, H, I>(
    host: &'a H,
    folders: I,
) -> impl Stream<Item = Result<MessageHeader, HostError>> + Send + 'a
where
    H: MailHost + ?Sized,
    I: IntoIterator<Item = FolderRef>,
    I::IntoIter: Send + 'a,
{
    stream::iter(folders).flat_map(move |folder| folder_messages(host, folder))
}

pub fn author_messages<'a, H: MailHost + ?Sized>(
    host: &'a H,
    author: String,
) -> impl Stream<Item = Result<MessageHeader, HostError>> + Send + 'a {
    let first: BoxFuture<'a, _> = Box::pin(async move { host.query_author(&author).await });
    paginate(host, first)
}
