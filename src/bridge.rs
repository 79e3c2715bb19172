use crate::bulk::collector::DeleteAction;
use crate::bulk::executor::DeleteOutcome;
use crate::bulk::scope::ScopeSelection;
use crate::bulk::session::PopupSession;
use crate::imap::host::ImapHost;
use crate::imap::ImapAccount;
use crate::state::ButtonInfo;
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use tokio::sync::mpsc as tokio_mpsc;
use tracing::{error, info};

#[derive(Debug)]
pub enum UiCommand {
    Open {
        accounts: Vec<ImapAccount>,
        folder: String,
        page_size: usize,
    },
    Delete {
        action: DeleteAction,
        selection: ScopeSelection,
    },
}

#[derive(Debug)]
pub enum BackgroundEvent {
    Opened {
        author: String,
        buttons: Vec<ButtonInfo>,
    },
    OpenError(String),
    DeleteFinished(DeleteOutcome),
    DeleteRejected(String),
}

pub struct BridgeChannels {
    pub cmd_tx: tokio_mpsc::UnboundedSender<UiCommand>,
    pub event_rx: std_mpsc::Receiver<BackgroundEvent>,
}

pub fn setup_bridge(ctx: egui::Context) -> BridgeChannels {
    let (cmd_tx, cmd_rx) = tokio_mpsc::unbounded_channel::<UiCommand>();
    let (event_tx, event_rx) = std_mpsc::channel::<BackgroundEvent>();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        rt.block_on(background_loop(cmd_rx, event_tx, ctx));
    });

    BridgeChannels { cmd_tx, event_rx }
}

fn sender(
    tx: std_mpsc::Sender<BackgroundEvent>,
    ctx: egui::Context,
) -> impl Fn(BackgroundEvent) {
    move |evt: BackgroundEvent| {
        if let Err(e) = tx.send(evt) {
            tracing::warn!("Failed to send event to UI: {}", e);
        }
        ctx.request_repaint();
    }
}

async fn background_loop(
    mut cmd_rx: tokio_mpsc::UnboundedReceiver<UiCommand>,
    event_tx: std_mpsc::Sender<BackgroundEvent>,
    ctx: egui::Context,
) {
    let mut session: Option<Arc<PopupSession<ImapHost>>> = None;

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            UiCommand::Open {
                accounts,
                folder,
                page_size,
            } => {
                let send = sender(event_tx.clone(), ctx.clone());
                session = handle_open(accounts, &folder, page_size, &send).await;
            }
            UiCommand::Delete { action, selection } => {
                let send = sender(event_tx.clone(), ctx.clone());
                let Some(current) = session.clone() else {
                    send(BackgroundEvent::DeleteRejected(
                        "Delete requested before a message was opened".to_string(),
                    ));
                    continue;
                };
                if current.is_deleting() {
                    send(BackgroundEvent::DeleteRejected(
                        "A delete is already in progress".to_string(),
                    ));
                    continue;
                }
                tokio::spawn(async move {
                    handle_delete(&current, action, selection, &send).await;
                });
            }
        }
    }
}

async fn handle_open(
    accounts: Vec<ImapAccount>,
    folder: &str,
    page_size: usize,
    send: &impl Fn(BackgroundEvent),
) -> Option<Arc<PopupSession<ImapHost>>> {
    let host = Arc::new(ImapHost::new(accounts, folder, page_size));
    match PopupSession::open(host).await {
        Ok(session) => {
            let buttons = DeleteAction::ALL
                .into_iter()
                .map(|action| ButtonInfo {
                    action,
                    detail: session.button_detail(action),
                    available: action.available(session.address()),
                })
                .collect();
            send(BackgroundEvent::Opened {
                author: session.message().author.clone(),
                buttons,
            });
            Some(Arc::new(session))
        }
        Err(e) => {
            error!("Failed to open displayed message: {}", e);
            send(BackgroundEvent::OpenError(e.to_string()));
            None
        }
    }
}

async fn handle_delete(
    session: &PopupSession<ImapHost>,
    action: DeleteAction,
    selection: ScopeSelection,
    send: &impl Fn(BackgroundEvent),
) {
    match session.delete(action, selection).await {
        Ok(outcome) => {
            info!("Delete {:?} finished: {:?}", action, outcome);
            send(BackgroundEvent::DeleteFinished(outcome));
        }
        Err(e) => {
            tracing::warn!("Delete {:?} rejected: {}", action, e);
            send(BackgroundEvent::DeleteRejected(e.to_string()));
        }
    }
}
