use crate::bridge::{BackgroundEvent, UiCommand};
use crate::bulk::executor::DeleteOutcome;
use crate::config::PopupConfig;
use crate::state::{AppPhase, AppState};
use crate::status::{self, StatusKey};
use crate::ui::{popup, sidebar};
use std::time::Instant;
use tokio::sync::mpsc::UnboundedSender;

pub struct BulkDeleteApp {
    state: AppState,
    cmd_tx: UnboundedSender<UiCommand>,
    event_rx: std::sync::mpsc::Receiver<BackgroundEvent>,
}

impl BulkDeleteApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &PopupConfig) -> Self {
        let bridge = crate::bridge::setup_bridge(cc.egui_ctx.clone());
        Self {
            state: AppState::new(config),
            cmd_tx: bridge.cmd_tx,
            event_rx: bridge.event_rx,
        }
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.event_rx.try_recv() {
            apply_event(&mut self.state, event, Instant::now());
            ctx.request_repaint();
        }
    }

    fn close_when_due(&self, ctx: &egui::Context) {
        let Some(close_at) = self.state.close_at else {
            return;
        };
        let now = Instant::now();
        if now >= close_at {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        } else {
            ctx.request_repaint_after(close_at - now);
        }
    }
}

fn apply_event(state: &mut AppState, event: BackgroundEvent, now: Instant) {
    match event {
        BackgroundEvent::Opened { author, buttons } => {
            state.author = Some(author);
            state.buttons = buttons;
            state.phase = AppPhase::Ready;
            state.status_text.clear();
        }
        BackgroundEvent::OpenError(msg) => {
            state.error_message = Some(msg);
            state.phase = AppPhase::SignedOut;
        }
        BackgroundEvent::DeleteFinished(outcome) => {
            state.status_text = status::outcome_text(&state.locale, &outcome);
            if matches!(outcome, DeleteOutcome::Deleted { .. }) {
                tracing::info!("{}: {}", StatusKey::DeleteSuccess.key(), state.status_text);
                state.phase = AppPhase::Closing;
                state.close_at = Some(now + state.close_delay);
            } else {
                if let DeleteOutcome::Error { message } = &outcome {
                    tracing::error!("Delete failed: {}", message);
                }
                tracing::info!("{}: {}", StatusKey::DeleteError.key(), state.status_text);
                // Stay open so the user can try again.
                state.phase = AppPhase::Ready;
            }
        }
        BackgroundEvent::DeleteRejected(msg) => {
            tracing::warn!("{}", msg);
            state.status_text = status::message(&state.locale, StatusKey::DeleteError).to_string();
            state.phase = AppPhase::Ready;
        }
    }
}

impl eframe::App for BulkDeleteApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);
        self.close_when_due(ctx);

        egui::SidePanel::left("sidebar")
            .resizable(true)
            .default_width(230.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    sidebar::draw_sidebar(ui, &mut self.state, &self.cmd_tx);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            popup::draw_popup(ui, &mut self.state, &self.cmd_tx);
        });
    }
}
