use crate::bridge::UiCommand;
use crate::bulk::collector::DeleteAction;
use crate::bulk::scope::Scope;
use crate::state::{AppPhase, AppState};
use crate::status::{self, StatusKey};
use egui::Ui;
use tokio::sync::mpsc::UnboundedSender;

fn action_label(action: DeleteAction) -> &'static str {
    match action {
        DeleteAction::Message => "Delete this message",
        DeleteAction::NameAndAddress => "Delete all from",
        DeleteAction::Address => "Delete all from address",
        DeleteAction::Domain => "Delete all from domain",
    }
}

fn scope_label(scope: Scope) -> &'static str {
    match scope {
        Scope::CurrentFolder => "Current folder",
        Scope::CurrentAccount => "Current account",
        Scope::AllFolders => "All accounts",
    }
}

pub fn draw_popup(ui: &mut Ui, state: &mut AppState, cmd_tx: &UnboundedSender<UiCommand>) {
    // Error display
    if let Some(err) = &state.error_message {
        ui.colored_label(egui::Color32::RED, format!("Error: {}", err));
        ui.add_space(4.0);
    }

    let Some(author) = state.author.clone() else {
        ui.centered_and_justified(|ui| {
            if state.phase == AppPhase::Opening {
                ui.spinner();
            } else {
                ui.label("Add an account and open a message to begin.");
            }
        });
        return;
    };

    ui.heading("Bulk Delete");
    ui.label(format!("From: {}", author));
    ui.add_space(8.0);
    ui.separator();

    let busy = state.busy();

    ui.label("Scope");
    ui.add_enabled_ui(!busy, |ui| {
        for scope in Scope::ALL {
            ui.radio_value(&mut state.selection.scope, scope, scope_label(scope));
        }
        ui.checkbox(&mut state.selection.include_trash, "Include Trash");
        ui.checkbox(&mut state.selection.include_spam, "Include Spam");
    });

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(4.0);

    let mut clicked = None;
    for button in &state.buttons {
        let text = match &button.detail {
            Some(detail) => format!("{}\n{}", action_label(button.action), detail),
            None => action_label(button.action).to_string(),
        };
        let enabled = !busy && button.available;
        if ui
            .add_enabled(enabled, egui::Button::new(text).min_size(egui::vec2(220.0, 0.0)))
            .clicked()
        {
            clicked = Some(button.action);
        }
        ui.add_space(2.0);
    }

    if let Some(action) = clicked {
        state.phase = AppPhase::Deleting;
        state.error_message = None;
        state.status_text = status::message(&state.locale, StatusKey::Deleting).to_string();

        let _ = cmd_tx.send(UiCommand::Delete {
            action,
            selection: state.selection,
        });
    }

    if !state.status_text.is_empty() {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if state.phase == AppPhase::Deleting {
                ui.spinner();
            }
            ui.label(&state.status_text);
        });
    }
}
