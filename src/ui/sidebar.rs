use crate::bridge::UiCommand;
use crate::imap::provider::ImapProvider;
use crate::state::{AppPhase, AppState};
use egui::Ui;
use tokio::sync::mpsc::UnboundedSender;

pub fn draw_sidebar(ui: &mut Ui, state: &mut AppState, cmd_tx: &UnboundedSender<UiCommand>) {
    let busy = state.busy();

    ui.heading("Accounts");
    ui.add_space(4.0);

    let mut remove = None;
    for (i, account) in state.accounts.iter().enumerate() {
        ui.horizontal(|ui| {
            let provider = ImapProvider::from_email(&account.email);
            ui.label(format!("{} ({})", account.email, provider.name));
            if ui.add_enabled(!busy, egui::Button::new("✖")).clicked() {
                remove = Some(i);
            }
        });
    }
    if let Some(i) = remove {
        state.accounts.remove(i);
    }

    ui.add_space(4.0);
    ui.label("Email");
    ui.add_enabled(!busy, egui::TextEdit::singleline(&mut state.email).hint_text("you@gmail.com"));

    ui.add_space(4.0);
    ui.label("App Password");
    ui.add_enabled(
        !busy,
        egui::TextEdit::singleline(&mut state.password)
            .password(true)
            .hint_text("app password"),
    );

    if state.email.contains('@') {
        let provider = ImapProvider::from_email(&state.email);
        ui.small(format!("Server: {}:{}", provider.host, provider.port));
    }

    ui.add_space(4.0);
    if ui
        .add_enabled(!busy && state.form_account().is_some(), egui::Button::new("Add Account"))
        .clicked()
    {
        state.add_form_account();
    }

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(4.0);

    ui.label("Folder (first account)");
    ui.add_enabled(!busy, egui::TextEdit::singleline(&mut state.folder).hint_text("INBOX"));

    ui.add_space(8.0);

    let accounts = state.accounts_to_open();
    let can_open = !busy && !accounts.is_empty() && !state.folder.trim().is_empty();
    if ui
        .add_enabled(can_open, egui::Button::new("Open Newest Message"))
        .clicked()
    {
        state.phase = AppPhase::Opening;
        state.error_message = None;
        state.author = None;
        state.buttons.clear();
        state.status_text.clear();

        let _ = cmd_tx.send(UiCommand::Open {
            accounts,
            folder: state.folder.trim().to_string(),
            page_size: state.page_size,
        });
    }
}
