use crate::bulk::collector::DeleteAction;
use crate::bulk::scope::ScopeSelection;
use crate::config::PopupConfig;
use crate::imap::ImapAccount;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppPhase {
    SignedOut,
    Opening,
    Ready,
    Deleting,
    Closing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonInfo {
    pub action: DeleteAction,
    pub detail: Option<String>,
    pub available: bool,
}

#[derive(Debug, Clone)]
pub struct AppState {
    // Credentials
    pub email: String,
    pub password: String,
    pub folder: String,
    pub accounts: Vec<ImapAccount>,

    // Settings
    pub selection: ScopeSelection,
    pub page_size: usize,
    pub close_delay: Duration,
    pub locale: String,

    // State
    pub phase: AppPhase,
    pub author: Option<String>,
    pub buttons: Vec<ButtonInfo>,
    pub status_text: String,
    pub close_at: Option<Instant>,

    // Errors
    pub error_message: Option<String>,
}

impl AppState {
    pub fn new(config: &PopupConfig) -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            folder: "INBOX".to_string(),
            accounts: Vec::new(),
            selection: config.selection,
            page_size: config.page_size,
            close_delay: config.close_delay,
            locale: config.locale.clone(),
            phase: AppPhase::SignedOut,
            author: None,
            buttons: Vec::new(),
            status_text: String::new(),
            close_at: None,
            error_message: None,
        }
    }

    pub fn busy(&self) -> bool {
        matches!(
            self.phase,
            AppPhase::Opening | AppPhase::Deleting | AppPhase::Closing
        )
    }

    pub fn form_account(&self) -> Option<ImapAccount> {
        if !self.email.contains('@') || self.password.is_empty() {
            return None;
        }
        Some(ImapAccount {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    pub fn add_form_account(&mut self) -> bool {
        let Some(account) = self.form_account() else {
            return false;
        };
        if self.accounts.iter().any(|a| a.email == account.email) {
            return false;
        }
        self.accounts.push(account);
        self.email.clear();
        self.password.clear();
        true
    }

    pub fn accounts_to_open(&self) -> Vec<ImapAccount> {
        let mut accounts = self.accounts.clone();
        if let Some(account) = self.form_account() {
            if !accounts.iter().any(|a| a.email == account.email) {
                accounts.push(account);
            }
        }
        accounts
    }
}
