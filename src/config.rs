use crate::bulk::scope::{Scope, ScopeSelection};
use std::time::Duration;

pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupConfig {
    pub selection: ScopeSelection,
    pub page_size: usize,
    pub close_delay: Duration,
    pub locale: String,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            selection: ScopeSelection::default(),
            page_size: DEFAULT_PAGE_SIZE,
            close_delay: DEFAULT_CLOSE_DELAY,
            locale: "en".to_string(),
        }
    }
}

impl PopupConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = var("BULK_DELETE_SCOPE") {
            match raw.parse::<Scope>() {
                Ok(scope) => config.selection.scope = scope,
                Err(e) => tracing::warn!("Ignoring BULK_DELETE_SCOPE: {}", e),
            }
        }
        if let Some(flag) = var("BULK_DELETE_INCLUDE_TRASH").and_then(|v| parse_flag(&v)) {
            config.selection.include_trash = flag;
        }
        if let Some(flag) = var("BULK_DELETE_INCLUDE_SPAM").and_then(|v| parse_flag(&v)) {
            config.selection.include_spam = flag;
        }
        if let Some(size) = var("BULK_DELETE_PAGE_SIZE").and_then(|v| v.trim().parse::<usize>().ok()) {
            config.page_size = size.max(1);
        }
        if let Some(ms) = var("BULK_DELETE_CLOSE_DELAY_MS").and_then(|v| v.trim().parse::<u64>().ok()) {
            config.close_delay = Duration::from_millis(ms);
        }
        if let Some(locale) = var("LANG").filter(|l| !l.is_empty() && l != "C") {
            config.locale = locale;
        }
        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            tracing::warn!("Ignoring invalid flag value: {}", other);
            None
        }
    }
}
