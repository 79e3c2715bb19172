use crate::error::BulkDeleteError;
use regex::Regex;
use std::sync::LazyLock;

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^("?([^"]+)"?\s+)?<?([A-Za-z0-9_.%+-]+)@([A-Za-z0-9_.-]+\.[a-zA-Z]{2,})>?$"#)
        .unwrap()
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressComponents {
    pub name: String,
    pub sender: String,
    pub domain: String,
}

impl AddressComponents {
    pub fn from_author(author: &str) -> Self {
        match parse_author(author) {
            Ok(parts) => {
                tracing::info!(
                    "Parsed: Name: {}, Sender: {}, Domain: {}",
                    parts.name,
                    parts.sender,
                    parts.domain
                );
                parts
            }
            Err(e) => {
                tracing::error!("{}", e);
                Self::default()
            }
        }
    }

    pub fn address(&self) -> Option<String> {
        if self.sender.is_empty() || self.domain.is_empty() {
            return None;
        }
        Some(format!("{}@{}", self.sender, self.domain))
    }
}

pub fn parse_author(author: &str) -> Result<AddressComponents, BulkDeleteError> {
    let caps = ADDRESS_RE
        .captures(author)
        .ok_or_else(|| BulkDeleteError::InvalidAddressFormat(author.to_string()))?;
    let group = |i: usize| caps.get(i).map(|m| m.as_str().to_string()).unwrap_or_default();
    Ok(AddressComponents {
        name: group(2),
        sender: group(3),
        domain: group(4),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_display_name() {
        let parts = parse_author("\"Jane Doe\" <jane@example.com>").unwrap();
        assert_eq!(
            parts,
            AddressComponents {
                name: "Jane Doe".into(),
                sender: "jane".into(),
                domain: "example.com".into(),
            }
        );
    }

    #[test]
    fn parses_bare_address() {
        let parts = parse_author("jane@example.com").unwrap();
        assert_eq!(parts.name, "");
        assert_eq!(parts.sender, "jane");
        assert_eq!(parts.domain, "example.com");
    }

    #[test]
    fn parses_unquoted_name_and_keeps_case() {
        let parts = parse_author("Billing Team <Billing.Dept+eu@Mail.Shop-Example.CO.uk>").unwrap();
        assert_eq!(parts.name, "Billing Team");
        assert_eq!(parts.sender, "Billing.Dept+eu");
        assert_eq!(parts.domain, "Mail.Shop-Example.CO.uk");
        assert_eq!(
            parts.address().as_deref(),
            Some("Billing.Dept+eu@Mail.Shop-Example.CO.uk")
        );
    }

    #[test]
    fn rejects_text_without_address() {
        assert_eq!(
            parse_author("not an email"),
            Err(BulkDeleteError::InvalidAddressFormat("not an email".into()))
        );
        let parts = AddressComponents::from_author("not an email");
        assert_eq!(parts, AddressComponents::default());
        assert_eq!(parts.address(), None);
    }

    #[test]
    fn rejects_single_letter_top_level_domain() {
        assert!(parse_author("jane@example.c").is_err());
    }
}
