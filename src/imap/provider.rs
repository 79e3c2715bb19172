#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImapProvider {
    pub name: &'static str,
    pub host: &'static str,
    pub port: u16,
}

impl ImapProvider {
    pub fn from_email(email: &str) -> Self {
        let domain = email
            .rsplit('@')
            .next()
            .unwrap_or("")
            .to_lowercase();

        if domain.contains("outlook") || domain.contains("hotmail") || domain.contains("live.com")
        {
            Self {
                name: "Outlook",
                host: "imap-mail.outlook.com",
                port: 993,
            }
        } else if domain.contains("yahoo") {
            Self {
                name: "Yahoo",
                host: "imap.mail.yahoo.com",
                port: 993,
            }
        } else if domain.contains("icloud") || domain.contains("me.com") || domain.contains("mac.com") {
            Self {
                name: "iCloud",
                host: "imap.mail.me.com",
                port: 993,
            }
        } else {
            // Default: Gmail
            Self {
                name: "Gmail",
                host: "imap.gmail.com",
                port: 993,
            }
        }
    }
}
