pub mod deleter;
pub mod host;
pub mod provider;
pub mod scanner;

use crate::error::HostError;
use provider::ImapProvider;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

pub type ImapSession =
    async_imap::Session<async_native_tls::TlsStream<async_std::net::TcpStream>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImapAccount {
    pub email: String,
    pub password: String,
}

pub async fn connect_imap(account: &ImapAccount) -> Result<ImapSession, HostError> {
    let provider = ImapProvider::from_email(&account.email);
    let tls = async_native_tls::TlsConnector::new();
    let tcp = async_std::future::timeout(
        CONNECT_TIMEOUT,
        async_std::net::TcpStream::connect((provider.host, provider.port)),
    )
    .await
    .map_err(|_| HostError::Connection("TCP connect timed out after 30s".to_string()))?
    .map_err(|e| HostError::Connection(e.to_string()))?;

    let tls_stream = tls
        .connect(provider.host, tcp)
        .await
        .map_err(|e| HostError::Tls(e.to_string()))?;

    let client = async_imap::Client::new(tls_stream);
    client
        .login(&account.email, &account.password)
        .await
        .map_err(|(e, _)| HostError::Auth(e.to_string()))
}

pub fn uid_set(uids: &[u32]) -> String {
    uids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub async fn logout(mut session: ImapSession, context: &str) {
    if let Err(e) = session.logout().await {
        tracing::warn!("Failed to logout after {}: {}", context, e);
    }
}
