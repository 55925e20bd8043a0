use super::store::Credential;
use std::future::Future;
use std::pin::Pin;

/// Strategy that produces session credentials for a (browser, domain) pair.
///
/// The gateway does not know or care how the credentials are obtained —
/// local cookie-file reads are just the default strategy. Every "not found"
/// condition (unknown browser, missing profile, missing cookie database, no
/// matching entries) is a normal operating state and must come back as
/// `Ok(vec![])`, never as an error; only structurally-fatal conditions
/// (an unreadable or corrupt source) propagate as `Err`.
pub trait CredentialImporter: Send + Sync {
    /// Importer identifier for logs (e.g. "browser").
    fn name(&self) -> &str;

    fn import<'a>(
        &'a self,
        browser: &'a str,
        domain: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Vec<Credential>>> + Send + 'a>>;
}

#[cfg(test)]
pub(crate) struct StaticImporter {
    pub credentials: Vec<Credential>,
}

#[cfg(test)]
impl CredentialImporter for StaticImporter {
    fn name(&self) -> &str {
        "static"
    }

    fn import<'a>(
        &'a self,
        _browser: &'a str,
        _domain: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Vec<Credential>>> + Send + 'a>> {
        Box::pin(async move { Ok(self.credentials.clone()) })
    }
}
