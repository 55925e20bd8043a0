//! Credential storage and import: the domain-keyed cookie jar the gateway
//! uses to authenticate to web backends on the caller's behalf.

mod browser;
mod importer;
mod store;

pub use browser::{
    import_chromium_db, import_firefox_db, import_safari_file, BrowserCookieImporter,
};
pub use importer::CredentialImporter;
pub use store::{cookie_header, Credential, CredentialStore};
