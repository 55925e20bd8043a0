//! Command-line interface: `serve` runs the gateway, `cookies` manages
//! the credential store.

use crate::backend::BackendKind;
use crate::config::{self, FileConfig};
use crate::credentials::{BrowserCookieImporter, CredentialImporter, CredentialStore};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "ferrygate", version, about = "OpenAI-compatible gateway for cookie-authenticated AI backends")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the gateway server.
    Serve {
        /// Backend family: ai-gateway or chatgpt-adapter.
        #[arg(long, value_parser = BackendKind::from_str)]
        backend: Option<BackendKind>,

        /// Backend base URL, overriding the family default.
        #[arg(long)]
        backend_url: Option<String>,

        /// Listen address.
        #[arg(long)]
        host: Option<String>,

        /// Listen port.
        #[arg(long)]
        port: Option<u16>,

        /// Path to the cookie store JSON document.
        #[arg(long)]
        cookie_store: Option<String>,

        /// Disable credential injection entirely.
        #[arg(long)]
        no_cookies: bool,

        /// Config file path (default: ~/.ferrygate/config.toml).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Inspect and manage stored backend cookies.
    Cookies {
        #[command(subcommand)]
        command: CookieCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum CookieCommand {
    /// Import cookies for a domain from a local browser profile.
    Import {
        /// Browser to read from: firefox, chrome, edge, or safari.
        browser: String,

        /// Domain to collect cookies for (substring match in the browser
        /// database, exact key in the store).
        domain: String,

        /// Path to the cookie store JSON document.
        #[arg(long)]
        cookie_store: Option<String>,
    },

    /// Remove stored cookies, for one domain or all of them.
    Clear {
        /// Domain to clear; omit to empty the whole store.
        domain: Option<String>,

        #[arg(long)]
        cookie_store: Option<String>,
    },

    /// List stored domains and their cookies.
    List {
        #[arg(long)]
        cookie_store: Option<String>,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve {
            backend,
            backend_url,
            host,
            port,
            cookie_store,
            no_cookies,
            config,
        } => run_serve(backend, backend_url, host, port, cookie_store, no_cookies, config).await,
        Command::Cookies { command } => run_cookies(command).await,
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_serve(
    backend: Option<BackendKind>,
    backend_url: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    cookie_store: Option<String>,
    no_cookies: bool,
    config: Option<PathBuf>,
) -> Result<()> {
    let config_path = config.unwrap_or_else(config::default_config_path);
    let file = FileConfig::load(&config_path)?;
    let gateway = file.into_gateway_config(backend, backend_url, host, port, cookie_store, no_cookies);

    println!("ferrygate — http://{}:{}", gateway.host, gateway.port);
    println!("  backend: {} ({})", gateway.backend.id(), gateway.base_url());
    println!("  GET  /v1/models");
    println!("  POST /v1/chat/completions");
    println!("  POST /v1/embeddings");

    crate::server::run(gateway).await
}

fn open_store(cookie_store: Option<String>) -> Result<CredentialStore> {
    let path = cookie_store
        .map(|raw| config::expand_path(&raw))
        .unwrap_or_else(config::default_cookie_store);
    CredentialStore::load(&path)
        .with_context(|| format!("failed to open cookie store {}", path.display()))
}

fn render_expiry(expires: Option<i64>) -> String {
    match expires.and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)) {
        Some(when) => when.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "session".to_string(),
    }
}

async fn run_cookies(command: CookieCommand) -> Result<()> {
    match command {
        CookieCommand::Import {
            browser,
            domain,
            cookie_store,
        } => {
            let store = open_store(cookie_store)?;
            let importer = BrowserCookieImporter;
            let credentials = importer.import(&browser, &domain).await?;
            if credentials.is_empty() {
                // Absence of credentials is a normal state, not a failure.
                println!("no cookies found for '{domain}' in {browser}");
                return Ok(());
            }
            let count = credentials.len();
            store.put(&domain, credentials).await?;
            println!("imported {count} cookie(s) for {domain} into {}", store.path().display());
            Ok(())
        }
        CookieCommand::Clear {
            domain,
            cookie_store,
        } => {
            let store = open_store(cookie_store)?;
            store.clear(domain.as_deref()).await?;
            match domain {
                Some(domain) => println!("cleared cookies for {domain}"),
                None => println!("cleared all cookies"),
            }
            Ok(())
        }
        CookieCommand::List { cookie_store } => {
            let store = open_store(cookie_store)?;
            let summary = store.summary().await;
            if summary.is_empty() {
                println!("cookie store is empty ({})", store.path().display());
                return Ok(());
            }
            for (domain, count) in summary {
                println!("{domain} ({count} cookie(s))");
                for credential in store.get(&domain).await {
                    println!(
                        "  {} expires {}{}",
                        credential.name,
                        render_expiry(credential.expires),
                        if credential.http_only { " [httpOnly]" } else { "" },
                    );
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_with_overrides() {
        let cli = Cli::try_parse_from([
            "ferrygate",
            "serve",
            "--backend",
            "chatgpt-adapter",
            "--port",
            "9001",
            "--no-cookies",
        ])
        .unwrap();
        match cli.command {
            Command::Serve {
                backend,
                port,
                no_cookies,
                ..
            } => {
                assert_eq!(backend, Some(BackendKind::ChatgptAdapter));
                assert_eq!(port, Some(9001));
                assert!(no_cookies);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["ferrygate", "serve", "--backend", "cortex"]).is_err());
    }

    #[test]
    fn parses_cookie_import() {
        let cli = Cli::try_parse_from([
            "ferrygate",
            "cookies",
            "import",
            "firefox",
            "chat.example.com",
        ])
        .unwrap();
        match cli.command {
            Command::Cookies {
                command: CookieCommand::Import { browser, domain, .. },
            } => {
                assert_eq!(browser, "firefox");
                assert_eq!(domain, "chat.example.com");
            }
            _ => panic!("expected cookies import"),
        }
    }

    #[test]
    fn expired_and_session_cookies_render_distinctly() {
        assert_eq!(render_expiry(None), "session");
        assert!(render_expiry(Some(1_900_000_000)).contains("2030"));
    }

    #[tokio::test]
    async fn import_with_no_matches_succeeds_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("cookies.json");
        let result = run_cookies(CookieCommand::Import {
            browser: "lynx".into(),
            domain: "example.com".into(),
            cookie_store: Some(store_path.to_string_lossy().into_owned()),
        })
        .await;
        assert!(result.is_ok());
        assert!(!store_path.exists());
    }
}
