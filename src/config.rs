use crate::backend::BackendKind;
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Process-wide gateway configuration.
///
/// Built once at startup from the optional TOML file plus CLI overrides and
/// passed by `Arc` into the server; request handling never reads ambient
/// state.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub backend: BackendKind,
    /// Explicit backend base URL; beats the variant default when set.
    pub backend_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub cookie_store: PathBuf,
    /// When false, no credential store is attached and no `Cookie` header
    /// is ever injected.
    pub credentials_enabled: bool,
}

impl GatewayConfig {
    /// Effective base URL for the active backend.
    pub fn base_url(&self) -> &str {
        self.backend_url
            .as_deref()
            .unwrap_or_else(|| self.backend.default_base_url())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            backend_url: None,
            host: default_host(),
            port: default_port(),
            cookie_store: default_cookie_store(),
            credentials_enabled: true,
        }
    }
}

// ─── File layer ──────────────────────────────────────────────────────────────

/// On-disk shape of `~/.ferrygate/config.toml`. Every field optional; CLI
/// flags override whatever the file sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub backend: Option<BackendKind>,
    pub backend_url: Option<String>,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path to the cookie store JSON document; `~` is expanded.
    pub cookie_store: Option<String>,
    #[serde(default = "default_true")]
    pub use_cookies: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            backend: None,
            backend_url: None,
            host: default_host(),
            port: default_port(),
            cookie_store: None,
            use_cookies: true,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8000
}

fn default_true() -> bool {
    true
}

/// `~/.ferrygate`, the dot-directory holding config and the cookie store.
pub fn ferrygate_dir() -> PathBuf {
    UserDirs::new()
        .map(|u| u.home_dir().join(".ferrygate"))
        .unwrap_or_else(|| PathBuf::from(".ferrygate"))
}

pub fn default_config_path() -> PathBuf {
    ferrygate_dir().join("config.toml")
}

pub fn default_cookie_store() -> PathBuf {
    ferrygate_dir().join("cookies.json")
}

/// Expand `~` and env-style prefixes in a user-supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

impl FileConfig {
    /// Read the config file if it exists; a missing file is the defaults,
    /// a present-but-invalid file is an error (silent fallback would mask
    /// typos in a file the user deliberately wrote).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Fold in CLI overrides and produce the immutable process config.
    pub fn into_gateway_config(
        self,
        backend: Option<BackendKind>,
        backend_url: Option<String>,
        host: Option<String>,
        port: Option<u16>,
        cookie_store: Option<String>,
        no_cookies: bool,
    ) -> GatewayConfig {
        let store_path = cookie_store
            .or(self.cookie_store)
            .map(|raw| expand_path(&raw))
            .unwrap_or_else(default_cookie_store);

        GatewayConfig {
            backend: backend.or(self.backend).unwrap_or_default(),
            backend_url: backend_url.or(self.backend_url),
            host: host.unwrap_or(self.host),
            port: port.unwrap_or(self.port),
            cookie_store: store_path,
            credentials_enabled: !no_cookies && self.use_cookies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_loopback_8000() {
        let config = GatewayConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert!(config.credentials_enabled);
        assert_eq!(config.backend, BackendKind::AiGateway);
    }

    #[test]
    fn base_url_override_beats_variant_default() {
        let mut config = GatewayConfig::default();
        assert_eq!(config.base_url(), "http://localhost:8080");
        config.backend_url = Some("http://10.0.0.7:9999".into());
        assert_eq!(config.base_url(), "http://10.0.0.7:9999");
    }

    #[test]
    fn file_config_parses_partial_toml() {
        let parsed: FileConfig = toml::from_str(
            r#"
            backend = "chatgpt-adapter"
            port = 9000
            "#,
        )
        .unwrap();
        assert_eq!(parsed.backend, Some(BackendKind::ChatgptAdapter));
        assert_eq!(parsed.port, 9000);
        assert_eq!(parsed.host, "127.0.0.1");
        assert!(parsed.use_cookies);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = FileConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert!(loaded.backend.is_none());
        assert_eq!(loaded.port, 8000);
    }

    #[test]
    fn invalid_file_is_an_error_not_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "backend = 42").unwrap();
        assert!(FileConfig::load(&path).is_err());
    }

    #[test]
    fn cli_overrides_beat_file_values() {
        let file: FileConfig = toml::from_str("port = 9000\nuse_cookies = true").unwrap();
        let config = file.into_gateway_config(
            Some(BackendKind::ChatgptAdapter),
            Some("http://override:1".into()),
            None,
            Some(8123),
            None,
            true,
        );
        assert_eq!(config.backend, BackendKind::ChatgptAdapter);
        assert_eq!(config.port, 8123);
        assert_eq!(config.base_url(), "http://override:1");
        assert!(!config.credentials_enabled);
    }

    #[test]
    fn tilde_paths_are_expanded() {
        let expanded = expand_path("~/cookies.json");
        assert!(!expanded.to_string_lossy().starts_with('~'));
    }
}
