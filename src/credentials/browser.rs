//! Default credential-import strategies: reading browser cookie stores.
//!
//! Firefox and the Chromium family keep their cookie jars in SQLite files
//! that stay locked while the browser runs, so every read copies the
//! database to a scratch path first. Safari uses its own binary cookie
//! archive (`Cookies.binarycookies`), parsed directly. Chromium encrypts
//! cookie values at rest on most platforms; like the plaintext `value`
//! column it reads, encrypted entries import as empty strings.

use super::importer::CredentialImporter;
use super::store::Credential;
use directories::UserDirs;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, Row, SqliteConnection};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::{env, fs};
use tracing::warn;

const FIREFOX_QUERY: &str = "SELECT name, value, host, path, expiry, isSecure, isHttpOnly \
     FROM moz_cookies WHERE host LIKE ?";

const CHROMIUM_QUERY: &str = "SELECT name, value, host_key, path, expires_utc, is_secure, is_httponly \
     FROM cookies WHERE host_key LIKE ?";

/// Chromium stores timestamps as microseconds since 1601-01-01.
const WEBKIT_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;

/// Safari stores timestamps as seconds since 2001-01-01.
const MAC_EPOCH_OFFSET_SECS: i64 = 978_307_200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Browser {
    Firefox,
    Chrome,
    Edge,
    Safari,
}

impl Browser {
    fn parse(id: &str) -> Option<Self> {
        match id.to_ascii_lowercase().as_str() {
            "firefox" => Some(Self::Firefox),
            "chrome" => Some(Self::Chrome),
            "edge" => Some(Self::Edge),
            "safari" => Some(Self::Safari),
            _ => None,
        }
    }
}

/// Importer that reads the local browser's cookie database.
pub struct BrowserCookieImporter;

impl CredentialImporter for BrowserCookieImporter {
    fn name(&self) -> &str {
        "browser"
    }

    fn import<'a>(
        &'a self,
        browser: &'a str,
        domain: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Vec<Credential>>> + Send + 'a>> {
        Box::pin(async move {
            let Some(browser) = Browser::parse(browser) else {
                warn!(browser, "unsupported browser; importing nothing");
                return Ok(Vec::new());
            };

            let Some(db) = cookie_db_path(browser) else {
                warn!(browser = ?browser, "browser cookie database not found");
                return Ok(Vec::new());
            };

            match browser {
                Browser::Firefox => import_firefox_db(&db, domain).await,
                Browser::Chrome | Browser::Edge => import_chromium_db(&db, domain).await,
                Browser::Safari => import_safari_file(&db, domain),
            }
        })
    }
}

/// Read a Firefox `cookies.sqlite` for entries whose host contains `domain`.
pub async fn import_firefox_db(db: &Path, domain: &str) -> anyhow::Result<Vec<Credential>> {
    let rows = query_db(db, FIREFOX_QUERY, domain).await?;
    rows.iter()
        .map(|row| {
            let expiry: i64 = row.try_get("expiry")?;
            Ok(Credential {
                name: row.try_get("name")?,
                value: row.try_get("value")?,
                domain: row.try_get("host")?,
                path: row.try_get("path")?,
                expires: (expiry != 0).then_some(expiry),
                secure: row.try_get::<i64, _>("isSecure")? != 0,
                http_only: row.try_get::<i64, _>("isHttpOnly")? != 0,
            })
        })
        .collect()
}

/// Read a Chromium-family `Cookies` database (Chrome, Edge).
pub async fn import_chromium_db(db: &Path, domain: &str) -> anyhow::Result<Vec<Credential>> {
    let rows = query_db(db, CHROMIUM_QUERY, domain).await?;
    rows.iter()
        .map(|row| {
            let expires_utc: i64 = row.try_get("expires_utc")?;
            Ok(Credential {
                name: row.try_get("name")?,
                value: row.try_get("value")?,
                domain: row.try_get("host_key")?,
                path: row.try_get("path")?,
                expires: webkit_micros_to_epoch(expires_utc),
                secure: row.try_get::<i64, _>("is_secure")? != 0,
                http_only: row.try_get::<i64, _>("is_httponly")? != 0,
            })
        })
        .collect()
}

/// Read a Safari `Cookies.binarycookies` archive for entries whose domain
/// contains `domain`. The archive is a plain read (no browser-held sqlite
/// lock), so no scratch copy is taken.
pub fn import_safari_file(file: &Path, domain: &str) -> anyhow::Result<Vec<Credential>> {
    if !file.exists() {
        warn!(file = %file.display(), "cookie archive missing; importing nothing");
        return Ok(Vec::new());
    }
    let raw = fs::read(file)?;
    parse_binarycookies(&raw, domain)
}

// binarycookies layout: "cook" magic, big-endian page count and page
// sizes, then pages. Within a page everything is little-endian: a
// 0x00000100 tag, cookie count, per-cookie offsets relative to the page.
// Each cookie record carries flags (bit 0 secure, bit 2 httpOnly),
// string offsets relative to the record, and f64 timestamps on the Mac
// epoch. Trailing file bytes (checksum, policy plist) are ignored.
fn parse_binarycookies(raw: &[u8], domain: &str) -> anyhow::Result<Vec<Credential>> {
    anyhow::ensure!(
        raw.len() >= 8 && &raw[..4] == b"cook",
        "not a binarycookies archive"
    );
    let page_count = read_u32_be(raw, 4)? as usize;
    let mut page_start = 8 + page_count * 4;
    let mut credentials = Vec::new();

    for page_index in 0..page_count {
        let page_size = read_u32_be(raw, 8 + page_index * 4)? as usize;
        let page = raw
            .get(page_start..page_start + page_size)
            .ok_or_else(|| anyhow::anyhow!("truncated cookie page"))?;
        parse_cookie_page(page, domain, &mut credentials)?;
        page_start += page_size;
    }
    Ok(credentials)
}

fn parse_cookie_page(
    page: &[u8],
    domain: &str,
    out: &mut Vec<Credential>,
) -> anyhow::Result<()> {
    let count = read_u32_le(page, 4)? as usize;
    for index in 0..count {
        let offset = read_u32_le(page, 8 + index * 4)? as usize;
        let record = page
            .get(offset..)
            .ok_or_else(|| anyhow::anyhow!("cookie offset past page end"))?;
        let credential = parse_cookie_record(record)?;
        if credential.domain.contains(domain) {
            out.push(credential);
        }
    }
    Ok(())
}

fn parse_cookie_record(record: &[u8]) -> anyhow::Result<Credential> {
    let flags = read_u32_le(record, 8)?;
    let domain_offset = read_u32_le(record, 16)? as usize;
    let name_offset = read_u32_le(record, 20)? as usize;
    let path_offset = read_u32_le(record, 24)? as usize;
    let value_offset = read_u32_le(record, 28)? as usize;
    let expiry = read_f64_le(record, 40)?;

    Ok(Credential {
        name: c_string_at(record, name_offset)?,
        value: c_string_at(record, value_offset)?,
        domain: c_string_at(record, domain_offset)?,
        path: c_string_at(record, path_offset)?,
        expires: mac_secs_to_epoch(expiry),
        secure: flags & 0x1 != 0,
        http_only: flags & 0x4 != 0,
    })
}

fn read_u32_be(raw: &[u8], at: usize) -> anyhow::Result<u32> {
    let bytes = raw
        .get(at..at + 4)
        .ok_or_else(|| anyhow::anyhow!("truncated field at {at}"))?;
    Ok(u32::from_be_bytes(bytes.try_into()?))
}

fn read_u32_le(raw: &[u8], at: usize) -> anyhow::Result<u32> {
    let bytes = raw
        .get(at..at + 4)
        .ok_or_else(|| anyhow::anyhow!("truncated field at {at}"))?;
    Ok(u32::from_le_bytes(bytes.try_into()?))
}

fn read_f64_le(raw: &[u8], at: usize) -> anyhow::Result<f64> {
    let bytes = raw
        .get(at..at + 8)
        .ok_or_else(|| anyhow::anyhow!("truncated field at {at}"))?;
    Ok(f64::from_le_bytes(bytes.try_into()?))
}

fn c_string_at(record: &[u8], at: usize) -> anyhow::Result<String> {
    let tail = record
        .get(at..)
        .ok_or_else(|| anyhow::anyhow!("string offset past record end"))?;
    let end = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| anyhow::anyhow!("unterminated string in cookie record"))?;
    Ok(String::from_utf8_lossy(&tail[..end]).into_owned())
}

/// Convert a Safari expiry to epoch seconds; a non-positive value means a
/// session cookie.
fn mac_secs_to_epoch(secs: f64) -> Option<i64> {
    if secs <= 0.0 {
        return None;
    }
    Some(secs as i64 + MAC_EPOCH_OFFSET_SECS)
}

async fn query_db(
    db: &Path,
    query: &str,
    domain: &str,
) -> anyhow::Result<Vec<sqlx::sqlite::SqliteRow>> {
    if !db.exists() {
        warn!(db = %db.display(), "cookie database missing; importing nothing");
        return Ok(Vec::new());
    }

    // The browser holds a lock on the live file; always read a copy.
    let scratch = ScratchCopy::of(db)?;
    let options = SqliteConnectOptions::new()
        .filename(scratch.path())
        .read_only(true);
    let mut conn = SqliteConnection::connect_with(&options).await?;
    let rows = sqlx::query(query)
        .bind(format!("%{domain}%"))
        .fetch_all(&mut conn)
        .await?;
    conn.close().await.ok();
    Ok(rows)
}

/// Convert a Chromium `expires_utc` value to epoch seconds; 0 means a
/// session cookie.
fn webkit_micros_to_epoch(expires_utc: i64) -> Option<i64> {
    if expires_utc == 0 {
        return None;
    }
    Some(expires_utc / 1_000_000 - WEBKIT_EPOCH_OFFSET_SECS)
}

// ─── Profile discovery ───────────────────────────────────────────────────────

fn cookie_db_path(browser: Browser) -> Option<PathBuf> {
    match browser {
        Browser::Firefox => {
            let profile = firefox_profile_dir()?;
            let db = profile.join("cookies.sqlite");
            db.exists().then_some(db)
        }
        Browser::Chrome | Browser::Edge => chromium_profile_dirs(browser)
            .into_iter()
            .flat_map(|profile| {
                // Modern Chromium keeps the jar under Network/; older
                // releases had it at the profile root.
                [profile.join("Network").join("Cookies"), profile.join("Cookies")]
            })
            .find(|candidate| candidate.exists()),
        Browser::Safari => safari_cookie_paths()
            .into_iter()
            .find(|candidate| candidate.exists()),
    }
}

fn safari_cookie_paths() -> Vec<PathBuf> {
    let Some(dirs) = UserDirs::new() else {
        return Vec::new();
    };
    let home = dirs.home_dir();
    vec![
        // Sandboxed Safari (modern macOS) and the classic location.
        home.join("Library")
            .join("Containers")
            .join("com.apple.Safari")
            .join("Data")
            .join("Library")
            .join("Cookies")
            .join("Cookies.binarycookies"),
        home.join("Library")
            .join("Cookies")
            .join("Cookies.binarycookies"),
    ]
}

fn firefox_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Some(dirs) = UserDirs::new() {
        let home = dirs.home_dir();
        roots.push(home.join(".mozilla").join("firefox"));
        roots.push(
            home.join("Library")
                .join("Application Support")
                .join("Firefox")
                .join("Profiles"),
        );
    }
    if let Ok(appdata) = env::var("APPDATA") {
        roots.push(
            PathBuf::from(appdata)
                .join("Mozilla")
                .join("Firefox")
                .join("Profiles"),
        );
    }
    roots
}

fn firefox_profile_dir() -> Option<PathBuf> {
    for root in firefox_roots() {
        if !root.exists() {
            continue;
        }

        // profiles.ini sits inside ~/.mozilla/firefox on Linux and next to
        // the Profiles directory elsewhere.
        for ini_dir in [Some(root.clone()), root.parent().map(Path::to_path_buf)]
            .into_iter()
            .flatten()
        {
            let ini = ini_dir.join("profiles.ini");
            if let Ok(contents) = fs::read_to_string(&ini) {
                if let Some(profile) = default_profile_from_ini(&contents) {
                    let resolved = if profile.is_relative {
                        ini_dir.join(&profile.path)
                    } else {
                        PathBuf::from(&profile.path)
                    };
                    if resolved.exists() {
                        return Some(resolved);
                    }
                }
            }
        }

        // No usable profiles.ini: fall back to the first *.default* dir.
        if let Ok(entries) = fs::read_dir(&root) {
            for entry in entries.flatten() {
                let path = entry.path();
                let name = entry.file_name();
                if path.is_dir() && name.to_string_lossy().contains(".default") {
                    return Some(path);
                }
            }
        }
    }
    None
}

struct IniProfile {
    path: String,
    is_relative: bool,
    is_default: bool,
}

fn parse_profiles_ini(contents: &str) -> Vec<IniProfile> {
    let mut profiles = Vec::new();
    let mut current: Option<IniProfile> = None;

    for line in contents.lines() {
        let line = line.trim();
        if line.starts_with("[Profile") {
            if let Some(profile) = current.take() {
                profiles.push(profile);
            }
            current = Some(IniProfile {
                path: String::new(),
                is_relative: true,
                is_default: false,
            });
        } else if line.starts_with('[') {
            if let Some(profile) = current.take() {
                profiles.push(profile);
            }
        } else if let Some((key, value)) = line.split_once('=') {
            if let Some(profile) = current.as_mut() {
                match key.trim() {
                    "Path" => profile.path = value.trim().to_string(),
                    "IsRelative" => profile.is_relative = value.trim() == "1",
                    "Default" => profile.is_default = value.trim() == "1",
                    _ => {}
                }
            }
        }
    }
    if let Some(profile) = current.take() {
        profiles.push(profile);
    }
    profiles.retain(|p| !p.path.is_empty());
    profiles
}

fn default_profile_from_ini(contents: &str) -> Option<IniProfile> {
    let mut profiles = parse_profiles_ini(contents);
    if let Some(index) = profiles.iter().position(|p| p.is_default) {
        return Some(profiles.swap_remove(index));
    }
    profiles.into_iter().next()
}

fn chromium_profile_dirs(browser: Browser) -> Vec<PathBuf> {
    let vendor = |home: &Path| -> Vec<PathBuf> {
        match browser {
            Browser::Chrome => vec![
                home.join(".config").join("google-chrome").join("Default"),
                home.join("Library")
                    .join("Application Support")
                    .join("Google")
                    .join("Chrome")
                    .join("Default"),
            ],
            Browser::Edge => vec![
                home.join(".config").join("microsoft-edge").join("Default"),
                home.join("Library")
                    .join("Application Support")
                    .join("Microsoft Edge")
                    .join("Default"),
            ],
            Browser::Firefox | Browser::Safari => Vec::new(),
        }
    };

    let mut dirs = UserDirs::new()
        .map(|u| vendor(u.home_dir()))
        .unwrap_or_default();

    if let Ok(local) = env::var("LOCALAPPDATA") {
        let base = PathBuf::from(local);
        let windows = match browser {
            Browser::Chrome => base.join("Google").join("Chrome"),
            Browser::Edge => base.join("Microsoft").join("Edge"),
            Browser::Firefox | Browser::Safari => return dirs,
        };
        dirs.push(windows.join("User Data").join("Default"));
    }
    dirs
}

// ─── Scratch copy ────────────────────────────────────────────────────────────

struct ScratchCopy {
    path: PathBuf,
}

impl ScratchCopy {
    fn of(db: &Path) -> std::io::Result<Self> {
        let path = env::temp_dir().join(format!("ferrygate-{}.sqlite", uuid::Uuid::new_v4()));
        fs::copy(db, &path)?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchCopy {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn firefox_fixture(dir: &Path) -> PathBuf {
        let db = dir.join("cookies.sqlite");
        let conn = rusqlite::Connection::open(&db).unwrap();
        conn.execute_batch(
            "CREATE TABLE moz_cookies (
                 name TEXT, value TEXT, host TEXT, path TEXT,
                 expiry INTEGER, isSecure INTEGER, isHttpOnly INTEGER
             );
             INSERT INTO moz_cookies VALUES
                 ('session', 'abc', '.chat.example.com', '/', 1900000000, 1, 1),
                 ('pref', 'dark', '.chat.example.com', '/', 0, 0, 0),
                 ('other', 'zzz', '.unrelated.net', '/', 1900000000, 0, 0);",
        )
        .unwrap();
        db
    }

    fn chromium_fixture(dir: &Path) -> PathBuf {
        let db = dir.join("Cookies");
        let conn = rusqlite::Connection::open(&db).unwrap();
        conn.execute_batch(
            "CREATE TABLE cookies (
                 name TEXT, value TEXT, host_key TEXT, path TEXT,
                 expires_utc INTEGER, is_secure INTEGER, is_httponly INTEGER
             );
             INSERT INTO cookies VALUES
                 ('token', 'v1', '.chat.example.com', '/', 13544473600000000, 1, 0);",
        )
        .unwrap();
        db
    }

    #[tokio::test]
    async fn firefox_import_filters_by_domain() {
        let dir = tempfile::tempdir().unwrap();
        let db = firefox_fixture(dir.path());

        let creds = import_firefox_db(&db, "chat.example.com").await.unwrap();
        assert_eq!(creds.len(), 2);
        assert!(creds.iter().all(|c| c.domain.contains("chat.example.com")));
    }

    #[tokio::test]
    async fn firefox_import_maps_flags_and_session_expiry() {
        let dir = tempfile::tempdir().unwrap();
        let db = firefox_fixture(dir.path());

        let creds = import_firefox_db(&db, "chat.example.com").await.unwrap();
        let session = creds.iter().find(|c| c.name == "session").unwrap();
        assert!(session.secure && session.http_only);
        assert_eq!(session.expires, Some(1_900_000_000));

        let pref = creds.iter().find(|c| c.name == "pref").unwrap();
        assert!(pref.expires.is_none());
    }

    #[tokio::test]
    async fn chromium_import_converts_webkit_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let db = chromium_fixture(dir.path());

        let creds = import_chromium_db(&db, "chat.example.com").await.unwrap();
        assert_eq!(creds.len(), 1);
        assert_eq!(creds[0].expires, Some(1_900_000_000));
        assert!(creds[0].secure);
        assert!(!creds[0].http_only);
    }

    #[tokio::test]
    async fn missing_database_imports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let creds = import_firefox_db(&dir.path().join("absent.sqlite"), "x.com")
            .await
            .unwrap();
        assert!(creds.is_empty());
    }

    #[tokio::test]
    async fn corrupt_database_is_a_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("cookies.sqlite");
        fs::write(&db, "this is not sqlite").unwrap();
        assert!(import_firefox_db(&db, "x.com").await.is_err());
    }

    #[tokio::test]
    async fn unknown_browser_imports_nothing() {
        let importer = BrowserCookieImporter;
        let creds = importer.import("lynx", "example.com").await.unwrap();
        assert!(creds.is_empty());
    }

    fn binary_cookie_record(
        name: &str,
        value: &str,
        domain: &str,
        path: &str,
        flags: u32,
        expiry_mac: f64,
    ) -> Vec<u8> {
        let mut strings = Vec::new();
        let mut offsets = Vec::new();
        for s in [domain, name, path, value] {
            offsets.push(56 + strings.len() as u32);
            strings.extend_from_slice(s.as_bytes());
            strings.push(0);
        }
        let size = 56 + strings.len() as u32;

        let mut record = Vec::new();
        record.extend_from_slice(&size.to_le_bytes());
        record.extend_from_slice(&0u32.to_le_bytes());
        record.extend_from_slice(&flags.to_le_bytes());
        record.extend_from_slice(&0u32.to_le_bytes());
        for offset in offsets {
            record.extend_from_slice(&offset.to_le_bytes());
        }
        record.extend_from_slice(&[0u8; 8]);
        record.extend_from_slice(&expiry_mac.to_le_bytes());
        record.extend_from_slice(&0f64.to_le_bytes());
        record.extend_from_slice(&strings);
        record
    }

    fn binarycookies_fixture(records: &[Vec<u8>]) -> Vec<u8> {
        let header = 8 + records.len() * 4 + 4;
        let mut cookies = Vec::new();
        let mut offsets = Vec::new();
        for record in records {
            offsets.push((header + cookies.len()) as u32);
            cookies.extend_from_slice(record);
        }

        let mut page = Vec::new();
        page.extend_from_slice(&[0x00, 0x00, 0x01, 0x00]);
        page.extend_from_slice(&(records.len() as u32).to_le_bytes());
        for offset in offsets {
            page.extend_from_slice(&offset.to_le_bytes());
        }
        page.extend_from_slice(&0u32.to_le_bytes());
        page.extend_from_slice(&cookies);

        let mut file = Vec::new();
        file.extend_from_slice(b"cook");
        file.extend_from_slice(&1u32.to_be_bytes());
        file.extend_from_slice(&(page.len() as u32).to_be_bytes());
        file.extend_from_slice(&page);
        file.extend_from_slice(&[0u8; 8]);
        file
    }

    #[test]
    fn safari_parse_filters_by_domain() {
        let raw = binarycookies_fixture(&[
            binary_cookie_record("session", "abc", ".chat.example.com", "/", 0x5, 1.0e9),
            binary_cookie_record("other", "zzz", ".unrelated.net", "/", 0x0, 1.0e9),
        ]);
        let creds = parse_binarycookies(&raw, "chat.example.com").unwrap();
        assert_eq!(creds.len(), 1);
        assert_eq!(creds[0].name, "session");
        assert_eq!(creds[0].value, "abc");
        assert_eq!(creds[0].path, "/");
    }

    #[test]
    fn safari_parse_maps_flags_and_mac_epoch() {
        let expiry_mac = (1_900_000_000 - MAC_EPOCH_OFFSET_SECS) as f64;
        let raw = binarycookies_fixture(&[binary_cookie_record(
            "token",
            "v1",
            ".chat.example.com",
            "/",
            0x5,
            expiry_mac,
        )]);
        let creds = parse_binarycookies(&raw, "chat.example.com").unwrap();
        assert_eq!(creds[0].expires, Some(1_900_000_000));
        assert!(creds[0].secure);
        assert!(creds[0].http_only);
    }

    #[test]
    fn safari_zero_expiry_is_session() {
        let raw = binarycookies_fixture(&[binary_cookie_record(
            "s",
            "v",
            ".chat.example.com",
            "/",
            0x0,
            0.0,
        )]);
        let creds = parse_binarycookies(&raw, "chat.example.com").unwrap();
        assert!(creds[0].expires.is_none());
        assert!(!creds[0].secure && !creds[0].http_only);
    }

    #[test]
    fn safari_import_reads_archive_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Cookies.binarycookies");
        fs::write(
            &file,
            binarycookies_fixture(&[binary_cookie_record(
                "session",
                "abc",
                ".chat.example.com",
                "/",
                0x1,
                1.0e9,
            )]),
        )
        .unwrap();

        let creds = import_safari_file(&file, "chat.example.com").unwrap();
        assert_eq!(creds.len(), 1);
    }

    #[test]
    fn safari_missing_archive_imports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let creds = import_safari_file(&dir.path().join("absent"), "x.com").unwrap();
        assert!(creds.is_empty());
    }

    #[test]
    fn safari_corrupt_archive_is_a_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Cookies.binarycookies");
        fs::write(&file, "not an archive").unwrap();
        assert!(import_safari_file(&file, "x.com").is_err());
    }

    #[test]
    fn safari_browser_id_is_recognized() {
        assert_eq!(Browser::parse("safari"), Some(Browser::Safari));
        assert_eq!(Browser::parse("Safari"), Some(Browser::Safari));
    }

    #[test]
    fn webkit_zero_is_session() {
        assert!(webkit_micros_to_epoch(0).is_none());
        assert_eq!(
            webkit_micros_to_epoch(13_544_473_600_000_000),
            Some(1_900_000_000)
        );
    }

    #[test]
    fn profiles_ini_default_flag_wins() {
        let ini = concat!(
            "[Profile0]\n",
            "Name=scratch\n",
            "IsRelative=1\n",
            "Path=abc.scratch\n",
            "\n",
            "[Profile1]\n",
            "Name=default\n",
            "IsRelative=1\n",
            "Path=xyz.default-release\n",
            "Default=1\n",
        );
        let profile = default_profile_from_ini(ini).unwrap();
        assert_eq!(profile.path, "xyz.default-release");
        assert!(profile.is_relative);
    }

    #[test]
    fn profiles_ini_without_default_takes_first() {
        let ini = "[Profile0]\nPath=only.one\nIsRelative=1\n";
        let profile = default_profile_from_ini(ini).unwrap();
        assert_eq!(profile.path, "only.one");
    }

    #[test]
    fn profiles_ini_ignores_install_sections() {
        let ini = "[Install4F96D1932A9F858E]\nDefault=abc.default\n[Profile0]\nPath=p0\n";
        let profiles = parse_profiles_ini(ini);
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].path, "p0");
    }
}
