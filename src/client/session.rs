//! Persistent bearer-token storage, one slot per backend origin.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use reqwest::Url;
use tracing::{debug, warn};

use crate::client::error::ClientError;

/// Fixed key the token lives under.
pub const TOKEN_KEY: &str = "access_token";

/// Where the client keeps its bearer token between runs. Validity is only
/// ever decided by the backend.
pub trait SessionStore: Send + Sync {
    fn save(&self, token: &str) -> Result<(), ClientError>;
    fn read(&self) -> Option<String>;
    fn clear(&self);
}

/// Keeps the token for the lifetime of the process only.
#[derive(Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, token: &str) -> Result<(), ClientError> {
        *self.token.lock().unwrap_or_else(|p| p.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn read(&self) -> Option<String> {
        self.token.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn clear(&self) {
        *self.token.lock().unwrap_or_else(|p| p.into_inner()) = None;
    }
}

/// JSON key/value file named after the backend origin, the on-disk
/// counterpart of browser local storage.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `backend_url` inside `dir`, e.g. `https_studio.example_443.json`.
    pub fn for_origin(dir: impl AsRef<Path>, backend_url: &str) -> Result<Self, ClientError> {
        let url = Url::parse(backend_url)
            .map_err(|e| ClientError::Storage(format!("invalid backend url: {e}")))?;
        Ok(Self::new(dir.as_ref().join(origin_file_name(&url))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return BTreeMap::new(),
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring corrupt session file");
            BTreeMap::new()
        })
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> Result<(), ClientError> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                    Err(ClientError::Storage(e.to_string()))
                }
                _ => Ok(()),
            };
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ClientError::Storage(e.to_string()))?;
        }
        let body =
            serde_json::to_vec_pretty(entries).map_err(|e| ClientError::Storage(e.to_string()))?;
        // write-then-rename so a crash never leaves half a file behind
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|e| ClientError::Storage(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| ClientError::Storage(e.to_string()))
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, token: &str) -> Result<(), ClientError> {
        let mut entries = self.load();
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.store(&entries)?;
        debug!(path = %self.path.display(), "session token saved");
        Ok(())
    }

    fn read(&self) -> Option<String> {
        self.load().remove(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    fn clear(&self) {
        let mut entries = self.load();
        if entries.remove(TOKEN_KEY).is_none() {
            return;
        }
        if let Err(e) = self.store(&entries) {
            warn!(path = %self.path.display(), error = %e, "failed to clear session token");
        }
    }
}

fn origin_file_name(url: &Url) -> String {
    let host = url.host_str().unwrap_or("local");
    let port = url.port_or_known_default().unwrap_or(0);
    let safe: String = format!("{}_{}_{}", url.scheme(), host, port)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '_' { c } else { '_' })
        .collect();
    format!("{safe}.json")
}
