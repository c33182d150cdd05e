//! Bearer-token sources for authenticated transfers.
//!
//! Transfers never fail for lack of a token: any provider problem is logged
//! and the request goes out unauthenticated.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, instrument, warn};
use vellum_config::CredentialConfig;
use vellum_error::{CredentialError, CredentialErrorKind, JsonError, VellumResult};

/// Supplies the bearer token attached to each transfer.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Current token, if one is available.
    async fn bearer_token(&self) -> Option<String>;
}

/// Never supplies a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

#[async_trait]
impl CredentialProvider for NoCredentials {
    async fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// Always supplies the same token.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    /// Wraps a token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StaticToken").field(&"<redacted>").finish()
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone()).filter(|token| !token.is_empty())
    }
}

/// Persistent string key-value storage, the place a login flow leaves its session.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`.
    async fn get(&self, key: &str) -> VellumResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> VellumResult<()>;

    /// Deletes `key`. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> VellumResult<()>;
}

/// In-process store, mostly useful in tests and for embedding applications.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> VellumResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> VellumResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> VellumResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object of string values on disk.
///
/// A missing file reads as an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Uses the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> VellumResult<Map<String, Value>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(CredentialError::new(CredentialErrorKind::StoreRead(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
                .into());
            }
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(CredentialError::new(CredentialErrorKind::Malformed(format!(
                "{}: expected a JSON object",
                self.path.display()
            )))
            .into()),
            Err(e) => Err(CredentialError::new(CredentialErrorKind::Malformed(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
            .into()),
        }
    }

    async fn write_all(&self, map: Map<String, Value>) -> VellumResult<()> {
        let write_error = |e: std::io::Error| {
            CredentialError::new(CredentialErrorKind::StoreWrite(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }

        let contents = serde_json::to_string_pretty(&Value::Object(map)).map_err(JsonError::from)?;
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(write_error)?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> VellumResult<Option<String>> {
        let map = self.read_all().await?;
        Ok(map.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    async fn set(&self, key: &str, value: String) -> VellumResult<()> {
        let mut map = self.read_all().await?;
        map.insert(key.to_string(), Value::String(value));
        self.write_all(map).await?;
        debug!("Stored credential entry");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn remove(&self, key: &str) -> VellumResult<()> {
        let mut map = self.read_all().await?;
        if map.remove(key).is_some() {
            self.write_all(map).await?;
            debug!("Removed credential entry");
        }
        Ok(())
    }
}

/// Reads the token out of a serialized session object in a [`KeyValueStore`].
///
/// `token_field` may be a dotted path (`auth.token`) into nested objects.
#[derive(Debug, Clone)]
pub struct SessionCredentials<S> {
    store: S,
    session_key: String,
    token_field: String,
}

impl<S: KeyValueStore> SessionCredentials<S> {
    /// Reads `token_field` of the object stored under `session_key`.
    pub fn new(store: S, session_key: impl Into<String>, token_field: impl Into<String>) -> Self {
        Self {
            store,
            session_key: session_key.into(),
            token_field: token_field.into(),
        }
    }

    /// Uses the key layout from configuration.
    pub fn from_config(store: S, config: &CredentialConfig) -> Self {
        Self::new(store, config.session_key.clone(), config.token_field.clone())
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Saves a session object holding `token` under the configured key.
    pub async fn save_token(&self, token: &str) -> VellumResult<()> {
        let mut session = Value::String(token.to_string());
        for segment in self.token_field.rsplit('.') {
            let mut map = Map::new();
            map.insert(segment.to_string(), session);
            session = Value::Object(map);
        }
        self.store
            .set(&self.session_key, serde_json::to_string(&session).map_err(JsonError::from)?)
            .await
    }

    /// Deletes the stored session.
    pub async fn clear(&self) -> VellumResult<()> {
        self.store.remove(&self.session_key).await
    }

    fn token_pointer(&self) -> String {
        format!("/{}", self.token_field.replace('.', "/"))
    }
}

#[async_trait]
impl<S: KeyValueStore> CredentialProvider for SessionCredentials<S> {
    async fn bearer_token(&self) -> Option<String> {
        let raw = match self.store.get(&self.session_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.session_key, "No stored session");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Credential store unavailable, sending without token");
                return None;
            }
        };

        let session: Value = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(e) => {
                warn!(key = %self.session_key, error = %e, "Stored session is not JSON");
                return None;
            }
        };

        session
            .pointer(&self.token_pointer())
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    }
}
