use crate::error::SecretError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{debug, trace};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Number of raw bytes the decoded secret must contain.
pub const SECRET_LEN: usize = 32;

/// The decoded shared key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SecretKey([u8; SECRET_LEN]);

impl SecretKey {
    pub fn as_bytes(&self) -> &[u8; SECRET_LEN] {
        &self.0
    }
}

impl From<[u8; SECRET_LEN]> for SecretKey {
    fn from(bytes: [u8; SECRET_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// Lazily loaded HMAC key backed by a base64 file.
///
/// The file may not exist when the proxy starts: another process generates it,
/// and that can take a while. Every call retries the load until one succeeds,
/// after which the cached key is returned without touching the filesystem.
#[derive(Debug)]
pub struct Secret {
    path: PathBuf,
    value: RwLock<Option<SecretKey>>,
}

impl Secret {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), value: RwLock::new(None) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the key, reading it from disk if it has not been loaded yet
    pub async fn value(&self) -> Result<SecretKey, SecretError> {
        if let Some(key) = *self.value.read().await {
            return Ok(key);
        }
        self.load().await
    }

    async fn load(&self) -> Result<SecretKey, SecretError> {
        trace!("Loading secret from {}", self.path.display());
        let contents = tokio::fs::read(&self.path).await.map_err(|source| SecretError::Read { path: self.path.clone(), source })?;
        let key = decode(&self.path, &contents)?;

        // Concurrent first callers may all get here; they decode the same file
        // so whichever write lands last stores an identical key.
        *self.value.write().await = Some(key);
        debug!("Loaded secret from {}", self.path.display());
        Ok(key)
    }
}

fn decode(path: &Path, contents: &[u8]) -> Result<SecretKey, SecretError> {
    let decoded = STANDARD.decode(contents.trim_ascii()).map_err(|source| SecretError::Decode { path: path.to_owned(), source })?;
    let bytes: [u8; SECRET_LEN] = decoded
        .as_slice()
        .try_into()
        .map_err(|_| SecretError::Length { path: path.to_owned(), expected: SECRET_LEN, found: decoded.len() })?;
    Ok(SecretKey(bytes))
}
