use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use super::error::AuthError;
use super::token::AccountToken;

/// Full mapping of account name to token record.
pub type TokenMap = BTreeMap<String, AccountToken>;

/// Storage abstraction for per-account OAuth tokens.
pub trait TokenStore: Send + Sync {
    fn load(&self, account: &str) -> Result<Option<AccountToken>, AuthError>;
    fn save(&self, account: &str, token: &AccountToken) -> Result<(), AuthError>;
    fn accounts(&self) -> Result<Vec<String>, AuthError>;
}

/// Token store backed by a single JSON file holding every account.
///
/// # Example
/// ```no_run
/// use kommo_bridge::auth::{AccountToken, FileTokenStore, TokenStore};
///
/// let store = FileTokenStore::new("./tokens.json");
/// let token = AccountToken {
///     access_token: "access".to_string(),
///     refresh_token: "refresh".to_string(),
///     expires: 1_900_000_000,
///     base_domain: "acme.kommo.com".to_string(),
/// };
/// store.save("acme", &token)?;
/// # Ok::<(), kommo_bridge::auth::AuthError>(())
/// ```
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole mapping. A missing or empty file reads as no accounts.
    pub fn read_all(&self) -> Result<TokenMap, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(TokenMap::new()),
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        if raw.trim().is_empty() {
            return Ok(TokenMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_all(&self, tokens: &TokenMap) -> Result<(), AuthError> {
        let serialized = serde_json::to_vec_pretty(tokens)?;
        atomic_write(&self.path, &serialized)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self, account: &str) -> Result<Option<AccountToken>, AuthError> {
        Ok(self.read_all()?.remove(account))
    }

    fn save(&self, account: &str, token: &AccountToken) -> Result<(), AuthError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut tokens = self.read_all()?;
        tokens.insert(account.to_string(), token.clone());
        self.write_all(&tokens)?;
        tracing::debug!(account, path = %self.path.display(), "token saved");
        Ok(())
    }

    fn accounts(&self) -> Result<Vec<String>, AuthError> {
        Ok(self.read_all()?.into_keys().collect())
    }
}

/// In-process token store, used by tests and embedders without a disk.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<TokenMap>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self, account: &str) -> Result<Option<AccountToken>, AuthError> {
        let tokens = self.tokens.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tokens.get(account).cloned())
    }

    fn save(&self, account: &str, token: &AccountToken) -> Result<(), AuthError> {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(account.to_string(), token.clone());
        Ok(())
    }

    fn accounts(&self) -> Result<Vec<String>, AuthError> {
        let tokens = self.tokens.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tokens.keys().cloned().collect())
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file_name = path.file_name().ok_or_else(|| {
        AuthError::InvalidConfig(format!("Token path {} has no file name", path.display()))
    })?;
    let temp_name = format!(
        ".{}.tmp-{}",
        file_name.to_string_lossy(),
        uuid::Uuid::new_v4().simple()
    );
    let temp_path = path.with_file_name(temp_name);

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let write_result = (|| -> std::io::Result<()> {
        let mut temp_file = options.open(&temp_path)?;
        temp_file.write_all(data)?;
        temp_file.sync_all()?;
        Ok(())
    })();

    if let Err(err) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;

    Ok(())
}
