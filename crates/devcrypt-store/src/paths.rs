//! Resolution of the user's key file locations.

use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// File name of the private key inside the config directory.
pub const DEFAULT_KEY_FILE: &str = "devcrypt_key";

/// Extension appended to the private key path to find the public key.
pub const PUBLIC_KEY_EXTENSION: &str = "pub";

const CONFIG_DIR_NAME: &str = "devcrypt";
const HOME_DIR_NAME: &str = ".devcrypt";

/// Key location overrides, typically from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct KeyPathConfig {
    /// Directory holding the default key files.
    pub config_dir: Option<PathBuf>,
    /// Explicit private key path.
    pub key: Option<PathBuf>,
    /// Explicit public key path.
    pub pubkey: Option<PathBuf>,
}

/// Resolved key file locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPaths {
    pub private_key: PathBuf,
    pub public_key: PathBuf,
}

impl KeyPathConfig {
    /// Resolve against the platform default config directory.
    pub fn resolve(&self) -> Result<KeyPaths> {
        self.resolve_with(default_config_dir())
    }

    /// Resolve with an explicit fallback config directory.
    ///
    /// The private key is `key`, else `<config_dir>/devcrypt_key`, else
    /// `<default_dir>/devcrypt_key`. The public key is `pubkey`, else the
    /// private key path with `.pub` appended.
    pub fn resolve_with(&self, default_dir: Option<PathBuf>) -> Result<KeyPaths> {
        let private_key = match (&self.key, &self.config_dir) {
            (Some(key), _) => key.clone(),
            (None, Some(dir)) => dir.join(DEFAULT_KEY_FILE),
            (None, None) => default_dir.ok_or(StoreError::NoKeyPath)?.join(DEFAULT_KEY_FILE),
        };
        let public_key = match &self.pubkey {
            Some(pubkey) => pubkey.clone(),
            None => public_key_path(&private_key),
        };
        Ok(KeyPaths {
            private_key,
            public_key,
        })
    }
}

/// The platform config directory plus `devcrypt`, falling back to `~/.devcrypt`.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .or_else(|| dirs::home_dir().map(|home| home.join(HOME_DIR_NAME)))
}

/// `<private_key>.pub`
pub fn public_key_path(private_key: &Path) -> PathBuf {
    let mut path = private_key.as_os_str().to_owned();
    path.push(".");
    path.push(PUBLIC_KEY_EXTENSION);
    PathBuf::from(path)
}
