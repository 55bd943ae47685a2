//! Configuration loading and persistence.
//!
//! Handles reading and writing the pushclip configuration file, plus the
//! optional "remembered" recipient token used by the send command.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::{fs, path::PathBuf};

/// Configuration for the pushclip CLI.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Config {
    /// URL of the push gateway (registration + message channel).
    pub server_url: String,
    /// Device name reported during registration.
    pub device_name: String,
    /// Whether message notifications may be displayed at all.
    ///
    /// This is the user-consent half of the permission gate; the other
    /// half is the runtime probe of the notification server.
    pub notifications_enabled: bool,
    /// Path to the service account key file used by the send command.
    pub credentials_path: PathBuf,
    /// Command that prints an OAuth access token for the send command.
    pub token_command: String,
}

impl Default for Config {
    fn default() -> Self {
        let device_name = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "Pushclip Desktop".to_string());

        let credentials_path = Self::config_dir()
            .map(|d| d.join("firebase_key.json"))
            .unwrap_or_else(|_| PathBuf::from("firebase_key.json"));

        Self {
            server_url: "https://gateway.pushclip.dev".to_string(),
            device_name,
            notifications_enabled: true,
            credentials_path,
            token_command: "gcloud auth print-access-token".to_string(),
        }
    }
}

impl Config {
    /// Returns the configuration directory path, creating it if necessary.
    ///
    /// Directory selection priority:
    /// 1. `#[cfg(test)]` (unit tests): `tmp/pushclip-test`
    /// 2. `PUSHCLIP_CONFIG_DIR` env var: explicit override
    /// 3. Default: platform config dir (macOS: ~/Library/Application Support/pushclip)
    pub fn config_dir() -> Result<PathBuf> {
        let dir = {
            #[cfg(test)]
            {
                // Unit tests: use the repo's tmp/ directory (gitignored)
                PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tmp/pushclip-test")
            }

            #[cfg(not(test))]
            {
                if let Ok(test_dir) = std::env::var("PUSHCLIP_CONFIG_DIR") {
                    // Explicit override via env var (integration tests, portable installs)
                    PathBuf::from(test_dir)
                } else {
                    // Production: use platform-standard config directory
                    dirs::config_dir()
                        .context("Could not determine config directory")?
                        .join("pushclip")
                }
            }
        };
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Loads configuration from file, with environment variable overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_file().unwrap_or_else(|_| Self::default());
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_from_file() -> Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");
        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            anyhow::bail!("Config file not found")
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(server_url) = std::env::var("PUSHCLIP_SERVER_URL") {
            self.server_url = server_url;
        }

        if let Ok(device_name) = std::env::var("PUSHCLIP_DEVICE_NAME") {
            self.device_name = device_name;
        }

        if let Ok(credentials) = std::env::var("PUSHCLIP_CREDENTIALS") {
            self.credentials_path = PathBuf::from(credentials);
        }

        if let Ok(enabled) = std::env::var("PUSHCLIP_NOTIFICATIONS") {
            self.notifications_enabled = !matches!(enabled.as_str(), "0" | "false" | "off");
        }
    }

    /// Persists the current configuration to disk.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_dir()?.join("config.json");
        fs::write(&config_path, serde_json::to_string_pretty(self)?)?;

        // Set restrictive permissions (owner read/write only)
        #[cfg(unix)]
        fs::set_permissions(&config_path, fs::Permissions::from_mode(0o600))?;

        Ok(())
    }

    /// Loads the remembered recipient token, if one was saved.
    pub fn load_saved_token() -> Option<String> {
        let path = Self::config_dir().ok()?.join("saved_token.txt");
        let token = fs::read_to_string(path).ok()?;
        let token = token.trim().to_string();
        (!token.is_empty()).then_some(token)
    }

    /// Saves the recipient token for future send invocations.
    pub fn save_token(token: &str) -> Result<()> {
        let path = Self::config_dir()?.join("saved_token.txt");
        fs::write(&path, token).context("Failed to save recipient token")?;

        #[cfg(unix)]
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;

        Ok(())
    }

    /// Deletes the remembered recipient token if it exists.
    pub fn delete_saved_token() -> Result<()> {
        let path = Self::config_dir()?.join("saved_token.txt");
        if path.exists() {
            fs::remove_file(&path).context("Failed to delete saved recipient token")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests share the on-disk saved_token.txt; serialize access.
    static TOKEN_FILE_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server_url, "https://gateway.pushclip.dev");
        assert!(config.notifications_enabled);
        assert!(!config.device_name.is_empty());
        assert_eq!(config.token_command, "gcloud auth print-access-token");
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = Config::default();
        config.server_url = "https://example.test".to_string();
        let json = serde_json::to_string(&config).unwrap();
        let loaded: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.server_url, "https://example.test");
    }

    #[test]
    fn test_saved_token_round_trip() {
        let _guard = TOKEN_FILE_LOCK.lock().unwrap();
        Config::save_token("device-token-123").unwrap();
        assert_eq!(
            Config::load_saved_token().as_deref(),
            Some("device-token-123")
        );

        Config::delete_saved_token().unwrap();
        assert_eq!(Config::load_saved_token(), None);

        // Deleting again is a no-op, not an error
        Config::delete_saved_token().unwrap();
    }

    #[test]
    fn test_empty_saved_token_is_none() {
        let _guard = TOKEN_FILE_LOCK.lock().unwrap();
        Config::save_token("   ").unwrap();
        assert_eq!(Config::load_saved_token(), None);
        Config::delete_saved_token().unwrap();
    }
}
