//! Configuration file handling for the ledger client.
//!
//! The configuration file is stored at `$LEDGER_HOME/config.json` and contains the URL of the
//! ledger service endpoint, the request timeout and optional locations of the client state files.

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "ledger";
const CONFIG_VERSION: u8 = 1;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const SECRETS: &str = ".secrets";
const CONFIG_JSON: &str = "config.json";
const SESSION_JSON: &str = "session.json";
const STATE_JSON: &str = "state.json";
const TEST_LEDGER_JSON: &str = "test_ledger.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$LEDGER_HOME` and from there it loads `$LEDGER_HOME/config.json`. It provides
/// paths to other items that are either configurable or are expected in a certain location within
/// the ledger home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory, its secrets subdirectory and an initial `config.json` file
    /// pointing at `api_url`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/ledger`
    /// - `api_url` - The URL of the ledger service endpoint that every request is posted to.
    ///
    /// # Errors
    /// - Returns an error if `api_url` is not a URL or if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>, api_url: &str) -> Result<Self> {
        validate_api_url(api_url)?;

        // Create the directory if it does not exist
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the ledger home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let secrets = root.join(SECRETS);
        utils::make_dir(&secrets).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile::new(api_url.to_string());
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            secrets,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `ledger_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the secrets directory exists
    /// - return the loaded configuration object
    pub async fn load(ledger_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = ledger_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Ledger Home is missing, run 'ledger init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        validate_api_url(&config_file.api_url)?;

        let config = Self {
            secrets: root.join(SECRETS),
            root,
            config_path,
            config_file,
        };
        if !config.secrets.is_dir() {
            bail!(
                "The secrets directory is missing '{}'",
                config.secrets.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    pub fn api_url(&self) -> &str {
        &self.config_file.api_url
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.config_file.request_timeout_secs
    }

    /// Where the session token and user identity are stored.
    pub fn session_path(&self) -> PathBuf {
        self.resolve(self.config_file.session_path())
    }

    /// Where the remaining client state, such as the last transaction id, is stored.
    pub fn state_path(&self) -> PathBuf {
        self.resolve(self.config_file.state_path())
    }

    /// Where the ledger used in test mode keeps its data.
    pub fn test_ledger_path(&self) -> PathBuf {
        self.root.join(TEST_LEDGER_JSON)
    }

    /// Checks if `p` is relative, and if so, resolves it. Returns it unchanged if it is absolute.
    fn resolve(&self, p: PathBuf) -> PathBuf {
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

fn validate_api_url(api_url: &str) -> Result<()> {
    let url = Url::parse(api_url).with_context(|| format!("Invalid API URL '{api_url}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("The API URL must use http or https, got '{}'", url.scheme())
    }
    Ok(())
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "ledger",
///   "config_version": 1,
///   "api_url": "https://script.google.com/macros/s/AKfycbx0/exec",
///   "request_timeout_secs": 30,
///   "session_path": ".secrets/session.json",
///   "state_path": "state.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "ledger"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URL of the ledger service endpoint
    api_url: String,

    /// How long to wait for the ledger service before reporting a network error
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    /// Path to the session file (optional, relative to config.json or absolute)
    /// Defaults to $LEDGER_HOME/.secrets/session.json if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session_path: Option<PathBuf>,

    /// Path to the client state file (optional, relative to config.json or absolute)
    /// Defaults to $LEDGER_HOME/state.json if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state_path: Option<PathBuf>,
}

fn default_request_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}

impl ConfigFile {
    fn new(api_url: String) -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_url,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            session_path: None,
            state_path: None,
        }
    }

    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version {} in config file, expected {}",
            config.config_version,
            CONFIG_VERSION
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        utils::save_json(path.as_ref(), self, false)
            .await
            .context("Unable to write config file")
    }

    fn session_path(&self) -> PathBuf {
        self.session_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SECRETS).join(SESSION_JSON))
    }

    fn state_path(&self) -> PathBuf {
        self.state_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(STATE_JSON))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const URL: &str = "https://script.google.com/macros/s/AKfycbx0/exec";

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("ledger_home");

        let config = Config::create(&home_dir, URL).await.unwrap();

        assert_eq!(URL, config.api_url());
        assert_eq!(30, config.request_timeout_secs());
        assert!(config.secrets().is_dir());
        assert!(config.config_path().is_file());
        assert_eq!(
            config.session_path(),
            config.root().join(".secrets").join("session.json")
        );
        assert_eq!(config.state_path(), config.root().join("state.json"));
    }

    #[tokio::test]
    async fn test_config_load() {
        let dir = TempDir::new().unwrap();
        let created = Config::create(dir.path(), URL).await.unwrap();
        let loaded = Config::load(dir.path()).await.unwrap();
        assert_eq!(created.root(), loaded.root());
        assert_eq!(loaded.api_url(), URL);
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(dir.path().join("nope")).await.is_err());
    }

    #[tokio::test]
    async fn test_config_create_bad_url() {
        let dir = TempDir::new().unwrap();
        assert!(Config::create(dir.path(), "not a url").await.is_err());
        assert!(Config::create(dir.path(), "ftp://example.com/x")
            .await
            .is_err());
        assert!(!dir.path().join(CONFIG_JSON).exists());
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{
            "app_name": "ledger",
            "config_version": 1,
            "api_url": "https://ledger.example.com/exec"
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let config = ConfigFile::load(&config_path).await.unwrap();
        assert_eq!(config.request_timeout_secs, REQUEST_TIMEOUT_SECS);
        assert_eq!(
            config.session_path(),
            PathBuf::from(SECRETS).join(SESSION_JSON)
        );
        assert_eq!(config.state_path(), PathBuf::from(STATE_JSON));
    }

    #[tokio::test]
    async fn test_config_file_custom_paths() {
        let temp_dir = TempDir::new().unwrap();
        let json = r#"{
            "app_name": "ledger",
            "config_version": 1,
            "api_url": "https://ledger.example.com/exec",
            "request_timeout_secs": 5,
            "state_path": "/var/lib/ledger/state.json"
        }"#;
        utils::write(temp_dir.path().join(CONFIG_JSON), json)
            .await
            .unwrap();
        utils::make_dir(&temp_dir.path().join(SECRETS)).await.unwrap();

        let config = Config::load(temp_dir.path()).await.unwrap();
        assert_eq!(config.request_timeout_secs(), 5);
        assert_eq!(
            config.state_path(),
            PathBuf::from("/var/lib/ledger/state.json")
        );
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{
            "app_name": "tiller",
            "config_version": 1,
            "api_url": "https://ledger.example.com/exec"
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let json = serde_json::to_string(&ConfigFile::new(URL.to_string())).unwrap();
        assert!(!json.contains("session_path"));
        assert!(!json.contains("state_path"));
        assert!(json.contains("request_timeout_secs"));
    }
}
