//! Connection Settings
//!
//! `tnmanage` needs two values to reach a TrueNAS system: the server URL and an
//! API key. They are resolved from three layers, highest priority first:
//!
//! 1. `--server` / `--token` flags
//! 2. `TRUENAS_URL` / `TRUENAS_API_KEY` environment variables
//! 3. the `~/.tnmanage` file written by `tnmanage config`
//!
//! The file is a plain `KEY=VALUE` list with `#` comments. Only the two keys
//! above are recognized; anything else is ignored when reading and dropped the
//! next time the file is written. Values made of URL-safe characters are written
//! as is; anything else is double-quoted with `\`, `"` and `$` escaped so it reads
//! back unchanged.

use crate::error::{ManageError, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const URL_VAR: &str = "TRUENAS_URL";
pub const API_KEY_VAR: &str = "TRUENAS_API_KEY";
pub const CONFIG_FILE_NAME: &str = ".tnmanage";

const FILE_HEADER: &str =
    "# TrueNAS Configuration\n# This file is automatically managed by tnmanage\n\n";

/// Resolved connection settings handed to the client
#[derive(Debug, Clone)]
pub struct TrueNasConfig {
    /// Base URL of the TrueNAS web interface, e.g. `https://192.168.1.100`
    pub url: String,
    pub api_key: SecretString,
}

impl TrueNasConfig {
    /// Build a config from explicit values. Blank values are rejected.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let api_key = api_key.into();
        if url.trim().is_empty() {
            return Err(ManageError::Config("server URL is required".to_string()));
        }
        if api_key.trim().is_empty() {
            return Err(ManageError::Config("API token is required".to_string()));
        }
        Ok(Self {
            url,
            api_key: SecretString::from(api_key),
        })
    }

    /// Build a config from `TRUENAS_URL` / `TRUENAS_API_KEY` alone
    pub fn from_env() -> Result<Self> {
        let env = EnvVars::from_process();
        let url = env.get(URL_VAR).ok_or_else(|| missing(URL_VAR))?;
        let api_key = env.get(API_KEY_VAR).ok_or_else(|| missing(API_KEY_VAR))?;
        Self::new(url, api_key)
    }
}

fn missing(var: &str) -> ManageError {
    ManageError::Config(format!("{} environment variable not set", var))
}

/// Which of the two stored keys a `config` command writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ServerUrl,
    ApiKey,
}

impl ConfigKey {
    pub fn var_name(self) -> &'static str {
        match self {
            ConfigKey::ServerUrl => URL_VAR,
            ConfigKey::ApiKey => API_KEY_VAR,
        }
    }
}

/// Values found in the config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
}

impl StoredConfig {
    fn set(&mut self, key: ConfigKey, value: String) {
        match key {
            ConfigKey::ServerUrl => self.url = Some(value),
            ConfigKey::ApiKey => self.api_key = Some(value),
        }
    }

    fn render(&self) -> String {
        let mut content = String::from(FILE_HEADER);
        if let Some(url) = &self.url {
            content.push_str(&format!("{}={}\n", URL_VAR, quote(url)));
        }
        if let Some(api_key) = &self.api_key {
            content.push_str(&format!("{}={}\n", API_KEY_VAR, quote(api_key)));
        }
        content
    }
}

/// Characters the line parser reads literally outside quotes
fn is_plain(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-_.:/=+@%,~".contains(c)
}

/// Value as written to the file: bare when every character is plain, otherwise
/// double-quoted with the parser's escapes applied
fn quote(value: &str) -> String {
    if !value.is_empty() && value.chars().all(is_plain) {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// The on-disk `KEY=VALUE` settings file
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.tnmanage`
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            ManageError::Config("could not determine home directory".to_string())
        })?;
        Ok(Self::new(home.join(CONFIG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the recognized keys. A missing file yields an empty config.
    ///
    /// Lines that cannot be parsed are skipped with a warning.
    pub fn load(&self) -> Result<StoredConfig> {
        let (stored, unreadable) = self.read()?;
        for e in &unreadable {
            warn!("Skipping unreadable line in {}: {}", self.path.display(), e);
        }
        Ok(stored)
    }

    /// Update a single key, keeping the other one, and rewrite the file
    ///
    /// Refuses to rewrite a file with unreadable lines, since the rewrite
    /// would drop whatever those lines hold. Values containing control
    /// characters are rejected.
    pub fn set(&self, key: ConfigKey, value: &str) -> Result<()> {
        if value.chars().any(char::is_control) {
            return Err(ManageError::Validation(format!(
                "{} must not contain control characters",
                key.var_name()
            )));
        }

        let (mut stored, unreadable) = self.read()?;
        if let Some(e) = unreadable.first() {
            return Err(ManageError::Config(format!(
                "{} has a line that cannot be read ({}); fix or remove it before updating",
                self.path.display(),
                e
            )));
        }

        debug!("Setting {} in {}", key.var_name(), self.path.display());
        stored.set(key, value.to_string());
        self.write(&stored)
    }

    fn read(&self) -> Result<(StoredConfig, Vec<dotenvy::Error>)> {
        let entries = match dotenvy::from_path_iter(&self.path) {
            Ok(entries) => entries,
            Err(e) if e.not_found() => {
                debug!("No config file at {}", self.path.display());
                return Ok((StoredConfig::default(), Vec::new()));
            }
            Err(dotenvy::Error::Io(e)) => return Err(ManageError::Io(e)),
            Err(e) => return Err(ManageError::Config(e.to_string())),
        };

        let mut stored = StoredConfig::default();
        let mut unreadable = Vec::new();
        for entry in entries {
            match entry {
                Ok((key, value)) if key == URL_VAR => stored.url = Some(value),
                Ok((key, value)) if key == API_KEY_VAR => stored.api_key = Some(value),
                Ok((key, _)) => debug!("Ignoring unknown config key {}", key),
                Err(e) => unreadable.push(e),
            }
        }
        Ok((stored, unreadable))
    }

    fn write(&self, stored: &StoredConfig) -> Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        #[cfg(unix)]
        {
            // mode() only applies on creation
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(stored.render().as_bytes())?;
        debug!("Wrote {}", self.path.display());
        Ok(())
    }
}

/// Snapshot of the two recognized environment variables. Empty values count
/// as unset.
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    vars: HashMap<String, String>,
}

impl EnvVars {
    pub fn from_process() -> Self {
        Self::from_pairs(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, v)| (k == URL_VAR || k == API_KEY_VAR) && !v.is_empty())
            .collect();
        Self { vars }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
struct Layered {
    truenas_url: Option<String>,
    truenas_api_key: Option<SecretString>,
}

/// Everything `tnmanage` knows about where to connect before flags are applied
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub stored: StoredConfig,
    pub env: EnvVars,
}

impl Settings {
    pub fn new(stored: StoredConfig, env: EnvVars) -> Self {
        Self { stored, env }
    }

    /// Load the config file (a broken file is reported and ignored) and
    /// snapshot the process environment.
    pub fn load(file: &ConfigFile) -> Self {
        let stored = file.load().unwrap_or_else(|e| {
            warn!("Ignoring config file {}: {}", file.path().display(), e);
            StoredConfig::default()
        });
        Self::new(stored, EnvVars::from_process())
    }

    /// Apply flags over environment over file and validate the result
    pub fn resolve(&self, server: Option<&str>, token: Option<&str>) -> Result<TrueNasConfig> {
        let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_string);

        let mut builder = config::Config::builder();
        if let Some(url) = &self.stored.url {
            builder = builder.set_default("truenas_url", url.as_str())?;
        }
        if let Some(api_key) = &self.stored.api_key {
            builder = builder.set_default("truenas_api_key", api_key.as_str())?;
        }
        let layered: Layered = builder
            .add_source(config::Environment::default().source(Some(
                self.env
                    .vars
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            )))
            .set_override_option("truenas_url", non_empty(server))?
            .set_override_option("truenas_api_key", non_empty(token))?
            .build()?
            .try_deserialize()?;

        let url = layered.truenas_url.ok_or_else(|| {
            ManageError::Config(format!(
                "{} is not set (use --server or `tnmanage config server <url>`)",
                URL_VAR
            ))
        })?;
        let api_key = layered.truenas_api_key.ok_or_else(|| {
            ManageError::Config(format!(
                "{} is not set (use --token or `tnmanage config token <token>`)",
                API_KEY_VAR
            ))
        })?;
        TrueNasConfig::new(url, api_key.expose_secret())
    }
}

impl From<config::ConfigError> for ManageError {
    fn from(e: config::ConfigError) -> Self {
        ManageError::Config(e.to_string())
    }
}
