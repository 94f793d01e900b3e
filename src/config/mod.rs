//! Configuration management for `issue_tracker`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`TRACKER_*`)
//! 3. Project config (.tracker/config.yaml)
//! 4. User config (~/.config/itr/config.yaml)
//! 5. Defaults
//!
//! The merged layer resolves into a [`ResolvedConfig`], which builds the
//! [`StoreConfig`] handed to the storage backend.

use crate::error::{Result, TrackerError};
use crate::storage::{DEFAULT_BUSY_TIMEOUT_MS, SqliteStorage, StoreConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the workspace directory.
pub const TRACKER_DIR_NAME: &str = ".tracker";
/// Database filename inside the workspace directory.
pub const DEFAULT_DB_FILENAME: &str = "tracker.db";
/// Config filename inside the workspace directory.
pub const CONFIG_FILENAME: &str = "config.yaml";
/// Default page size for `list`.
pub const DEFAULT_LIST_LIMIT: usize = 100;
/// Largest page size `list` will return.
pub const MAX_LIST_LIMIT: usize = 1000;

const ENV_PREFIX: &str = "TRACKER_";

/// A flat set of normalized configuration keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&contents)?;
        Ok(layer_from_yaml_value(&value))
    }

    /// Build a layer from `TRACKER_*` environment variables.
    ///
    /// `TRACKER_DIR` locates the workspace and is not a config key.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(env::vars())
    }

    fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut layer = Self::default();
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                if stripped == "DIR" {
                    continue;
                }
                layer.set(stripped, value);
            }
        }
        layer
    }

    /// Insert a value under its normalized key.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&normalize_key(key))
            .map(String::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// CLI overrides for config loading.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db: Option<PathBuf>,
    pub json: Option<bool>,
    pub lock_timeout: Option<u64>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();

        if let Some(path) = &self.db {
            layer.set("db", path.to_string_lossy());
        }
        if let Some(json) = self.json {
            layer.set("json", json.to_string());
        }
        if let Some(lock_timeout) = self.lock_timeout {
            layer.set("lock-timeout", lock_timeout.to_string());
        }

        layer
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub tracker_dir: PathBuf,
    pub db_path: PathBuf,
    pub lock_timeout_ms: u64,
    pub default_limit: usize,
    pub log_file: Option<PathBuf>,
    pub json: bool,
}

impl ResolvedConfig {
    /// Resolve typed settings from a merged layer.
    ///
    /// Relative paths are resolved against the workspace directory.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Config` if a numeric or boolean key is malformed.
    pub fn from_layer(tracker_dir: &Path, layer: &ConfigLayer) -> Result<Self> {
        let db_path = layer
            .get("db")
            .map_or_else(|| tracker_dir.join(DEFAULT_DB_FILENAME), |value| {
                resolve_relative(tracker_dir, value)
            });

        let lock_timeout_ms =
            parse_key::<u64>(layer, "lock-timeout")?.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS);

        let default_limit = parse_key::<usize>(layer, "default-limit")?
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);

        let json = match layer.get("json") {
            Some(value) => parse_bool(value)
                .ok_or_else(|| TrackerError::Config(format!("json: expected a boolean, got '{value}'")))?,
            None => false,
        };

        Ok(Self {
            tracker_dir: tracker_dir.to_path_buf(),
            db_path,
            lock_timeout_ms,
            default_limit,
            log_file: layer
                .get("log-file")
                .map(|value| resolve_relative(tracker_dir, value)),
            json,
        })
    }

    /// Backend settings for `SqliteStorage::open_with_config`.
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.db_path).with_busy_timeout(self.lock_timeout_ms)
    }
}

/// Discover the active `.tracker` directory.
///
/// Honors `TRACKER_DIR` when set, otherwise walks up from `start` (or CWD).
///
/// # Errors
///
/// Returns `TrackerError::NotInitialized` if no workspace is found.
pub fn discover_tracker_dir(start: Option<&Path>) -> Result<PathBuf> {
    let env_override = env::var("TRACKER_DIR")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from);
    discover_tracker_dir_with_env(start, env_override.as_deref())
}

fn discover_tracker_dir_with_env(start: Option<&Path>, env_override: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = env_override {
        if path.is_dir() {
            return Ok(path.to_path_buf());
        }
    }

    let mut current = match start {
        Some(path) => path.to_path_buf(),
        None => env::current_dir()?,
    };

    loop {
        let candidate = current.join(TRACKER_DIR_NAME);
        if candidate.is_dir() {
            return Ok(candidate);
        }

        if !current.pop() {
            break;
        }
    }

    Err(TrackerError::NotInitialized)
}

/// Load project config (.tracker/config.yaml).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(tracker_dir: &Path) -> Result<ConfigLayer> {
    ConfigLayer::from_yaml(&tracker_dir.join(CONFIG_FILENAME))
}

/// Load user config (~/.config/itr/config.yaml).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigLayer> {
    let Ok(home) = env::var("HOME") else {
        return Ok(ConfigLayer::default());
    };
    let path = Path::new(&home)
        .join(".config")
        .join("itr")
        .join(CONFIG_FILENAME);
    ConfigLayer::from_yaml(&path)
}

/// Load configuration with the full precedence chain.
///
/// # Errors
///
/// Returns an error if any config file cannot be read or parsed.
pub fn load_config(tracker_dir: &Path, cli: &CliOverrides) -> Result<ConfigLayer> {
    let user = load_user_config()?;
    let project = load_project_config(tracker_dir)?;
    let env_layer = ConfigLayer::from_env();
    let cli_layer = cli.as_layer();

    Ok(ConfigLayer::merge_layers(&[
        user, project, env_layer, cli_layer,
    ]))
}

/// Resolve configuration for the workspace at `tracker_dir`.
///
/// # Errors
///
/// Returns an error if config files cannot be read or hold malformed values.
pub fn resolve_config(tracker_dir: &Path, cli: &CliOverrides) -> Result<ResolvedConfig> {
    let layer = load_config(tracker_dir, cli)?;
    ResolvedConfig::from_layer(tracker_dir, &layer)
}

/// Open storage using resolved configuration.
///
/// # Errors
///
/// Returns an error if configuration cannot be resolved or the database
/// cannot be opened.
pub fn open_storage(
    tracker_dir: &Path,
    cli: &CliOverrides,
) -> Result<(SqliteStorage, ResolvedConfig)> {
    let config = resolve_config(tracker_dir, cli)?;
    let storage = SqliteStorage::open_with_config(&config.store_config())?;
    Ok((storage, config))
}

/// Log file location, if one is configured.
///
/// Consulted before the command runs, so every failure reads as "no log
/// file".
#[must_use]
pub fn configured_log_file() -> Option<PathBuf> {
    let tracker_dir = discover_tracker_dir(None).ok()?;
    resolve_config(&tracker_dir, &CliOverrides::default())
        .ok()?
        .log_file
}

/// Config file written by `itr init`.
#[must_use]
pub fn default_config_yaml() -> String {
    format!(
        "# itr configuration\n\
         # db: {DEFAULT_DB_FILENAME}\n\
         # lock-timeout: {DEFAULT_BUSY_TIMEOUT_MS}\n\
         # default-limit: {DEFAULT_LIST_LIMIT}\n\
         # log-file: itr.log\n"
    )
}

fn resolve_relative(base: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

fn parse_key<T: std::str::FromStr>(layer: &ConfigLayer, key: &str) -> Result<Option<T>> {
    layer
        .get(key)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|_| TrackerError::Config(format!("{key}: invalid value '{value}'")))
        })
        .transpose()
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn layer_from_yaml_value(value: &serde_yaml::Value) -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    let mut flat = HashMap::new();
    flatten_yaml(value, "", &mut flat);

    for (key, value) in flat {
        layer.set(&key, value);
    }

    layer
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next_prefix = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(value, &next_prefix, out);
            }
        }
        _ => {
            if let Some(value) = yaml_scalar_to_string(value) {
                out.insert(prefix.to_string(), value);
            }
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
