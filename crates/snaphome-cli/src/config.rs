//! Scenario configuration – reads/writes `~/.snaphome/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use snaphome_runtime::{GridSpec, HomingConfig};
use snaphome_types::Landmark;

/// Home position where the reference snapshot is taken.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct OriginConfig {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// Persisted scenario stored in `~/.snaphome/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Evaluate grid cells on the rayon thread pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Mean angular error (degrees) a homing field must stay below.
    #[serde(default = "default_threshold_deg")]
    pub acceptance_threshold_deg: f64,

    #[serde(default)]
    pub origin: OriginConfig,

    #[serde(default)]
    pub homing: HomingConfig,

    #[serde(default)]
    pub grid: GridSpec,

    /// Cylindrical landmarks as `{ x, y, radius }`.
    #[serde(default = "default_landmarks")]
    pub landmarks: Vec<Landmark>,
}

fn default_parallel() -> bool {
    true
}
fn default_threshold_deg() -> f64 {
    30.0
}

/// Three half-unit cylinders east and south of the origin.
pub fn default_landmarks() -> Vec<Landmark> {
    [(3.5, 2.0), (3.5, -2.0), (0.0, -4.0)]
        .into_iter()
        .filter_map(|(x, y)| Landmark::new(x, y, 0.5).ok())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            acceptance_threshold_deg: default_threshold_deg(),
            origin: OriginConfig::default(),
            homing: HomingConfig::default(),
            grid: GridSpec::default(),
            landmarks: default_landmarks(),
        }
    }
}

/// Return the path to `~/.snaphome/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".snaphome").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `SNAPHOME_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `SNAPHOME_RATIO` | `homing.turn_approach_ratio` |
/// | `SNAPHOME_THRESHOLD_DEG` | `acceptance_threshold_deg` |
/// | `SNAPHOME_PARALLEL` | `parallel` |
///
/// Values that fail to parse are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("SNAPHOME_RATIO")
        && let Ok(ratio) = v.parse::<f64>()
    {
        cfg.homing.turn_approach_ratio = ratio;
    }
    if let Ok(v) = std::env::var("SNAPHOME_THRESHOLD_DEG")
        && let Ok(threshold) = v.parse::<f64>()
    {
        cfg.acceptance_threshold_deg = threshold;
    }
    if let Ok(v) = std::env::var("SNAPHOME_PARALLEL")
        && let Ok(parallel) = v.parse::<bool>()
    {
        cfg.parallel = parallel;
    }
}

/// Save the config to `path`, creating parent directories if necessary.
pub fn save_to(cfg: &Config, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))
}

/// JSON schema of the config file, pretty-printed.
pub fn schema_json() -> Result<String, String> {
    let schema = schemars::schema_for!(Config);
    serde_json::to_string_pretty(&schema).map_err(|e| format!("Failed to render schema: {}", e))
}
