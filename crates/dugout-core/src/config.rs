// Configuration loading and parsing (engine.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Default per-position shortlist size for the lineup search.
pub const DEFAULT_SHORTLIST_CAP: usize = 14;

/// Default number of relievers kept before bullpen role selection.
pub const DEFAULT_BULLPEN_SHORTLIST: usize = 50;

const ENGINE_FILE: &str = "engine.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub engine: EngineConfig,
    pub data_paths: DataPaths,
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// engine.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire engine.toml file.
#[derive(Debug, Clone, Deserialize)]
struct EngineFile {
    engine: EngineConfig,
    data_paths: DataPaths,
    #[serde(default)]
    output: OutputSection,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct OutputSection {
    #[serde(default)]
    path: String,
}

/// Tuning knobs for a single roster build.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Scoring metric name, e.g. `true_overall` or `vs-left`. Parsed by the
    /// engine crate, which owns the metric vocabulary.
    pub metric: String,
    #[serde(default = "default_shortlist_cap")]
    pub shortlist_cap: usize,
    #[serde(default = "default_bullpen_shortlist")]
    pub bullpen_shortlist: usize,
    /// Whether one base identity may appear on both the hitter and the
    /// pitcher side of the same roster.
    #[serde(default = "default_allow_two_way")]
    pub allow_two_way: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            metric: "true_overall".into(),
            shortlist_cap: DEFAULT_SHORTLIST_CAP,
            bullpen_shortlist: DEFAULT_BULLPEN_SHORTLIST,
            allow_two_way: true,
        }
    }
}

fn default_shortlist_cap() -> usize {
    DEFAULT_SHORTLIST_CAP
}

fn default_bullpen_shortlist() -> usize {
    DEFAULT_BULLPEN_SHORTLIST
}

fn default_allow_two_way() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub cards: String,
}

/// Where the assembled roster JSON goes. `None` means stdout.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/engine.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let engine_path = base_dir.join("config").join(ENGINE_FILE);
    let engine_text = read_file(&engine_path)?;
    parse_config(&engine_text, &engine_path)
}

/// Parse and validate the text of an engine.toml file. `path` is only used
/// for error reporting.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: EngineFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let output_path = file.output.path.trim();
    let config = Config {
        engine: file.engine,
        data_paths: file.data_paths,
        output: OutputConfig {
            path: if output_path.is_empty() {
                None
            } else {
                Some(PathBuf::from(output_path))
            },
        },
    };

    validate(&config)?;
    Ok(config)
}

/// Seed `config/engine.toml` from `defaults/engine.toml` when it is missing.
/// Returns the path written, or `None` when the file already existed or there
/// is no default to copy from. An existing file is never touched.
pub fn ensure_engine_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let source = base_dir.join("defaults").join(ENGINE_FILE);
    let config_dir = base_dir.join("config");
    let target = config_dir.join(ENGINE_FILE);

    if !source.is_file() {
        if target.is_file() {
            return Ok(None);
        }
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {ENGINE_FILE} under defaults/ or config/ in {}; run from the project root",
                base_dir.display()
            ),
        });
    }

    let copy_err = |what: &str, path: &Path, e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to {what} {}: {e}", path.display()),
    };

    std::fs::create_dir_all(&config_dir).map_err(|e| copy_err("create", &config_dir, e))?;

    // create_new: a file written by a concurrent first run is left alone.
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => return Err(copy_err("create", &target, e)),
    };
    let content = std::fs::read(&source).map_err(|e| copy_err("read", &source, e))?;
    std::io::Write::write_all(&mut dest, &content).map_err(|e| copy_err("write", &target, e))?;

    info!("seeded {} from {}", target.display(), source.display());
    Ok(Some(target))
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Seeds `config/engine.toml` from the defaults before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_engine_config(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.engine.metric.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "engine.metric".into(),
            message: "must not be empty".into(),
        });
    }

    let size_fields: &[(&str, usize)] = &[
        ("engine.shortlist_cap", config.engine.shortlist_cap),
        ("engine.bullpen_shortlist", config.engine.bullpen_shortlist),
    ];
    for (name, val) in size_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    if config.data_paths.cards.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data_paths.cards".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
