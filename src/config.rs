//! TOML settings shared by the trainer and the prediction UI.
//!
//! Every field has a default, so a partial file only overrides what it names
//! and a missing file yields [`AppSettings::default`].

use std::path::{Path, PathBuf};

use serde::de::Error as SerdeDeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs::{self, AppDirError};
use crate::training::TrainingParams;

/// Settings file name inside the app root.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

pub const DEFAULT_DATASET_PATH: &str = "personal_tutoring_dataset.csv";
pub const DEFAULT_MODEL_PATH: &str = "trained_model.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid settings at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error(transparent)]
    AppDir(#[from] AppDirError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Student CSV used for training and for rebuilding encoders in the UI.
    pub dataset_path: PathBuf,
    /// Where the trainer writes the model and the UI reads it.
    pub model_path: PathBuf,
    pub training: TrainingParams,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            training: TrainingParams::default(),
        }
    }
}

/// Default settings file location inside the app root.
pub fn settings_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(SETTINGS_FILE_NAME))
}

/// Load `explicit` if given, otherwise the default settings file.
pub fn load_or_default(explicit: Option<&Path>) -> Result<AppSettings, ConfigError> {
    match explicit {
        Some(path) => load_settings_from(path),
        None => load_settings_from(&settings_path()?),
    }
}

/// Parse settings from `path`, returning defaults when it does not exist.
pub fn load_settings_from(path: &Path) -> Result<AppSettings, ConfigError> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source: SerdeDeError::custom(source),
    })?;
    let settings = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Loaded settings from {}", path.display());
    Ok(settings)
}
