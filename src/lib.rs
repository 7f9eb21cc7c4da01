//! Library exports shared by the trainer, the prediction UI, and tests.
/// Application directory helpers.
pub mod app_dirs;
/// Persisted model artifact.
pub mod artifact;
/// TOML settings.
pub mod config;
/// CSV dataset loading and column schema.
pub mod dataset;
/// Prediction form UI.
pub mod egui_app;
/// Logging setup.
pub mod logging;
/// Encoders, scaler, forest, and metrics.
pub mod ml;
/// Reconstructs preprocessing and turns form input into predictions.
pub mod predictor;
/// Label encoding of dataset records into feature rows.
pub mod preprocess;
/// Offline training pipeline.
pub mod training;
