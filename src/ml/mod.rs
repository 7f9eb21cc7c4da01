//! Machine learning building blocks for training and inference.
//!
//! Plain numerics over row-major `Vec<Vec<f64>>` matrices. Randomness comes
//! from seeded `rand` generators, so a fixed seed gives the same model, and
//! fitted state derives serde for the saved artifact.

pub mod encoding;
pub mod forest;
pub mod metrics;
pub mod scaler;
pub mod split;
