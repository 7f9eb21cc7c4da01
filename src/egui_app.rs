//! Prediction form built on egui.
//!
//! `state` holds plain data, `controller` owns the predictor and applies form
//! actions, and `ui` renders the controller each frame.

pub mod controller;
pub mod state;
pub mod ui;
