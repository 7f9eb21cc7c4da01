//! Form actions, independent of rendering.

use std::path::Path;

use crate::egui_app::state::{ErrorDialog, FormState, StatusBarState, StatusTone};
use crate::predictor::{FieldSpec, Predictor};

/// Owns the predictor and the form it feeds.
pub struct FormController {
    predictor: Predictor,
    pub form: FormState,
    pub status: StatusBarState,
}

impl FormController {
    pub fn new(predictor: Predictor, dataset_path: &Path, model_path: &Path) -> Self {
        let form = FormState {
            values: predictor.fields().iter().map(FieldSpec::default_value).collect(),
            result_text: String::new(),
        };
        let sources = format!(
            "Dataset: {}  |  Model: {}",
            dataset_path.display(),
            model_path.display()
        );
        let mut status = StatusBarState::idle(sources);
        if let Some(drift) = predictor.drift() {
            status.set(drift.to_string(), StatusTone::Warning);
        }
        Self {
            predictor,
            form,
            status,
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        self.predictor.fields()
    }

    pub fn value(&self, idx: usize) -> &str {
        self.form.values.get(idx).map(String::as_str).unwrap_or_default()
    }

    pub fn set_value(&mut self, idx: usize, value: impl Into<String>) {
        if let Some(slot) = self.form.values.get_mut(idx) {
            *slot = value.into();
        }
    }

    /// Validate and predict from the current form values.
    ///
    /// On failure the result label is left untouched and the dialog to show
    /// is returned.
    pub fn submit(&mut self) -> Option<ErrorDialog> {
        match self.predictor.predict(&self.form.values) {
            Ok(score) => {
                self.form.result_text = format!("Predicted Assessment Score: {score:.2}");
                let tone = if self.predictor.drift().is_some() {
                    StatusTone::Warning
                } else {
                    StatusTone::Info
                };
                self.status.set("Prediction complete", tone);
                None
            }
            Err(err) => {
                tracing::warn!("Prediction rejected: {err}");
                self.status.set(err.to_string(), StatusTone::Error);
                Some(ErrorDialog {
                    title: err.dialog_title().to_string(),
                    message: err.dialog_message(),
                })
            }
        }
    }
}
