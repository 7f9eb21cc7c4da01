use egui::Color32;

/// Severity shown by the status badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Info,
    Warning,
    Error,
}

impl StatusTone {
    pub fn badge(self) -> (&'static str, Color32) {
        match self {
            StatusTone::Idle => ("Idle", Color32::from_rgb(42, 42, 42)),
            StatusTone::Info => ("Info", Color32::from_rgb(64, 140, 112)),
            StatusTone::Warning => ("Warning", Color32::from_rgb(192, 138, 43)),
            StatusTone::Error => ("Error", Color32::from_rgb(192, 57, 43)),
        }
    }
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub tone: StatusTone,
    /// Dataset and model paths in use.
    pub sources: String,
}

impl StatusBarState {
    pub fn idle(sources: String) -> Self {
        Self {
            text: "Fill in the form and press Predict".into(),
            tone: StatusTone::Idle,
            sources,
        }
    }

    pub fn set(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.text = text.into();
        self.tone = tone;
    }
}

/// Current text of every form control, aligned with the predictor's fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    pub values: Vec<String>,
    /// Text of the result label; empty until the first successful prediction.
    pub result_text: String,
}

/// Modal error to show after a failed submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorDialog {
    pub title: String,
    pub message: String,
}
