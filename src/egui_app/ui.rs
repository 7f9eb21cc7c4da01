//! egui renderer for the prediction form.
use eframe::egui::{self, Color32, Frame, Margin, RichText, StrokeKind};
use rfd::{MessageButtons, MessageDialog, MessageLevel};

use crate::dataset::ColumnKind;
use crate::egui_app::controller::FormController;
use crate::egui_app::state::ErrorDialog;

/// Window and header title.
pub const WINDOW_TITLE: &str = "Personal Tutoring Prediction Dashboard";

/// Caption above the input grid.
pub const FORM_TITLE: &str = "Input Student Details";

pub const FOOTER_TEXT: &str = "© 2025 • Personal Tutoring AI System";

/// Minimum window size that keeps the form readable.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(520.0, 480.0);

/// Renders the form using the controller's state.
pub struct TutorApp {
    controller: FormController,
    visuals_set: bool,
}

impl TutorApp {
    pub fn new(controller: FormController) -> Self {
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::light();
        visuals.panel_fill = Color32::from_rgb(244, 244, 244);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_header(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header")
            .frame(
                Frame::new()
                    .fill(Color32::from_rgb(0, 123, 255))
                    .inner_margin(Margin::symmetric(12, 10)),
            )
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new(WINDOW_TITLE)
                            .size(22.0)
                            .strong()
                            .color(Color32::WHITE),
                    );
                });
            });
    }

    fn render_status(&self, ctx: &egui::Context) {
        let status = &self.controller.status;
        let (badge_label, badge_color) = status.tone.badge();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::new()
                    .fill(Color32::from_rgb(230, 230, 230))
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let (badge_rect, _) =
                        ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                    ui.painter().rect_filled(badge_rect, 0.0, badge_color);
                    ui.painter().rect_stroke(
                        badge_rect,
                        0.0,
                        egui::Stroke::new(1.0, Color32::from_gray(90)),
                        StrokeKind::Inside,
                    );
                    ui.label(badge_label);
                    ui.separator();
                    ui.label(&status.text);
                });
                ui.label(RichText::new(&status.sources).small().weak());
            });
    }

    fn render_footer(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("footer")
            .frame(Frame::new().inner_margin(Margin::symmetric(8, 6)))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(FOOTER_TEXT).small().weak());
                });
            });
    }

    fn render_form(&mut self, ctx: &egui::Context) -> Option<ErrorDialog> {
        let mut dialog = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.group(|ui| {
                        ui.label(RichText::new(FORM_TITLE).size(16.0).strong());
                        ui.add_space(6.0);
                        egui::Grid::new("prediction_form")
                            .num_columns(2)
                            .spacing([16.0, 8.0])
                            .striped(true)
                            .show(ui, |ui| {
                                let fields = self.controller.fields().to_vec();
                                for (idx, field) in fields.iter().enumerate() {
                                    ui.label(RichText::new(&field.name).strong());
                                    match field.kind {
                                        ColumnKind::Categorical | ColumnKind::Level => {
                                            let current = self.controller.value(idx).to_string();
                                            egui::ComboBox::from_id_salt(("field", idx))
                                                .width(240.0)
                                                .selected_text(current.as_str())
                                                .show_ui(ui, |ui| {
                                                    for option in &field.options {
                                                        if ui
                                                            .selectable_label(
                                                                *option == current,
                                                                option.as_str(),
                                                            )
                                                            .clicked()
                                                        {
                                                            self.controller
                                                                .set_value(idx, option.clone());
                                                        }
                                                    }
                                                });
                                        }
                                        ColumnKind::Continuous => {
                                            let mut text = self.controller.value(idx).to_string();
                                            let response = ui.add(
                                                egui::TextEdit::singleline(&mut text)
                                                    .desired_width(240.0),
                                            );
                                            if response.changed() {
                                                self.controller.set_value(idx, text);
                                            }
                                        }
                                    }
                                    ui.end_row();
                                }
                            });
                    });

                    ui.add_space(12.0);
                    ui.vertical_centered(|ui| {
                        let button = egui::Button::new(
                            RichText::new("Predict Assessment Score").color(Color32::WHITE),
                        )
                        .fill(Color32::from_rgb(40, 167, 69));
                        if ui.add(button).clicked() {
                            dialog = self.controller.submit();
                        }
                        ui.add_space(8.0);
                        ui.label(
                            RichText::new(&self.controller.form.result_text)
                                .size(18.0)
                                .strong(),
                        );
                    });
                });
        });
        dialog
    }
}

impl eframe::App for TutorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.render_header(ctx);
        self.render_status(ctx);
        self.render_footer(ctx);
        if let Some(dialog) = self.render_form(ctx) {
            show_error_dialog(&dialog);
        }
    }
}

/// Blocking modal; the frame resumes once it is dismissed.
fn show_error_dialog(dialog: &ErrorDialog) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(&dialog.title)
        .set_description(&dialog.message)
        .set_buttons(MessageButtons::Ok)
        .show();
}
