//! Entry point for the prediction form.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use std::path::PathBuf;

use eframe::egui;
use tutorscore::config;
use tutorscore::egui_app::controller::FormController;
use tutorscore::egui_app::ui::{MIN_VIEWPORT_SIZE, TutorApp, WINDOW_TITLE};
use tutorscore::logging;
use tutorscore::predictor::Predictor;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }
    let args = match parse_args(std::env::args().skip(1).collect()) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };
    let startup = build_controller(&args);

    let viewport = egui::ViewportBuilder::default()
        .with_title(WINDOW_TITLE)
        .with_inner_size([640.0, 760.0])
        .with_min_inner_size(MIN_VIEWPORT_SIZE);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(move |_cc| match startup {
            Ok(controller) => Ok(Box::new(TutorApp::new(controller))),
            Err(message) => Ok(Box::new(LaunchError { message })),
        }),
    )?;
    Ok(())
}

#[derive(Debug, Default)]
struct GuiArgs {
    dataset: Option<PathBuf>,
    model: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args(args: Vec<String>) -> Result<GuiArgs, String> {
    let mut parsed = GuiArgs::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        let slot = match flag {
            "--dataset" => &mut parsed.dataset,
            "--model" => &mut parsed.model,
            "--config" => &mut parsed.config,
            "-h" | "--help" => {
                return Err(
                    "Usage: tutorscore [--dataset <csv>] [--model <file>] [--config <toml>]"
                        .to_string(),
                );
            }
            unknown => return Err(format!("Unknown argument: {unknown}")),
        };
        idx += 1;
        let value = args
            .get(idx)
            .ok_or_else(|| format!("{flag} requires a value"))?;
        *slot = Some(PathBuf::from(value));
        idx += 1;
    }
    Ok(parsed)
}

fn build_controller(args: &GuiArgs) -> Result<FormController, String> {
    let settings = config::load_or_default(args.config.as_deref())
        .map_err(|err| format!("Failed to load settings: {err}"))?;
    let dataset_path = args.dataset.clone().unwrap_or(settings.dataset_path);
    let model_path = args.model.clone().unwrap_or(settings.model_path);
    let predictor = Predictor::load(&dataset_path, &model_path).map_err(|err| {
        tracing::error!("Startup failed: {err}");
        err.to_string()
    })?;
    Ok(FormController::new(predictor, &dataset_path, &model_path))
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start prediction form");
                ui.label(&self.message);
            });
        });
    }
}
