use eframe::egui;
use tokio::runtime::Runtime;

use crate::config::ViewerConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, preview};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MouseRhythmsApp {
    pub state: AppState,
    /// Drives the concurrent matrix loads.
    runtime: Runtime,
}

impl MouseRhythmsApp {
    pub fn new(config: ViewerConfig, runtime: Runtime) -> Self {
        let startup_dir = config.data_dir.clone();
        let mut state = AppState::new(config);
        if let Some(dir) = startup_dir {
            state.load_folder(&runtime, dir);
        }
        Self { state, runtime }
    }
}

impl eframe::App for MouseRhythmsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &self.runtime);
        });

        // ---- Bottom panel: raw data preview ----
        if self.state.show_preview {
            egui::TopBottomPanel::bottom("preview_panel")
                .resizable(true)
                .default_height(240.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::both().show(ui, |ui| {
                        preview::data_preview(ui, &self.state);
                    });
                });
        }

        // ---- Left side panel: subjects ----
        egui::SidePanel::left("subject_panel")
            .default_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::central_plot(ui, &self.state);
        });
    }
}
