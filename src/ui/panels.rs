use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use tokio::runtime::Runtime;

use mouse_rhythms::data::model::Sex;

use crate::state::{AppState, ChartKind, DisplayMode};

// ---------------------------------------------------------------------------
// Left side panel – subject selection (individual mode)
// ---------------------------------------------------------------------------

/// Render the left subject panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Subjects");
    ui.separator();

    let Some(derived) = &state.derived else {
        ui.label("No data loaded.");
        return;
    };

    if state.mode != DisplayMode::Individual {
        ui.label("Switch to Individual mode to pick subjects.");
        return;
    }

    // Clone what we need so we can mutate state inside the loop.
    let subjects = derived
        .activity
        .individual
        .raw
        .as_ref()
        .map(|c| c.names().map(str::to_string).collect::<Vec<_>>());

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for sex in [Sex::Male, Sex::Female] {
                let names = subjects.get(sex);
                let n_selected = state.selection.get(sex).len();
                let header_text = format!("{sex}  ({n_selected}/{})", names.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(sex)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(sex);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(sex);
                            }
                        });

                        for name in names {
                            let mut checked = state.selection.get(sex).contains(name);
                            let text =
                                RichText::new(name).color(state.palette.color_for(sex, name));
                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_subject(sex, name);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, runtime: &Runtime) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open folder…").clicked() {
                open_folder_dialog(state, runtime);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                if let Some(dir) = state.data_dir.clone() {
                    state.load_folder(runtime, dir);
                }
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.chart, ChartKind::Comparison, "Comparison");
        ui.selectable_value(&mut state.chart, ChartKind::Histogram, "Histogram");

        ui.separator();

        ui.toggle_value(&mut state.show_activity, "Activity");
        ui.toggle_value(&mut state.show_temperature, "Temperature");

        if state.chart == ChartKind::Comparison {
            ui.separator();
            ui.selectable_value(&mut state.mode, DisplayMode::Average, "Average");
            ui.selectable_value(&mut state.mode, DisplayMode::Individual, "Individual");

            ui.separator();
            let range = state.window_range();
            let changed = ui
                .add(egui::Slider::new(state.window_mut(), range).text("Smoothing window"))
                .changed();
            if changed {
                state.rederive();
            }
        }

        ui.separator();
        ui.toggle_value(&mut state.show_preview, "Data preview");

        if let Some(study) = &state.study {
            ui.separator();
            ui.label(format!(
                "{} + {} subjects, {} ticks",
                study.activity.male.subjects.len(),
                study.activity.female.subjects.len(),
                study.activity.male.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState, runtime: &Runtime) {
    let folder = rfd::FileDialog::new()
        .set_title("Open data folder")
        .pick_folder();

    if let Some(dir) = folder {
        state.load_folder(runtime, dir);
    }
}
