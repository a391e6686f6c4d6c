use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use mouse_rhythms::data::model::{Metric, Sex, SubjectMatrix};

use crate::state::AppState;

/// Rows shown per matrix.
const PREVIEW_ROWS: usize = 10;

// ---------------------------------------------------------------------------
// Raw data preview (bottom panel)
// ---------------------------------------------------------------------------

/// First rows of every loaded matrix, as read from disk.
pub fn data_preview(ui: &mut Ui, state: &AppState) {
    let Some(study) = &state.study else {
        ui.label("No data loaded.");
        return;
    };

    ui.horizontal_top(|ui: &mut Ui| {
        for metric in Metric::ALL {
            for sex in [Sex::Male, Sex::Female] {
                let matrix = study.metric(metric).get(sex);
                ui.vertical(|ui: &mut Ui| {
                    ui.label(RichText::new(format!("{sex} {metric}")).strong());
                    ui.push_id((metric, sex), |ui: &mut Ui| matrix_table(ui, matrix));
                });
                ui.separator();
            }
        }
    });
}

fn matrix_table(ui: &mut Ui, matrix: &SubjectMatrix) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto())
        .columns(Column::auto().at_least(40.0), matrix.subjects.len())
        .header(18.0, |mut header| {
            header.col(|ui| {
                ui.strong("tick");
            });
            for name in &matrix.subjects {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|mut body| {
            for (tick, record) in matrix.records.iter().take(PREVIEW_ROWS).enumerate() {
                body.row(16.0, |mut row| {
                    row.col(|ui| {
                        ui.label(tick.to_string());
                    });
                    for v in &record.readings {
                        row.col(|ui| {
                            ui.label(format!("{v}"));
                        });
                    }
                });
            }
        });
}
