use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{
    Bar, BarChart, Legend, Line, LineStyle, MarkerShape, Plot, PlotPoint, PlotPoints, PlotUi,
    Points, VLine,
};

use mouse_rhythms::data::model::{Metric, Sex, TimeSample};
use mouse_rhythms::data::pipeline::{CursorReadout, MetricView, StudyView};

use crate::color::{self, sex_color};
use crate::state::{AppState, ChartKind, DisplayMode};

/// Ticks per day; one tick is one minute.
pub const TICKS_PER_DAY: f64 = 1440.0;

/// Days of the recording on which estrus begins.
pub const ESTRUS_DAYS: [u32; 4] = [1, 5, 9, 13];

// ---------------------------------------------------------------------------
// Central panel dispatch
// ---------------------------------------------------------------------------

/// Render the chart selected in the top bar.
pub fn central_plot(ui: &mut Ui, state: &AppState) {
    let Some(derived) = &state.derived else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a data folder to view recordings  (File → Open folder…)");
        });
        return;
    };

    match state.chart {
        ChartKind::Comparison => comparison_plot(ui, state, derived),
        ChartKind::Histogram => histogram_plot(ui, state, derived),
    }
}

fn to_points(series: &[TimeSample]) -> PlotPoints<'static> {
    series.iter().map(|s| [s.time as f64, s.value]).collect()
}

fn metric_style(metric: Metric) -> LineStyle {
    match metric {
        Metric::Activity => LineStyle::Solid,
        Metric::Temperature => LineStyle::dashed_loose(),
    }
}

fn day_label(ticks: f64) -> String {
    format!("{:.1}d", ticks / TICKS_PER_DAY + 1.0)
}

// ---------------------------------------------------------------------------
// Comparison (time series) plot
// ---------------------------------------------------------------------------

fn comparison_plot(ui: &mut Ui, state: &AppState, derived: &StudyView) {
    let metrics = state.visible_metrics();
    // leave room for the readout line below the chart
    let plot_height = (ui.available_height() - 48.0).max(120.0);

    let response = Plot::new("comparison_plot")
        .height(plot_height)
        .legend(Legend::default())
        .x_axis_label("Time (days)")
        .y_axis_label("Normalised level")
        .x_axis_formatter(|mark, _range| day_label(mark.value))
        .include_y(0.0)
        .include_y(1.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for day in ESTRUS_DAYS {
                plot_ui.vline(
                    VLine::new(day as f64 * TICKS_PER_DAY)
                        .name("Estrus start")
                        .color(color::ESTRUS)
                        .style(LineStyle::dashed_dense()),
                );
            }

            for &metric in &metrics {
                let view = derived.metric(metric);
                match state.mode {
                    DisplayMode::Average => draw_average(plot_ui, view),
                    DisplayMode::Individual => draw_individual(plot_ui, state, view),
                }
            }

            let pointer = plot_ui.pointer_coordinate()?;
            for &metric in &metrics {
                if let Some(r) = readout_for(state, derived.metric(metric), pointer.x) {
                    plot_ui.vline(VLine::new(r.time as f64).color(color::CURSOR).width(0.5));
                    plot_ui.points(cursor_points(&r));
                }
            }
            Some(pointer)
        });

    let Some(pointer) = response.inner else {
        ui.label(RichText::new("Hover the chart for values").weak());
        return;
    };
    cursor_readout(ui, state, derived, &metrics, pointer);
}

fn draw_average<'a>(plot_ui: &mut PlotUi<'a>, view: &'a MetricView) {
    for sex in [Sex::Male, Sex::Female] {
        let line = Line::new(to_points(view.average.smoothed.get(sex)))
            .name(format!("{sex} {}", view.metric))
            .color(sex_color(sex))
            .style(metric_style(view.metric))
            .width(1.5);
        plot_ui.line(line);
    }
}

fn draw_individual<'a>(plot_ui: &mut PlotUi<'a>, state: &'a AppState, view: &'a MetricView) {
    for sex in [Sex::Male, Sex::Female] {
        let collection = view.individual.smoothed.get(sex);
        for name in state.selection.get(sex) {
            let Some(series) = collection.get(name) else {
                continue;
            };
            let line = Line::new(to_points(&series.values))
                .name(format!("{name} {}", view.metric))
                .color(state.palette.color_for(sex, name))
                .style(metric_style(view.metric))
                .width(1.5);
            plot_ui.line(line);
        }
    }
}

// ---------------------------------------------------------------------------
// Cursor readout
// ---------------------------------------------------------------------------

fn readout_for(state: &AppState, view: &MetricView, x: f64) -> Option<CursorReadout> {
    match state.mode {
        DisplayMode::Average => view.average.readout(x),
        DisplayMode::Individual => view.individual.readout(state.cursor_subjects()?, x),
    }
}

fn cursor_readout(
    ui: &mut Ui,
    state: &AppState,
    derived: &StudyView,
    metrics: &[Metric],
    pointer: PlotPoint,
) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for &metric in metrics {
            let Some(r) = readout_for(state, derived.metric(metric), pointer.x) else {
                continue;
            };
            let heading = format!("{metric} @ tick {} ({})", r.time, day_label(r.time as f64));
            ui.label(RichText::new(heading).strong());
            for sex in [Sex::Male, Sex::Female] {
                if r.smoothed.get(sex).is_nan() && r.raw.get(sex).is_nan() {
                    continue;
                }
                ui.label(
                    RichText::new(format!(
                        "{sex}: {:.2} (norm. {:.2})",
                        r.raw.get(sex),
                        r.smoothed.get(sex)
                    ))
                    .color(sex_color(sex)),
                );
            }
            ui.separator();
        }
    });
}

/// Cursor markers drawn on top of the lines; a sex without a value gets none.
fn cursor_points(readout: &CursorReadout) -> Points<'static> {
    let x = readout.time as f64;
    let markers: Vec<[f64; 2]> = [readout.smoothed.male, readout.smoothed.female]
        .into_iter()
        .filter(|y| !y.is_nan())
        .map(|y| [x, y])
        .collect();
    Points::new(markers)
        .shape(MarkerShape::Circle)
        .radius(4.0)
        .color(color::CURSOR)
}

// ---------------------------------------------------------------------------
// Histogram plot
// ---------------------------------------------------------------------------

fn histogram_plot(ui: &mut Ui, state: &AppState, derived: &StudyView) {
    let metrics = state.visible_metrics();
    if metrics.is_empty() {
        ui.label("Select Activity or Temperature in the top bar.");
        return;
    }

    ui.columns(metrics.len(), |columns| {
        for (col, &metric) in columns.iter_mut().zip(&metrics) {
            let view = derived.metric(metric);
            col.label(RichText::new(format!("Histogram of average {metric}")).strong());
            Plot::new(("histogram_plot", metric))
                .legend(Legend::default())
                .x_axis_label(metric.to_string())
                .y_axis_label("Ticks")
                .allow_boxed_zoom(true)
                .allow_drag(true)
                .allow_zoom(true)
                .show(col, |plot_ui| {
                    for sex in [Sex::Male, Sex::Female] {
                        let bars = view
                            .histogram
                            .get(sex)
                            .iter()
                            .map(|b| Bar::new(b.center(), b.count as f64).width(b.width()))
                            .collect();
                        let c = sex_color(sex);
                        let chart = BarChart::new(bars)
                            .name(sex.to_string())
                            .color(Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), 170));
                        plot_ui.bar_chart(chart);
                    }
                });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use mouse_rhythms::data::model::SexPair;

    fn readout(male: f64, female: f64) -> CursorReadout {
        CursorReadout {
            time: 1440,
            raw: SexPair::new(male, female),
            smoothed: SexPair::new(male, female),
        }
    }

    #[test]
    fn cursor_points_outlive_their_readout() {
        let points: Vec<Points<'static>> = (0..2)
            .map(|i| {
                let r = readout(i as f64, 0.5);
                cursor_points(&r)
            })
            .collect();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn day_labels_start_at_day_one() {
        assert_eq!(day_label(0.0), "1.0d");
        assert_eq!(day_label(TICKS_PER_DAY * 1.5), "2.5d");
    }
}
