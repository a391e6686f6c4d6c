use serde::{Deserialize, Serialize};

use super::aggregate::{aggregate_rows_with, subject_series, CellPolicy};
use super::error::PipelineWarning;
use super::histogram::{overlay_histograms, HistogramBin};
use super::locate::locate_nearest;
use super::model::{Metric, SeriesCollection, Sex, SexPair, Study, SubjectMatrix, TimeSample};
use super::normalize::{normalize_collections, normalize_pair, ScaleBounds};
use super::smooth::{smooth_collection, smooth_with, Smoothing, WindowEdge};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Parameters of one full derivation pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Moving-average window for the sex averages.
    pub average_window: usize,
    /// Moving-average window for individual subjects.
    pub individual_window: usize,
    /// Average curves use a half-open window.
    pub average_edge: WindowEdge,
    /// Individual curves include both window ends.
    pub individual_edge: WindowEdge,
    pub cell_policy: CellPolicy,
    pub histogram_bins: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            average_window: 50,
            individual_window: 120,
            average_edge: WindowEdge::Exclusive,
            individual_edge: WindowEdge::Inclusive,
            cell_policy: CellPolicy::Propagate,
            histogram_bins: 40,
        }
    }
}

impl PipelineConfig {
    fn average_smoothing(&self) -> Smoothing {
        Smoothing {
            window: self.average_window,
            edge: self.average_edge,
        }
    }

    fn individual_smoothing(&self) -> Smoothing {
        Smoothing {
            window: self.individual_window,
            edge: self.individual_edge,
        }
    }
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Per-sex mean series of one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct AverageSeries {
    /// Row means before normalisation; kept for literal tooltip values.
    pub raw: SexPair<Vec<TimeSample>>,
    /// Shared-scale normalised, then smoothed.
    pub smoothed: SexPair<Vec<TimeSample>>,
    pub scale: ScaleBounds,
}

/// Per-subject series of one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct IndividualSeries {
    pub raw: SexPair<SeriesCollection>,
    pub smoothed: SexPair<SeriesCollection>,
    pub scale: ScaleBounds,
}

/// What a cursor at some tick reads from a pair of series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorReadout {
    pub time: usize,
    pub raw: SexPair<f64>,
    pub smoothed: SexPair<f64>,
}

/// Everything the renderer needs for one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricView {
    pub metric: Metric,
    pub average: AverageSeries,
    pub individual: IndividualSeries,
    /// Histograms of the raw row means.
    pub histogram: SexPair<Vec<HistogramBin>>,
    pub warnings: Vec<PipelineWarning>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudyView {
    pub activity: MetricView,
    pub temperature: MetricView,
}

impl StudyView {
    pub fn metric(&self, metric: Metric) -> &MetricView {
        match metric {
            Metric::Activity => &self.activity,
            Metric::Temperature => &self.temperature,
        }
    }

    pub fn warnings(&self) -> impl Iterator<Item = &PipelineWarning> {
        self.activity
            .warnings
            .iter()
            .chain(&self.temperature.warnings)
    }
}

fn readout(
    raw: SexPair<&[TimeSample]>,
    smoothed: SexPair<&[TimeSample]>,
    query: f64,
) -> Option<CursorReadout> {
    let anchor = locate_nearest(smoothed.male, query)
        .or_else(|| locate_nearest(smoothed.female, query))?;
    let time = anchor.time as f64;
    let value_at = |s: &[TimeSample]| locate_nearest(s, time).map_or(f64::NAN, |t| t.value);
    Some(CursorReadout {
        time: anchor.time,
        raw: SexPair::new(value_at(raw.male), value_at(raw.female)),
        smoothed: SexPair::new(value_at(smoothed.male), value_at(smoothed.female)),
    })
}

fn subject_values<'a>(c: &'a SexPair<SeriesCollection>, sex: Sex, name: &str) -> &'a [TimeSample] {
    c.get(sex)
        .get(name)
        .map_or(&[][..], |s| s.values.as_slice())
}

impl AverageSeries {
    /// Nearest tick to `query` with raw and smoothed values of both sexes.
    pub fn readout(&self, query: f64) -> Option<CursorReadout> {
        readout(
            SexPair::new(self.raw.male.as_slice(), self.raw.female.as_slice()),
            SexPair::new(
                self.smoothed.male.as_slice(),
                self.smoothed.female.as_slice(),
            ),
            query,
        )
    }
}

impl IndividualSeries {
    /// Like [`AverageSeries::readout`] for one chosen subject per sex.
    pub fn readout(&self, subjects: SexPair<&str>, query: f64) -> Option<CursorReadout> {
        let (male, female) = (subjects.male, subjects.female);
        readout(
            SexPair::new(
                subject_values(&self.raw, Sex::Male, male),
                subject_values(&self.raw, Sex::Female, female),
            ),
            SexPair::new(
                subject_values(&self.smoothed, Sex::Male, male),
                subject_values(&self.smoothed, Sex::Female, female),
            ),
            query,
        )
    }
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

fn matrix_warnings(metric: Metric, matrices: &SexPair<SubjectMatrix>) -> Vec<PipelineWarning> {
    let mut warnings = Vec::new();
    for sex in [Sex::Male, Sex::Female] {
        let count = matrices.get(sex).malformed_cells;
        if count > 0 {
            warnings.push(PipelineWarning::MalformedCells { metric, sex, count });
        }
    }
    if matrices.male.len() != matrices.female.len() {
        warnings.push(PipelineWarning::LengthMismatch {
            metric,
            male: matrices.male.len(),
            female: matrices.female.len(),
        });
    }
    warnings
}

fn scale_warning(metric: Metric, mode: &'static str, scale: ScaleBounds) -> Option<PipelineWarning> {
    scale.is_degenerate().then_some(PipelineWarning::DegenerateScale {
        metric,
        mode,
        min: scale.min,
        max: scale.max,
    })
}

/// Aggregate, normalise and smooth one metric for both sexes.
pub fn derive_average(
    matrices: &SexPair<SubjectMatrix>,
    config: &PipelineConfig,
) -> AverageSeries {
    let raw = matrices
        .as_ref()
        .map(|m| aggregate_rows_with(&m.records, config.cell_policy));
    let normalized = normalize_pair(&raw.male, &raw.female);
    let smoothing = config.average_smoothing();
    let smoothed = SexPair::new(
        smooth_with(&normalized.a, smoothing),
        smooth_with(&normalized.b, smoothing),
    );
    AverageSeries {
        raw,
        smoothed,
        scale: normalized.scale,
    }
}

/// Split, normalise over all subjects of both sexes, and smooth per subject.
pub fn derive_individual(
    matrices: &SexPair<SubjectMatrix>,
    config: &PipelineConfig,
) -> IndividualSeries {
    let raw = matrices
        .as_ref()
        .map(|m| subject_series(m, config.cell_policy));
    let (male, female, scale) = normalize_collections(&raw.male, &raw.female);
    let smoothing = config.individual_smoothing();
    let smoothed = SexPair::new(
        smooth_collection(&male, smoothing),
        smooth_collection(&female, smoothing),
    );
    IndividualSeries {
        raw,
        smoothed,
        scale,
    }
}

/// Full derivation of one metric. Warnings are logged as well as returned.
pub fn derive_metric(
    metric: Metric,
    matrices: &SexPair<SubjectMatrix>,
    config: &PipelineConfig,
) -> MetricView {
    let average = derive_average(matrices, config);
    let individual = derive_individual(matrices, config);
    let histogram = overlay_histograms(
        &average.raw.male,
        &average.raw.female,
        config.histogram_bins,
    );

    let mut warnings = matrix_warnings(metric, matrices);
    warnings.extend(scale_warning(metric, "average", average.scale));
    warnings.extend(scale_warning(metric, "individual", individual.scale));
    for w in &warnings {
        log::warn!("{w}");
    }

    MetricView {
        metric,
        average,
        individual,
        histogram,
        warnings,
    }
}

/// Rebuild every derived series from the loaded study.
pub fn derive_study(study: &Study, config: &PipelineConfig) -> StudyView {
    StudyView {
        activity: derive_metric(Metric::Activity, &study.activity, config),
        temperature: derive_metric(Metric::Temperature, &study.temperature, config),
    }
}
