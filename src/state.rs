use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use tokio::runtime::Runtime;

use mouse_rhythms::data::loader::{load_study, StudyPaths};
use mouse_rhythms::data::model::{Metric, Sex, SexPair, Study};
use mouse_rhythms::data::pipeline::{derive_study, StudyView};
use mouse_rhythms::data::smooth::WindowEdge;

use crate::color::SubjectPalette;
use crate::config::ViewerConfig;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Comparison,
    Histogram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Average,
    Individual,
}

/// Largest smoothing window the slider offers.
pub const MAX_WINDOW: usize = 240;

/// Subjects drawn in individual mode, per sex.
pub type SubjectSelection = SexPair<BTreeSet<String>>;

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,

    /// Folder the current study was loaded from.
    pub data_dir: Option<PathBuf>,

    /// Loaded matrices (None until a folder is opened).
    pub study: Option<Study>,

    /// Series derived from `study` with the current pipeline settings.
    pub derived: Option<StudyView>,

    pub chart: ChartKind,
    pub mode: DisplayMode,
    pub show_activity: bool,
    pub show_temperature: bool,
    pub show_preview: bool,

    pub selection: SubjectSelection,
    pub palette: SubjectPalette,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Last failed load; cleared by the next successful one.
    pub load_error: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            data_dir: None,
            study: None,
            derived: None,
            chart: ChartKind::Comparison,
            mode: DisplayMode::Average,
            show_activity: true,
            show_temperature: true,
            show_preview: false,
            selection: SubjectSelection::default(),
            palette: SubjectPalette::default(),
            status_message: None,
            load_error: None,
            loading: false,
        }
    }

    /// Load the four matrices of `dir` concurrently and derive all series.
    /// On failure the previous study stays in place.
    pub fn load_folder(&mut self, runtime: &Runtime, dir: PathBuf) {
        self.loading = true;
        let paths = StudyPaths::in_dir(&dir, &self.config.files);
        match runtime.block_on(load_study(&paths)) {
            Ok(study) => {
                log::info!(
                    "Loaded study from {}: {} activity / {} temperature ticks",
                    dir.display(),
                    study.activity.male.len(),
                    study.temperature.male.len()
                );
                self.data_dir = Some(dir);
                self.load_error = None;
                self.set_study(study);
            }
            Err(e) => {
                log::error!("Failed to load study: {e:#}");
                self.load_error = Some(format!("Error: {e:#}"));
                self.refresh_status();
                self.loading = false;
            }
        }
    }

    /// Ingest a newly loaded study, derive series and reset selections.
    pub fn set_study(&mut self, study: Study) {
        self.study = Some(study);
        self.rederive();

        if let Some(derived) = &self.derived {
            let individual = &derived.activity.individual.raw;
            self.palette = SubjectPalette::new(individual);
            // first subject of each sex selected
            self.selection = individual
                .as_ref()
                .map(|c| c.names().take(1).map(str::to_string).collect());
        }
        self.loading = false;
    }

    /// Recompute every derived series from the retained study.
    pub fn rederive(&mut self) {
        let Some(study) = &self.study else {
            return;
        };
        self.derived = Some(derive_study(study, &self.config.pipeline));
        self.refresh_status();
    }

    /// Load error first, then the pipeline warnings of the current study.
    fn refresh_status(&mut self) {
        let mut parts: Vec<String> = self.load_error.iter().cloned().collect();
        if let Some(derived) = &self.derived {
            parts.extend(derived.warnings().map(|w| w.to_string()));
        }
        self.status_message = (!parts.is_empty()).then(|| parts.join("; "));
    }

    /// Smoothing window of the active display mode.
    pub fn window_mut(&mut self) -> &mut usize {
        match self.mode {
            DisplayMode::Average => &mut self.config.pipeline.average_window,
            DisplayMode::Individual => &mut self.config.pipeline.individual_window,
        }
    }

    /// Slider range for [`window_mut`](Self::window_mut). A half-open
    /// window needs at least 2 to cover its centre.
    pub fn window_range(&self) -> RangeInclusive<usize> {
        let pipeline = &self.config.pipeline;
        let edge = match self.mode {
            DisplayMode::Average => pipeline.average_edge,
            DisplayMode::Individual => pipeline.individual_edge,
        };
        match edge {
            WindowEdge::Inclusive => 1..=MAX_WINDOW,
            WindowEdge::Exclusive => 2..=MAX_WINDOW,
        }
    }

    pub fn visible_metrics(&self) -> Vec<Metric> {
        Metric::ALL
            .into_iter()
            .filter(|m| match m {
                Metric::Activity => self.show_activity,
                Metric::Temperature => self.show_temperature,
            })
            .collect()
    }

    /// Toggle a single subject in the individual-mode selection.
    pub fn toggle_subject(&mut self, sex: Sex, subject: &str) {
        let selected = self.selection.get_mut(sex);
        if !selected.remove(subject) {
            selected.insert(subject.to_string());
        }
    }

    /// Select every subject of one sex.
    pub fn select_all(&mut self, sex: Sex) {
        if let Some(derived) = &self.derived {
            let all = derived
                .activity
                .individual
                .raw
                .get(sex)
                .names()
                .map(str::to_string)
                .collect();
            *self.selection.get_mut(sex) = all;
        }
    }

    pub fn select_none(&mut self, sex: Sex) {
        self.selection.get_mut(sex).clear();
    }

    /// First selected subject of each sex, for the cursor readout. A sex
    /// with nothing selected gets an empty name, which reads as NaN.
    pub fn cursor_subjects(&self) -> Option<SexPair<&str>> {
        fn first(set: &BTreeSet<String>) -> Option<&str> {
            set.iter().next().map(String::as_str)
        }
        match (first(&self.selection.male), first(&self.selection.female)) {
            (None, None) => None,
            (male, female) => Some(SexPair::new(
                male.unwrap_or_default(),
                female.unwrap_or_default(),
            )),
        }
    }
}
