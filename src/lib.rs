//! Activity and body-temperature rhythm pipeline for mouse cohort recordings.
//!
//! The `data` module turns per-sex subject matrices into normalised, smoothed
//! series; the `mouse-rhythms` binary draws them.

pub mod data;

pub use data::aggregate::{aggregate_rows, CellPolicy};
pub use data::locate::locate_nearest;
pub use data::model::{Metric, PairedTimeSample, Sex, SexPair, Study, SubjectMatrix, TimeSample};
pub use data::normalize::{normalize_pair, NormalizedPair, ScaleBounds};
pub use data::pipeline::{derive_study, PipelineConfig, StudyView};
pub use data::smooth::{smooth, Smoothing, WindowEdge};
