/// Data layer: loading and the series pipeline.
///
/// Architecture:
/// ```text
///  male_act.csv  fem_act.csv  male_temp.csv  fem_temp.csv
///        │            │            │              │
///        └────────────┴─────┬──────┴──────────────┘
///                           ▼
///                    ┌────────────┐
///                    │   loader   │  four concurrent loads → Study
///                    └────────────┘
///                           │
///                           ▼
///                    ┌────────────┐
///                    │ aggregate  │  row means / per-subject split
///                    └────────────┘
///                           │
///                           ▼
///                    ┌────────────┐
///                    │ normalize  │  shared min/max across both sexes
///                    └────────────┘
///                           │
///                           ▼
///                    ┌────────────┐
///                    │   smooth   │  centred moving average
///                    └────────────┘
///                           │
///                           ▼
///                     MetricView ──► renderer (locate: cursor lookups)
/// ```
///
/// `pipeline` wires the stages together; `histogram` bins the raw means.

pub mod aggregate;
pub mod error;
pub mod histogram;
pub mod loader;
pub mod locate;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod smooth;
