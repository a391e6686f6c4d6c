use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mouse_rhythms::data::loader::StudyFiles;
use mouse_rhythms::data::pipeline::PipelineConfig;

// ---------------------------------------------------------------------------
// Viewer configuration (optional JSON file given as the first argument)
// ---------------------------------------------------------------------------

/// ```json
/// {
///   "data_dir": "assets/data",
///   "files": { "male_activity": "male_act.csv" },
///   "pipeline": { "average_window": 50, "average_edge": "inclusive" }
/// }
/// ```
/// Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Folder loaded at startup, if any.
    pub data_dir: Option<PathBuf>,
    pub files: StudyFiles,
    pub pipeline: PipelineConfig,
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: ViewerConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;

        // relative data_dir is relative to the config file
        if let (Some(dir), Some(base)) = (config.data_dir.as_mut(), path.parent()) {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        Ok(config)
    }

    /// Config from the first CLI argument, defaults without one.
    pub fn from_args() -> Result<Self> {
        match std::env::args_os().nth(1) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}
