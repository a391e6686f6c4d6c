//! Concurrent loading of a four-matrix study folder from disk.

use std::path::PathBuf;

use mouse_rhythms::data::loader::{load_study, StudyFiles, StudyPaths};
use mouse_rhythms::{derive_study, Metric, PipelineConfig, Sex, WindowEdge};
use pretty_assertions::assert_eq;

/// Fresh scratch folder per test, removed on drop.
struct Scratch(PathBuf);

impl Scratch {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "mouse-rhythms-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        Scratch(dir)
    }

    fn write(&self, file: &str, contents: &str) {
        std::fs::write(self.0.join(file), contents).unwrap();
    }

    fn write_study(&self) {
        self.write("male_act.csv", "m1,m2\n2,4\n6,8\n");
        self.write("fem_act.csv", "f1,f2\n0,10\n0,0\n");
        self.write("male_temp.csv", "m1,m2\n37.0,37.2\n36.8, \n");
        self.write("fem_temp.csv", "f1,f2\n37.1,37.3\n36.9,inf\n");
    }

    fn paths(&self) -> StudyPaths {
        StudyPaths::in_dir(&self.0, &StudyFiles::default())
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[tokio::test]
async fn loads_all_four_matrices() {
    let scratch = Scratch::new("all-four");
    scratch.write_study();

    let study = load_study(&scratch.paths()).await.unwrap();

    assert_eq!(study.activity.male.subjects, vec!["m1", "m2"]);
    assert_eq!(study.activity.female.subjects, vec!["f1", "f2"]);
    assert_eq!(study.activity.male.len(), 2);
    assert_eq!(study.temperature.male.reading(0, "m2"), Some(37.2));
    // a blank cell reads as zero, an unknown word is malformed
    assert_eq!(study.temperature.male.reading(1, "m2"), Some(0.0));
    assert_eq!(study.temperature.male.malformed_cells, 0);
    assert_eq!(study.temperature.female.malformed_cells, 1);
    assert!(study
        .temperature
        .female
        .reading(1, "f2")
        .is_some_and(f64::is_nan));
}

#[tokio::test]
async fn loaded_study_feeds_the_pipeline() {
    let scratch = Scratch::new("pipeline");
    scratch.write_study();

    let study = load_study(&scratch.paths()).await.unwrap();
    let config = PipelineConfig {
        average_window: 1,
        average_edge: WindowEdge::Inclusive,
        ..PipelineConfig::default()
    };
    let view = derive_study(&study, &config);

    let smoothed: Vec<f64> = view
        .metric(Metric::Activity)
        .average
        .smoothed
        .get(Sex::Female)
        .iter()
        .map(|s| s.value)
        .collect();
    assert_eq!(smoothed, vec![5.0 / 7.0, 0.0]);

    let warnings: Vec<String> = view.warnings().map(ToString::to_string).collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("Temperature"));
}

#[tokio::test]
async fn one_missing_file_fails_the_whole_study() {
    let scratch = Scratch::new("missing");
    scratch.write_study();
    std::fs::remove_file(scratch.0.join("fem_temp.csv")).unwrap();

    let err = load_study(&scratch.paths()).await.unwrap_err();
    assert!(format!("{err:#}").contains("fem_temp.csv"));
}

#[tokio::test]
async fn malformed_header_fails_the_whole_study() {
    let scratch = Scratch::new("bad-header");
    scratch.write_study();
    scratch.write("male_act.csv", "");

    assert!(load_study(&scratch.paths()).await.is_err());
}
