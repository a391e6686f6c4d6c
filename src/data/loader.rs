use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{RawRecord, SexPair, Study, SubjectMatrix};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load one subject matrix. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header of subject ids, one row of readings per tick
/// * `.json`    – `[{ "m1": 12.0, "m2": 7.5, ... }, ...]`, one object per tick
/// * `.parquet` – one numeric column per subject
pub fn load_file(path: &Path) -> Result<SubjectMatrix> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let matrix = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {}: {} subjects x {} ticks",
        path.display(),
        matrix.subjects.len(),
        matrix.len()
    );
    if matrix.malformed_cells > 0 {
        log::warn!(
            "{}: {} cell(s) are not numbers",
            path.display(),
            matrix.malformed_cells
        );
    }
    Ok(matrix)
}

/// File names of the four matrices inside a data folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyFiles {
    pub male_activity: String,
    pub female_activity: String,
    pub male_temperature: String,
    pub female_temperature: String,
}

impl Default for StudyFiles {
    fn default() -> Self {
        Self {
            male_activity: "male_act.csv".into(),
            female_activity: "fem_act.csv".into(),
            male_temperature: "male_temp.csv".into(),
            female_temperature: "fem_temp.csv".into(),
        }
    }
}

/// Resolved locations of the four matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyPaths {
    pub activity: SexPair<PathBuf>,
    pub temperature: SexPair<PathBuf>,
}

impl StudyPaths {
    pub fn in_dir(dir: &Path, files: &StudyFiles) -> Self {
        Self {
            activity: SexPair::new(
                dir.join(&files.male_activity),
                dir.join(&files.female_activity),
            ),
            temperature: SexPair::new(
                dir.join(&files.male_temperature),
                dir.join(&files.female_temperature),
            ),
        }
    }
}

async fn load_matrix(path: PathBuf) -> Result<SubjectMatrix> {
    tokio::task::spawn_blocking(move || load_file(&path))
        .await
        .context("loader worker join failed")?
}

/// Load all four matrices concurrently. Resolves only once every file has
/// loaded; the first failure aborts the whole study.
pub async fn load_study(paths: &StudyPaths) -> Result<Study> {
    let (male_act, female_act, male_temp, female_temp) = tokio::try_join!(
        load_matrix(paths.activity.male.clone()),
        load_matrix(paths.activity.female.clone()),
        load_matrix(paths.temperature.male.clone()),
        load_matrix(paths.temperature.female.clone()),
    )?;

    Ok(Study {
        activity: SexPair::new(male_act, female_act),
        temperature: SexPair::new(male_temp, female_temp),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row names the subjects; every following row is one tick.
/// Empty cells read as 0; cells that are not numbers become NaN.
fn load_csv(path: &Path) -> Result<SubjectMatrix> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

/// CSV parsing over any reader.
pub fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<SubjectMatrix> {
    let subjects: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().trim_matches('"').to_string())
        .collect();

    if subjects.is_empty() || subjects.iter().all(|s| s.is_empty()) {
        return Err(DataError::EmptyHeader.into());
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let readings = record.iter().map(parse_cell).collect();
        records.push(RawRecord::new(readings));
    }

    Ok(SubjectMatrix::new(subjects, records))
}

/// Numeric coercion of one cell. A blank cell reads as 0. Only decimal
/// notation and `Infinity` are numbers; `inf`, `nan` and other words are not.
fn parse_cell(s: &str) -> f64 {
    let cell = s.trim();
    if cell.is_empty() {
        return 0.0;
    }
    let unsigned = cell.strip_prefix(['+', '-']).unwrap_or(cell);
    match unsigned {
        "Infinity" if cell.starts_with('-') => f64::NEG_INFINITY,
        "Infinity" => f64::INFINITY,
        u if u.starts_with(|c: char| c.is_ascii_digit() || c == '.') => {
            cell.parse::<f64>().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "m1": 12.0, "m2": 7.5 },
///   { "m1": 11.0, "m2": 9.0 }
/// ]
/// ```
///
/// Subjects are taken from the first object; a subject missing from a later
/// row reads as NaN.
fn load_json(path: &Path) -> Result<SubjectMatrix> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<SubjectMatrix> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let subjects: Vec<String> = match rows.first() {
        Some(first) => first
            .as_object()
            .ok_or(DataError::NotAnObject { row: 0 })?
            .keys()
            .cloned()
            .collect(),
        None => Vec::new(),
    };
    if subjects.is_empty() {
        return Err(DataError::EmptyHeader.into());
    }

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or(DataError::NotAnObject { row: i })?;
        let readings = subjects
            .iter()
            .map(|s| obj.get(s).map(json_to_reading).unwrap_or(f64::NAN))
            .collect();
        records.push(RawRecord::new(readings));
    }

    Ok(SubjectMatrix::new(subjects, records))
}

fn json_to_reading(val: &JsonValue) -> f64 {
    match val {
        JsonValue::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        JsonValue::String(s) => parse_cell(s),
        _ => f64::NAN,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Every column is one subject and must be numeric (any int or float width);
/// nulls read as NaN. Works with files written by Pandas and Polars alike.
fn load_parquet(path: &Path) -> Result<SubjectMatrix> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let subjects: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    if subjects.is_empty() {
        return Err(DataError::EmptyHeader.into());
    }
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = batch
            .columns()
            .iter()
            .zip(&subjects)
            .map(|(col, name)| numeric_column(col, name))
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let readings = columns
                .iter()
                .map(|c| {
                    if c.is_null(row) {
                        f64::NAN
                    } else {
                        c.value(row)
                    }
                })
                .collect();
            records.push(RawRecord::new(readings));
        }
    }

    Ok(SubjectMatrix::new(subjects, records))
}

/// Widen any numeric Arrow column to `Float64Array`.
fn numeric_column(col: &Arc<dyn Array>, name: &str) -> Result<Float64Array> {
    if !col.data_type().is_numeric() {
        return Err(DataError::NonNumericColumn {
            column: name.to_string(),
            data_type: format!("{:?}", col.data_type()),
        }
        .into());
    }
    let widened = cast(col.as_ref(), &DataType::Float64)
        .with_context(|| format!("casting column '{name}' to Float64"))?;
    widened
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .with_context(|| format!("column '{name}' did not cast to Float64"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn csv_text(text: &str) -> Result<SubjectMatrix> {
        read_csv(csv::Reader::from_reader(text.as_bytes()))
    }

    #[test]
    fn csv_header_becomes_subjects() {
        let m = csv_text("m1,m2\n1,2\n3.5,4\n").unwrap();
        assert_eq!(m.subjects, vec!["m1", "m2"]);
        assert_eq!(
            m.records,
            vec![RawRecord::new(vec![1.0, 2.0]), RawRecord::new(vec![3.5, 4.0])]
        );
        assert_eq!(m.malformed_cells, 0);
    }

    #[test]
    fn csv_bad_cells_become_nan() {
        let m = csv_text("f1,f2\n1, x\ninf,2\nNaN,-infinity\n").unwrap();
        assert!(m.records[0].readings[1].is_nan());
        assert!(m.records[1].readings[0].is_nan());
        assert!(m.records[2].readings.iter().all(|v| v.is_nan()));
        assert_eq!(m.malformed_cells, 4);
    }

    #[test]
    fn csv_blank_cells_read_as_zero() {
        let m = csv_text("a,b\n4,\n , 6\n").unwrap();
        assert_eq!(
            m.records,
            vec![RawRecord::new(vec![4.0, 0.0]), RawRecord::new(vec![0.0, 6.0])]
        );
        assert_eq!(m.malformed_cells, 0);
        assert_eq!(
            crate::data::aggregate::aggregate_rows(&m.records[..1])[0].value,
            2.0
        );
    }

    #[test]
    fn cell_coercion() {
        assert_eq!(parse_cell(" 1e3 "), 1000.0);
        assert_eq!(parse_cell("-.5"), -0.5);
        assert_eq!(parse_cell("+2."), 2.0);
        assert_eq!(parse_cell("Infinity"), f64::INFINITY);
        assert_eq!(parse_cell("-Infinity"), f64::NEG_INFINITY);
        for word in ["inf", "-inf", "infinity", "nan", "NaN", "12abc", "e5"] {
            assert!(parse_cell(word).is_nan(), "{word}");
        }
    }

    #[test]
    fn csv_ragged_row_is_an_error() {
        assert!(csv_text("a,b\n1,2,3\n").is_err());
    }

    #[test]
    fn json_records() {
        let m = parse_json(r#"[{"m1": 1, "m2": "2.5"}, {"m1": null}]"#).unwrap();
        assert_eq!(m.subjects, vec!["m1", "m2"]);
        assert_eq!(m.records[0], RawRecord::new(vec![1.0, 2.5]));
        assert!(m.records[1].readings.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn json_subjects_keep_file_order() {
        let m = parse_json(r#"[{"m2": 1, "m10": 2, "m1": 3}]"#).unwrap();
        assert_eq!(m.subjects, vec!["m2", "m10", "m1"]);
        assert_eq!(m.records[0], RawRecord::new(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn json_rejects_non_objects() {
        let err = parse_json(r#"[{"m1": 1}, 3]"#).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("unsupported file extension"), "{chain}");
    }

    #[test]
    fn study_paths_join_folder() {
        let p = StudyPaths::in_dir(Path::new("/data"), &StudyFiles::default());
        assert_eq!(p.activity.female, PathBuf::from("/data/fem_act.csv"));
        assert_eq!(p.temperature.male, PathBuf::from("/data/male_temp.csv"));
    }
}
