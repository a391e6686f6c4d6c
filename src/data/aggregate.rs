use serde::{Deserialize, Serialize};

use super::model::{RawRecord, SeriesCollection, SubjectMatrix, SubjectSeries, TimeSample};

// ---------------------------------------------------------------------------
// Malformed-cell policy
// ---------------------------------------------------------------------------

/// How NaN readings (cells that failed to parse) enter the row mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellPolicy {
    /// Keep NaN; any malformed cell makes the row mean NaN.
    #[default]
    Propagate,
    /// Treat malformed cells as zero readings.
    Zero,
    /// Leave malformed cells out of the mean. An all-NaN row stays NaN.
    Skip,
}

impl CellPolicy {
    fn resolve(self, v: f64) -> Option<f64> {
        match self {
            CellPolicy::Propagate => Some(v),
            CellPolicy::Zero if v.is_nan() => Some(0.0),
            CellPolicy::Skip if v.is_nan() => None,
            _ => Some(v),
        }
    }
}

// ---------------------------------------------------------------------------
// Row means
// ---------------------------------------------------------------------------

/// Arithmetic mean of `values`, summed in order. `NaN` when empty.
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Reduce every row to the mean of its readings; `time` is the row index.
pub fn aggregate_rows(records: &[RawRecord]) -> Vec<TimeSample> {
    aggregate_rows_with(records, CellPolicy::Propagate)
}

/// [`aggregate_rows`] with an explicit malformed-cell policy.
pub fn aggregate_rows_with(records: &[RawRecord], policy: CellPolicy) -> Vec<TimeSample> {
    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let value = mean(rec.readings.iter().filter_map(|&v| policy.resolve(v)));
            TimeSample::new(i, value)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Per-subject split
// ---------------------------------------------------------------------------

/// One series per matrix column, in header order.
///
/// Under [`CellPolicy::Skip`] malformed cells stay NaN: a single reading has
/// nothing to be averaged with.
pub fn subject_series(matrix: &SubjectMatrix, policy: CellPolicy) -> SeriesCollection {
    let series = matrix
        .subjects
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let values = matrix
                .records
                .iter()
                .enumerate()
                .map(|(t, rec)| {
                    let v = rec.readings.get(col).copied().unwrap_or(f64::NAN);
                    TimeSample::new(t, policy.resolve(v).unwrap_or(v))
                })
                .collect();
            SubjectSeries {
                name: name.clone(),
                values,
            }
        })
        .collect();
    SeriesCollection { series }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rows(data: &[&[f64]]) -> Vec<RawRecord> {
        data.iter().map(|r| RawRecord::new(r.to_vec())).collect()
    }

    #[test]
    fn row_mean_and_index() {
        let out = aggregate_rows(&rows(&[&[2.0, 4.0], &[6.0, 8.0], &[1.0, 2.0, 6.0]]));
        assert_eq!(
            out,
            vec![
                TimeSample::new(0, 3.0),
                TimeSample::new(1, 7.0),
                TimeSample::new(2, 3.0),
            ]
        );
    }

    #[test]
    fn nan_propagates_by_default() {
        let out = aggregate_rows(&rows(&[&[1.0, f64::NAN]]));
        assert!(out[0].value.is_nan());
    }

    #[test]
    fn zero_and_skip_policies() {
        let data = rows(&[&[4.0, f64::NAN]]);
        assert_eq!(aggregate_rows_with(&data, CellPolicy::Zero)[0].value, 2.0);
        assert_eq!(aggregate_rows_with(&data, CellPolicy::Skip)[0].value, 4.0);

        let all_bad = rows(&[&[f64::NAN, f64::NAN]]);
        assert!(aggregate_rows_with(&all_bad, CellPolicy::Skip)[0].value.is_nan());
    }

    #[test]
    fn empty_row_is_nan() {
        let out = aggregate_rows(&rows(&[&[]]));
        assert_eq!(out[0].time, 0);
        assert!(out[0].value.is_nan());
    }

    #[test]
    fn splits_columns_into_named_series() {
        let m = SubjectMatrix::new(
            vec!["f1".into(), "f2".into()],
            rows(&[&[1.0, 2.0], &[3.0, f64::NAN]]),
        );
        let c = subject_series(&m, CellPolicy::Zero);
        assert_eq!(c.names().collect::<Vec<_>>(), vec!["f1", "f2"]);
        assert_eq!(
            c.get("f2").map(|s| s.values.clone()),
            Some(vec![TimeSample::new(0, 2.0), TimeSample::new(1, 0.0)])
        );
    }
}
