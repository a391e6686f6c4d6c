use serde::{Deserialize, Serialize};

use super::aggregate::mean;
use super::model::{SeriesCollection, SubjectSeries, TimeSample};

/// Where a window centred on `i` with half-width `h = window / 2` ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowEdge {
    /// `[i - h, i + h]`, both ends included.
    #[default]
    Inclusive,
    /// `[i - h, i + h)`, the window of the average curves.
    Exclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Smoothing {
    pub window: usize,
    #[serde(default)]
    pub edge: WindowEdge,
}

impl Smoothing {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            edge: WindowEdge::Inclusive,
        }
    }

    /// Index range averaged for position `i` of a series of length `len`.
    /// Truncated at both ends of the series, never padded.
    pub fn bounds(&self, i: usize, len: usize) -> std::ops::Range<usize> {
        let half = self.window / 2;
        let start = i.saturating_sub(half);
        let end = match self.edge {
            WindowEdge::Inclusive => (i + half + 1).min(len),
            WindowEdge::Exclusive => (i + half).min(len),
        };
        start..end.max(start)
    }
}

/// Centred moving average with the default inclusive window.
pub fn smooth(series: &[TimeSample], window_size: usize) -> Vec<TimeSample> {
    smooth_with(series, Smoothing::new(window_size))
}

/// Centred moving average. An empty window (exclusive edge with a window
/// below 2) averages to NaN.
pub fn smooth_with(series: &[TimeSample], smoothing: Smoothing) -> Vec<TimeSample> {
    let len = series.len();
    series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let window = &series[smoothing.bounds(i, len)];
            TimeSample::new(s.time, mean(window.iter().map(|w| w.value)))
        })
        .collect()
}

/// Smooth every subject of a collection independently.
pub fn smooth_collection(collection: &SeriesCollection, smoothing: Smoothing) -> SeriesCollection {
    SeriesCollection {
        series: collection
            .series
            .iter()
            .map(|s| SubjectSeries {
                name: s.name.clone(),
                values: smooth_with(&s.values, smoothing),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn series(values: &[f64]) -> Vec<TimeSample> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| TimeSample::new(i, v))
            .collect()
    }

    fn values(s: &[TimeSample]) -> Vec<f64> {
        s.iter().map(|t| t.value).collect()
    }

    #[test]
    fn inclusive_window_shrinks_at_both_ends() {
        // window 4 → half 2
        let out = smooth(&series(&[0.0, 3.0, 6.0, 9.0, 12.0, 15.0]), 4);
        assert_eq!(
            values(&out),
            vec![
                (0.0 + 3.0 + 6.0) / 3.0,
                (0.0 + 3.0 + 6.0 + 9.0) / 4.0,
                (0.0 + 3.0 + 6.0 + 9.0 + 12.0) / 5.0,
                (3.0 + 6.0 + 9.0 + 12.0 + 15.0) / 5.0,
                (6.0 + 9.0 + 12.0 + 15.0) / 4.0,
                (9.0 + 12.0 + 15.0) / 3.0,
            ]
        );
    }

    #[test]
    fn exclusive_window_drops_the_right_end() {
        let s = Smoothing {
            window: 4,
            edge: WindowEdge::Exclusive,
        };
        let out = smooth_with(&series(&[0.0, 3.0, 6.0, 9.0]), s);
        assert_eq!(
            values(&out),
            vec![
                (0.0 + 3.0) / 2.0,
                (0.0 + 3.0 + 6.0) / 3.0,
                (0.0 + 3.0 + 6.0 + 9.0) / 4.0,
                (3.0 + 6.0 + 9.0) / 3.0,
            ]
        );
    }

    #[test]
    fn exclusive_window_below_two_is_empty() {
        let s = Smoothing {
            window: 1,
            edge: WindowEdge::Exclusive,
        };
        assert_eq!(s.bounds(3, 10), 3..3);
        assert!(smooth_with(&series(&[1.0]), s)[0].value.is_nan());
    }

    #[test]
    fn nan_spreads_over_one_window_only() {
        // window 4 → half 2; NaN at index 4 reaches indices 2..=6
        let mut raw = vec![1.0; 9];
        raw[4] = f64::NAN;
        let out = smooth(&series(&raw), 4);
        let nan_at: Vec<usize> = out
            .iter()
            .filter(|s| s.value.is_nan())
            .map(|s| s.time)
            .collect();
        assert_eq!(nan_at, vec![2, 3, 4, 5, 6]);
        assert!(out
            .iter()
            .filter(|s| !s.value.is_nan())
            .all(|s| s.value == 1.0));
    }

    #[test]
    fn window_of_one_is_identity() {
        let input = series(&[1.0, 5.0, 2.0]);
        assert_eq!(smooth(&input, 1), input);
    }

    #[test]
    fn time_is_preserved() {
        let input = vec![TimeSample::new(10, 1.0), TimeSample::new(11, 2.0)];
        let out = smooth(&input, 50);
        assert_eq!(out.iter().map(|s| s.time).collect::<Vec<_>>(), vec![10, 11]);
    }

    #[test]
    fn constant_series_unchanged() {
        let input = series(&[0.25; 40]);
        assert_eq!(smooth(&input, 30), input);
    }

    #[test]
    fn collection_smooths_each_subject() {
        let c = SeriesCollection {
            series: vec![SubjectSeries {
                name: "m1".into(),
                values: series(&[0.0, 2.0, 4.0]),
            }],
        };
        let out = smooth_collection(&c, Smoothing::new(2));
        assert_eq!(values(&out.series[0].values), vec![1.0, 2.0, 3.0]);
    }
}
