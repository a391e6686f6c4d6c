use serde::{Deserialize, Serialize};

use super::model::{PairedTimeSample, SeriesCollection, SubjectSeries, TimeSample};

// ---------------------------------------------------------------------------
// Shared min/max scale
// ---------------------------------------------------------------------------

/// The `[min, max]` range both series of a pair are rescaled with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
}

impl ScaleBounds {
    /// Extrema of `values`, ignoring NaN. With no finite input `min` is
    /// `+inf` and `max` is `-inf`.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        values.into_iter().fold(
            ScaleBounds {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |b, v| ScaleBounds {
                min: b.min.min(v),
                max: b.max.max(v),
            },
        )
    }

    /// `(v - min) / (max - min)`. Unguarded: a zero-width range
    /// yields NaN or ±inf.
    #[inline]
    pub fn apply(&self, v: f64) -> f64 {
        (v - self.min) / (self.max - self.min)
    }

    /// Inverse of [`apply`](Self::apply).
    #[inline]
    pub fn invert(&self, n: f64) -> f64 {
        n * (self.max - self.min) + self.min
    }

    /// True when [`apply`](Self::apply) cannot produce finite output.
    pub fn is_degenerate(&self) -> bool {
        !(self.max - self.min).is_finite() || self.max == self.min
    }
}

/// Output of [`normalize_pair`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPair {
    pub a: Vec<TimeSample>,
    pub b: Vec<TimeSample>,
    pub scale: ScaleBounds,
}

fn rescale(series: &[TimeSample], scale: &ScaleBounds) -> Vec<TimeSample> {
    series
        .iter()
        .map(|s| TimeSample::new(s.time, scale.apply(s.value)))
        .collect()
}

/// Rescale two series into [0, 1] using one min/max over both.
pub fn normalize_pair(a: &[TimeSample], b: &[TimeSample]) -> NormalizedPair {
    let scale = ScaleBounds::from_values(a.iter().chain(b).map(|s| s.value));
    NormalizedPair {
        a: rescale(a, &scale),
        b: rescale(b, &scale),
        scale,
    }
}

/// [`normalize_pair`] for the paired representation.
pub fn normalize_paired(data: &[PairedTimeSample]) -> (Vec<PairedTimeSample>, ScaleBounds) {
    let scale = ScaleBounds::from_values(data.iter().flat_map(|d| [d.male, d.female]));
    let out = data
        .iter()
        .map(|d| PairedTimeSample {
            time: d.time,
            male: scale.apply(d.male),
            female: scale.apply(d.female),
        })
        .collect();
    (out, scale)
}

/// Individual mode: one scale over every reading of every subject in both
/// collections.
pub fn normalize_collections(
    a: &SeriesCollection,
    b: &SeriesCollection,
) -> (SeriesCollection, SeriesCollection, ScaleBounds) {
    let scale = ScaleBounds::from_values(a.values().chain(b.values()));
    let apply = |c: &SeriesCollection| SeriesCollection {
        series: c
            .series
            .iter()
            .map(|s| SubjectSeries {
                name: s.name.clone(),
                values: rescale(&s.values, &scale),
            })
            .collect(),
    };
    (apply(a), apply(b), scale)
}
