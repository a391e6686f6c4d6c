use super::model::{SexPair, TimeSample};
use super::normalize::ScaleBounds;

/// One bar of a histogram: `[x0, x1)` and how many values fell into it.
/// The last bin also holds values equal to its `x1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub x0: f64,
    pub x1: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }
}

fn empty_bins(domain: ScaleBounds, bins: usize) -> Vec<HistogramBin> {
    let width = (domain.max - domain.min) / bins as f64;
    (0..bins)
        .map(|i| HistogramBin {
            x0: domain.min + width * i as f64,
            x1: if i + 1 == bins {
                domain.max
            } else {
                domain.min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect()
}

fn fill(bins: &mut [HistogramBin], domain: ScaleBounds, values: &[TimeSample]) {
    let n = bins.len();
    let width = (domain.max - domain.min) / n as f64;
    for v in values.iter().map(|s| s.value).filter(|v| !v.is_nan()) {
        let idx = if width > 0.0 {
            (((v - domain.min) / width) as usize).min(n - 1)
        } else {
            0
        };
        bins[idx].count += 1;
    }
}

/// Bin both series over one shared, equal-width domain so their bars line up.
///
/// NaN values are not counted. Empty or constant input collapses to a
/// single bin.
pub fn overlay_histograms(
    male: &[TimeSample],
    female: &[TimeSample],
    bin_count: usize,
) -> SexPair<Vec<HistogramBin>> {
    let domain = ScaleBounds::from_values(male.iter().chain(female).map(|s| s.value));
    let (domain, bin_count) = if domain.is_degenerate() {
        let at = if domain.min.is_finite() { domain.min } else { 0.0 };
        (ScaleBounds { min: at, max: at }, 1)
    } else {
        (domain, bin_count.max(1))
    };

    let mut out = SexPair::new(
        empty_bins(domain, bin_count),
        empty_bins(domain, bin_count),
    );
    fill(&mut out.male, domain, male);
    fill(&mut out.female, domain, female);
    out
}
