use super::model::Timed;

/// Sample whose time is closest to `query`, found by bisection.
///
/// `series` must be sorted by time. `query` may be fractional (an inverted
/// screen coordinate). On a tie the earlier sample wins; the later neighbour
/// is chosen only when it is strictly closer. Returns `None` for an empty
/// series.
pub fn locate_nearest<T: Timed>(series: &[T], query: f64) -> Option<&T> {
    locate_nearest_index(series, query).map(|i| &series[i])
}

/// Index form of [`locate_nearest`].
pub fn locate_nearest_index<T: Timed>(series: &[T], query: f64) -> Option<usize> {
    // bisect-left: first sample not before the query
    let idx = series.partition_point(|s| (s.time() as f64) < query);
    match (idx.checked_sub(1), series.get(idx)) {
        (Some(l), Some(right)) => {
            let left = &series[l];
            if query - left.time() as f64 > right.time() as f64 - query {
                Some(idx)
            } else {
                Some(l)
            }
        }
        (Some(l), None) => Some(l),
        (None, Some(_)) => Some(idx),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{PairedTimeSample, TimeSample};

    fn series(times: &[usize]) -> Vec<TimeSample> {
        times.iter().map(|&t| TimeSample::new(t, t as f64 * 10.0)).collect()
    }

    #[test]
    fn exact_time_returns_that_sample() {
        let s = series(&[0, 1, 2, 3, 4]);
        for k in 0..5 {
            assert_eq!(locate_nearest(&s, k as f64), Some(&s[k]));
        }
    }

    #[test]
    fn picks_closer_neighbour() {
        let s = series(&[0, 10, 20]);
        assert_eq!(locate_nearest(&s, 3.0).map(|x| x.time), Some(0));
        assert_eq!(locate_nearest(&s, 7.5).map(|x| x.time), Some(10));
        assert_eq!(locate_nearest(&s, 16.0).map(|x| x.time), Some(20));
    }

    #[test]
    fn tie_prefers_earlier_sample() {
        let s = series(&[0, 10]);
        assert_eq!(locate_nearest(&s, 5.0).map(|x| x.time), Some(0));
    }

    #[test]
    fn boundaries_return_only_neighbour() {
        let s = series(&[2, 3]);
        assert_eq!(locate_nearest(&s, -4.0).map(|x| x.time), Some(2));
        assert_eq!(locate_nearest(&s, 99.0).map(|x| x.time), Some(3));
    }

    #[test]
    fn empty_series_is_none() {
        let s: Vec<TimeSample> = Vec::new();
        assert_eq!(locate_nearest(&s, 1.0), None);
        assert_eq!(locate_nearest_index(&s, 1.0), None);
    }

    #[test]
    fn works_on_paired_samples() {
        let s = vec![
            PairedTimeSample { time: 0, male: 1.0, female: 2.0 },
            PairedTimeSample { time: 1, male: 3.0, female: 4.0 },
        ];
        assert_eq!(locate_nearest(&s, 0.9).map(|p| p.female), Some(4.0));
        assert_eq!(locate_nearest_index(&s, 0.9), Some(1));
    }
}
