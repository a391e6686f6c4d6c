use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Metric / Sex – what a matrix measures and whom
// ---------------------------------------------------------------------------

/// The two recorded quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    Activity,
    Temperature,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Activity, Metric::Temperature];
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Activity => write!(f, "Activity"),
            Metric::Temperature => write!(f, "Temperature"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "Male"),
            Sex::Female => write!(f, "Female"),
        }
    }
}

/// A value carried once per sex.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SexPair<T> {
    pub male: T,
    pub female: T,
}

impl<T> SexPair<T> {
    pub fn new(male: T, female: T) -> Self {
        Self { male, female }
    }

    pub fn get(&self, sex: Sex) -> &T {
        match sex {
            Sex::Male => &self.male,
            Sex::Female => &self.female,
        }
    }

    pub fn get_mut(&mut self, sex: Sex) -> &mut T {
        match sex {
            Sex::Male => &mut self.male,
            Sex::Female => &mut self.female,
        }
    }

    pub fn as_ref(&self) -> SexPair<&T> {
        SexPair::new(&self.male, &self.female)
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> SexPair<U> {
        SexPair::new(f(self.male), f(self.female))
    }
}

// ---------------------------------------------------------------------------
// RawRecord / SubjectMatrix – the loaded CSV
// ---------------------------------------------------------------------------

/// One input row: the reading of every subject at one tick.
///
/// Readings are stored in the header order of the owning [`SubjectMatrix`];
/// use [`SubjectMatrix::reading`] to address them by subject id.
/// Cells that failed to parse are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub readings: Vec<f64>,
}

impl RawRecord {
    pub fn new(readings: Vec<f64>) -> Self {
        Self { readings }
    }
}

/// A whole per-sex input file: one column per subject, one row per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectMatrix {
    /// Subject identifiers from the header row.
    pub subjects: Vec<String>,
    /// Rows in file order; row index is the tick.
    pub records: Vec<RawRecord>,
    /// Number of cells that could not be parsed as a float.
    pub malformed_cells: usize,
}

impl SubjectMatrix {
    pub fn new(subjects: Vec<String>, records: Vec<RawRecord>) -> Self {
        let malformed_cells = records
            .iter()
            .flat_map(|r| r.readings.iter())
            .filter(|v| v.is_nan())
            .count();
        Self {
            subjects,
            records,
            malformed_cells,
        }
    }

    /// Number of ticks.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn subject_index(&self, subject: &str) -> Option<usize> {
        self.subjects.iter().position(|s| s == subject)
    }

    /// Reading of `subject` at `tick`, if both exist.
    pub fn reading(&self, tick: usize, subject: &str) -> Option<f64> {
        let col = self.subject_index(subject)?;
        self.records.get(tick)?.readings.get(col).copied()
    }
}

/// The four matrices one experiment consists of.
#[derive(Debug, Clone)]
pub struct Study {
    pub activity: SexPair<SubjectMatrix>,
    pub temperature: SexPair<SubjectMatrix>,
}

impl Study {
    pub fn metric(&self, metric: Metric) -> &SexPair<SubjectMatrix> {
        match metric {
            Metric::Activity => &self.activity,
            Metric::Temperature => &self.temperature,
        }
    }
}

// ---------------------------------------------------------------------------
// Derived series
// ---------------------------------------------------------------------------

/// Anything positioned on the tick axis.
pub trait Timed {
    fn time(&self) -> usize;
}

/// One scalar sample of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSample {
    pub time: usize,
    pub value: f64,
}

impl TimeSample {
    pub fn new(time: usize, value: f64) -> Self {
        Self { time, value }
    }
}

impl Timed for TimeSample {
    fn time(&self) -> usize {
        self.time
    }
}

/// Male and female values sharing one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairedTimeSample {
    pub time: usize,
    pub male: f64,
    pub female: f64,
}

impl Timed for PairedTimeSample {
    fn time(&self) -> usize {
        self.time
    }
}

/// Zip two series on their shared time domain. Truncates to the shorter one.
pub fn pair_series(male: &[TimeSample], female: &[TimeSample]) -> Vec<PairedTimeSample> {
    male.iter()
        .zip(female)
        .map(|(m, f)| PairedTimeSample {
            time: m.time,
            male: m.value,
            female: f.value,
        })
        .collect()
}

/// Split paired samples back into `(male, female)` series.
pub fn unpair_series(paired: &[PairedTimeSample]) -> SexPair<Vec<TimeSample>> {
    let male = paired
        .iter()
        .map(|p| TimeSample::new(p.time, p.male))
        .collect();
    let female = paired
        .iter()
        .map(|p| TimeSample::new(p.time, p.female))
        .collect();
    SexPair::new(male, female)
}

/// The series of a single subject (one CSV column).
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectSeries {
    pub name: String,
    pub values: Vec<TimeSample>,
}

/// Independent per-subject series over one time domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesCollection {
    pub series: Vec<SubjectSeries>,
}

impl SeriesCollection {
    pub fn get(&self, name: &str) -> Option<&SubjectSeries> {
        self.series.iter().find(|s| s.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Every value of every subject, in column-major order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().map(|v| v.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn malformed_cells_are_counted_from_nan_readings() {
        let m = SubjectMatrix::new(
            vec!["m1".into(), "m2".into()],
            vec![
                RawRecord::new(vec![1.0, f64::NAN]),
                RawRecord::new(vec![f64::NAN, 4.0]),
            ],
        );
        assert_eq!(m.malformed_cells, 2);
        assert_eq!(m.reading(1, "m2"), Some(4.0));
        assert_eq!(m.reading(2, "m2"), None);
        assert_eq!(m.reading(0, "m9"), None);
    }

    #[test]
    fn pair_of_scalars_is_copy() {
        let readout = SexPair::new(0.5, f64::NAN);
        let copied = readout;
        assert_eq!(readout.male, copied.male);
        assert_eq!(copied.map(f64::is_nan), SexPair::new(false, true));
    }

    #[test]
    fn pairing_truncates_to_shorter_series() {
        let male = vec![TimeSample::new(0, 1.0), TimeSample::new(1, 2.0)];
        let female = vec![TimeSample::new(0, 5.0)];
        let paired = pair_series(&male, &female);
        assert_eq!(
            paired,
            vec![PairedTimeSample {
                time: 0,
                male: 1.0,
                female: 5.0
            }]
        );
        let split = unpair_series(&paired);
        assert_eq!(split.male, vec![TimeSample::new(0, 1.0)]);
        assert_eq!(split.female, vec![TimeSample::new(0, 5.0)]);
    }
}
