use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const TICKS_PER_DAY: usize = 1440;
const DAYS: usize = 14;
const SUBJECTS_PER_SEX: usize = 13;
/// Female cycle: estrus begins on days 1, 5, 9, 13.
const ESTRUS_EVERY_DAYS: usize = 4;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Sex {
    Male,
    Female,
}

/// Phase of the light cycle in [0, 1); lights off for the second half.
fn day_phase(tick: usize) -> f64 {
    (tick % TICKS_PER_DAY) as f64 / TICKS_PER_DAY as f64
}

fn in_estrus(tick: usize) -> bool {
    let day = tick / TICKS_PER_DAY;
    day >= 1 && (day - 1) % ESTRUS_EVERY_DAYS == 0
}

fn activity(tick: usize, sex: Sex, bias: f64, rng: &mut SimpleRng) -> f64 {
    let dark = day_phase(tick) >= 0.5;
    let mut level = (if dark { 30.0 } else { 6.0 }) * bias;
    if sex == Sex::Female && in_estrus(tick) {
        level *= 1.3;
    }
    rng.gauss(level, level * 0.4).max(0.0).round()
}

fn temperature(tick: usize, sex: Sex, bias: f64, rng: &mut SimpleRng) -> f64 {
    let circadian = (2.0 * std::f64::consts::PI * (day_phase(tick) - 0.25)).sin();
    let mut t = 36.9 + bias * 0.1 - 0.4 * circadian;
    if sex == Sex::Female && in_estrus(tick) {
        t += 0.3;
    }
    rng.gauss(t, 0.08)
}

/// Column-major matrix: `columns[subject][tick]`.
fn generate(
    sex: Sex,
    rng: &mut SimpleRng,
    sample: fn(usize, Sex, f64, &mut SimpleRng) -> f64,
) -> Vec<Vec<f64>> {
    (0..SUBJECTS_PER_SEX)
        .map(|_| {
            let bias = rng.gauss(1.0, 0.15);
            (0..DAYS * TICKS_PER_DAY)
                .map(|tick| sample(tick, sex, bias, rng))
                .collect()
        })
        .collect()
}

fn subject_names(prefix: &str) -> Vec<String> {
    (1..=SUBJECTS_PER_SEX).map(|i| format!("{prefix}{i}")).collect()
}

fn write_csv(path: &Path, names: &[String], columns: &[Vec<f64>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(names)?;
    let ticks = columns.first().map_or(0, Vec::len);
    for tick in 0..ticks {
        writer.write_record(columns.iter().map(|c| format!("{:.3}", c[tick])))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, names: &[String], columns: &[Vec<f64>]) -> Result<()> {
    let schema = Arc::new(Schema::new(
        names
            .iter()
            .map(|n| Field::new(n, DataType::Float64, false))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|c| Arc::new(Float64Array::from(c.clone())) as ArrayRef)
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets/data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let males = subject_names("m");
    let females = subject_names("f");

    let outputs = [
        ("male_act", &males, generate(Sex::Male, &mut rng, activity)),
        ("fem_act", &females, generate(Sex::Female, &mut rng, activity)),
        ("male_temp", &males, generate(Sex::Male, &mut rng, temperature)),
        ("fem_temp", &females, generate(Sex::Female, &mut rng, temperature)),
    ];

    for (stem, names, columns) in &outputs {
        let csv_path = out_dir.join(format!("{stem}.csv"));
        write_csv(&csv_path, names, columns)?;
        write_parquet(&out_dir.join(format!("{stem}.parquet")), names, columns)?;
        log::info!("Wrote {}", csv_path.display());
    }

    println!(
        "Wrote {} subjects x {} ticks per file to {}",
        SUBJECTS_PER_SEX,
        DAYS * TICKS_PER_DAY,
        out_dir.display()
    );
    Ok(())
}
