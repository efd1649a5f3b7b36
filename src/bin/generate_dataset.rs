//! Writes a reproducible set of input files for the viewer.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use ideal_fit::data::model::{Column, Table};
use ideal_fit::data::writer::{write_csv, write_parquet};

const IDEAL_FUNCTIONS: usize = 50;
const GRID_POINTS: usize = 400;
/// Ideal functions the training series are drawn from.
const TRAINING_SOURCES: [usize; 4] = [3, 17, 28, 41];
const TRAINING_NOISE: f64 = 0.3;
const TEST_POINTS: usize = 100;
const NANOFLUID_ROWS: usize = 200;
const NANOPARTICLES: [&str; 5] = ["Al2O3", "CuO", "TiO2", "SiO2", "Ag"];

#[derive(Debug, Parser)]
#[command(name = "generate_dataset", about = "Write sample training, ideal, test and nanofluid files")]
struct Args {
    /// Output directory.
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,

    /// PRNG seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// x ∈ [-20, 20) in steps of 0.1.
fn grid() -> Vec<f64> {
    (0..GRID_POINTS).map(|i| (i as f64 - 200.0) / 10.0).collect()
}

/// Ideal function `k` evaluated at `x`. Cycles through a few shapes with
/// coefficients that drift with `k`.
fn ideal(k: usize, x: f64) -> f64 {
    let a = 1.0 + (k / 5) as f64 * 0.5;
    let b = 0.2 + (k % 7) as f64 * 0.15;
    match k % 5 {
        0 => a * x + b,
        1 => a * 0.05 * x * x - b,
        2 => a * (b * x).sin(),
        3 => a * (b * x).cos() + 0.1 * x,
        _ => a * 4.0 * (-(x * b / 4.0).powi(2)).exp(),
    }
}

/// An `x` column followed by `y1`, `y2`, ... for each of `columns`.
fn with_x(x: &[f64], columns: &[Vec<f64>]) -> Result<Table> {
    let columns = std::iter::once(Column::new("x", x.to_vec()))
        .chain(
            columns
                .iter()
                .enumerate()
                .map(|(i, values)| Column::new(format!("y{}", i + 1), values.clone())),
        )
        .collect();
    Ok(Table::from_columns(columns)?)
}

fn write_test_points(path: &Path, x: &[f64], training: &[Vec<f64>], rng: &mut SimpleRng) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["x", "y"])?;
    for _ in 0..TEST_POINTS {
        let i = rng.below(x.len());
        // Most points follow a training series, the rest are scattered.
        let y = if rng.next_f64() < 0.8 {
            let series = &training[rng.below(training.len())];
            series[i] + rng.gauss(0.0, TRAINING_NOISE)
        } else {
            rng.uniform(-40.0, 40.0)
        };
        writer.write_record([x[i].to_string(), y.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_nanofluid(path: &Path, rng: &mut SimpleRng) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record([
        "Nanoparticle_Type",
        "Volume_Fraction (%)",
        "Particle_Size (nm)",
        "Temperature (°C)",
        "Flow_Velocity (m/s)",
        "Thermal_Conductivity (W/mK)",
        "Viscosity (Pa·s)",
        "Heat_Transfer_Coefficient (W/m²K)",
    ])?;

    for _ in 0..NANOFLUID_ROWS {
        let kind = rng.below(NANOPARTICLES.len());
        let fraction = rng.uniform(0.1, 5.0);
        let size = rng.uniform(10.0, 100.0);
        let temperature = rng.uniform(20.0, 80.0);
        let velocity = rng.uniform(0.1, 3.0);
        let conductivity =
            0.6 * (1.0 + 0.03 * fraction * (1.0 + kind as f64 * 0.2)) + rng.gauss(0.0, 0.01);
        let viscosity = 0.001 * (1.0 + 2.5 * fraction / 100.0) * (1.0 + 0.1 * kind as f64)
            * (1.0 - 0.005 * (temperature - 20.0))
            + rng.gauss(0.0, 0.00002);
        let htc = 500.0 + 800.0 * velocity.powf(0.8) * conductivity + rng.gauss(0.0, 40.0);

        writer.write_record([
            NANOPARTICLES[kind].to_string(),
            format!("{fraction:.3}"),
            format!("{size:.1}"),
            format!("{temperature:.1}"),
            format!("{velocity:.3}"),
            format!("{conductivity:.4}"),
            format!("{viscosity:.6}"),
            format!("{htc:.2}"),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let x = grid();
    let ideal_columns: Vec<Vec<f64>> = (0..IDEAL_FUNCTIONS)
        .map(|k| x.iter().map(|&xi| ideal(k, xi)).collect())
        .collect();

    let training_columns: Vec<Vec<f64>> = TRAINING_SOURCES
        .iter()
        .map(|&k| {
            ideal_columns[k]
                .iter()
                .map(|&y| y + rng.gauss(0.0, TRAINING_NOISE))
                .collect()
        })
        .collect();

    let ideal = with_x(&x, &ideal_columns)?;
    let training = with_x(&x, &training_columns)?;

    let out = &args.out_dir;
    write_csv(&out.join("ideal.csv"), &ideal)?;
    write_parquet(&out.join("ideal.parquet"), &ideal)?;
    write_csv(&out.join("train.csv"), &training)?;
    write_test_points(&out.join("test.csv"), &x, &training_columns, &mut rng)?;
    write_nanofluid(&out.join("nanofluid_heat_transfer_dataset.csv"), &mut rng)?;

    for (series, &k) in TRAINING_SOURCES.iter().enumerate() {
        log::info!("train y{} follows ideal y{}", series + 1, k + 1);
    }
    println!(
        "Wrote {} ideal functions, {} training series, {} test points and {} nanofluid rows to {}",
        IDEAL_FUNCTIONS,
        TRAINING_SOURCES.len(),
        TEST_POINTS,
        NANOFLUID_ROWS,
        out.display()
    );
    Ok(())
}
