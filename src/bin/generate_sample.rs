//! Writes a synthetic particle list in the sampler's layout
//! (`mcid,tau,x,y,eta,E,px,py,pz`) as both CSV and Parquet.

use std::f64::consts::PI;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const N_PARTICLES: usize = 20_000;
const TEMPERATURE: f64 = 0.15;
const Y_CUT: f64 = 3.0;

/// (mcid, mass in GeV, relative abundance)
const SPECIES: [(i64, f64, f64); 7] = [
    (211, 0.13957, 0.30),
    (-211, 0.13957, 0.30),
    (111, 0.13498, 0.20),
    (321, 0.49368, 0.06),
    (-321, 0.49368, 0.06),
    (2212, 0.93827, 0.04),
    (-2212, 0.93827, 0.04),
];

/// xoshiro256** seeded through splitmix64, so a fixed seed always
/// reproduces the same particle list.
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut sm = seed;
        let state = std::array::from_fn(|_| {
            sm = sm.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = sm;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            z ^ (z >> 31)
        });
        SimpleRng { state }
    }

    fn next_u64(&mut self) -> u64 {
        let [s0, s1, s2, s3] = &mut self.state;
        let out = s1.wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let shifted = *s1 << 17;
        *s2 ^= *s0;
        *s3 ^= *s1;
        *s1 ^= *s2;
        *s0 ^= *s3;
        *s2 ^= shifted;
        *s3 = s3.rotate_left(45);
        out
    }

    /// Uniform in (0, 1].
    fn next_f64(&mut self) -> f64 {
        ((self.next_u64() >> 11) as f64 + 1.0) / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64();
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

#[derive(Default)]
struct Columns {
    mcid: Vec<i64>,
    tau: Vec<f64>,
    x: Vec<f64>,
    y: Vec<f64>,
    eta: Vec<f64>,
    energy: Vec<f64>,
    px: Vec<f64>,
    py: Vec<f64>,
    pz: Vec<f64>,
}

fn pick_species(rng: &mut SimpleRng) -> (i64, f64) {
    let total: f64 = SPECIES.iter().map(|s| s.2).sum();
    let mut u = rng.uniform(0.0, total);
    for &(mcid, mass, weight) in &SPECIES {
        if u < weight {
            return (mcid, mass);
        }
        u -= weight;
    }
    let (mcid, mass, _) = SPECIES[SPECIES.len() - 1];
    (mcid, mass)
}

/// Thermal-like particle: pT ~ pT·exp(-mT/T) (gamma approximation),
/// flat rapidity in [-Y_CUT, Y_CUT], isotropic azimuth.
fn sample_particles(rng: &mut SimpleRng, n: usize) -> Columns {
    let mut cols = Columns::default();
    for _ in 0..n {
        let (mcid, mass) = pick_species(rng);
        let slope = TEMPERATURE + 0.1 * mass;
        let pt = -slope * (rng.next_f64() * rng.next_f64()).ln();
        let phi = rng.uniform(0.0, 2.0 * PI);
        let rapidity = rng.uniform(-Y_CUT, Y_CUT);
        let mt = (mass * mass + pt * pt).sqrt();

        cols.mcid.push(mcid);
        cols.tau.push(0.6 + rng.uniform(0.0, 1.0).ln().abs() * 6.0);
        cols.x.push(rng.gauss(0.0, 3.0));
        cols.y.push(rng.gauss(0.0, 3.0));
        cols.eta.push(rapidity + rng.gauss(0.0, 0.3));
        cols.energy.push(mt * rapidity.cosh());
        cols.px.push(pt * phi.cos());
        cols.py.push(pt * phi.sin());
        cols.pz.push(mt * rapidity.sinh());
    }
    cols
}

fn write_csv(path: &str, cols: &Columns) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(["mcid", "tau", "x", "y", "eta", "E", "px", "py", "pz"])?;
    for i in 0..cols.mcid.len() {
        writer.write_record(&[
            cols.mcid[i].to_string(),
            format!("{:.8e}", cols.tau[i]),
            format!("{:.8e}", cols.x[i]),
            format!("{:.8e}", cols.y[i]),
            format!("{:.8e}", cols.eta[i]),
            format!("{:.8e}", cols.energy[i]),
            format!("{:.8e}", cols.px[i]),
            format!("{:.8e}", cols.py[i]),
            format!("{:.8e}", cols.pz[i]),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, cols: Columns) -> Result<()> {
    let float = |name: &str| Field::new(name, DataType::Float64, false);
    let schema = Arc::new(Schema::new(vec![
        Field::new("mcid", DataType::Int64, false),
        float("tau"),
        float("x"),
        float("y"),
        float("eta"),
        float("E"),
        float("px"),
        float("py"),
        float("pz"),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(cols.mcid)) as ArrayRef,
            Arc::new(Float64Array::from(cols.tau)) as ArrayRef,
            Arc::new(Float64Array::from(cols.x)) as ArrayRef,
            Arc::new(Float64Array::from(cols.y)) as ArrayRef,
            Arc::new(Float64Array::from(cols.eta)) as ArrayRef,
            Arc::new(Float64Array::from(cols.energy)) as ArrayRef,
            Arc::new(Float64Array::from(cols.px)) as ArrayRef,
            Arc::new(Float64Array::from(cols.py)) as ArrayRef,
            Arc::new(Float64Array::from(cols.pz)) as ArrayRef,
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let cols = sample_particles(&mut rng, N_PARTICLES);

    write_csv("sample_particles.csv", &cols)?;
    write_parquet("sample_particles.parquet", cols)?;

    println!("Wrote {N_PARTICLES} particles to sample_particles.csv and sample_particles.parquet");
    Ok(())
}
