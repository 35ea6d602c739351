use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusty_raster::config::RunConfig;

const DT: f64 = 0.1;
const NUM_NEURONS: usize = 4;

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

// ---------------------------------------------------------------------------
// Small network of leaky integrate-and-fire neurons driven by two inputs
// ---------------------------------------------------------------------------

const DURATION: f64 = 100.0;
const V_REST: f64 = -65.0;
const V_THRESH: f64 = -50.0;
const V_RESET: f64 = -70.0;
const TAU_M: f64 = 20.0;

/// Input A is on during [10, 40), input B during [45, 75).
fn stimulus_at(t: f64) -> (f64, f64) {
    let a = if (10.0..40.0).contains(&t) { 1.0 } else { 0.0 };
    let b = if (45.0..75.0).contains(&t) { 1.0 } else { 0.0 };
    (a, b)
}

fn write_network(dir: &Path, rng: &mut SimpleRng) -> Result<usize> {
    // Drive (mV) each neuron receives from inputs A and B.
    let weights_a = [22.0, 6.0, 18.0, 2.0];
    let weights_b = [4.0, 21.0, 9.0, 19.0];

    let mut spikes = csv::Writer::from_path(dir.join("spikes.csv")).context("creating spikes.csv")?;
    let mut voltages =
        csv::Writer::from_path(dir.join("voltages.csv")).context("creating voltages.csv")?;
    let mut stim = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(dir.join("stim.csv"))
        .context("creating stim.csv")?;

    spikes.write_record(["Time [ms]", "Neuron ID"])?;
    voltages.write_record(["Time [ms]", "Neuron number", "Membrane voltage [mV]"])?;

    let mut v = [V_REST; NUM_NEURONS];
    let steps = (DURATION / DT).round() as usize;
    let mut spike_count = 0;

    for step in 0..steps {
        let t = step as f64 * DT;
        let (a, b) = stimulus_at(t);
        stim.serialize((a, b))?;

        for i in 0..NUM_NEURONS {
            let drive = weights_a[i] * a + weights_b[i] * b;
            v[i] += DT * (-(v[i] - V_REST) + drive) / TAU_M + rng.gauss(0.0, 0.3);
            if v[i] >= V_THRESH {
                spikes.serialize((t, i))?;
                spike_count += 1;
                v[i] = V_RESET;
            }
            voltages.serialize((t, i, v[i]))?;
        }
    }

    spikes.flush()?;
    voltages.flush()?;
    stim.flush()?;
    Ok(spike_count)
}

// ---------------------------------------------------------------------------
// Single adaptive exponential integrate-and-fire neuron, RK4
// ---------------------------------------------------------------------------

const C: f64 = 281.0; // pF
const GL: f64 = 30.0; // nS
const EL: f64 = -70.6; // mV
const ADEX_V_THRESH: f64 = -50.4; // mV
const V_PEAK: f64 = -40.0; // mV
const V_MAX: f64 = 10.0; // mV
const ADEX_V_RESET: f64 = -70.6; // mV
const DELTA_T: f64 = 2.0;
const TAU_W: f64 = 144.0;
const A: f64 = 4.0;
const B: f64 = 80.5;

fn dv(v: f64, w: f64, i: f64) -> f64 {
    (1.0 / C) * (-GL * (v - EL) + GL * DELTA_T * ((v - ADEX_V_THRESH) / DELTA_T).exp() + i - w)
}

fn dw(v: f64, w: f64) -> f64 {
    (1.0 / TAU_W) * (A * (v - EL) - w)
}

fn write_adaptation(dir: &Path) -> Result<usize> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(dir.join("data.csv"))
        .context("creating data.csv")?;

    let mut v = EL;
    let mut w = 0.0;
    let steps = (300.0 / DT).round() as usize;

    for step in 0..steps {
        let t = step as f64 * DT;
        let i = if t > 20.0 { 700.0 } else { 0.0 };

        if v >= V_MAX {
            v = ADEX_V_RESET;
        }

        let v1 = dv(v, w, i);
        let w1 = dw(v, w);
        let v2 = dv(v + DT * 0.5 * v1, w + DT * 0.5 * w1, i);
        let w2 = dw(v + DT * 0.5 * v1, w + DT * 0.5 * w1);
        let v3 = dv(v + DT * 0.5 * v2, w + DT * 0.5 * w2, i);
        let w3 = dw(v + DT * 0.5 * v2, w + DT * 0.5 * w2);
        let v4 = dv(v + DT * v3, w + DT * w3, i);
        let w4 = dw(v + DT * v3, w + DT * w3);

        v += (DT / 6.0) * (v1 + 2.0 * (v2 + v3) + v4);

        // Spikes are drawn at V_MAX; w is not integrated through the peak.
        if v > V_PEAK {
            v = V_MAX;
            w += B;
        } else {
            w += (DT / 6.0) * (w1 + 2.0 * (w2 + w3) + w4);
        }

        out.serialize((t, v, w, v1, v2, v3, v4, w1, w2, w3, w4))?;
    }

    out.flush()?;
    Ok(steps)
}

fn main() -> Result<()> {
    env_logger::init();

    let dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let spike_count = write_network(&dir, &mut rng)?;
    let adaptation_rows = write_adaptation(&dir)?;

    let config = RunConfig {
        spikes: Some(PathBuf::from("spikes.csv")),
        voltages: Some(PathBuf::from("voltages.csv")),
        stimulus: Some(PathBuf::from("stim.csv")),
        adaptation: Some(PathBuf::from("data.csv")),
        channel_count: NUM_NEURONS,
        ..RunConfig::default()
    };
    fs::write(dir.join("run.json"), config.to_json()?).context("writing run.json")?;

    log::info!(
        "Wrote {spike_count} spikes, {NUM_NEURONS} voltage channels and {adaptation_rows} AdEx samples to {}",
        dir.display()
    );
    Ok(())
}
