use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::models::{BASE_ENERGY, BASE_LEARNING_TIME, ModelProfile, PulseShape};
use super::types::{
    BlochPoint, PULSE_STEPS, SimulationInputs, SimulationResult, TRAJECTORY_STEPS, Waveform,
};

const TRAJECTORY_START: BlochPoint = BlochPoint {
    theta: 0.0,
    phi: 0.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingMetrics {
    pub final_energy: f64,
    pub learning_time: f64,
    pub model_params: i64,
}

/// Runs one mock optimisation. All randomness comes from `rng`, so a seeded
/// generator makes the whole result reproducible.
pub fn run_simulation<R: Rng + ?Sized>(inputs: &SimulationInputs, rng: &mut R) -> SimulationResult {
    let profile = inputs.model.profile();
    let optimal_pulse = match profile.pulse {
        Some(shape) => generate_pulse(&shape, inputs, rng),
        None => Vec::new(),
    };
    let metrics = training_metrics(profile, inputs);
    let trajectory = generate_trajectory(profile, inputs);

    SimulationResult {
        optimal_pulse,
        final_energy: metrics.final_energy,
        learning_time: metrics.learning_time,
        model_params: metrics.model_params,
        trajectory,
    }
}

/// Builds the generator used for one request: deterministic when a seed is
/// supplied, entropy-seeded otherwise.
pub fn simulation_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub fn training_metrics(profile: &ModelProfile, inputs: &SimulationInputs) -> TrainingMetrics {
    let qubits = inputs.qubits as f64;
    let strength = inputs.strength;

    let mut final_energy = BASE_ENERGY + profile.energy_offset;
    let mut learning_time = BASE_LEARNING_TIME + profile.time_offset;
    let base_params = profile.base_params as f64;

    final_energy += qubits * 0.5;
    learning_time += qubits * 0.8;
    let model_params = base_params + base_params * (qubits / 10.0);
    final_energy -= strength * 5.0;
    learning_time += strength * 1.2;

    TrainingMetrics {
        final_energy: round_to(final_energy, 2),
        learning_time: round_to(learning_time, 1),
        model_params: model_params.trunc() as i64,
    }
}

fn generate_pulse<R: Rng + ?Sized>(
    shape: &PulseShape,
    inputs: &SimulationInputs,
    rng: &mut R,
) -> Vec<f64> {
    let amplitude = shape.amplitude * inputs.strength;
    let sigma = shape.noise.std_dev(inputs.qubits);
    let last = (PULSE_STEPS - 1) as f64;

    (0..PULSE_STEPS)
        .map(|i| {
            let x = shape.span * i as f64 / last;
            let base = match shape.waveform {
                Waveform::Sine => x.sin(),
                Waveform::Cosine => x.cos(),
            };
            base * amplitude + sigma * standard_normal(rng)
        })
        .collect()
}

fn generate_trajectory(profile: &ModelProfile, inputs: &SimulationInputs) -> Vec<BlochPoint> {
    let target = profile.target.resolve(inputs.qubits, inputs.strength);
    let steps = TRAJECTORY_STEPS as f64;

    // Step 0 is excluded; the last step lands on the target exactly.
    (0..TRAJECTORY_STEPS)
        .map(|i| {
            let t = (i + 1) as f64 / steps;
            BlochPoint {
                theta: TRAJECTORY_START.theta + t * (target.theta - TRAJECTORY_START.theta),
                phi: TRAJECTORY_START.phi + t * (target.phi - TRAJECTORY_START.phi),
            }
        })
        .collect()
}

/// Rounds the exact binary value to `decimals` places. Scaling by a power of
/// ten first would turn values just below a tie into exact ties.
fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1 = rng.gen_range(f64::MIN_POSITIVE..1.0);
    let u2 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
