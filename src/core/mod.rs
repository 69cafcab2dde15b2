mod engine;
mod models;
mod types;
mod work;

pub use engine::{TrainingMetrics, run_simulation, simulation_rng, training_metrics};
pub use models::{ModelProfile, NoiseLevel, PulseShape, TargetOrientation};
pub use types::{
    BlochPoint, DEFAULT_QUBITS, DEFAULT_STRENGTH, ModelKind, PULSE_STEPS, SimulationInputs,
    SimulationResult, TRAJECTORY_STEPS, Waveform,
};
pub use work::{DEFAULT_WORK_DELAY, WorkDelay};
