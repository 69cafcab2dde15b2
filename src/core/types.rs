use serde::Serialize;

pub const PULSE_STEPS: usize = 50;
pub const TRAJECTORY_STEPS: usize = 50;

pub const DEFAULT_QUBITS: i32 = 8;
pub const DEFAULT_STRENGTH: f64 = 1.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum ModelKind {
    Mlp,
    MlpSet,
    #[default]
    Gcn,
    Gat,
    Unknown,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Waveform {
    Sine,
    Cosine,
}

#[derive(Debug, Clone, Copy)]
pub struct SimulationInputs {
    pub qubits: i32,
    pub strength: f64,
    pub model: ModelKind,
}

impl Default for SimulationInputs {
    fn default() -> Self {
        Self {
            qubits: DEFAULT_QUBITS,
            strength: DEFAULT_STRENGTH,
            model: ModelKind::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlochPoint {
    pub theta: f64,
    pub phi: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub optimal_pulse: Vec<f64>,
    pub final_energy: f64,
    pub learning_time: f64,
    pub model_params: i64,
    pub trajectory: Vec<BlochPoint>,
}

impl SimulationResult {
    /// False when any number would serialize as JSON `null`.
    pub fn is_finite(&self) -> bool {
        self.final_energy.is_finite()
            && self.learning_time.is_finite()
            && self.optimal_pulse.iter().all(|v| v.is_finite())
            && self
                .trajectory
                .iter()
                .all(|p| p.theta.is_finite() && p.phi.is_finite())
    }
}
