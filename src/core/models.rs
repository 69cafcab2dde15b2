use std::f64::consts::PI;

use super::types::{BlochPoint, ModelKind, Waveform};

pub const BASE_ENERGY: f64 = 100.0;
pub const BASE_LEARNING_TIME: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseLevel {
    Fixed(f64),
    /// `sigma * qubits / reference_qubits`
    QubitScaled { sigma: f64, reference_qubits: f64 },
}

impl NoiseLevel {
    /// Always non-negative; a negative qubit count scales by its magnitude.
    pub fn std_dev(self, qubits: i32) -> f64 {
        match self {
            NoiseLevel::Fixed(sigma) => sigma,
            NoiseLevel::QubitScaled {
                sigma,
                reference_qubits,
            } => (sigma * (qubits as f64 / reference_qubits)).abs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseShape {
    pub waveform: Waveform,
    /// Upper bound of the sampled phase interval, starting at zero.
    pub span: f64,
    /// Multiplied by the coupling strength.
    pub amplitude: f64,
    pub noise: NoiseLevel,
}

/// Target orientation coefficients: `theta = theta_base + theta_per_strength * strength`
/// and `phi = phi_base + phi_per_qubit * qubits`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetOrientation {
    pub theta_base: f64,
    pub theta_per_strength: f64,
    pub phi_base: f64,
    pub phi_per_qubit: f64,
}

impl TargetOrientation {
    pub fn resolve(&self, qubits: i32, strength: f64) -> BlochPoint {
        BlochPoint {
            theta: self.theta_base + self.theta_per_strength * strength,
            phi: self.phi_base + self.phi_per_qubit * qubits as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelProfile {
    pub energy_offset: f64,
    pub time_offset: f64,
    pub base_params: i64,
    pub pulse: Option<PulseShape>,
    pub target: TargetOrientation,
}

const MLP: ModelProfile = ModelProfile {
    energy_offset: 30.0,
    time_offset: 5.0,
    base_params: 50_000,
    pulse: Some(PulseShape {
        waveform: Waveform::Sine,
        span: 2.0 * PI,
        amplitude: 0.8,
        noise: NoiseLevel::Fixed(0.15),
    }),
    target: TargetOrientation {
        theta_base: PI / 1.5,
        theta_per_strength: 0.1,
        phi_base: PI / 3.0,
        phi_per_qubit: 0.1,
    },
};

const MLP_SET: ModelProfile = ModelProfile {
    energy_offset: 15.0,
    time_offset: 10.0,
    base_params: 80_000,
    pulse: Some(PulseShape {
        waveform: Waveform::Sine,
        span: 3.0 * PI,
        amplitude: 1.0,
        noise: NoiseLevel::Fixed(0.10),
    }),
    target: TargetOrientation {
        theta_base: PI / 2.0,
        theta_per_strength: -0.2,
        phi_base: 1.5 * PI,
        phi_per_qubit: 0.05,
    },
};

const GCN: ModelProfile = ModelProfile {
    energy_offset: -10.0,
    time_offset: 15.0,
    base_params: 150_000,
    pulse: Some(PulseShape {
        waveform: Waveform::Sine,
        span: 2.0 * PI,
        amplitude: 1.0,
        noise: NoiseLevel::QubitScaled {
            sigma: 0.1,
            reference_qubits: 8.0,
        },
    }),
    target: TargetOrientation {
        theta_base: PI / 4.0,
        theta_per_strength: 0.1,
        phi_base: PI / 2.0,
        phi_per_qubit: 0.2,
    },
};

const GAT: ModelProfile = ModelProfile {
    energy_offset: -15.0,
    time_offset: 20.0,
    base_params: 250_000,
    pulse: Some(PulseShape {
        waveform: Waveform::Cosine,
        span: 2.0 * PI,
        amplitude: 1.0,
        noise: NoiseLevel::Fixed(0.05),
    }),
    target: TargetOrientation {
        theta_base: PI / 2.1,
        theta_per_strength: 0.05,
        phi_base: PI / 1.9,
        phi_per_qubit: 0.1,
    },
};

const UNKNOWN: ModelProfile = ModelProfile {
    energy_offset: 0.0,
    time_offset: 0.0,
    base_params: 10_000,
    pulse: None,
    target: TargetOrientation {
        theta_base: PI / 2.0,
        theta_per_strength: 0.0,
        phi_base: 0.0,
        phi_per_qubit: 0.0,
    },
};

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        ModelKind::Mlp,
        ModelKind::MlpSet,
        ModelKind::Gcn,
        ModelKind::Gat,
        ModelKind::Unknown,
    ];

    /// Maps a wire label to a model. Labels are matched exactly; anything
    /// unrecognised selects the fallback row.
    pub fn from_label(label: &str) -> Self {
        match label {
            "MLP" => ModelKind::Mlp,
            "MLP (Set)" => ModelKind::MlpSet,
            "GCN" => ModelKind::Gcn,
            "GAT" => ModelKind::Gat,
            _ => ModelKind::Unknown,
        }
    }

    pub fn label(self) -> Option<&'static str> {
        match self {
            ModelKind::Mlp => Some("MLP"),
            ModelKind::MlpSet => Some("MLP (Set)"),
            ModelKind::Gcn => Some("GCN"),
            ModelKind::Gat => Some("GAT"),
            ModelKind::Unknown => None,
        }
    }

    pub fn profile(self) -> &'static ModelProfile {
        match self {
            ModelKind::Mlp => &MLP,
            ModelKind::MlpSet => &MLP_SET,
            ModelKind::Gcn => &GCN,
            ModelKind::Gat => &GAT,
            ModelKind::Unknown => &UNKNOWN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_for_known_models() {
        for model in ModelKind::ALL {
            if let Some(label) = model.label() {
                assert_eq!(ModelKind::from_label(label), model);
            }
        }
    }

    #[test]
    fn unrecognised_labels_fall_back() {
        assert_eq!(ModelKind::from_label("gcn"), ModelKind::Unknown);
        assert_eq!(ModelKind::from_label("MLP(Set)"), ModelKind::Unknown);
        assert_eq!(ModelKind::from_label(""), ModelKind::Unknown);
        assert_eq!(ModelKind::from_label("Transformer"), ModelKind::Unknown);
    }

    #[test]
    fn only_the_fallback_row_has_no_pulse() {
        for model in ModelKind::ALL {
            assert_eq!(
                model.profile().pulse.is_none(),
                model == ModelKind::Unknown,
                "{model:?}"
            );
        }
    }

    #[test]
    fn gcn_noise_scales_with_qubits() {
        let noise = ModelKind::Gcn.profile().pulse.map(|p| p.noise);
        let Some(noise) = noise else {
            panic!("GCN must define a pulse");
        };
        assert_eq!(noise.std_dev(0), 0.0);
        assert!((noise.std_dev(8) - 0.1).abs() < 1e-12);
        assert!((noise.std_dev(16) - 0.2).abs() < 1e-12);
        assert!((noise.std_dev(-8) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn fixed_noise_ignores_qubits() {
        let noise = NoiseLevel::Fixed(0.05);
        assert_eq!(noise.std_dev(1), 0.05);
        assert_eq!(noise.std_dev(100), 0.05);
    }

    #[test]
    fn target_orientation_uses_strength_and_qubits() {
        let target = ModelKind::Gcn.profile().target.resolve(8, 1.0);
        assert!((target.theta - (PI / 4.0 + 0.1)).abs() < 1e-12);
        assert!((target.phi - (PI / 2.0 + 1.6)).abs() < 1e-12);

        let fallback = ModelKind::Unknown.profile().target.resolve(12, 3.5);
        assert_eq!(fallback.theta, PI / 2.0);
        assert_eq!(fallback.phi, 0.0);
    }
}
