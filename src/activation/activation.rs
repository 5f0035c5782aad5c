use serde::{Deserialize, Serialize};

/// σ(x) = 1 / (1 + e^(-x)). Squashes any finite value into (0, 1).
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// How per-unit deltas are shaped during back-propagation.
///
/// `Literal` reproduces the classic training program this network descends
/// from: the output slope re-applies σ to an already-squashed output, and
/// hidden slopes use `(1 + a)(1 - a)`. `Textbook` uses the sigmoid derivative
/// `a(1 - a)` everywhere and converges differently; it is opt-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaRule {
    #[default]
    Literal,
    Textbook,
}

impl DeltaRule {
    /// Slope applied to an output unit's error, given its activation `o`.
    pub fn output_slope(&self, o: f64) -> f64 {
        match self {
            DeltaRule::Literal => {
                let s = sigmoid(o);
                s * (1.0 - s)
            }
            DeltaRule::Textbook => o * (1.0 - o),
        }
    }

    /// Slope applied to a hidden unit's accumulated error, given its activation `a`.
    pub fn hidden_slope(&self, a: f64) -> f64 {
        match self {
            DeltaRule::Literal => (1.0 + a) * (1.0 - a),
            DeltaRule::Textbook => a * (1.0 - a),
        }
    }
}
