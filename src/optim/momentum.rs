/// Momentum step used for every weight in the network:
///
/// ```text
/// Δw ← Δw·α + g·β
/// w  ← w − Δw
/// ```
///
/// The combined step is subtracted as-is; there is no separate learning rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Momentum {
    /// Decay applied to the previous step.
    pub alpha: f64,
    /// Scale applied to the fresh gradient signal.
    pub beta: f64,
}

impl Momentum {
    /// The fixed constants this network trains with.
    pub const FIXED: Momentum = Momentum { alpha: 0.1, beta: 0.1 };

    pub fn new(alpha: f64, beta: f64) -> Momentum {
        Momentum { alpha, beta }
    }

    /// Applies one step to a single weight and its accumulator.
    pub fn step(&self, weight: &mut f64, velocity: &mut f64, gradient: f64) {
        *velocity = *velocity * self.alpha + gradient * self.beta;
        *weight -= *velocity;
    }
}

impl Default for Momentum {
    fn default() -> Self {
        Momentum::FIXED
    }
}
