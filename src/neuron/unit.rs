use rand::Rng;

use crate::activation::activation::sigmoid;
use crate::error::{Error, Result};
use crate::optim::momentum::Momentum;

/// A single weighted-sum + sigmoid node.
///
/// `weights` and `momentum` always have the unit's declared arity and are
/// indexed identically. The bias is held at 0.0 and never trained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unit {
    bias: f64,
    weights: Vec<f64>,
    momentum: Vec<f64>,
}

impl Unit {
    pub fn new<R: Rng + ?Sized>(arity: usize, randomize: bool, rng: &mut R) -> Unit {
        let mut unit = Unit::default();
        unit.initialize(arity, randomize, rng);
        unit
    }

    /// Builds a unit from explicit weights, with a zeroed accumulator.
    pub fn from_weights(weights: Vec<f64>) -> Unit {
        let momentum = vec![0.0; weights.len()];
        Unit { bias: 0.0, weights, momentum }
    }

    /// (Re)allocates weights and accumulator for `arity` inputs. Weights are
    /// drawn uniformly from `[-1.0, 1.0)` when `randomize` is set, zero
    /// otherwise. The accumulator and bias always start at zero.
    pub fn initialize<R: Rng + ?Sized>(&mut self, arity: usize, randomize: bool, rng: &mut R) {
        self.weights = if randomize {
            (0..arity).map(|_| rng.gen_range(-1.0..1.0)).collect()
        } else {
            vec![0.0; arity]
        };
        self.momentum = vec![0.0; arity];
        self.bias = 0.0;
    }

    pub fn arity(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn momentum(&self) -> &[f64] {
        &self.momentum
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// σ(bias + Σ wᵢ·xᵢ) over the first `arity` inputs; extra inputs are ignored.
    pub fn activate(&self, inputs: &[f64]) -> Result<f64> {
        if inputs.len() < self.weights.len() {
            return Err(Error::Size {
                expected: self.weights.len(),
                actual: inputs.len(),
            });
        }
        let net = self.bias
            + self
                .weights
                .iter()
                .zip(inputs)
                .map(|(w, x)| w * x)
                .sum::<f64>();
        Ok(sigmoid(net))
    }

    /// This unit's share of `delta` attributed to input `index`.
    pub fn backward_contribution(&self, delta: f64, index: usize) -> f64 {
        delta * self.weights[index]
    }

    /// Momentum update of weight `index` with the fixed constants.
    pub fn update_weight(&mut self, delta: f64, index: usize) {
        self.update_weight_with(&Momentum::FIXED, delta, index);
    }

    pub fn update_weight_with(&mut self, momentum: &Momentum, delta: f64, index: usize) {
        momentum.step(&mut self.weights[index], &mut self.momentum[index], delta);
    }
}
