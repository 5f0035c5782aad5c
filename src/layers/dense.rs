use rand::Rng;

use crate::activation::activation::DeltaRule;
use crate::error::{Error, Result};
use crate::neuron::unit::Unit;

/// An ordered group of units sharing one input arity.
#[derive(Debug, Clone)]
pub struct Layer {
    pub units: Vec<Unit>,
    input_size: usize,
    /// Activations from the most recent `feed_from`, needed for backprop.
    activations: Vec<f64>,
}

impl Layer {
    pub fn new<R: Rng + ?Sized>(size: usize, input_size: usize, randomize: bool, rng: &mut R) -> Layer {
        let units = (0..size).map(|_| Unit::new(input_size, randomize, &mut *rng)).collect();
        Layer { units, input_size, activations: Vec::new() }
    }

    /// Builds a layer from prepared units; all of them must share one arity.
    pub fn from_units(units: Vec<Unit>) -> Result<Layer> {
        let input_size = units.first().map_or(0, Unit::arity);
        if let Some(odd) = units.iter().find(|u| u.arity() != input_size) {
            return Err(Error::Topology(format!(
                "units in one layer must share arity {}, found {}",
                input_size,
                odd.arity()
            )));
        }
        Ok(Layer { units, input_size, activations: Vec::new() })
    }

    pub fn size(&self) -> usize {
        self.units.len()
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn activations(&self) -> &[f64] {
        &self.activations
    }

    /// Activates every unit over `input` and caches the results.
    pub fn feed_from(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        let a = self
            .units
            .iter()
            .map(|unit| unit.activate(input))
            .collect::<Result<Vec<f64>>>()?;
        self.activations = a.clone();
        Ok(a)
    }

    /// Deltas for the output layer from its raw errors.
    pub fn output_deltas(&self, errors: &[f64], rule: DeltaRule) -> Vec<f64> {
        errors
            .iter()
            .zip(&self.activations)
            .map(|(err, &o)| err * rule.output_slope(o))
            .collect()
    }

    /// Error attributed to each of this layer's inputs: for input `j`,
    /// `Σₖ unitₖ.backward_contribution(δₖ, j)`.
    pub fn backward_errors(&self, deltas: &[f64]) -> Vec<f64> {
        (0..self.input_size)
            .map(|j| {
                self.units
                    .iter()
                    .zip(deltas)
                    .map(|(unit, &delta)| unit.backward_contribution(delta, j))
                    .sum()
            })
            .collect()
    }

    /// Deltas for a hidden layer from the errors handed down by the layer above.
    pub fn hidden_deltas(&self, errors: &[f64], rule: DeltaRule) -> Vec<f64> {
        errors
            .iter()
            .zip(&self.activations)
            .map(|(err, &a)| err * rule.hidden_slope(a))
            .collect()
    }

    /// Updates every weight: unit `i`, weight `j` gets `δᵢ · inputs[j]`.
    pub fn apply_deltas(&mut self, deltas: &[f64], inputs: &[f64]) -> Result<()> {
        if deltas.len() != self.units.len() {
            return Err(Error::Topology(format!(
                "got {} deltas for a layer of {} units",
                deltas.len(),
                self.units.len()
            )));
        }
        if inputs.len() < self.input_size {
            return Err(Error::Size { expected: self.input_size, actual: inputs.len() });
        }
        for (unit, &delta) in self.units.iter_mut().zip(deltas) {
            for (j, &x) in inputs[..self.input_size].iter().enumerate() {
                unit.update_weight(delta * x, j);
            }
        }
        Ok(())
    }
}
