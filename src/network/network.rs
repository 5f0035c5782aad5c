use rand::Rng;

use crate::activation::activation::DeltaRule;
use crate::error::{Error, Result};
use crate::layers::dense::Layer;
use crate::loss::mse::{argmax, one_hot, MseLoss};
use crate::network::spec::NetworkSpec;

/// Per-unit error signals from one backward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Deltas {
    /// Raw output errors, `output_k - target_k`.
    pub errors: Vec<f64>,
    /// `layers[l][i]` is the delta of unit `i` in layer `l`.
    pub layers: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub struct Network {
    pub layers: Vec<Layer>,
    delta_rule: DeltaRule,
    /// Input of the most recent successful forward pass.
    input: Option<Vec<f64>>,
}

impl Network {
    /// Builds a network from a validated spec, drawing initial weights from `rng`.
    pub fn new<R: Rng + ?Sized>(spec: &NetworkSpec, rng: &mut R) -> Result<Network> {
        spec.validate()?;
        let layers = spec
            .layers
            .iter()
            .map(|l| Layer::new(l.size, l.input_size, spec.randomize, &mut *rng))
            .collect();
        Ok(Network { layers, delta_rule: spec.delta_rule, input: None })
    }

    /// Wraps prepared layers; each layer's arity must equal the previous layer's size.
    pub fn from_layers(layers: Vec<Layer>, delta_rule: DeltaRule) -> Result<Network> {
        if layers.is_empty() {
            return Err(Error::Topology("network needs at least one layer".to_owned()));
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[1].input_size() != pair[0].size() {
                return Err(Error::Topology(format!(
                    "layer {} expects {} inputs but layer {} has {} units",
                    i + 1,
                    pair[1].input_size(),
                    i,
                    pair[0].size()
                )));
            }
        }
        Ok(Network { layers, delta_rule, input: None })
    }

    pub fn delta_rule(&self) -> DeltaRule {
        self.delta_rule
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Layer::input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, Layer::size)
    }

    /// Forward pass; caches the input and every layer's activations for
    /// `backward` and `update`.
    pub fn forward(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.input = None;
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.feed_from(&current)?;
        }
        self.input = Some(input.to_vec());
        Ok(current)
    }

    /// Activations of the output layer from the last forward pass.
    pub fn output(&self) -> &[f64] {
        match self.layers.last() {
            Some(layer) => layer.activations(),
            None => &[],
        }
    }

    /// Index of the most confident output unit.
    pub fn predict(&mut self, input: &[f64]) -> Result<usize> {
        let output = self.forward(input)?;
        Ok(argmax(&output))
    }

    /// Back-propagates the error of the last forward pass against `label`.
    ///
    /// Output unit `k` is aimed at 1.0 when `k == label` and 0.0 otherwise.
    /// Deltas flow output → first layer; no weight is touched here.
    pub fn backward(&self, label: usize) -> Result<Deltas> {
        if self.input.is_none() {
            return Err(Error::NoForwardPass);
        }
        let Some(last) = self.layers.len().checked_sub(1) else {
            return Err(Error::Topology("network has no layers".to_owned()));
        };
        let output = self.layers[last].activations();
        let errors = MseLoss::derivative(output, &one_hot(label, output.len()));

        let mut deltas = vec![Vec::new(); self.layers.len()];
        deltas[last] = self.layers[last].output_deltas(&errors, self.delta_rule);
        for l in (0..last).rev() {
            let upstream = self.layers[l + 1].backward_errors(&deltas[l + 1]);
            deltas[l] = self.layers[l].hidden_deltas(&upstream, self.delta_rule);
        }

        Ok(Deltas { errors, layers: deltas })
    }

    /// Applies momentum updates, output layer first, each layer fed by the
    /// pre-update activations beneath it (raw input for the first layer).
    pub fn update(&mut self, deltas: &Deltas) -> Result<()> {
        let input = self.input.as_deref().ok_or(Error::NoForwardPass)?;
        if deltas.layers.len() != self.layers.len() {
            return Err(Error::Topology(format!(
                "got deltas for {} layers, network has {}",
                deltas.layers.len(),
                self.layers.len()
            )));
        }
        // Every shape is checked before any weight moves.
        for (l, (layer, d)) in self.layers.iter().zip(&deltas.layers).enumerate() {
            if d.len() != layer.size() {
                return Err(Error::Topology(format!(
                    "got {} deltas for layer {} of {} units",
                    d.len(),
                    l,
                    layer.size()
                )));
            }
        }
        for l in (0..self.layers.len()).rev() {
            let (below, rest) = self.layers.split_at_mut(l);
            let inputs = match below.last() {
                Some(prev) => prev.activations(),
                None => input,
            };
            rest[0].apply_deltas(&deltas.layers[l], inputs)?;
        }
        Ok(())
    }
}
