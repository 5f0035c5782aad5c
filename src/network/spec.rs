use serde::{Deserialize, Serialize};

use crate::activation::activation::DeltaRule;
use crate::error::{Error, Result};

/// Describes one layer in a network specification.
///
/// Fields:
/// - `size`       — number of units in this layer
/// - `input_size` — arity of every unit in this layer (the size of the
///                  previous layer, or the raw input dimension for the first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
}

impl LayerSpec {
    pub fn new(size: usize, input_size: usize) -> LayerSpec {
        LayerSpec { size, input_size }
    }
}

/// A serializable description of a network's topology and training rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    #[serde(default)]
    pub delta_rule: DeltaRule,
    /// Draw initial weights from `[-1.0, 1.0)`; otherwise start at zero.
    #[serde(default = "default_randomize")]
    pub randomize: bool,
}

fn default_randomize() -> bool {
    true
}

impl NetworkSpec {
    pub fn new(layers: Vec<LayerSpec>) -> NetworkSpec {
        NetworkSpec { layers, delta_rule: DeltaRule::default(), randomize: true }
    }

    /// Builds a spec from `(size, input_size)` pairs.
    pub fn from_pairs(pairs: &[(usize, usize)]) -> NetworkSpec {
        NetworkSpec::new(pairs.iter().map(|&(size, input)| LayerSpec::new(size, input)).collect())
    }

    /// 784 → 16 → 16 → 10, the 28×28 digit classifier.
    pub fn mnist() -> NetworkSpec {
        NetworkSpec::from_pairs(&[(16, 28 * 28), (16, 16), (10, 16)])
    }

    pub fn with_delta_rule(mut self, rule: DeltaRule) -> NetworkSpec {
        self.delta_rule = rule;
        self
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.size)
    }

    /// Checks that the layer chain lines up end to end.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(Error::Topology("network needs at least one layer".to_owned()));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.size == 0 || layer.input_size == 0 {
                return Err(Error::Topology(format!(
                    "layer {} has zero size ({} units, {} inputs)",
                    i, layer.size, layer.input_size
                )));
            }
        }
        for (i, pair) in self.layers.windows(2).enumerate() {
            if pair[1].input_size != pair[0].size {
                return Err(Error::Topology(format!(
                    "layer {} expects {} inputs but layer {} has {} units",
                    i + 1,
                    pair[1].input_size,
                    i,
                    pair[0].size
                )));
            }
        }
        Ok(())
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let spec: NetworkSpec = serde_json::from_reader(reader)?;
        spec.validate()?;
        Ok(spec)
    }
}

impl Default for NetworkSpec {
    fn default() -> Self {
        NetworkSpec::mnist()
    }
}
