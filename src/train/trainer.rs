use crate::{
    data::idx::Sample,
    error::Result,
    loss::mse::{argmax, one_hot, MseLoss},
    network::network::Network,
};

/// Outcome of training on one sample, measured before the update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    /// Mean squared error of the output against the one-hot target.
    pub loss: f64,
    pub predicted: usize,
    pub correct: bool,
}

/// One online step: forward → backward → update.
pub fn train_sample(network: &mut Network, sample: &Sample) -> Result<SampleStats> {
    let label = sample.label as usize;

    let output = network.forward(&sample.pixels)?;
    let loss = MseLoss::loss(&output, &one_hot(label, output.len()));
    let predicted = argmax(&output);

    let deltas = network.backward(label)?;
    network.update(&deltas)?;

    Ok(SampleStats { loss, predicted, correct: predicted == label })
}
