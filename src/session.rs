//! A configured classifier: model, labels, input size policy and label offset.
use std::path::Path;

use serde::Serialize;
use tch::{Device, Kind, Tensor};
use tracing::{debug, info};

use crate::config::Config;
use crate::labels::{resolve_labels, LabelOffset, Labels};
use crate::model::{resolve_model, Model};
use crate::preprocess;
use crate::size::{resolve_input_size, InputSize};
use crate::{Error, Result};

/// Number of predictions returned by [`Session::classify`].
pub const TOP_K: usize = 5;

/// One entry of a classification result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub class: String,
    pub probability: f64,
}

/// Returns the `k` largest probabilities with their indexes, in descending
/// order. Equal probabilities keep their index order.
pub fn top_k(probabilities: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut indexed: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
    // `sort_by` is stable.
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
    indexed.truncate(k);
    indexed
}

#[derive(Debug)]
pub struct Session {
    model_name: String,
    model: Box<dyn Model>,
    labels: Labels,
    input_size: InputSize,
    label_offset: LabelOffset,
    device: Device,
}

impl Session {
    /// Resolves model and labels for `model_name`, picks the input size policy
    /// and runs a warm-up forward pass.
    pub fn configure(model_name: &str, config: &Config) -> Result<Self> {
        let registry = config.registry()?;
        let model = resolve_model(model_name, config, &registry)?;
        let labels = resolve_labels(config)?;
        let input_size = resolve_input_size(&registry, model_name, config.max_dynamic_size);
        match input_size {
            InputSize::Fixed(side) => info!("images will be converted to {side}x{side}"),
            InputSize::Dynamic { max } => info!("images will be capped to a max size of {max}x{max}"),
        }
        Self::with_model(model_name, model, labels, input_size, config.device)
    }

    /// Builds a session from already resolved parts.
    ///
    /// The warm-up pass output decides how model outputs map to labels. Models
    /// with fewer than [`TOP_K`] outputs are rejected.
    pub fn with_model(
        model_name: &str,
        model: Box<dyn Model>,
        labels: Labels,
        input_size: InputSize,
        device: Device,
    ) -> Result<Self> {
        let side = input_size.warmup_side();
        let warmup = Tensor::f_rand([1, side, side, 3], (Kind::Float, device))?;
        let logits = tch::no_grad(|| model.forward(&warmup))?;
        let outputs = class_count(&logits)?;
        // Every classification returns exactly `TOP_K` predictions.
        if outputs < TOP_K as i64 {
            return Err(Error::LabelMismatch { outputs, labels: labels.len() });
        }
        let label_offset = LabelOffset::detect(outputs, labels.len())?;
        info!("model {model_name} ready: {outputs} classes, {} labels, {label_offset:?}", labels.len());
        Ok(Self { model_name: model_name.to_string(), model, labels, input_size, label_offset, device })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn input_size(&self) -> InputSize {
        self.input_size
    }

    pub fn label_offset(&self) -> LabelOffset {
        self.label_offset
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Classifies the image at `path`, returning the five most likely classes.
    pub fn classify<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Prediction>> {
        let images = preprocess::prepare(path, self.input_size, self.device)?;
        self.classify_tensor(&images)
    }

    /// Full softmax distribution over the model classes for a prepared
    /// `[1, H, W, 3]` batch, indexed by model output.
    pub fn probabilities(&self, images: &Tensor) -> Result<Vec<f32>> {
        debug!("forward pass on {:?}", images.size());
        let logits = tch::no_grad(|| self.model.forward(images))?;
        class_count(&logits)?;
        let probabilities = logits.f_softmax(-1, Kind::Float)?.f_view([-1])?;
        Ok(Vec::<f32>::try_from(&probabilities)?)
    }

    /// Classifies an already prepared `[1, H, W, 3]` batch.
    pub fn classify_tensor(&self, images: &Tensor) -> Result<Vec<Prediction>> {
        let probabilities = self.probabilities(images)?;
        top_k(&probabilities, TOP_K)
            .into_iter()
            .map(|(class_index, probability)| {
                let label_index = self.label_offset.label_index(class_index);
                let class = self.labels.get(label_index).ok_or_else(|| {
                    Error::UnexpectedOutput(format!("class {class_index} has no label"))
                })?;
                Ok(Prediction { class: class.to_string(), probability: probability as f64 })
            })
            .collect()
    }
}

fn class_count(logits: &Tensor) -> Result<i64> {
    match logits.size().as_slice() {
        [1, classes] => Ok(*classes),
        size => Err(Error::UnexpectedOutput(format!("expected a [1, C] tensor, got {size:?}"))),
    }
}
