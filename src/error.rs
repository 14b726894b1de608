use std::io;
use std::path::PathBuf;

use tch::TchError;
use thiserror::Error;

/// Main library error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The model name is neither cached locally nor present in the registry.
    #[error("unknown model name: {0}")]
    UnknownModelName(String),

    /// The model is in the registry but no source could provide it.
    #[error("model {name} is not available: {reason}")]
    ModelUnavailable { name: String, reason: String },

    /// Neither the local label files nor the remote label file could be read.
    #[error("labels are not available: {0}")]
    LabelsUnavailable(String),

    /// The image could not be opened or decoded.
    #[error("cannot load image {path:?}: {reason}")]
    ImageLoad { path: PathBuf, reason: String },

    /// `classify` was called before a successful `configure`.
    #[error("no model configured, call configure first")]
    NotConfigured,

    /// The model output width does not line up with the label list.
    #[error("model produces {outputs} classes but {labels} labels are available")]
    LabelMismatch { outputs: i64, labels: usize },

    /// The model returned something other than a `[1, C]` score tensor.
    #[error("unexpected model output: {0}")]
    UnexpectedOutput(String),

    /// HTTP(S) fetch failure.
    #[error("fetch error for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Errors returned by libtorch.
    #[error(transparent)]
    Torch(#[from] TchError),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Registry file parse error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn image_load<P: Into<PathBuf>>(path: P, reason: impl ToString) -> Self {
        Error::ImageLoad { path: path.into(), reason: reason.to_string() }
    }

    pub(crate) fn fetch(url: &str, reason: impl ToString) -> Self {
        Error::Fetch { url: url.to_string(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
