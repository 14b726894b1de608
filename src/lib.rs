//! Top-5 ImageNet classification with pretrained TorchScript models.
//!
//! A model is configured once by name: the artifact is looked up in a local
//! cache, then fetched from the model registry, the label list is resolved the
//! same way and a warm-up pass is run. Images are then classified one at a time.
//!
//! ```no_run
//! # fn main() -> imagenet_hub::Result<()> {
//! let config = imagenet_hub::Config::from_env()?;
//! let session = imagenet_hub::Session::configure("mobilenet_v2_100_224", &config)?;
//! for prediction in session.classify("cat.jpg")? {
//!     println!("{:30} {:5.2}%", prediction.class, 100.0 * prediction.probability);
//! }
//! # Ok(())
//! # }
//! ```
mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::Config;

pub mod fetch;
pub mod labels;
pub mod model;
pub mod preprocess;
pub mod registry;
pub mod resolve;
pub mod size;

mod session;
pub use session::{top_k, Prediction, Session, TOP_K};

mod service;
pub use service::ClassifierService;
