//! Runtime configuration.
//!
//! Every field has a default and can be overridden through an environment
//! variable, see [`Config::from_env`].
use std::env;
use std::path::{Path, PathBuf};

use tch::Device;

use crate::registry::ModelRegistry;
use crate::{Error, Result};

/// Canonical ImageNet label file, 1001 lines with `background` first.
pub const DEFAULT_LABELS_URL: &str =
    "https://storage.googleapis.com/download.tensorflow.org/data/ImageNetLabels.txt";

/// Largest side accepted without resizing for models with no fixed input size.
pub const DEFAULT_MAX_DYNAMIC_SIZE: i64 = 512;

/// Name of the label file inside the cache and save directories.
pub const LABELS_FILE_NAME: &str = "ImageNetLabels.txt";

pub const CACHE_DIR_ENV: &str = "IMAGENET_HUB_CACHE_DIR";
pub const SAVE_DIR_ENV: &str = "IMAGENET_HUB_SAVE_DIR";
pub const LABELS_URL_ENV: &str = "IMAGENET_HUB_LABELS_URL";
pub const MAX_SIZE_ENV: &str = "IMAGENET_HUB_MAX_SIZE";
pub const DEVICE_ENV: &str = "IMAGENET_HUB_DEVICE";
pub const REGISTRY_ENV: &str = "IMAGENET_HUB_REGISTRY";

#[derive(Debug, Clone)]
pub struct Config {
    /// Read-only directory of pre-provisioned artifacts, `<dir>/<name>/model.pt`.
    pub cache_dir: PathBuf,
    /// Directory written after a successful remote fetch.
    pub save_dir: PathBuf,
    pub labels_url: String,
    pub max_dynamic_size: i64,
    pub device: Device,
    /// Optional JSON file replacing the built-in model registry.
    pub registry_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./graphs"),
            save_dir: PathBuf::from("./saves"),
            labels_url: DEFAULT_LABELS_URL.to_string(),
            max_dynamic_size: DEFAULT_MAX_DYNAMIC_SIZE,
            device: Device::Cpu,
            registry_file: None,
        }
    }
}

impl Config {
    /// Builds a configuration from the defaults and the `IMAGENET_HUB_*`
    /// environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(dir) = lookup(CACHE_DIR_ENV) {
            config.cache_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(SAVE_DIR_ENV) {
            config.save_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup(LABELS_URL_ENV) {
            config.labels_url = url;
        }
        if let Some(size) = lookup(MAX_SIZE_ENV) {
            config.max_dynamic_size = parse_max_size(&size)?;
        }
        if let Some(device) = lookup(DEVICE_ENV) {
            config.device = parse_device(&device)?;
        }
        if let Some(file) = lookup(REGISTRY_ENV) {
            config.registry_file = Some(PathBuf::from(file));
        }
        Ok(config)
    }

    pub fn with_cache_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cache_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_save_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.save_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_labels_url(mut self, url: impl Into<String>) -> Self {
        self.labels_url = url.into();
        self
    }

    pub fn with_max_dynamic_size(mut self, size: i64) -> Self {
        self.max_dynamic_size = size;
        self
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    pub fn with_registry_file<P: AsRef<Path>>(mut self, file: P) -> Self {
        self.registry_file = Some(file.as_ref().to_path_buf());
        self
    }

    /// The registry in effect: the override file when set, the built-in table otherwise.
    pub fn registry(&self) -> Result<ModelRegistry> {
        match &self.registry_file {
            Some(file) => ModelRegistry::from_json_file(file),
            None => Ok(ModelRegistry::builtin()),
        }
    }

    pub fn cached_model_path(&self, name: &str) -> PathBuf {
        model_path(&self.cache_dir, name)
    }

    pub fn saved_model_path(&self, name: &str) -> PathBuf {
        model_path(&self.save_dir, name)
    }

    pub fn cached_labels_path(&self) -> PathBuf {
        self.cache_dir.join(LABELS_FILE_NAME)
    }

    pub fn saved_labels_path(&self) -> PathBuf {
        self.save_dir.join(LABELS_FILE_NAME)
    }
}

fn model_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(name).join("model.pt")
}

fn parse_max_size(value: &str) -> Result<i64> {
    match value.trim().parse::<i64>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(Error::Config(format!("{MAX_SIZE_ENV} must be a positive integer, got {value:?}"))),
    }
}

fn parse_device(value: &str) -> Result<Device> {
    match value.trim().to_lowercase().as_str() {
        "cpu" => Ok(Device::Cpu),
        "cuda" | "gpu" => Ok(Device::cuda_if_available()),
        other => match other.strip_prefix("cuda:").map(str::parse::<usize>) {
            Some(Ok(index)) => Ok(Device::Cuda(index)),
            _ => Err(Error::Config(format!("unsupported device {value:?}"))),
        },
    }
}
