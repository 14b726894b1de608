//! Static model registry: model name to remote artifact locator and, when the
//! architecture has one, its fixed square input side.
use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::Result;

/// A registry entry, also the value type of the JSON override file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistryEntry {
    pub url: String,
    #[serde(default)]
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

// (name, locator, fixed input side)
const BUILTIN: &[(&str, &str, Option<i64>)] = &[
    ("efficientnetv2-s", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet1k_s/classification/2", Some(384)),
    ("efficientnetv2-m", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet1k_m/classification/2", Some(480)),
    ("efficientnetv2-l", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet1k_l/classification/2", Some(480)),
    ("efficientnetv2-s-21k", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet21k_s/classification/2", Some(384)),
    ("efficientnetv2-m-21k", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet21k_m/classification/2", Some(480)),
    ("efficientnetv2-l-21k", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet21k_l/classification/2", Some(480)),
    ("efficientnetv2-xl-21k", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet21k_xl/classification/2", Some(512)),
    ("efficientnetv2-b0-21k", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet21k_b0/classification/2", Some(224)),
    ("efficientnetv2-b1-21k", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet21k_b1/classification/2", Some(240)),
    ("efficientnetv2-b2-21k", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet21k_b2/classification/2", Some(260)),
    ("efficientnetv2-b3-21k", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet21k_b3/classification/2", Some(300)),
    ("efficientnetv2-s-21k-ft1k", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet21k_ft1k_s/classification/2", Some(384)),
    ("efficientnetv2-m-21k-ft1k", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet21k_ft1k_m/classification/2", Some(480)),
    ("efficientnetv2-l-21k-ft1k", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet21k_ft1k_l/classification/2", Some(480)),
    ("efficientnetv2-xl-21k-ft1k", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet21k_ft1k_xl/classification/2", Some(512)),
    ("efficientnetv2-b0-21k-ft1k", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet21k_ft1k_b0/classification/2", Some(224)),
    ("efficientnetv2-b1-21k-ft1k", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet21k_ft1k_b1/classification/2", Some(240)),
    ("efficientnetv2-b2-21k-ft1k", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet21k_ft1k_b2/classification/2", Some(260)),
    ("efficientnetv2-b3-21k-ft1k", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet21k_ft1k_b3/classification/2", Some(300)),
    ("efficientnetv2-b0", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet1k_b0/classification/2", Some(224)),
    ("efficientnetv2-b1", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet1k_b1/classification/2", Some(240)),
    ("efficientnetv2-b2", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet1k_b2/classification/2", Some(260)),
    ("efficientnetv2-b3", "https://tfhub.dev/google/imagenet/efficientnet_v2_imagenet1k_b3/classification/2", Some(300)),
    ("efficientnet_b0", "https://tfhub.dev/tensorflow/efficientnet/b0/classification/1", Some(224)),
    ("efficientnet_b1", "https://tfhub.dev/tensorflow/efficientnet/b1/classification/1", Some(240)),
    ("efficientnet_b2", "https://tfhub.dev/tensorflow/efficientnet/b2/classification/1", Some(260)),
    ("efficientnet_b3", "https://tfhub.dev/tensorflow/efficientnet/b3/classification/1", Some(300)),
    ("efficientnet_b4", "https://tfhub.dev/tensorflow/efficientnet/b4/classification/1", Some(380)),
    ("efficientnet_b5", "https://tfhub.dev/tensorflow/efficientnet/b5/classification/1", Some(456)),
    ("efficientnet_b6", "https://tfhub.dev/tensorflow/efficientnet/b6/classification/1", Some(528)),
    ("efficientnet_b7", "https://tfhub.dev/tensorflow/efficientnet/b7/classification/1", Some(600)),
    ("bit_s-r50x1", "https://tfhub.dev/google/bit/s-r50x1/ilsvrc2012_classification/1", None),
    ("inception_v3", "https://tfhub.dev/google/imagenet/inception_v3/classification/4", Some(299)),
    ("inception_resnet_v2", "https://tfhub.dev/google/imagenet/inception_resnet_v2/classification/4", Some(299)),
    ("resnet_v1_50", "https://tfhub.dev/google/imagenet/resnet_v1_50/classification/4", Some(224)),
    ("resnet_v1_101", "https://tfhub.dev/google/imagenet/resnet_v1_101/classification/4", Some(224)),
    ("resnet_v1_152", "https://tfhub.dev/google/imagenet/resnet_v1_152/classification/4", Some(224)),
    ("resnet_v2_50", "https://tfhub.dev/google/imagenet/resnet_v2_50/classification/4", Some(224)),
    ("resnet_v2_101", "https://tfhub.dev/google/imagenet/resnet_v2_101/classification/4", Some(224)),
    ("resnet_v2_152", "https://tfhub.dev/google/imagenet/resnet_v2_152/classification/4", Some(224)),
    ("nasnet_large", "https://tfhub.dev/google/imagenet/nasnet_large/classification/4", Some(331)),
    ("nasnet_mobile", "https://tfhub.dev/google/imagenet/nasnet_mobile/classification/4", Some(224)),
    ("pnasnet_large", "https://tfhub.dev/google/imagenet/pnasnet_large/classification/4", Some(331)),
    ("mobilenet_v2_100_224", "https://tfhub.dev/google/imagenet/mobilenet_v2_100_224/classification/4", Some(224)),
    ("mobilenet_v2_130_224", "https://tfhub.dev/google/imagenet/mobilenet_v2_130_224/classification/4", Some(224)),
    ("mobilenet_v2_140_224", "https://tfhub.dev/google/imagenet/mobilenet_v2_140_224/classification/4", Some(224)),
    ("mobilenet_v3_small_100_224", "https://tfhub.dev/google/imagenet/mobilenet_v3_small_100_224/classification/5", Some(224)),
    ("mobilenet_v3_small_075_224", "https://tfhub.dev/google/imagenet/mobilenet_v3_small_075_224/classification/5", Some(224)),
    ("mobilenet_v3_large_100_224", "https://tfhub.dev/google/imagenet/mobilenet_v3_large_100_224/classification/5", Some(224)),
    ("mobilenet_v3_large_075_224", "https://tfhub.dev/google/imagenet/mobilenet_v3_large_075_224/classification/5", Some(224)),
];

impl ModelRegistry {
    /// The registry shipped with the crate.
    ///
    /// Its locators are TensorFlow Hub pages, not TorchScript artifacts, so a
    /// model from this table only loads from a local `model.pt` in the cache or
    /// save directory. Point [`crate::Config::with_registry_file`] at a JSON
    /// table of TorchScript URLs to fetch models remotely.
    pub fn builtin() -> Self {
        BUILTIN
            .iter()
            .map(|&(name, url, size)| (name.to_string(), RegistryEntry { url: url.to_string(), size }))
            .collect()
    }

    /// Loads a registry from a JSON object of the form
    /// `{ "<name>": { "url": "...", "size": 224 } }`, `size` being optional.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let entries: BTreeMap<String, RegistryEntry> =
            serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(Self { entries })
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: RegistryEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    pub fn locator(&self, name: &str) -> Option<&str> {
        self.get(name).map(|entry| entry.url.as_str())
    }

    pub fn fixed_size(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|entry| entry.size)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, RegistryEntry)> for ModelRegistry {
    fn from_iter<I: IntoIterator<Item = (String, RegistryEntry)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}
