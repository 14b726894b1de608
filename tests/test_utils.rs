#![allow(dead_code)]
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use image::{GrayImage, Luma, Rgb, RgbImage};
use imagenet_hub::labels::Labels;
use imagenet_hub::model::Model;
use tch::{CModule, Kind, Tensor};

pub type Shapes = Arc<Mutex<Vec<Vec<i64>>>>;

/// Returns fixed scores and records the shape of every input it sees.
#[derive(Debug)]
pub struct StubModel {
    logits: Vec<f32>,
    shapes: Shapes,
}

impl StubModel {
    pub fn new(logits: Vec<f32>) -> (Box<dyn Model>, Shapes) {
        let shapes = Shapes::default();
        (Box::new(StubModel { logits, shapes: shapes.clone() }), shapes)
    }

    /// Scores of width `classes` with a single maximum at `argmax`.
    pub fn peaked(classes: usize, argmax: usize) -> (Box<dyn Model>, Shapes) {
        let mut logits = vec![0.0; classes];
        logits[argmax] = 10.0;
        Self::new(logits)
    }
}

impl Model for StubModel {
    fn forward(&self, images: &Tensor) -> imagenet_hub::Result<Tensor> {
        self.shapes.lock().unwrap().push(images.size());
        Ok(Tensor::from_slice(self.logits.as_slice()).view([1, -1]))
    }
}

/// Scores that depend on the input: class `i` scores `10 * cos(i) * mean(pixels)`.
#[derive(Debug)]
pub struct PixelMeanModel {
    weights: Tensor,
}

impl PixelMeanModel {
    pub fn new(classes: i64) -> Box<dyn Model> {
        let weights = Tensor::arange(classes, (Kind::Float, tch::Device::Cpu)).cos().view([1, -1]);
        Box::new(PixelMeanModel { weights })
    }
}

impl Model for PixelMeanModel {
    fn forward(&self, images: &Tensor) -> imagenet_hub::Result<Tensor> {
        Ok(&self.weights * images.mean(Kind::Float) * 10.0)
    }
}

/// A real TorchScript module producing `[1, classes]` scores increasing with
/// the class index, scaled by the mean pixel value.
pub fn traced_module(classes: i64) -> CModule {
    let weights = Tensor::arange(classes, (Kind::Float, tch::Device::Cpu)).view([1, -1]);
    let mut closure = |inputs: &[Tensor]| vec![&weights * inputs[0].mean(Kind::Float)];
    CModule::create_by_tracing(
        "PixelMean",
        "forward",
        &[Tensor::zeros([1, 8, 8, 3], (Kind::Float, tch::Device::Cpu))],
        &mut closure,
    )
    .unwrap()
}

pub fn save_traced_module(path: &Path, classes: i64) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    traced_module(classes).save(path).unwrap();
}

pub fn label_lines(count: usize) -> Vec<String> {
    let mut labels = vec!["background".to_string()];
    labels.extend((1..count).map(|i| format!("class {i}")));
    labels
}

/// ImageNet style label list: `background` followed by `class 1` .. `class {count-1}`.
pub fn imagenet_labels(count: usize) -> Labels {
    Labels::from(label_lines(count))
}

pub fn write_labels(path: &Path, count: usize) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, label_lines(count).join("\n") + "\n").unwrap();
}

pub fn write_rgb_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

pub fn write_gray_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let img = GrayImage::from_fn(width, height, |x, _| Luma([(x * 3 % 256) as u8]));
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}
