//! Image decoding and preprocessing into model-ready NHWC float batches.
use std::path::Path;

use image::{DynamicImage, ImageReader};
use tch::{Device, Kind, Tensor};
use tracing::debug;

use crate::size::InputSize;
use crate::{Error, Result};

/// Converts a decoded image to a `[height, width, 3]` float tensor.
///
/// Colour images lose their alpha channel, single-channel images are
/// replicated to three channels. Integer pixels are scaled by their natural
/// range so that values land in [0, 1].
pub fn image_to_tensor(image: &DynamicImage) -> Result<Tensor> {
    let height = image.height() as i64;
    let width = image.width() as i64;
    let tensor = if image.color().has_color() {
        let rgb = image.to_rgb32f();
        Tensor::f_from_slice(rgb.as_raw().as_slice())?.f_view([height, width, 3])?
    } else {
        let gray = image.to_luma32f();
        let gray = Tensor::f_from_slice(gray.as_raw().as_slice())?.f_view([height, width, 1])?;
        Tensor::f_cat(&[&gray, &gray, &gray], 2)?
    };
    // Float images may carry 0-255 values.
    if tensor.f_max()?.double_value(&[]) > 1.0 {
        Ok(tensor / 255.0)
    } else {
        Ok(tensor)
    }
}

/// Decodes an image file, the format is guessed from its content.
///
/// On success returns a tensor of shape [height, width, 3] with values in [0, 1].
pub fn load_image<T: AsRef<Path>>(path: T) -> Result<Tensor> {
    let path = path.as_ref();
    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|err| Error::image_load(path, err))?
        .decode()
        .map_err(|err| Error::image_load(path, err))?;
    image_to_tensor(&image)
}

/// Resizes a `[batch, height, width, channels]` tensor so that it fits in a
/// `side x side` square while preserving the aspect ratio, then centres it on
/// a zero canvas.
pub fn resize_with_pad(images: &Tensor, side: i64) -> Result<Tensor> {
    let (batch, height, width, channels) = images.size4()?;
    if height == 0 || width == 0 {
        return Err(Error::Torch(tch::TchError::Shape(format!("empty image {height}x{width}"))));
    }
    let ratio = f64::max(width as f64 / side as f64, height as f64 / side as f64);
    let resized_h = ((height as f64 / ratio).floor() as i64).clamp(1, side);
    let resized_w = ((width as f64 / ratio).floor() as i64).clamp(1, side);
    let top = (side - resized_h) / 2;
    let left = (side - resized_w) / 2;

    let nchw = images.f_permute([0, 3, 1, 2])?.f_to_kind(Kind::Float)?;
    let resized = nchw
        .f_upsample_bilinear2d([resized_h, resized_w], false, None, None)?
        .f_permute([0, 2, 3, 1])?;
    let canvas = Tensor::f_zeros([batch, side, side, channels], (Kind::Float, images.device()))?;
    let mut window = canvas.f_narrow(1, top, resized_h)?.f_narrow(2, left, resized_w)?;
    window.f_copy_(&resized)?;
    Ok(canvas)
}

/// Batches a `[height, width, 3]` image and sizes it according to `input_size`.
pub fn batch_and_resize(image: &Tensor, input_size: InputSize) -> Result<Tensor> {
    let (height, width, _) = image.size3()?;
    let batch = image.f_unsqueeze(0)?;
    match input_size.target_side(height, width) {
        Some(side) => {
            debug!("resizing {height}x{width} image to {side}x{side}");
            resize_with_pad(&batch, side)
        }
        None => Ok(batch),
    }
}

/// Loads `path` and turns it into a `[1, H, W, 3]` float batch on `device`.
pub fn prepare<T: AsRef<Path>>(path: T, input_size: InputSize, device: Device) -> Result<Tensor> {
    let image = load_image(path)?;
    Ok(batch_and_resize(&image, input_size)?.f_to_device(device)?)
}
