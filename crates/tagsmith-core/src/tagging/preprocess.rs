//! Image preprocessing for WD-style tagger models.
//!
//! The models expect:
//! - Transparent pixels flattened onto white
//! - The image padded to a white square, then resized to `size × size`
//! - Channel order: BGR, values in [0, 255] (no normalization)
//! - Tensor layout: NHWC [batch, height, width, channels]

use image::{imageops, DynamicImage, Rgb, RgbImage};
use ndarray::Array4;

/// Number of color channels.
const CHANNELS: usize = 3;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Flatten alpha onto white and center the image on a white square canvas.
fn pad_to_square(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let side = width.max(height);
    let offset_x = (side - width) / 2;
    let offset_y = (side - height) / 2;

    let mut canvas = RgbImage::from_pixel(side, side, WHITE);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        canvas.put_pixel(x + offset_x, y + offset_y, Rgb([blend(r), blend(g), blend(b)]));
    }
    canvas
}

/// Preprocess an image into a `[1, size, size, 3]` BGR tensor.
pub fn preprocess(image: &DynamicImage, size: u32) -> Array4<f32> {
    let square = pad_to_square(image);
    let resized = if square.width() == size {
        square
    } else {
        imageops::resize(&square, size, size, imageops::FilterType::CatmullRom)
    };

    let side = size as usize;
    let mut tensor = Array4::<f32>::zeros((1, side, side, CHANNELS));
    for (x, y, pixel) in resized.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let (x, y) = (x as usize, y as usize);
        tensor[[0, y, x, 0]] = b as f32;
        tensor[[0, y, x, 1]] = g as f32;
        tensor[[0, y, x, 2]] = r as f32;
    }
    tensor
}
