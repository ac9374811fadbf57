//! Image chunking - pads images to power-of-two canvases and splits them into square cells.

use crate::Result;
use image::imageops;
use image::{GenericImageView, Rgb, RgbImage};
use std::path::Path;

// Rec. 709 luma coefficients
const RED_FACTOR: f64 = 0.2126;
const GREEN_FACTOR: f64 = 0.7152;
const BLUE_FACTOR: f64 = 0.0722;
const MAX_CHANNEL: f64 = 255.0;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Load an image from disk as 8-bit RGB.
pub fn load(path: impl AsRef<Path>) -> Result<RgbImage> {
    Ok(image::open(path.as_ref())?.to_rgb8())
}

/// Center `image` on a white canvas whose sides are powers of two (at least 2).
///
/// When the extra width or height is odd, the spare column goes to the right
/// and the spare row to the bottom.
pub fn pad(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let (padded_w, padded_h) = (padded_side(width), padded_side(height));

    let mut canvas = RgbImage::from_pixel(padded_w, padded_h, WHITE);
    let left = (padded_w - width) / 2;
    let top = (padded_h - height) / 2;
    imageops::replace(&mut canvas, image, i64::from(left), i64::from(top));

    log::debug!("Padded {width}×{height} image to {padded_w}×{padded_h}");
    canvas
}

fn padded_side(n: u32) -> u32 {
    n.next_power_of_two().max(2)
}

/// Split a padded image into `rows × cols` square cells of side `width / cols`.
///
/// Cell `(i, j)` starts at pixel row `i * size`, column `j * size`.
pub fn partition(image: &RgbImage, rows: u32, cols: u32) -> Vec<Vec<RgbImage>> {
    let size = image.width() / cols;
    (0..rows)
        .map(|i| {
            (0..cols)
                .map(|j| imageops::crop_imm(image, j * size, i * size, size, size).to_image())
                .collect()
        })
        .collect()
}

/// Mean luma of a region, scaled to [0, 1].
pub fn brightness<I>(image: &I) -> f64
where
    I: GenericImageView<Pixel = Rgb<u8>>,
{
    let (width, height) = image.dimensions();
    let total: f64 = image.pixels().map(|(_, _, pixel)| grey(pixel)).sum();
    total / (f64::from(width) * f64::from(height) * MAX_CHANNEL)
}

fn grey(Rgb([r, g, b]): Rgb<u8>) -> f64 {
    f64::from(r) * RED_FACTOR + f64::from(g) * GREEN_FACTOR + f64::from(b) * BLUE_FACTOR
}
