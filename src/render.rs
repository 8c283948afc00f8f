// Turns the 16-bit samples from the camera into the 8-bit RGB preview.
// One pass: min/max statistics and the image are produced together.

use image::RgbImage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStats {
    pub min: u16,
    pub max: u16,
}

/// Keep the high byte of a sample.
#[inline]
pub fn luminance(sample: u16) -> u8 {
    (sample >> 8) as u8
}

/// Convert `width * height` samples into an RGB image.
///
/// With `red_filter` set the image is red-only (green and blue are 0),
/// otherwise gray. `samples` may be longer than the region; the tail is
/// ignored. An empty region reports min 65535 and max 0.
pub fn convert(samples: &[u16], width: u32, height: u32, red_filter: bool) -> (RgbImage, FrameStats) {
    let count = width as usize * height as usize;
    let mut rgb = Vec::with_capacity(count * 3);
    let mut stats = FrameStats { min: u16::MAX, max: 0 };

    for &s in &samples[..count.min(samples.len())] {
        stats.min = stats.min.min(s);
        stats.max = stats.max.max(s);
        let l = luminance(s);
        if red_filter {
            rgb.extend_from_slice(&[l, 0, 0]);
        } else {
            rgb.extend_from_slice(&[l, l, l]);
        }
    }
    // A short read leaves the rest of the image black.
    rgb.resize(count * 3, 0);

    let img = RgbImage::from_raw(width, height, rgb).unwrap_or_else(|| RgbImage::new(width, height));
    (img, stats)
}
