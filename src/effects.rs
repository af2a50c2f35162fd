//! CPU colour effects for preview frames.
//!
//! Frames are small (480p at most) so a straight per-pixel pass is fast
//! enough at preview rate.

use crate::media::VideoFrame;
use crate::project::Effects;
use image::{imageops, Rgba, RgbaImage};
use std::sync::Arc;

/// Apply `effects` to a frame, returning the input untouched for the identity
pub fn apply_effects(frame: &VideoFrame, effects: &Effects) -> VideoFrame {
    if effects.is_identity() {
        return frame.clone();
    }
    let Some(mut image) = RgbaImage::from_raw(frame.width, frame.height, frame.data.to_vec()) else {
        log::warn!("Frame buffer does not match {}x{}", frame.width, frame.height);
        return frame.clone();
    };

    let recolour = effects.brightness != 0.0 || effects.contrast != 0.0 || effects.saturation != 0.0;
    if recolour {
        for pixel in image.pixels_mut() {
            adjust_pixel(pixel, effects);
        }
    }
    // Blur amount is used as the gaussian sigma
    if effects.blur > 0.0 {
        image = imageops::fast_blur(&image, effects.blur);
    }

    VideoFrame {
        data: Arc::new(image.into_raw()),
        ..frame.clone()
    }
}

/// Brightness shifts, contrast scales around mid grey, saturation mixes
/// toward or away from luma. Alpha is left alone.
pub fn adjust_pixel(pixel: &mut Rgba<u8>, effects: &Effects) {
    let [r, g, b, a] = pixel.0;
    let mut rgb = [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0];

    let contrast = 1.0 + effects.contrast;
    for c in rgb.iter_mut() {
        *c = (*c + effects.brightness - 0.5) * contrast + 0.5;
    }

    if effects.saturation != 0.0 {
        let luma = 0.299 * rgb[0] + 0.587 * rgb[1] + 0.114 * rgb[2];
        let saturation = 1.0 + effects.saturation;
        for c in rgb.iter_mut() {
            *c = luma + (*c - luma) * saturation;
        }
    }

    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    pixel.0 = [to_u8(rgb[0]), to_u8(rgb[1]), to_u8(rgb[2]), a];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(rgba: [u8; 4], effects: Effects) -> [u8; 4] {
        let mut p = Rgba(rgba);
        adjust_pixel(&mut p, &effects);
        p.0
    }

    fn frame(width: u32, height: u32, data: Vec<u8>) -> VideoFrame {
        VideoFrame {
            data: Arc::new(data),
            width,
            height,
            pts: 0.0,
        }
    }

    #[test]
    fn test_identity_is_untouched() {
        let input = frame(1, 1, vec![10, 20, 30, 255]);
        let output = apply_effects(&input, &Effects::default());
        assert!(Arc::ptr_eq(&input.data, &output.data));
        assert_eq!(pixel([10, 20, 30, 200], Effects::default()), [10, 20, 30, 200]);
    }

    #[test]
    fn test_brightness() {
        let brighter = Effects {
            brightness: 0.2,
            ..Effects::default()
        };
        assert_eq!(pixel([100, 100, 100, 255], brighter), [151, 151, 151, 255]);
        let full = Effects {
            brightness: 1.0,
            ..Effects::default()
        };
        assert_eq!(pixel([100, 0, 0, 7], full), [255, 255, 255, 7]);
    }

    #[test]
    fn test_contrast() {
        let flat = Effects {
            contrast: -1.0,
            ..Effects::default()
        };
        assert_eq!(pixel([0, 255, 40, 255], flat), [128, 128, 128, 255]);
        let punchy = Effects {
            contrast: 0.5,
            ..Effects::default()
        };
        assert_eq!(pixel([64, 192, 128, 255], punchy), [32, 224, 128, 255]);
    }

    #[test]
    fn test_desaturate_to_grey() {
        let grey = Effects {
            saturation: -1.0,
            ..Effects::default()
        };
        let [r, g, b, a] = pixel([255, 0, 0, 255], grey);
        assert_eq!((r, g, b, a), (76, 76, 76, 255));
    }

    #[test]
    fn test_blur_averages_neighbours() {
        let mut data = vec![0u8; 3 * 3 * 4];
        // White centre pixel
        data[16..20].copy_from_slice(&[255, 255, 255, 255]);
        let blurred = apply_effects(
            &frame(3, 3, data),
            &Effects {
                blur: 1.0,
                ..Effects::default()
            },
        );
        let pixels: Vec<&[u8]> = blurred.data.chunks(4).collect();
        assert!(pixels[4][0] < 255);
        assert!(pixels[1][0] > 0 && pixels[3][0] > 0);
    }

    #[test]
    fn test_blur_keeps_flat_image() {
        let data = [9u8, 8, 7, 6].repeat(4 * 2);
        let blurred = apply_effects(
            &frame(4, 2, data.clone()),
            &Effects {
                blur: 3.0,
                ..Effects::default()
            },
        );
        assert!(blurred.data.iter().zip(&data).all(|(a, b)| a.abs_diff(*b) <= 1));
    }

    #[test]
    fn test_mismatched_buffer_passes_through() {
        let input = frame(2, 2, vec![1; 4]);
        let output = apply_effects(
            &input,
            &Effects {
                brightness: 0.5,
                ..Effects::default()
            },
        );
        assert_eq!(output, input);
    }
}
