// THEORY:
// The `segmenter` module is the first stage of the vision pipeline. It turns a
// raw BGR frame into a binary mask for one color channel: a pixel is set iff
// its HSV triple falls inside the channel's `ColorSpec` band. Everything
// downstream (dilation, contours, regions, the cursor itself) operates on this
// mask, so this is the single place where raw pixels are interpreted.
//
// Key architectural principles:
// 1.  **HSV, Not BGR**: Thresholding happens in HSV because hue is far more
//     stable under lighting changes than raw channel intensities. The
//     conversion uses the OpenCV 8-bit convention (hue in [0, 180)).
// 2.  **Stateless Per-Frame Function**: Segmentation has no memory. Each call
//     owns the mask it produces; downstream stages consume it read-only.
// 3.  **Degenerate Frames Degrade**: A zero-dimension frame yields an empty
//     mask. There is no error path here; "nothing matched" is always a valid
//     answer for one frame.

use image::{GrayImage, ImageBuffer, Rgb};

use crate::core_modules::color_spec::ColorSpec;

/// A frame buffer whose channel order is BGR, matching the camera collaborator.
///
/// The `Rgb<u8>` pixel type is a three-channel container here; channel 0 is
/// blue, channel 2 is red. Conversions that leave the crate must swap.
pub type BgrImage = ImageBuffer<Rgb<u8>, Vec<u8>>;

/// Mask value for a pixel accepted by the color threshold.
pub const MASK_SET: u8 = 255;

/// Converts one BGR pixel to HSV with hue scaled to [0, 180) and saturation
/// and value scaled to [0, 255].
pub fn bgr_to_hsv(b: u8, g: u8, r: u8) -> (u16, u8, u8) {
    let r_f = r as f64 / 255.0;
    let g_f = g as f64 / 255.0;
    let b_f = b as f64 / 255.0;

    let max = r_f.max(g_f).max(b_f);
    let min = r_f.min(g_f).min(b_f);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r_f {
        60.0 * (((g_f - b_f) / delta) % 6.0)
    } else if max == g_f {
        60.0 * (((b_f - r_f) / delta) + 2.0)
    } else {
        60.0 * (((r_f - g_f) / delta) + 4.0)
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    let s = if max == 0.0 { 0.0 } else { delta / max };

    (
        (h / 2.0).round() as u16 % 180,
        (s * 255.0).round() as u8,
        (max * 255.0).round() as u8,
    )
}

/// Thresholds one frame against one channel's spec, producing a binary mask
/// with the same dimensions as the frame.
pub fn segment(frame: &BgrImage, spec: &ColorSpec) -> GrayImage {
    let (width, height) = frame.dimensions();
    let mut mask = GrayImage::new(width, height);

    for (x, y, pixel) in frame.enumerate_pixels() {
        let Rgb([b, g, r]) = *pixel;
        let (h, s, v) = bgr_to_hsv(b, g, r);
        if spec.accepts(h, s, v) {
            mask.put_pixel(x, y, image::Luma([MASK_SET]));
        }
    }

    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_primaries_map_to_opencv_hues() {
        assert_eq!(bgr_to_hsv(0, 0, 255), (0, 255, 255)); // red
        assert_eq!(bgr_to_hsv(0, 255, 0), (60, 255, 255)); // green
        assert_eq!(bgr_to_hsv(255, 0, 0), (120, 255, 255)); // blue
    }

    #[test]
    fn black_has_zero_value() {
        let (_, s, v) = bgr_to_hsv(0, 0, 0);
        assert_eq!(s, 0);
        assert_eq!(v, 0);
    }

    #[test]
    fn segment_sets_only_matching_pixels() {
        let mut frame = BgrImage::new(3, 1);
        frame.put_pixel(0, 0, Rgb([0, 255, 0])); // pure green, hue 60
        frame.put_pixel(1, 0, Rgb([0, 0, 255])); // pure red, hue 0
        frame.put_pixel(2, 0, Rgb([40, 40, 40])); // dark gray, below value floor

        let spec = ColorSpec::new(60, 10);
        let mask = segment(&frame, &spec);

        assert_eq!(mask.get_pixel(0, 0).0[0], MASK_SET);
        assert_eq!(mask.get_pixel(1, 0).0[0], 0);
        assert_eq!(mask.get_pixel(2, 0).0[0], 0);
    }

    #[test]
    fn zero_dimension_frame_yields_empty_mask() {
        let frame = BgrImage::new(0, 0);
        let mask = segment(&frame, &ColorSpec::new(60, 10));
        assert_eq!(mask.dimensions(), (0, 0));
    }
}
