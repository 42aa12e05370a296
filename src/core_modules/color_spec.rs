// THEORY:
// A `ColorSpec` is the contract between the outside world ("track the bright
// green marker") and the segmenter ("accept pixels whose HSV triple falls in
// this band"). It is a dumb data container: the segmenter interprets it, the
// rendering boundary derives a display color from it, and the settings
// collaborator produces it.
//
// Key architectural principles:
// 1.  **One Spec Per Channel**: The pipeline tracks one cursor per spec. The
//     default set mirrors the classic red/green/blue marker setup (hue centers
//     0, 60, 120) with a shared tolerance.
// 2.  **Clamp By Shift, Not Wraparound**: When `hue_center - hue_tolerance`
//     would go negative, the whole band is shifted upward so its lower bound
//     sits at 0. The band width is preserved but its range moves; a red marker
//     tuned near hue 0 therefore sees a slightly different band than a naive
//     circular-hue reading would suggest. This matches the original tuning and
//     is deliberate; see `hue_band`.

use crate::core_modules::color_convert::{Bgr, hsv_to_bgr};

/// The HSV acceptance band for one tracked color channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSpec {
    /// Center of the hue band, OpenCV convention: [0, 180).
    pub hue_center: u16,
    /// Half-width of the hue band.
    pub hue_tolerance: u16,
    /// Minimum accepted saturation.
    pub min_sat: u8,
    /// Maximum accepted saturation.
    pub max_sat: u8,
    /// Minimum accepted value (brightness).
    pub min_val: u8,
    /// Maximum accepted value.
    pub max_val: u8,
}

impl ColorSpec {
    /// Builds a spec with the conventional full saturation/value ceilings and
    /// the noise floors used by the default channels.
    pub fn new(hue_center: u16, hue_tolerance: u16) -> Self {
        Self {
            hue_center,
            hue_tolerance,
            min_sat: 100,
            max_sat: 255,
            min_val: 100,
            max_val: 255,
        }
    }

    /// The default red/green/blue marker channels sharing one tolerance and
    /// one set of saturation/value bounds.
    pub fn default_channels(
        tolerance: u16,
        min_sat: u8,
        max_sat: u8,
        min_val: u8,
        max_val: u8,
    ) -> Vec<ColorSpec> {
        [0u16, 60, 120]
            .into_iter()
            .map(|hue| ColorSpec {
                hue_center: hue,
                hue_tolerance: tolerance,
                min_sat,
                max_sat,
                min_val,
                max_val,
            })
            .collect()
    }

    /// The effective inclusive hue band `[lo, hi]`.
    ///
    /// When `hue_center < hue_tolerance` the band is shifted upward so that
    /// `lo == 0`; the width (`2 * hue_tolerance`) is preserved. This is a
    /// shift, not a modular wraparound.
    pub fn hue_band(&self) -> (u16, u16) {
        if self.hue_center < self.hue_tolerance {
            (0, self.hue_tolerance * 2)
        } else {
            (
                self.hue_center - self.hue_tolerance,
                self.hue_center + self.hue_tolerance,
            )
        }
    }

    /// True when the HSV triple falls inside every band of this spec.
    pub fn accepts(&self, h: u16, s: u8, v: u8) -> bool {
        let (lo, hi) = self.hue_band();
        h >= lo
            && h <= hi
            && s >= self.min_sat
            && s <= self.max_sat
            && v >= self.min_val
            && v <= self.max_val
    }

    /// The BGR color used to render everything belonging to this channel.
    pub fn render_color(&self) -> Bgr {
        hsv_to_bgr(self.hue_center, 255, 255)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_is_symmetric_away_from_zero() {
        let spec = ColorSpec::new(60, 10);
        assert_eq!(spec.hue_band(), (50, 70));
    }

    #[test]
    fn low_end_clamp_shifts_band_and_preserves_width() {
        let spec = ColorSpec::new(1, 10);
        let (lo, hi) = spec.hue_band();
        assert_eq!((lo, hi), (0, 20));
        assert_eq!(hi - lo, 20);
    }

    #[test]
    fn accepts_respects_all_three_bands() {
        let spec = ColorSpec::new(60, 10);
        assert!(spec.accepts(60, 255, 255));
        assert!(spec.accepts(50, 100, 100));
        assert!(!spec.accepts(49, 255, 255)); // hue below band
        assert!(!spec.accepts(60, 99, 255)); // saturation below floor
        assert!(!spec.accepts(60, 255, 99)); // value below floor
    }

    #[test]
    fn default_channels_cover_the_three_markers() {
        let channels = ColorSpec::default_channels(10, 100, 255, 100, 255);
        let centers: Vec<u16> = channels.iter().map(|c| c.hue_center).collect();
        assert_eq!(centers, vec![0, 60, 120]);
    }
}
