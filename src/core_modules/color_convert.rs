// THEORY:
// The `color_convert` module is the rendering boundary's color authority. Every
// tracked channel is defined by a hue, and everything drawn for that channel
// (region rectangles, cursor, trail) must use a color derived from that same
// hue, so the on-screen feedback always matches what the segmenter is actually
// looking for.
//
// Key architectural principles:
// 1.  **Deterministic Mapping**: The HSV -> BGR conversion is a pure function.
//     The same (h, s, v) triple always yields the same BGR triple, so channel
//     colors are stable across frames and sessions.
// 2.  **OpenCV Hue Convention**: Hue lives in [0, 180) to match the 8-bit hue
//     range the segmenter thresholds against. Sector width is 30, giving the
//     standard six sectors of the HSV cone.
// 3.  **Degenerate Inputs Degrade, Never Abort**: A hue outside [0, 180) maps
//     to an out-of-range sector; the conversion logs a warning and returns
//     black instead of erroring. Rendering a black marker is a visible bug
//     report; a panic mid-frame is not.

/// A color triple in BGR channel order, matching the frame buffer layout.
pub type Bgr = (u8, u8, u8);

/// Converts an HSV triple (hue in [0, 180), saturation and value in [0, 255])
/// into a BGR triple using the standard sector formula.
///
/// Hues outside [0, 180) land in a sector >= 6 and are mapped to black.
pub fn hsv_to_bgr(h: u16, s: u8, v: u8) -> Bgr {
    let sector = h / 30;
    let s_f = s as f64 / 255.0;
    let v_f = v as f64 / 255.0;

    let c = v_f * s_f;
    let x = c * (1.0 - ((h as f64 / 30.0) % 2.0 - 1.0).abs());
    let m = v_f - c;

    let (r, g, b) = match sector {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        5 => (c, 0.0, x),
        _ => {
            log::warn!("hue {} outside [0, 180), rendering black", h);
            return (0, 0, 0);
        }
    };

    (
        ((b + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((r + m) * 255.0).round() as u8,
    )
}
