//! Colour scale for sunlight hours.

/// Hours mapped to the hot end of the scale.
pub const DEFAULT_MAX_HOURS: f64 = 12.0;

/// Diverging blue-to-red scale as `(position, [r, g, b])` stops.
const STOPS: [(f64, [u8; 3]); 8] = [
    (0.0, [49, 54, 149]),
    (0.25, [69, 117, 180]),
    (0.4, [116, 173, 209]),
    (0.5, [224, 243, 248]),
    (0.6, [254, 224, 144]),
    (0.75, [253, 174, 97]),
    (0.9, [244, 109, 67]),
    (1.0, [165, 0, 38]),
];

/// Color of a unit receiving `hours` of sun, with `max_hours` at the red end.
///
/// Channels are interpolated linearly between the bracketing stops and
/// rounded to the nearest integer.
pub fn color_for(hours: f64, max_hours: f64) -> [u8; 3] {
    let t = if max_hours > 0.0 && hours.is_finite() {
        (hours / max_hours).clamp(0.0, 1.0)
    } else {
        0.0
    };

    for w in STOPS.windows(2) {
        let (t0, c0) = w[0];
        let (t1, c1) = w[1];
        if t <= t1 {
            let f = (t - t0) / (t1 - t0);
            let mut rgb = [0_u8; 3];
            for i in 0..3 {
                let v = c0[i] as f64 + (c1[i] as f64 - c0[i] as f64) * f;
                rgb[i] = v.round().clamp(0.0, 255.0) as u8;
            }
            return rgb;
        }
    }
    STOPS[STOPS.len() - 1].1
}

/// [`color_for`] with the 12-hour scale.
pub fn default_color_for(hours: f64) -> [u8; 3] {
    color_for(hours, DEFAULT_MAX_HOURS)
}
