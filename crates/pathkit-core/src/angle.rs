//! Heading arithmetic in degrees.
//!
//! All headings in PathKit are degrees measured counter-clockwise from the
//! positive x axis. Normalized headings live in `(-180, 180]`.

/// Normalize an angle in degrees into `(-180, 180]`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let mut a = degrees % 360.0;
    if a <= -180.0 {
        a += 360.0;
    } else if a > 180.0 {
        a -= 360.0;
    }
    a
}

/// Signed shortest-path difference `to - from` in degrees, in `(-180, 180]`.
pub fn angular_difference(from: f64, to: f64) -> f64 {
    normalize_degrees(to - from)
}

/// Interpolate from `from` towards `to` along the shortest arc.
///
/// `fraction` is clamped to `[0, 1]`.
pub fn lerp_heading(from: f64, to: f64, fraction: f64) -> f64 {
    let f = fraction.clamp(0.0, 1.0);
    normalize_degrees(from + angular_difference(from, to) * f)
}

/// Heading in degrees of the direction vector `(dx, dy)`.
pub fn heading_of(dx: f64, dy: f64) -> f64 {
    normalize_degrees(dy.atan2(dx).to_degrees())
}
