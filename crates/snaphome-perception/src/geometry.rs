//! Geometry primitives on the circular (mod 2π) bearing domain.
//!
//! Bearings come from `atan2` and lie in `(−π, π]`.  Silhouette bounds and
//! space centers are derived from them arithmetically and may leave that
//! range; the comparisons in [`crate::feature`] are defined on those raw
//! values.  [`wrap_angle`] canonicalises derived directions such as turn
//! angles.

use std::f64::consts::{PI, TAU};

use snaphome_types::{HomingError, Vec2};

use crate::feature::Feature;

/// Canonicalise an angle into `(−π, π]`.
pub fn wrap_angle(angle: f64) -> f64 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Clockwise arc length from `left` to `right` on the unit circle.
///
/// When `left < right` the interval wraps through the seam and the
/// complement `2π − |right − left|` is returned.  For any `a ≠ b`,
/// `arc_length(a, b) + arc_length(b, a) == 2π`.
pub fn arc_length(left: f64, right: f64) -> f64 {
    let arc = (right - left).abs();
    if left < right { TAU - arc } else { arc }
}

/// Bearing of `(x2, y2)` seen from `(x1, y1)`, in `(−π, π]`.
pub fn angle_between(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (y2 - y1).atan2(x2 - x1)
}

/// Euclidean distance between two points.
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x2 - x1).hypot(y2 - y1)
}

/// Unit vector pointing along `angle`.
pub fn unit_vector(angle: f64) -> Vec2 {
    Vec2::from_angle(angle)
}

/// Circular distance `min(|a − b|, 2π − |a − b|)`.
///
/// Lies in `[0, π]` whenever the two angles are less than a full turn apart.
pub fn circular_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    diff.min(TAU - diff)
}

/// Return the feature whose `center` is circularly closest to `target`.
///
/// Features are scanned in slice order and the first minimal match is kept,
/// so equidistant candidates resolve to the earliest one.
pub fn closest_feature(target: f64, features: &[Feature]) -> Result<&Feature, HomingError> {
    let mut best: Option<(&Feature, f64)> = None;
    for feature in features {
        let diff = circular_distance(feature.center(), target);
        match best {
            Some((_, min)) if diff >= min => {}
            _ => best = Some((feature, diff)),
        }
    }
    best.map(|(feature, _)| feature)
        .ok_or_else(|| HomingError::EmptyInput("no features to match against".to_string()))
}
