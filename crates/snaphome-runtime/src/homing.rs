//! Correspondence matching and homing-vector synthesis.
//!
//! Every feature of the remembered (origin) snapshot is paired with the
//! circularly nearest feature of the same kind in the current snapshot.
//! Each pair then votes twice:
//!
//! - a **turn** vector, perpendicular to the matched bearing, that corrects
//!   the rotational offset between memory and view;
//! - an **approach** vector along the matched bearing, pointing towards the
//!   feature when it now looks smaller than remembered and away from it when
//!   it looks larger.
//!
//! The homing direction is `normalize(turn + ratio · approach)`.  A view in
//! which every remembered feature reappears unchanged has no direction and
//! is reported as [`HomingError::DegenerateVector`].
//!
//! # Example
//!
//! ```rust
//! use snaphome_perception::Snapshot;
//! use snaphome_runtime::homing::{compute_homing_vector, HomingConfig};
//! use snaphome_types::Landmark;
//!
//! let landmarks = vec![
//!     Landmark::new(3.5, 2.0, 0.5).unwrap(),
//!     Landmark::new(3.5, -2.0, 0.5).unwrap(),
//!     Landmark::new(0.0, -4.0, 0.5).unwrap(),
//! ];
//! let home = Snapshot::capture(0.0, 0.0, &landmarks).unwrap();
//! let here = Snapshot::capture(-3.0, -3.0, &landmarks).unwrap();
//!
//! let homing = compute_homing_vector(&home, &here, &HomingConfig::default()).unwrap();
//! // Home lies up and to the right of (-3, -3).
//! assert!(homing.direction.x > 0.0 && homing.direction.y > 0.0);
//! ```

use std::f64::consts::{FRAC_PI_2, PI};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use snaphome_perception::geometry::{closest_feature, unit_vector, wrap_angle};
use snaphome_perception::{Feature, Snapshot};
use snaphome_types::{HomingError, Vec2};
use tracing::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Tunable constants of the homing-vector synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HomingConfig {
    /// Weight of the approach vector relative to the turn vector.
    #[serde(default = "default_turn_approach_ratio")]
    pub turn_approach_ratio: f64,
    /// Center and length differences at or below this value (radians) count
    /// as an unchanged feature.
    #[serde(default = "default_angular_tolerance")]
    pub angular_tolerance: f64,
    /// Combined vectors at or below this magnitude have no usable direction.
    #[serde(default = "default_degenerate_threshold")]
    pub degenerate_threshold: f64,
}

fn default_turn_approach_ratio() -> f64 {
    3.0
}
fn default_angular_tolerance() -> f64 {
    1e-9
}
fn default_degenerate_threshold() -> f64 {
    1e-9
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            turn_approach_ratio: default_turn_approach_ratio(),
            angular_tolerance: default_angular_tolerance(),
            degenerate_threshold: default_degenerate_threshold(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Correspondence
// ─────────────────────────────────────────────────────────────────────────────

/// A remembered feature, its match in the current view and the resulting
/// turn angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correspondence {
    pub origin: Feature,
    pub matched: Feature,
    /// Direction of the turn vector, in `(−π, π]`.
    pub turn_angle: f64,
}

impl Correspondence {
    /// Pair `origin` with `matched` and derive the turn angle.
    ///
    /// The matched bearing is rotated by −90° when its center is numerically
    /// smaller than the remembered center and by +90° otherwise.  Matches
    /// wider than a half turn point the other way, so the angle is flipped
    /// by π.
    pub fn new(origin: Feature, matched: Feature) -> Self {
        let mut angle = if matched.center() < origin.center() {
            matched.center() - FRAC_PI_2
        } else {
            matched.center() + FRAC_PI_2
        };
        if matched.length() > PI {
            angle += PI;
        }
        Self {
            origin,
            matched,
            turn_angle: wrap_angle(angle),
        }
    }

    /// Difference between the matched and the remembered center.
    pub fn angular_offset(&self) -> f64 {
        self.matched.center() - self.origin.center()
    }

    /// Whether the match has the remembered center and length within
    /// `tolerance`.
    pub fn is_unchanged(&self, tolerance: f64) -> bool {
        self.angular_offset().abs() <= tolerance
            && (self.matched.length() - self.origin.length()).abs() <= tolerance
    }

    /// Unit vector along the turn angle.
    pub fn turn_contribution(&self) -> Vec2 {
        unit_vector(self.turn_angle)
    }

    /// Unit vector towards the matched feature when it has shrunk, away from
    /// it otherwise.
    pub fn approach_contribution(&self) -> Vec2 {
        let toward = unit_vector(self.matched.center());
        if self.origin.length() > self.matched.length() {
            toward
        } else {
            toward.neg()
        }
    }
}

/// Match every origin feature to its nearest current feature of the same kind.
///
/// Landmark features come first, then space features, each in origin order.
/// Fails with [`HomingError::EmptyInput`] when the origin has features of a
/// kind the current snapshot lacks.
pub fn correspondences(
    origin: &Snapshot,
    current: &Snapshot,
) -> Result<Vec<Correspondence>, HomingError> {
    let categories = [
        (origin.features(), current.features()),
        (origin.spaces_features(), current.spaces_features()),
    ];

    let matches = categories
        .into_iter()
        .flat_map(|(remembered, seen)| {
            remembered.iter().map(move |feature| {
                closest_feature(feature.center(), seen)
                    .map(|nearest| Correspondence::new(*feature, *nearest))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        x = current.x(),
        y = current.y(),
        matches = matches.len(),
        "features matched against origin"
    );
    Ok(matches)
}

/// Sum of the turn contributions (not normalised).
pub fn turn_vector(matches: &[Correspondence]) -> Vec2 {
    matches.iter().map(Correspondence::turn_contribution).sum()
}

/// Sum of the approach contributions (not normalised).
pub fn approach_vector(matches: &[Correspondence]) -> Vec2 {
    matches.iter().map(Correspondence::approach_contribution).sum()
}

// ─────────────────────────────────────────────────────────────────────────────
// HomingVector
// ─────────────────────────────────────────────────────────────────────────────

/// Homing result together with the components it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HomingVector {
    /// Aggregate rotational correction.
    pub turn: Vec2,
    /// Aggregate radial correction.
    pub approach: Vec2,
    /// Unit steering direction towards the origin.
    pub direction: Vec2,
}

impl HomingVector {
    /// Combine precomputed correspondences into a homing vector.
    ///
    /// Fails with [`HomingError::DegenerateVector`] when every match is
    /// unchanged or the weighted sum is too short to normalise.
    pub fn from_correspondences(
        matches: &[Correspondence],
        config: &HomingConfig,
    ) -> Result<Self, HomingError> {
        if matches.iter().all(|m| m.is_unchanged(config.angular_tolerance)) {
            return Err(HomingError::DegenerateVector { magnitude: 0.0 });
        }
        let turn = turn_vector(matches);
        let approach = approach_vector(matches);
        let direction = turn
            .add(approach.scale(config.turn_approach_ratio))
            .normalized(config.degenerate_threshold)?;
        Ok(Self {
            turn,
            approach,
            direction,
        })
    }
}

/// Steering vector that leads from `current` back to `origin`.
///
/// Fails with [`HomingError::DegenerateVector`] when the weighted sum has no
/// direction, which is always the case when `current` shows the same view as
/// `origin`.
pub fn compute_homing_vector(
    origin: &Snapshot,
    current: &Snapshot,
    config: &HomingConfig,
) -> Result<HomingVector, HomingError> {
    let matches = correspondences(origin, current)?;
    HomingVector::from_correspondences(&matches, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snaphome_perception::FeatureKind;
    use snaphome_types::Landmark;

    fn scenario() -> Vec<Landmark> {
        vec![
            Landmark::new(3.5, 2.0, 0.5).unwrap(),
            Landmark::new(3.5, -2.0, 0.5).unwrap(),
            Landmark::new(0.0, -4.0, 0.5).unwrap(),
        ]
    }

    fn landmark_feature(center: f64, half_width: f64) -> Feature {
        Feature::new(
            FeatureKind::Landmark,
            center,
            center + half_width,
            center - half_width,
        )
    }

    // ── Turn angle ──────────────────────────────────────────────────────────

    #[test]
    fn turn_angle_rotates_clockwise_match_by_minus_quarter() {
        let c = Correspondence::new(landmark_feature(0.5, 0.1), landmark_feature(0.3, 0.1));
        assert!((c.turn_angle - (0.3 - FRAC_PI_2)).abs() < 1e-12);
    }

    #[test]
    fn turn_angle_rotates_counter_clockwise_match_by_plus_quarter() {
        let c = Correspondence::new(landmark_feature(0.3, 0.1), landmark_feature(0.5, 0.1));
        assert!((c.turn_angle - (0.5 + FRAC_PI_2)).abs() < 1e-12);
    }

    #[test]
    fn turn_angle_flips_for_wide_match() {
        let origin = Feature::new(FeatureKind::Space, 0.3, 1.0, -0.4);
        // Clockwise from 1.0 round to 2.0 spans more than half a turn.
        let wide = Feature::new(FeatureKind::Space, 0.5, 1.0, 2.0);
        assert!(wide.length() > PI);
        let c = Correspondence::new(origin, wide);
        // 0.5 + π/2 + π wraps to 0.5 − π/2.
        assert!((c.turn_angle - (0.5 - FRAC_PI_2)).abs() < 1e-12);
    }

    #[test]
    fn turn_angle_is_canonical() {
        let c = Correspondence::new(landmark_feature(2.5, 0.1), landmark_feature(3.0, 0.1));
        assert!(c.turn_angle > -PI && c.turn_angle <= PI);
        assert!((c.turn_angle - wrap_angle(3.0 + FRAC_PI_2)).abs() < 1e-12);
    }

    #[test]
    fn turn_branch_compares_raw_centers_across_seam() {
        // The match sits just past the seam: numerically smaller, so it is
        // rotated by −90°.
        let c = Correspondence::new(landmark_feature(PI - 0.1, 0.05), landmark_feature(-PI + 0.1, 0.05));
        assert!(c.angular_offset() < 0.0);
        assert!((c.turn_angle - wrap_angle(-PI + 0.1 - FRAC_PI_2)).abs() < 1e-12);
        assert!((c.turn_angle - (FRAC_PI_2 + 0.1)).abs() < 1e-12);
    }

    #[test]
    fn turn_branch_for_space_center_beyond_pi() {
        // Remembered space center 2.616, match at -3.043 (less than it).
        let origin = Feature::new(FeatureKind::Space, 2.616, 0.5, -1.0);
        let matched = Feature::new(FeatureKind::Space, -3.043, 0.3, 0.1);
        let c = Correspondence::new(origin, matched);
        assert!((c.turn_angle - wrap_angle(-3.043 - FRAC_PI_2)).abs() < 1e-12);
    }

    // ── Contributions ───────────────────────────────────────────────────────

    #[test]
    fn identical_feature_still_votes() {
        // Equal centers take the +90° branch; equal lengths push away.
        let f = landmark_feature(1.0, 0.2);
        let c = Correspondence::new(f, f);
        assert!(c.is_unchanged(1e-9));
        assert!((c.turn_angle - (1.0 + FRAC_PI_2)).abs() < 1e-12);
        let v = c.approach_contribution();
        assert!((v.x + 1.0f64.cos()).abs() < 1e-12);
        assert!((v.y + 1.0f64.sin()).abs() < 1e-12);
    }

    #[test]
    fn one_unchanged_match_is_not_degenerate() {
        let same = Correspondence::new(landmark_feature(1.0, 0.2), landmark_feature(1.0, 0.2));
        let moved = Correspondence::new(landmark_feature(0.0, 0.2), landmark_feature(0.1, 0.1));
        let homing =
            HomingVector::from_correspondences(&[same, moved], &HomingConfig::default()).unwrap();
        let expected = same
            .turn_contribution()
            .add(moved.turn_contribution())
            .add(same.approach_contribution().add(moved.approach_contribution()).scale(3.0));
        assert!((homing.direction.x - expected.x / expected.norm()).abs() < 1e-12);
        assert!((homing.direction.y - expected.y / expected.norm()).abs() < 1e-12);
    }

    #[test]
    fn all_unchanged_matches_are_degenerate() {
        let same = Correspondence::new(landmark_feature(1.0, 0.2), landmark_feature(1.0, 0.2));
        let err = HomingVector::from_correspondences(&[same, same], &HomingConfig::default())
            .unwrap_err();
        assert!(matches!(err, HomingError::DegenerateVector { .. }));
    }

    #[test]
    fn shrunken_feature_pulls_towards_it() {
        let c = Correspondence::new(landmark_feature(0.0, 0.2), landmark_feature(0.0, 0.1));
        let v = c.approach_contribution();
        assert!((v.x - 1.0).abs() < 1e-12);
        assert!(v.y.abs() < 1e-12);
    }

    #[test]
    fn grown_feature_pushes_away() {
        let c = Correspondence::new(landmark_feature(0.0, 0.1), landmark_feature(0.0, 0.2));
        let v = c.approach_contribution();
        assert!((v.x + 1.0).abs() < 1e-12);
    }

    // ── Matching ────────────────────────────────────────────────────────────

    #[test]
    fn correspondences_keep_origin_order_and_categories() {
        let landmarks = scenario();
        let origin = Snapshot::capture(0.0, 0.0, &landmarks).unwrap();
        let current = Snapshot::capture(-3.0, -3.0, &landmarks).unwrap();
        let matches = correspondences(&origin, &current).unwrap();

        assert_eq!(
            matches.len(),
            origin.features().len() + origin.spaces_features().len()
        );
        for (m, f) in matches.iter().zip(origin.all_features()) {
            assert_eq!(m.origin, *f);
            assert_eq!(m.origin.kind(), m.matched.kind());
        }
    }

    #[test]
    fn missing_space_features_is_empty_input() {
        let landmarks = vec![
            Landmark::new(5.0, 0.0, 1.0).unwrap(),
            Landmark::new(-5.0, 0.0, 1.0).unwrap(),
        ];
        let origin = Snapshot::capture(0.0, 0.0, &landmarks).unwrap();
        // Far along the axis both silhouettes line up and overlap.
        let current = Snapshot::capture(12.0, 0.0, &landmarks).unwrap();
        assert!(!origin.spaces_features().is_empty());
        assert!(current.spaces_features().is_empty());

        let err = correspondences(&origin, &current).unwrap_err();
        assert!(matches!(err, HomingError::EmptyInput(_)));
    }

    // ── Homing vector ───────────────────────────────────────────────────────

    #[test]
    fn homing_at_origin_is_degenerate() {
        let landmarks = scenario();
        let origin = Snapshot::capture(0.0, 0.0, &landmarks).unwrap();
        let again = Snapshot::capture(0.0, 0.0, &landmarks).unwrap();
        let err = compute_homing_vector(&origin, &again, &HomingConfig::default()).unwrap_err();
        assert!(matches!(err, HomingError::DegenerateVector { .. }));
    }

    #[test]
    fn homing_direction_is_unit_and_weighted() {
        let landmarks = scenario();
        let origin = Snapshot::capture(0.0, 0.0, &landmarks).unwrap();
        let current = Snapshot::capture(-3.0, -3.0, &landmarks).unwrap();
        let config = HomingConfig::default();
        let homing = compute_homing_vector(&origin, &current, &config).unwrap();

        assert!((homing.direction.norm() - 1.0).abs() < 1e-12);
        let raw = homing.turn.add(homing.approach.scale(3.0));
        let expected = raw.scale(1.0 / raw.norm());
        assert!((homing.direction.x - expected.x).abs() < 1e-12);
        assert!((homing.direction.y - expected.y).abs() < 1e-12);
    }

    #[test]
    fn ratio_changes_the_blend() {
        let landmarks = scenario();
        let origin = Snapshot::capture(0.0, 0.0, &landmarks).unwrap();
        let current = Snapshot::capture(-3.0, -3.0, &landmarks).unwrap();
        let turn_only = HomingConfig {
            turn_approach_ratio: 0.0,
            ..HomingConfig::default()
        };
        let homing = compute_homing_vector(&origin, &current, &turn_only).unwrap();
        let expected = homing.turn.normalized(1e-9).unwrap();
        assert!((homing.direction.x - expected.x).abs() < 1e-12);
        assert!((homing.direction.y - expected.y).abs() < 1e-12);
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg: HomingConfig = serde_json::from_str(r#"{"turn_approach_ratio": 2.0}"#).unwrap();
        assert_eq!(cfg.turn_approach_ratio, 2.0);
        assert_eq!(cfg.angular_tolerance, 1e-9);
        assert_eq!(cfg.degenerate_threshold, 1e-9);
    }
}
