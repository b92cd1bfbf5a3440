//! Angular features seen from an observer.
//!
//! A [`Feature`] is an interval on the unit circle around the observer.  It
//! is either the silhouette of a landmark ([`FeatureKind::Landmark`]) or the
//! empty gap between two neighbouring silhouettes ([`FeatureKind::Space`]).
//!
//! Bounds follow a clockwise convention: a landmark feature runs from its
//! `left` ray (counter-clockwise edge) clockwise to its `right` ray.  A space
//! feature takes the *inner* edges of its two flanking landmarks, so its
//! `left` is the first landmark's `right` and its `right` is the second
//! landmark's `left`.
//!
//! Bounds are kept exactly as derived (`center ± half_width`, or the
//! flanking landmarks' bounds), without folding them back into `(−π, π]`.
//! The overlap test and the space-center rule compare these raw values.

use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;
use snaphome_types::{HomingError, Landmark, Vec2};

use crate::geometry::{angle_between, arc_length, distance};

/// What a [`Feature`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// The occlusion arc of a landmark.
    Landmark,
    /// The free arc between two landmark silhouettes.
    Space,
}

/// A line segment in the world frame, used for overlay rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

/// An angular interval around an observer.
///
/// Landmark centers lie in `(−π, π]`; bounds and space centers may extend
/// past ±π.  `length` is the clockwise [`arc_length`] from `left` to `right`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Feature {
    kind: FeatureKind,
    center: f64,
    length: f64,
    left: f64,
    right: f64,
}

impl Feature {
    /// Build a feature from its center and boundary rays.
    ///
    /// The length is derived with [`arc_length`].
    pub fn new(kind: FeatureKind, center: f64, left: f64, right: f64) -> Self {
        Self {
            kind,
            center,
            length: arc_length(left, right),
            left,
            right,
        }
    }

    /// The silhouette of `landmark` seen from `(x, y)`.
    ///
    /// Fails with [`HomingError::InvalidGeometry`] when the observer is on or
    /// inside the landmark, where the silhouette is undefined.
    pub fn of_landmark(x: f64, y: f64, landmark: &Landmark) -> Result<Self, HomingError> {
        let dist = distance(x, y, landmark.x(), landmark.y());
        if !(dist > landmark.radius()) {
            return Err(HomingError::InvalidGeometry {
                reason: format!("observer ({x}, {y}) is not outside {landmark}"),
            });
        }
        let center = angle_between(x, y, landmark.x(), landmark.y());
        let half_width = (landmark.radius() / dist).asin();
        Ok(Self::new(
            FeatureKind::Landmark,
            center,
            center + half_width,
            center - half_width,
        ))
    }

    /// The space feature lying clockwise between `from` and `to`.
    ///
    /// The center is chosen by comparing the two flanking centers: equal
    /// centers are kept, a larger `from` takes the plain midpoint and a
    /// smaller `from` takes the midpoint shifted by π.
    pub fn between(from: &Feature, to: &Feature) -> Self {
        let center = if from.center == to.center {
            from.center
        } else if from.center > to.center {
            from.center + (to.center - from.center) / 2.0
        } else {
            from.center + PI + (to.center - from.center) / 2.0
        };
        Self::new(FeatureKind::Space, center, from.right, to.left)
    }

    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    pub fn center(&self) -> f64 {
        self.center
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    /// Whether two landmark silhouettes overlap: `self.left > other.right`
    /// and `self.right < other.left` on the raw bounds.  Touching bounds do
    /// not overlap.
    pub fn overlaps(&self, other: &Feature) -> bool {
        self.left > other.right && self.right < other.left
    }

    /// Segment from `(x, y)` along the feature center.
    pub fn center_ray(&self, x: f64, y: f64, length: f64) -> Segment {
        ray(x, y, self.center, length)
    }

    /// Segments from `(x, y)` along the left and right boundary rays.
    pub fn boundary_rays(&self, x: f64, y: f64, length: f64) -> [Segment; 2] {
        [ray(x, y, self.left, length), ray(x, y, self.right, length)]
    }
}

fn ray(x: f64, y: f64, angle: f64, length: f64) -> Segment {
    let start = Vec2::new(x, y);
    Segment {
        start,
        end: start.add(Vec2::from_angle(angle).scale(length)),
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Feature(center={}, length={})", self.center, self.length)
    }
}
