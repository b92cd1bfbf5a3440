//! Panoramic snapshots.
//!
//! A [`Snapshot`] decomposes the full 360° view from one position into
//! alternating landmark features and space features.  Everything is computed
//! once in [`Snapshot::capture`]; the snapshot is immutable afterwards, so its
//! two feature lists can never fall out of step.
//!
//! # Example
//!
//! ```rust
//! use snaphome_perception::snapshot::Snapshot;
//! use snaphome_types::Landmark;
//!
//! let landmarks = vec![
//!     Landmark::new(3.5, 2.0, 0.5).unwrap(),
//!     Landmark::new(3.5, -2.0, 0.5).unwrap(),
//!     Landmark::new(0.0, -4.0, 0.5).unwrap(),
//! ];
//! let home = Snapshot::capture(0.0, 0.0, &landmarks).unwrap();
//!
//! assert_eq!(home.features().len(), 3);
//! assert_eq!(home.spaces_features().len(), 3);
//! ```

use std::fmt;

use serde::Serialize;
use snaphome_types::{HomingError, Landmark};
use tracing::debug;

use crate::feature::{Feature, Segment};

/// The landmark and space features visible from one observer position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    x: f64,
    y: f64,
    /// One feature per landmark, in landmark input order.
    features: Vec<Feature>,
    /// One feature per cyclically adjacent landmark pair whose silhouettes
    /// do not overlap, in pair order.
    spaces_features: Vec<Feature>,
}

impl Snapshot {
    /// Take a snapshot of `landmarks` from `(x, y)`.
    ///
    /// Fails with [`HomingError::EmptyInput`] when `landmarks` is empty and
    /// with [`HomingError::InvalidGeometry`] when the observer is on or inside
    /// any landmark.
    pub fn capture(x: f64, y: f64, landmarks: &[Landmark]) -> Result<Self, HomingError> {
        if landmarks.is_empty() {
            return Err(HomingError::EmptyInput(
                "a snapshot needs at least one landmark".to_string(),
            ));
        }

        let features = landmarks
            .iter()
            .map(|landmark| Feature::of_landmark(x, y, landmark))
            .collect::<Result<Vec<_>, _>>()?;

        let spaces_features = features
            .iter()
            .zip(features.iter().cycle().skip(1))
            .filter(|(from, to)| !from.overlaps(to))
            .map(|(from, to)| Feature::between(from, to))
            .collect::<Vec<_>>();

        debug!(
            x,
            y,
            landmarks = features.len(),
            spaces = spaces_features.len(),
            "snapshot captured"
        );

        Ok(Self {
            x,
            y,
            features,
            spaces_features,
        })
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Landmark features, one per landmark in input order.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Space features between non-overlapping neighbouring landmarks.
    pub fn spaces_features(&self) -> &[Feature] {
        &self.spaces_features
    }

    /// Landmark features followed by space features.
    pub fn all_features(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter().chain(self.spaces_features.iter())
    }

    /// Ray segments for drawing this snapshot at its own position.
    pub fn overlay(&self, length: f64) -> SnapshotOverlay {
        self.overlay_at(self.x, self.y, length)
    }

    /// Ray segments for drawing this snapshot anchored at `(x, y)`.
    ///
    /// Anchoring elsewhere lets a renderer superimpose the home snapshot on
    /// the current position.
    pub fn overlay_at(&self, x: f64, y: f64, length: f64) -> SnapshotOverlay {
        SnapshotOverlay {
            landmark_centers: self
                .features
                .iter()
                .map(|f| f.center_ray(x, y, length))
                .collect(),
            landmark_bounds: self
                .features
                .iter()
                .flat_map(|f| f.boundary_rays(x, y, length))
                .collect(),
            space_centers: self
                .spaces_features
                .iter()
                .map(|f| f.center_ray(x, y, length))
                .collect(),
        }
    }
}

/// Drawable rays of a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotOverlay {
    pub landmark_centers: Vec<Segment>,
    /// Left and right boundary rays, two per landmark feature.
    pub landmark_bounds: Vec<Segment>,
    pub space_centers: Vec<Segment>,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Snapshot(x={}, y={})", self.x, self.y)?;
        for feature in self.all_features() {
            write!(f, "\n{feature}")?;
        }
        Ok(())
    }
}
