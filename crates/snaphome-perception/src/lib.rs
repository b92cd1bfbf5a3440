//! `snaphome-perception` – what the agent sees.
//!
//! Turns a set of ideal circular landmarks into the bearing-only panorama
//! used by the snapshot model of visual homing.
//!
//! # Modules
//!
//! - [`geometry`] – angle, distance and arc-length helpers on the circular
//!   bearing domain, plus [`closest_feature`][geometry::closest_feature]
//!   matching.
//! - [`feature`] – [`Feature`][feature::Feature]: an angular interval that is
//!   either a landmark silhouette or the gap between two silhouettes.
//! - [`snapshot`] – [`Snapshot`][snapshot::Snapshot]: the full panoramic
//!   decomposition seen from one position.

pub mod feature;
pub mod geometry;
pub mod snapshot;

pub use feature::{Feature, FeatureKind, Segment};
pub use snapshot::{Snapshot, SnapshotOverlay};
