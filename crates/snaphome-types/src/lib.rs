//! `snaphome-types` – value types shared by every snaphome crate.
//!
//! - [`Vec2`] – a planar vector used for steering, turn and approach vectors.
//! - [`Landmark`] – an ideal circular landmark placed in the world.
//! - [`HomingError`] – the error type returned by snapshot construction,
//!   feature matching and homing-vector synthesis.

use std::fmt;
use std::iter::Sum;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Vec2
// ────────────────────────────────────────────────────────────────────────────

/// A 2-D vector in the world frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// Create a new vector.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The zero vector.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Unit vector pointing along `angle` (radians, counter-clockwise from +X).
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }

    pub fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }

    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Euclidean length.
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Direction of the vector, `atan2(y, x)`.
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Scale to unit length.
    ///
    /// Fails with [`HomingError::DegenerateVector`] when the length is not
    /// greater than `threshold` (or is not finite), since the direction is
    /// then undefined.
    pub fn normalized(self, threshold: f64) -> Result<Self, HomingError> {
        let magnitude = self.norm();
        if !magnitude.is_finite() || magnitude <= threshold {
            return Err(HomingError::DegenerateVector { magnitude });
        }
        Ok(self.scale(1.0 / magnitude))
    }
}

impl Sum for Vec2 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Vec2::add)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Landmark
// ────────────────────────────────────────────────────────────────────────────

/// A static, circular world object seen by the agent as an occluding arc.
///
/// Landmarks are validated on construction (and on deserialisation) and are
/// never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "LandmarkRecord")]
pub struct Landmark {
    x: f64,
    y: f64,
    radius: f64,
}

/// Unvalidated wire form of a [`Landmark`].
#[derive(Deserialize, JsonSchema)]
struct LandmarkRecord {
    x: f64,
    y: f64,
    radius: f64,
}

impl TryFrom<LandmarkRecord> for Landmark {
    type Error = HomingError;

    fn try_from(raw: LandmarkRecord) -> Result<Self, Self::Error> {
        Landmark::new(raw.x, raw.y, raw.radius)
    }
}

impl Landmark {
    /// Create a landmark centred at `(x, y)`.
    ///
    /// `radius` must be strictly positive and all values finite.
    pub fn new(x: f64, y: f64, radius: f64) -> Result<Self, HomingError> {
        if !(x.is_finite() && y.is_finite()) {
            return Err(HomingError::InvalidGeometry {
                reason: format!("landmark position ({x}, {y}) is not finite"),
            });
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(HomingError::InvalidGeometry {
                reason: format!("landmark radius {radius} must be a positive number"),
            });
        }
        Ok(Self { x, y, radius })
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Whether the point `(px, py)` lies on or inside the landmark boundary.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        (px - self.x).hypot(py - self.y) <= self.radius
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Landmark(x={}, y={}, radius={})",
            self.x, self.y, self.radius
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Errors raised while building snapshots or synthesising a homing vector.
///
/// All of them are detected eagerly where the offending value is computed.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HomingError {
    /// The observer sits on or inside a landmark, or a landmark is malformed.
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    /// There was nothing to build from or nothing to match against.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A vector too short to define a direction was normalised.
    #[error("Degenerate vector: magnitude {magnitude:e} has no direction")]
    DegenerateVector { magnitude: f64 },
}
