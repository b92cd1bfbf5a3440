//! Homing-field evaluation.
//!
//! Sweeps a rectangular grid of positions, computes the homing vector at
//! each one and measures how far it deviates from the true bearing to the
//! origin.  The mean deviation over the grid is the figure of merit for a
//! landmark layout and a [`HomingConfig`].
//!
//! Each cell is an independent pure computation against the shared origin
//! snapshot, so the sweep can run on the rayon thread pool.  Cells that fail
//! (observer on a landmark, nothing to match, degenerate vector) are recorded
//! as [`SkippedCell`]s and never abort the sweep.

use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use snaphome_perception::Snapshot;
use snaphome_perception::geometry::{angle_between, unit_vector};
use snaphome_types::{HomingError, Landmark, Vec2};
use tracing::{info, warn};

use crate::homing::{HomingConfig, HomingVector, compute_homing_vector};

/// Coordinates closer than this are treated as the same grid cell.
const CELL_EPSILON: f64 = 1e-9;

/// Largest grid a sweep will allocate.
pub const MAX_CELLS: usize = 1_000_000;

// ─────────────────────────────────────────────────────────────────────────────
// GridSpec
// ─────────────────────────────────────────────────────────────────────────────

/// Inclusive rectangular grid of query positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GridSpec {
    #[serde(default = "default_min")]
    pub x_min: f64,
    #[serde(default = "default_max")]
    pub x_max: f64,
    #[serde(default = "default_min")]
    pub y_min: f64,
    #[serde(default = "default_max")]
    pub y_max: f64,
    /// Spacing between neighbouring cells along both axes.
    #[serde(default = "default_step")]
    pub step: f64,
}

fn default_min() -> f64 {
    -7.0
}
fn default_max() -> f64 {
    7.0
}
fn default_step() -> f64 {
    1.0
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            x_min: default_min(),
            x_max: default_max(),
            y_min: default_min(),
            y_max: default_max(),
            step: default_step(),
        }
    }
}

impl GridSpec {
    /// All cell positions, x-major then y, both bounds included.
    ///
    /// Grids with more than [`MAX_CELLS`] cells are rejected before anything
    /// is allocated.
    pub fn cells(&self) -> Result<Vec<(f64, f64)>, HomingError> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(HomingError::InvalidGeometry {
                reason: format!("grid step {} must be positive", self.step),
            });
        }
        let nx = axis_len(self.x_min, self.x_max, self.step);
        let ny = axis_len(self.y_min, self.y_max, self.step);
        if nx == 0.0 || ny == 0.0 {
            return Err(HomingError::EmptyInput("grid has no cells".to_string()));
        }
        if nx * ny > MAX_CELLS as f64 {
            return Err(HomingError::InvalidGeometry {
                reason: format!("grid of {nx} x {ny} cells exceeds the limit of {MAX_CELLS}"),
            });
        }
        let xs = axis(self.x_min, nx as usize, self.step);
        let ys = axis(self.y_min, ny as usize, self.step);
        Ok(xs
            .iter()
            .flat_map(|&x| ys.iter().map(move |&y| (x, y)))
            .collect())
    }
}

/// Number of inclusive steps from `min` to `max`, as a float so oversized
/// grids can be rejected without overflow.
fn axis_len(min: f64, max: f64, step: f64) -> f64 {
    if !(min.is_finite() && max.is_finite()) || max < min {
        return 0.0;
    }
    ((max - min) / step + CELL_EPSILON).floor() + 1.0
}

fn axis(min: f64, count: usize, step: f64) -> Vec<f64> {
    (0..count).map(|i| min + i as f64 * step).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Results
// ─────────────────────────────────────────────────────────────────────────────

/// Homing result at one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSample {
    pub x: f64,
    pub y: f64,
    pub homing: HomingVector,
    /// True bearing from the cell to the origin.
    pub ideal_bearing: f64,
    /// Unsigned angle between the homing direction and the ideal bearing.
    pub error_rad: f64,
    pub error_deg: f64,
}

/// A grid cell whose homing vector could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedCell {
    pub x: f64,
    pub y: f64,
    pub error: HomingError,
}

/// Outcome of a full grid sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldReport {
    pub samples: Vec<FieldSample>,
    /// The origin cell and cells centred on a landmark.
    pub excluded: Vec<Vec2>,
    pub skipped: Vec<SkippedCell>,
    pub mean_error_deg: Option<f64>,
    pub max_error_deg: Option<f64>,
}

impl FieldReport {
    /// Whether the mean error is strictly below `threshold_deg`.
    ///
    /// A report without samples never passes.
    pub fn passes(&self, threshold_deg: f64) -> bool {
        self.mean_error_deg.is_some_and(|mean| mean < threshold_deg)
    }
}

enum CellOutcome {
    Excluded(Vec2),
    Sample(FieldSample),
    Skipped(SkippedCell),
}

/// Unsigned angle between a unit `direction` and the bearing `ideal`, in
/// `[0, π]`.
pub fn angular_error(direction: Vec2, ideal: f64) -> f64 {
    direction.dot(unit_vector(ideal)).clamp(-1.0, 1.0).acos()
}

// ─────────────────────────────────────────────────────────────────────────────
// FieldEvaluator
// ─────────────────────────────────────────────────────────────────────────────

/// Evaluates homing vectors against one remembered origin snapshot.
#[derive(Debug, Clone)]
pub struct FieldEvaluator {
    landmarks: Vec<Landmark>,
    origin: Snapshot,
    config: HomingConfig,
}

impl FieldEvaluator {
    /// Capture the origin snapshot at `(origin_x, origin_y)`.
    pub fn new(
        landmarks: Vec<Landmark>,
        origin_x: f64,
        origin_y: f64,
        config: HomingConfig,
    ) -> Result<Self, HomingError> {
        let origin = Snapshot::capture(origin_x, origin_y, &landmarks)?;
        Ok(Self {
            landmarks,
            origin,
            config,
        })
    }

    pub fn origin(&self) -> &Snapshot {
        &self.origin
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn config(&self) -> &HomingConfig {
        &self.config
    }

    /// Snapshot of the landmarks from `(x, y)`.
    pub fn snapshot_at(&self, x: f64, y: f64) -> Result<Snapshot, HomingError> {
        Snapshot::capture(x, y, &self.landmarks)
    }

    /// Homing vector and error at a single position.
    pub fn evaluate_at(&self, x: f64, y: f64) -> Result<FieldSample, HomingError> {
        let current = self.snapshot_at(x, y)?;
        let homing = compute_homing_vector(&self.origin, &current, &self.config)?;
        let ideal_bearing = angle_between(x, y, self.origin.x(), self.origin.y());
        let error_rad = angular_error(homing.direction, ideal_bearing);
        Ok(FieldSample {
            x,
            y,
            homing,
            ideal_bearing,
            error_rad,
            error_deg: error_rad.to_degrees(),
        })
    }

    /// Sweep `grid`, optionally across the rayon thread pool.
    ///
    /// Results keep grid order regardless of `parallel`.
    pub fn evaluate(&self, grid: &GridSpec, parallel: bool) -> Result<FieldReport, HomingError> {
        let cells = grid.cells()?;
        let outcomes: Vec<CellOutcome> = if parallel {
            cells.par_iter().map(|&(x, y)| self.classify(x, y)).collect()
        } else {
            cells.iter().map(|&(x, y)| self.classify(x, y)).collect()
        };

        let mut samples = Vec::new();
        let mut excluded = Vec::new();
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                CellOutcome::Sample(sample) => samples.push(sample),
                CellOutcome::Excluded(cell) => excluded.push(cell),
                CellOutcome::Skipped(cell) => {
                    warn!(x = cell.x, y = cell.y, error = %cell.error, "grid cell skipped");
                    skipped.push(cell);
                }
            }
        }

        let mean_error_deg = (!samples.is_empty())
            .then(|| samples.iter().map(|s| s.error_deg).sum::<f64>() / samples.len() as f64);
        let max_error_deg = samples.iter().map(|s| s.error_deg).reduce(f64::max);

        info!(
            samples = samples.len(),
            excluded = excluded.len(),
            skipped = skipped.len(),
            mean_error_deg = mean_error_deg.unwrap_or(f64::NAN),
            "homing field evaluated"
        );

        Ok(FieldReport {
            samples,
            excluded,
            skipped,
            mean_error_deg,
            max_error_deg,
        })
    }

    fn classify(&self, x: f64, y: f64) -> CellOutcome {
        if self.is_excluded(x, y) {
            return CellOutcome::Excluded(Vec2::new(x, y));
        }
        match self.evaluate_at(x, y) {
            Ok(sample) => CellOutcome::Sample(sample),
            Err(error) => CellOutcome::Skipped(SkippedCell { x, y, error }),
        }
    }

    fn is_excluded(&self, x: f64, y: f64) -> bool {
        let same = |ax: f64, ay: f64| (ax - x).abs() < CELL_EPSILON && (ay - y).abs() < CELL_EPSILON;
        same(self.origin.x(), self.origin.y())
            || self.landmarks.iter().any(|l| same(l.x(), l.y()))
    }
}
