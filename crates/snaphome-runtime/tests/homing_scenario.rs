//! End-to-end homing on the three-cylinder layout and on a mirror-symmetric
//! layout.

use snaphome_perception::Snapshot;
use snaphome_runtime::field::angular_error;
use snaphome_runtime::{FieldEvaluator, GridSpec, HomingConfig, compute_homing_vector};
use snaphome_types::{HomingError, Landmark};

fn cylinders() -> Vec<Landmark> {
    vec![
        Landmark::new(3.5, 2.0, 0.5).unwrap(),
        Landmark::new(3.5, -2.0, 0.5).unwrap(),
        Landmark::new(0.0, -4.0, 0.5).unwrap(),
    ]
}

/// Two landmarks mirrored about the x-axis.  Swapping them maps the landmark
/// list onto its own mirror image, so both space features swap too.
fn mirrored() -> Vec<Landmark> {
    vec![
        Landmark::new(3.0, 2.0, 0.5).unwrap(),
        Landmark::new(3.0, -2.0, 0.5).unwrap(),
    ]
}

#[test]
fn minus_three_minus_three_points_home() {
    let landmarks = cylinders();
    let origin = Snapshot::capture(0.0, 0.0, &landmarks).unwrap();
    let current = Snapshot::capture(-3.0, -3.0, &landmarks).unwrap();

    let homing = compute_homing_vector(&origin, &current, &HomingConfig::default()).unwrap();
    let ideal = snaphome_perception::geometry::angle_between(-3.0, -3.0, 0.0, 0.0);
    let error_deg = angular_error(homing.direction, ideal).to_degrees();
    assert!(error_deg < 30.0, "error at (-3, -3) was {error_deg}°");
    assert!((error_deg - 8.462272663233597).abs() < 1e-9, "error {error_deg}°");
}

#[test]
fn grid_mean_error_is_below_acceptance_threshold() {
    let evaluator = FieldEvaluator::new(cylinders(), 0.0, 0.0, HomingConfig::default()).unwrap();
    let report = evaluator.evaluate(&GridSpec::default(), true).unwrap();

    assert_eq!(report.samples.len(), 219);
    assert_eq!(report.skipped.len(), 4);
    let mean = report.mean_error_deg.unwrap();
    assert!(mean < 30.0, "mean error {mean}°");
    assert!(report.passes(30.0));
    assert!(
        (mean - 12.116510958235057).abs() < 1e-9,
        "mean error {mean}° differs from the reference sweep"
    );
    let max = report.max_error_deg.unwrap();
    assert!((max - 68.04137104934512).abs() < 1e-9, "max error {max}°");
    for sample in &report.samples {
        assert!((sample.homing.direction.norm() - 1.0).abs() < 1e-9);
        assert!(sample.error_deg <= 180.0);
    }
}

#[test]
fn homing_at_origin_is_degenerate() {
    let evaluator = FieldEvaluator::new(cylinders(), 0.0, 0.0, HomingConfig::default()).unwrap();
    let err = evaluator.evaluate_at(0.0, 0.0).unwrap_err();
    assert!(matches!(err, HomingError::DegenerateVector { .. }));
}

#[test]
fn mirrored_positions_give_mirrored_vectors() {
    let landmarks = mirrored();
    let origin = Snapshot::capture(0.0, 0.0, &landmarks).unwrap();
    let config = HomingConfig::default();

    for (x, y) in [(2.0, 3.0), (-5.0, 4.0), (6.0, 1.0), (-2.0, 6.0), (0.0, 5.0), (5.0, 5.0)] {
        let above = Snapshot::capture(x, y, &landmarks).unwrap();
        let below = Snapshot::capture(x, -y, &landmarks).unwrap();
        let up = compute_homing_vector(&origin, &above, &config).unwrap();
        let down = compute_homing_vector(&origin, &below, &config).unwrap();

        assert!(
            (up.direction.x - down.direction.x).abs() < 1e-9,
            "x mismatch at ({x}, {y}): {} vs {}",
            up.direction,
            down.direction
        );
        assert!(
            (up.direction.y + down.direction.y).abs() < 1e-9,
            "y not mirrored at ({x}, {y}): {} vs {}",
            up.direction,
            down.direction
        );
    }
}

#[test]
fn landmark_features_follow_input_order() {
    let mut reordered = cylinders();
    reordered.swap(0, 1);
    let a = Snapshot::capture(-3.0, -3.0, &cylinders()).unwrap();
    let b = Snapshot::capture(-3.0, -3.0, &reordered).unwrap();
    assert_eq!(a.features()[0], b.features()[1]);
    assert_eq!(a.features()[1], b.features()[0]);
}
