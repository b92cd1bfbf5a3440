//! Human-readable and JSON renderings of sweep and probe results.

use colored::Colorize;
use serde::Serialize;
use snaphome_perception::{Snapshot, SnapshotOverlay};
use snaphome_runtime::{Correspondence, FieldReport, HomingVector};

/// Length of the rays in a probe overlay, in world units.
const OVERLAY_RAY_LENGTH: f64 = 20.0;

/// Everything known about the homing decision at a single position.
#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub origin: Snapshot,
    pub current: Snapshot,
    pub correspondences: Vec<Correspondence>,
    pub homing: HomingVector,
    pub ideal_bearing: f64,
    pub error_deg: f64,
    /// Current snapshot rays followed by the origin snapshot anchored at the
    /// current position.
    pub overlay: [SnapshotOverlay; 2],
}

impl ProbeReport {
    pub fn new(
        origin: Snapshot,
        current: Snapshot,
        correspondences: Vec<Correspondence>,
        homing: HomingVector,
        ideal_bearing: f64,
        error_deg: f64,
    ) -> Self {
        let overlay = [
            current.overlay(OVERLAY_RAY_LENGTH),
            origin.overlay_at(current.x(), current.y(), OVERLAY_RAY_LENGTH),
        ];
        Self {
            origin,
            current,
            correspondences,
            homing,
            ideal_bearing,
            error_deg,
            overlay,
        }
    }
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Failed to serialize report: {}", e))
}

pub fn print_field(report: &FieldReport, threshold_deg: f64) {
    println!();
    println!("{}", "  Homing field".bold().cyan());
    println!(
        "    {} evaluated, {} excluded, {} skipped",
        report.samples.len().to_string().bold(),
        report.excluded.len(),
        report.skipped.len()
    );

    match (report.mean_error_deg, report.max_error_deg) {
        (Some(mean), Some(max)) => {
            println!("    Mean angular error: {}", format!("{mean:.2}°").bold());
            println!("    Max angular error:  {max:.2}°");
        }
        _ => println!("    {}", "No cell produced a homing vector.".yellow()),
    }

    for cell in &report.skipped {
        println!(
            "    {} ({}, {}): {}",
            "skipped".yellow(),
            cell.x,
            cell.y,
            cell.error.to_string().dimmed()
        );
    }

    if report.passes(threshold_deg) {
        println!(
            "\n  {} mean error below {threshold_deg}°\n",
            "✓".green().bold()
        );
    } else {
        println!(
            "\n  {} mean error not below {threshold_deg}°\n",
            "✗".red().bold()
        );
    }
}

pub fn print_probe(report: &ProbeReport) {
    println!();
    println!("{}", "  Origin snapshot".bold().cyan());
    print_indented(&report.origin.to_string());
    println!("{}", "  Current snapshot".bold().cyan());
    print_indented(&report.current.to_string());

    println!("{}", "  Correspondences".bold().cyan());
    for m in &report.correspondences {
        println!(
            "    {:?} {:>8.4} -> {:>8.4}  turn {:>8.4} rad",
            m.origin.kind(),
            m.origin.center(),
            m.matched.center(),
            m.turn_angle
        );
    }

    println!();
    println!("    Turn vector:     {}", report.homing.turn);
    println!("    Approach vector: {}", report.homing.approach);
    println!(
        "    Homing vector:   {}",
        report.homing.direction.to_string().bold()
    );
    println!(
        "    Ideal bearing {:.4} rad, error {}",
        report.ideal_bearing,
        format!("{:.2}°", report.error_deg).bold()
    );
    println!();
}

fn print_indented(text: &str) {
    for line in text.lines() {
        println!("    {}", line.dimmed());
    }
}
