//! Template 10-10 / 10-5 electrode layout on a spherical head
//!
//! Sagittal rows sit at 5 % steps of the nasion-inion arc. The ring through
//! Fpz, T7, Oz and T8 is the equator and the ring through Nz, T9 and Iz lies
//! 10 % below it. Along every row the lateral columns step from the midline
//! to the equator (column 7) and on to the lower ring (column 9). Odd numbers
//! are left, even numbers right, and an `h` suffix marks the point half a
//! 10-10 step toward the midline.

use super::coordinate::Coordinate;
use super::{Montage, ReferenceLocation};
use crate::types::MontageKind;

/// Head radius of the template sphere, in metres
pub const HEAD_RADIUS: f64 = 0.095;

/// Polar angle, in degrees, covered by 1 % of the nasion-inion arc
const DEGREES_PER_PERCENT: f64 = 2.25;

/// Polar angle of the lower ring (Nz, T9, Iz)
const LOWER_RING: f64 = 112.5;

/// Half-steps from the midline to the equator along a row
const EQUATOR_STEP: usize = 8;

/// Half-steps from the midline to the lower ring along a row
const LOWER_STEP: usize = 10;

struct Row {
    prefix: &'static str,
    lateral: &'static str,
    percent: f64,
}

const ROWS: [Row; 15] = [
    Row { prefix: "AFp", lateral: "AFp", percent: 15.0 },
    Row { prefix: "AF", lateral: "AF", percent: 20.0 },
    Row { prefix: "AFF", lateral: "AFF", percent: 25.0 },
    Row { prefix: "F", lateral: "F", percent: 30.0 },
    Row { prefix: "FFC", lateral: "FFT", percent: 35.0 },
    Row { prefix: "FC", lateral: "FT", percent: 40.0 },
    Row { prefix: "FCC", lateral: "FTT", percent: 45.0 },
    Row { prefix: "C", lateral: "T", percent: 50.0 },
    Row { prefix: "CCP", lateral: "TTP", percent: 55.0 },
    Row { prefix: "CP", lateral: "TP", percent: 60.0 },
    Row { prefix: "CPP", lateral: "TPP", percent: 65.0 },
    Row { prefix: "P", lateral: "P", percent: 70.0 },
    Row { prefix: "PPO", lateral: "PPO", percent: 75.0 },
    Row { prefix: "PO", lateral: "PO", percent: 80.0 },
    Row { prefix: "POO", lateral: "POO", percent: 85.0 },
];

/// Generates the reference locations for a standard montage
pub fn generate_montage_locations(kind: MontageKind) -> Montage {
    let mut builder = LayoutBuilder::default();

    builder.add_pair("Nz", None, spherical(LOWER_RING, 0.0));
    builder.add_pair("N1", Some("N2"), spherical(LOWER_RING, 18.0));
    builder.add_pair("Fpz", None, spherical(90.0, 0.0));
    builder.add_pair("Fp1h", Some("Fp2h"), spherical(90.0, 9.0));
    builder.add_pair("Fp1", Some("Fp2"), spherical(90.0, 18.0));

    for row in &ROWS {
        builder.add_row(row);
    }

    builder.add_pair("Oz", None, spherical(90.0, 180.0));
    builder.add_pair("O1h", Some("O2h"), spherical(90.0, 171.0));
    builder.add_pair("O1", Some("O2"), spherical(90.0, 162.0));
    builder.add_pair("Iz", None, spherical(LOWER_RING, 180.0));
    builder.add_pair("I1", Some("I2"), spherical(LOWER_RING, 162.0));

    let mut locations = builder.locations;
    if kind == MontageKind::Standard1010 {
        locations.retain(|loc| is_1010_label(&loc.label));
    }

    Montage::new(kind.name(), locations)
}

fn spherical(polar: f64, azimuth: f64) -> Coordinate {
    Coordinate::from_spherical(HEAD_RADIUS, polar, azimuth)
}

/// 10-10 labels carry no `h` suffix and sit on rows at 10 % multiples
fn is_1010_label(label: &str) -> bool {
    if label.ends_with('h') {
        return false;
    }
    let prefix = label.trim_end_matches(|c: char| c.is_ascii_digit() || c == 'z');
    !matches!(
        prefix,
        "AFp" | "AFF" | "FFC" | "FFT" | "FCC" | "FTT" | "CCP" | "TTP" | "CPP" | "TPP" | "PPO" | "POO"
    )
}

#[derive(Default)]
struct LayoutBuilder {
    locations: Vec<ReferenceLocation>,
}

impl LayoutBuilder {
    /// Adds a left-side point and, when named, its mirrored right-side twin
    fn add_pair(&mut self, left: &str, right: Option<&str>, position: Coordinate) {
        self.locations.push(ReferenceLocation::new(left, position));
        if let Some(right) = right {
            self.locations.push(ReferenceLocation::new(right, position.mirrored()));
        }
    }

    fn add_row(&mut self, row: &Row) {
        let midline = if row.percent < 50.0 {
            spherical((50.0 - row.percent) * DEGREES_PER_PERCENT, 0.0)
        } else {
            spherical((row.percent - 50.0) * DEGREES_PER_PERCENT, 180.0)
        };
        let azimuth = row.percent * 1.8;
        let equator = spherical(90.0, azimuth);
        let lower = spherical(LOWER_RING, azimuth);

        self.add_pair(&format!("{}z", row.prefix), None, midline);

        for step in 1..=LOWER_STEP {
            let position = if step <= EQUATOR_STEP {
                midline.slerp(&equator, step as f64 / EQUATOR_STEP as f64)
            } else {
                let t = (step - EQUATOR_STEP) as f64 / (LOWER_STEP - EQUATOR_STEP) as f64;
                equator.slerp(&lower, t)
            };

            let prefix = if step > 6 { row.lateral } else { row.prefix };
            let number = if step % 2 == 0 { step - 1 } else { step };
            let half = if step % 2 == 1 { "h" } else { "" };

            let left = format!("{}{}{}", prefix, number, half);
            let right = format!("{}{}{}", prefix, number + 1, half);
            self.add_pair(&left, Some(&right), position);
        }
    }
}
