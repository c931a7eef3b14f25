//! Builds small workbooks laid out like the fOLD toolbox sheets

use std::path::Path;

use rust_xlsxwriter::{Workbook, XlsxError};

use crate::types::Atlas;

pub const EXAMPLE_COLUMNS: [&str; 10] = [
    "Source",
    "Detector",
    "Distance (mm)",
    "brainSens",
    "X (mm)",
    "Y (mm)",
    "Z (mm)",
    "Landmark",
    "Specificity",
    "Label ID",
];

struct Pair {
    source: &'static str,
    detector: &'static str,
    distance: f64,
    brain_sens: f64,
    centre: [f64; 3],
    landmarks: &'static [(&'static str, f64, f64)],
}

const PAIRS: [Pair; 3] = [
    Pair {
        source: "T7",
        detector: "TP7",
        distance: 30.1,
        brain_sens: 0.45,
        centre: [-72.4, -28.9, -1.7],
        landmarks: &[
            ("L Mid Orbital Gyrus", 0.1234, 31.0),
            ("L Superior Temporal Gyrus", 0.4012, 81.0),
            ("L Middle Temporal Gyrus", 0.3354, 85.0),
            ("L Inferior Temporal Gyrus", 0.14, 89.0),
        ],
    },
    Pair {
        source: "Fp1",
        detector: "AF3",
        distance: 31.4,
        brain_sens: 0.61,
        centre: [-24.8, 66.0, 14.2],
        landmarks: &[
            ("L Superior Frontal Gyrus", 0.6021, 3.0),
            ("L Middle Frontal Gyrus", 0.3011, 7.0),
            ("L Mid Orbital Gyrus", 0.0968, 31.0),
        ],
    },
    Pair {
        source: "Cz",
        detector: "FCz",
        distance: 28.7,
        brain_sens: 0.38,
        centre: [0.4, -5.1, 78.3],
        landmarks: &[
            ("L Precentral Gyrus", 0.25, 1.0),
            ("R Precentral Gyrus", 0.25, 2.0),
            ("L Paracentral Lobule", 0.3, 69.0),
            ("R Paracentral Lobule", 0.2, 70.0),
        ],
    },
];

/// Writes a 15-sheet workbook whose Juelich sheet holds 11 landmark rows
///
/// Pairs are separated by blank spacer rows and only the first row of each
/// pair carries the optode columns, as in the published files.
pub fn write_fold_workbook(path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();

    for sheet in 0..15 {
        let worksheet = workbook.add_worksheet();
        if sheet != Atlas::Juelich.sheet_index() {
            continue;
        }

        for (col, name) in EXAMPLE_COLUMNS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *name)?;
        }

        let mut row = 1u32;
        for pair in &PAIRS {
            worksheet.write_string(row, 0, pair.source)?;
            worksheet.write_string(row, 1, pair.detector)?;
            worksheet.write_number(row, 2, pair.distance)?;
            worksheet.write_number(row, 3, pair.brain_sens)?;
            for (i, value) in pair.centre.iter().enumerate() {
                worksheet.write_number(row, 4 + i as u16, *value)?;
            }

            for (landmark, specificity, label_id) in pair.landmarks {
                worksheet.write_string(row, 7, *landmark)?;
                worksheet.write_number(row, 8, *specificity)?;
                worksheet.write_number(row, 9, *label_id)?;
                row += 1;
            }
            row += 1;
        }
    }

    workbook.save(path)
}
