//! ASA `.elc` electrode position files

use std::fs;
use std::path::Path;

use log::debug;

use super::coordinate::Coordinate;
use super::ReferenceLocation;
use crate::error::{Error, Result};

/// Fiducials stored alongside the electrodes but not used as references
const FIDUCIALS: [&str; 2] = ["LPA", "RPA"];

enum Section {
    Header,
    Positions,
    Labels,
}

/// Reads an `.elc` file into reference locations, converted to metres
pub fn read_elc<P: AsRef<Path>>(path: P) -> Result<Vec<ReferenceLocation>> {
    let text = fs::read_to_string(path.as_ref())?;
    parse_elc(&text)
}

/// Parses the text of an `.elc` file
pub fn parse_elc(text: &str) -> Result<Vec<ReferenceLocation>> {
    let mut scale = 1e-3;
    let mut section = Section::Header;
    let mut positions = Vec::new();
    let mut labels = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match section {
            Section::Header => {
                if let Some(unit) = trimmed.strip_prefix("UnitPosition") {
                    scale = unit_scale(unit.trim())?;
                } else if trimmed == "Positions" {
                    section = Section::Positions;
                }
            }
            Section::Positions => {
                if trimmed == "Labels" {
                    section = Section::Labels;
                    continue;
                }
                // Some writers prefix each row with "label :"
                let values = trimmed.rsplit(':').next().unwrap_or(trimmed);
                let numbers = values
                    .split_whitespace()
                    .map(|v| v.parse::<f64>())
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| Error::InvalidFormat(format!("Bad position row {:?}: {}", trimmed, e)))?;
                let position = Coordinate::from_slice(&numbers)
                    .ok_or_else(|| Error::InvalidFormat(format!("Position row needs 3 values: {:?}", trimmed)))?;
                positions.push(position.scaled(scale));
            }
            Section::Labels => labels.push(trimmed.to_string()),
        }
    }

    if positions.len() != labels.len() {
        return Err(Error::InvalidFormat(format!(
            "{} positions but {} labels",
            positions.len(),
            labels.len()
        )));
    }

    let locations: Vec<ReferenceLocation> = labels
        .into_iter()
        .zip(positions)
        .filter(|(label, _)| !FIDUCIALS.contains(&label.as_str()))
        .map(|(label, position)| ReferenceLocation::new(label, position))
        .collect();

    debug!("parsed {} electrode positions (scale {})", locations.len(), scale);
    Ok(locations)
}

fn unit_scale(unit: &str) -> Result<f64> {
    match unit {
        "mm" => Ok(1e-3),
        "cm" => Ok(1e-2),
        "m" => Ok(1.0),
        other => Err(Error::InvalidFormat(format!("Unknown UnitPosition: {}", other))),
    }
}
