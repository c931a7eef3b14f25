//! Reference electrode locations and nearest-label matching

pub mod coordinate;
pub mod elc;
pub mod standard;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use coordinate::Coordinate;
pub use standard::generate_montage_locations;

/// A labelled point of a standard placement system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLocation {
    pub label: String,
    pub position: Coordinate,
}

impl ReferenceLocation {
    /// Creates a new reference location
    pub fn new(label: impl Into<String>, position: Coordinate) -> Self {
        Self {
            label: label.into(),
            position,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsvLocation {
    label: String,
    x: f64,
    y: f64,
    z: f64,
}

/// Table of reference locations, in table order
#[derive(Debug, Clone)]
pub struct Montage {
    name: String,
    locations: Vec<ReferenceLocation>,
}

impl Montage {
    /// Creates a montage from explicit locations
    pub fn new(name: impl Into<String>, locations: Vec<ReferenceLocation>) -> Self {
        Self {
            name: name.into(),
            locations,
        }
    }

    /// Loads a montage from an ASA `.elc` file
    pub fn from_elc<P: AsRef<Path>>(path: P) -> Result<Self> {
        let locations = elc::read_elc(path.as_ref())?;
        Self::checked(file_stem(path.as_ref()), locations)
    }

    /// Loads a montage from a `label,x,y,z` CSV file (metres)
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path.as_ref())?;
        let mut locations = Vec::new();
        for record in reader.deserialize() {
            let row: CsvLocation = record?;
            locations.push(ReferenceLocation::new(row.label, Coordinate::new(row.x, row.y, row.z)));
        }
        Self::checked(file_stem(path.as_ref()), locations)
    }

    /// Creates a montage from loaded locations, rejecting duplicate labels
    /// and non-finite positions
    pub fn checked(name: impl Into<String>, locations: Vec<ReferenceLocation>) -> Result<Self> {
        let mut seen = HashSet::new();
        for loc in &locations {
            if !loc.position.is_finite() {
                return Err(Error::InvalidFormat(format!(
                    "Non-finite position for {}: {:?}",
                    loc.label, loc.position
                )));
            }
            if !seen.insert(loc.label.as_str()) {
                return Err(Error::InvalidFormat(format!("Duplicate label: {}", loc.label)));
            }
        }
        Ok(Self::new(name, locations))
    }

    /// Loads a montage file, picking the reader from the extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("elc") => Self::from_elc(path),
            Some("csv") => Self::from_csv(path),
            _ => Err(Error::InvalidFormat(format!(
                "Unsupported montage file: {}",
                path.display()
            ))),
        }
    }

    /// Returns the montage name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all locations
    pub fn locations(&self) -> &[ReferenceLocation] {
        &self.locations
    }

    /// Iterates over the labels in table order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().map(|loc| loc.label.as_str())
    }

    /// Returns the number of locations
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns whether the montage is empty
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Looks up the position of a label
    pub fn position(&self, label: &str) -> Option<Coordinate> {
        self.locations
            .iter()
            .find(|loc| loc.label == label)
            .map(|loc| loc.position)
    }

    /// Finds the location closest to `position` and its distance
    ///
    /// Ties resolve to the earliest location in table order. Locations with
    /// a non-finite position are never selected.
    pub fn nearest(&self, position: Coordinate) -> Result<(&ReferenceLocation, f64)> {
        if !position.is_finite() {
            return Err(Error::InvalidPosition(format!("{:?}", position)));
        }

        let mut best: Option<(&ReferenceLocation, f64)> = None;
        for loc in &self.locations {
            let dist = loc.position.distance(&position);
            if !dist.is_finite() {
                continue;
            }
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((loc, dist)),
            }
        }

        best.ok_or(Error::EmptyMontage)
    }
}

/// Returns the label of the reference location closest to `position`
pub fn find_closest_standard_location(position: Coordinate, reference: &Montage) -> Result<&str> {
    reference.nearest(position).map(|(loc, _)| loc.label.as_str())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("custom")
        .to_string()
}
