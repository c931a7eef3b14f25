//! fNIRS channel geometry

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::montage::Coordinate;

/// A source-detector channel with optode positions in the head frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptodeChannel {
    pub name: String,
    pub source: Coordinate,
    pub detector: Coordinate,
}

impl OptodeChannel {
    /// Creates a new channel
    pub fn new(name: impl Into<String>, source: Coordinate, detector: Coordinate) -> Self {
        Self {
            name: name.into(),
            source,
            detector,
        }
    }

    /// Builds a channel from a 12-value channel location vector
    ///
    /// Values 3..6 hold the source position and 6..9 the detector position.
    pub fn from_loc(name: impl Into<String>, loc: &[f64]) -> Result<Self> {
        let name = name.into();
        if loc.len() < 9 {
            return Err(Error::InvalidFormat(format!(
                "Channel {} location has {} values, need at least 9",
                name,
                loc.len()
            )));
        }
        let source = Coordinate::new(loc[3], loc[4], loc[5]);
        let detector = Coordinate::new(loc[6], loc[7], loc[8]);
        Ok(Self::new(name, source, detector))
    }

    /// Source-detector separation
    pub fn separation(&self) -> f64 {
        self.source.distance(&self.detector)
    }
}

#[derive(Debug, Deserialize)]
struct ChannelRecord {
    name: String,
    source_x: f64,
    source_y: f64,
    source_z: f64,
    detector_x: f64,
    detector_y: f64,
    detector_z: f64,
}

impl From<ChannelRecord> for OptodeChannel {
    fn from(r: ChannelRecord) -> Self {
        OptodeChannel::new(
            r.name,
            Coordinate::new(r.source_x, r.source_y, r.source_z),
            Coordinate::new(r.detector_x, r.detector_y, r.detector_z),
        )
    }
}

/// Reads channels from a CSV export
///
/// Expected header: `name,source_x,source_y,source_z,detector_x,detector_y,detector_z`
/// with positions in metres.
pub fn read_channels_csv<P: AsRef<Path>>(path: P) -> Result<Vec<OptodeChannel>> {
    let reader = csv::Reader::from_path(path.as_ref())?;
    parse_channels(reader)
}

fn parse_channels<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<OptodeChannel>> {
    let mut channels = Vec::new();
    for record in reader.deserialize() {
        let record: ChannelRecord = record?;
        channels.push(record.into());
    }
    Ok(channels)
}
