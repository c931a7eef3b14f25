//! nirs-fold - fOLD anatomical specificity lookup for fNIRS channels
//!
//! nirs-fold snaps fNIRS optode positions to the closest standard 10-10/10-5
//! location and looks the resulting source-detector pair up in the fOLD
//! toolbox sensitivity tables.
//!
//! # Examples
//!
//! ## Nearest standard location
//!
//! ```no_run
//! use nirs_fold::{find_closest_standard_location, generate_montage_locations};
//! use nirs_fold::{Coordinate, MontageKind};
//!
//! let reference = generate_montage_locations(MontageKind::Standard1005);
//! let label = find_closest_standard_location(Coordinate::new(-0.095, 0.0, 0.0), &reference)?;
//! println!("closest label: {}", label);
//! # Ok::<(), nirs_fold::Error>(())
//! ```
//!
//! ## Querying a fOLD workbook
//!
//! ```no_run
//! use nirs_fold::{read_fold_xls, Atlas};
//!
//! let table = read_fold_xls("10-10.xls", Atlas::Juelich)?;
//! let pair = table.source_detector("T7", "TP7");
//! for row in pair.rows() {
//!     println!("{:?}: {:?}%", row.landmark(), row.specificity());
//! }
//! # Ok::<(), nirs_fold::Error>(())
//! ```
//!
//! ## Per-channel landmark specificity
//!
//! ```no_run
//! use nirs_fold::{fold_landmark_specificity, read_channels_csv, FoldFiles, SpecificityOptions};
//!
//! let channels = read_channels_csv("channels.csv")?;
//! let files = FoldFiles::Directory("fold".into());
//! let scores = fold_landmark_specificity(
//!     &channels,
//!     "L Superior Frontal Gyrus",
//!     Some(&files),
//!     SpecificityOptions::default(),
//! )?;
//! for (channel, score) in channels.iter().zip(scores) {
//!     println!("{}: {:.1}%", channel.name, score);
//! }
//! # Ok::<(), nirs_fold::Error>(())
//! ```

pub mod error;
pub mod types;
pub mod montage;
pub mod formats;
pub mod channels;
pub mod config;
pub mod specificity;

pub use error::{Error, Result};
pub use types::{Atlas, MontageKind};
pub use montage::{
    find_closest_standard_location, generate_montage_locations, Coordinate, Montage,
    ReferenceLocation,
};
pub use formats::fold::{read_fold_xls, FoldRow, FoldTable, Value};
pub use channels::{read_channels_csv, OptodeChannel};
pub use config::{load_fold, load_fold_tables, resolve_fold_files, FoldFiles, Settings, FOLD_PATH_ENV};
pub use specificity::{
    fold_channel_specificity, fold_channel_specificity_with_montage, fold_landmark_specificity,
    fold_landmark_specificity_with_montage, landmark_specificity, match_channels,
    source_detector_fold_table, ChannelMatch, SpecificityOptions,
};
