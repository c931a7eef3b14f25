//! Error types for nirs-fold

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type for nirs-fold operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in nirs-fold operations
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(io::Error),

    /// Workbook could not be opened or decoded
    Spreadsheet(calamine::Error),

    /// CSV decoding error
    Csv(csv::Error),

    /// JSON settings error
    Json(serde_json::Error),

    /// Malformed input file
    InvalidFormat(String),

    /// Required table column is absent from the header row
    MissingColumn(String),

    /// Workbook does not contain the requested sheet
    MissingSheet(usize),

    /// Atlas name not in the supported set
    UnknownAtlas(String),

    /// Montage name not in the supported set
    UnknownMontage(String),

    /// A required input file or directory does not exist
    FileNotFound { name: String, path: PathBuf },

    /// Missing or inconsistent configuration
    Config(String),

    /// Reference montage has no locations
    EmptyMontage,

    /// Coordinate contains NaN or infinite components
    InvalidPosition(String),

    /// More than one landmark row matched a channel
    AmbiguousSpecificity { channel: String, count: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Spreadsheet(e) => write!(f, "Spreadsheet error: {}", e),
            Error::Csv(e) => write!(f, "CSV error: {}", e),
            Error::Json(e) => write!(f, "JSON error: {}", e),
            Error::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            Error::MissingColumn(name) => write!(f, "Missing column: {}", name),
            Error::MissingSheet(index) => write!(f, "Missing sheet at index {}", index),
            Error::UnknownAtlas(name) => write!(
                f,
                "Invalid value for the 'atlas' parameter: {:?}, expected one of AAL2, AICHA, Brodmann, Juelich, Loni",
                name
            ),
            Error::UnknownMontage(name) => write!(
                f,
                "Invalid value for the 'montage' parameter: {:?}, expected standard_1005 or standard_1010",
                name
            ),
            Error::FileNotFound { name, path } => {
                write!(f, "{} does not exist: {}", name, path.display())
            }
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::EmptyMontage => write!(f, "Reference montage has no locations"),
            Error::InvalidPosition(msg) => write!(f, "Invalid position: {}", msg),
            Error::AmbiguousSpecificity { channel, count } => write!(
                f,
                "Multiple specificity values returned for channel {} ({} rows)",
                channel, count
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Spreadsheet(e) => Some(e),
            Error::Csv(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<calamine::Error> for Error {
    fn from(error: calamine::Error) -> Self {
        Error::Spreadsheet(error)
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Error::Csv(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json(error)
    }
}
