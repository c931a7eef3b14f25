//! Settings and fOLD file resolution

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::formats::fold::{read_fold_xls, FoldTable};
use crate::montage::{generate_montage_locations, Montage};
use crate::specificity::SpecificityOptions;
use crate::types::{Atlas, MontageKind};

/// Environment variable naming the directory holding the fOLD workbooks
pub const FOLD_PATH_ENV: &str = "NIRS_FOLD_PATH";

/// Workbook names looked up inside a fOLD directory, in load order
pub const FOLD_FILE_NAMES: [&str; 2] = ["10-5.xls", "10-10.xls"];

/// Where to find the fOLD workbooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FoldFiles {
    /// Explicit workbook paths, loaded in order
    Files(Vec<PathBuf>),
    /// Directory holding `10-5.xls` and `10-10.xls`
    Directory(PathBuf),
}

/// Resolves the workbook list; `None` falls back to `NIRS_FOLD_PATH`
pub fn resolve_fold_files(files: Option<&FoldFiles>) -> Result<Vec<PathBuf>> {
    resolve_with_env(files, std::env::var_os(FOLD_PATH_ENV))
}

fn resolve_with_env(files: Option<&FoldFiles>, env: Option<OsString>) -> Result<Vec<PathBuf>> {
    let paths = match files {
        Some(FoldFiles::Files(paths)) => {
            if paths.is_empty() {
                return Err(Error::Config("fold_files is an empty list".to_string()));
            }
            paths.clone()
        }
        Some(FoldFiles::Directory(dir)) => expand_directory(dir)?,
        None => {
            let dir = env.ok_or_else(|| {
                Error::Config(format!(
                    "{} not set, either set it or pass fold_files as a directory or list of files",
                    FOLD_PATH_ENV
                ))
            })?;
            debug!("using fOLD directory from {}", FOLD_PATH_ENV);
            expand_directory(Path::new(&dir))?
        }
    };

    for (i, path) in paths.iter().enumerate() {
        if !path.is_file() {
            return Err(Error::FileNotFound {
                name: format!("fold_files[{}]", i),
                path: path.clone(),
            });
        }
    }

    Ok(paths)
}

fn expand_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::FileNotFound {
            name: "fold_files".to_string(),
            path: dir.to_path_buf(),
        });
    }
    Ok(FOLD_FILE_NAMES.iter().map(|name| dir.join(name)).collect())
}

/// Reads every workbook and concatenates the atlas sheets in order
pub fn load_fold_tables(files: &[PathBuf], atlas: Atlas) -> Result<FoldTable> {
    let mut paths = files.iter();
    let first = paths
        .next()
        .ok_or_else(|| Error::Config("No fOLD files given".to_string()))?;

    let mut table = read_fold_xls(first, atlas)?;
    for path in paths {
        table.concat(read_fold_xls(path, atlas)?)?;
    }
    Ok(table)
}

/// Resolves and loads the fOLD tables in one step
pub fn load_fold(files: Option<&FoldFiles>, atlas: Atlas) -> Result<FoldTable> {
    let paths = resolve_fold_files(files)?;
    load_fold_tables(&paths, atlas)
}

/// Persistent settings, typically read from a JSON file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub atlas: Atlas,
    pub montage: MontageKind,
    /// Measured montage (`.elc` or `.csv`) replacing the template
    pub montage_file: Option<PathBuf>,
    pub interpolate: bool,
    pub fold_files: Option<FoldFiles>,
}

impl Settings {
    /// Reads settings from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Options passed to the specificity queries
    pub fn options(&self) -> SpecificityOptions {
        SpecificityOptions {
            atlas: self.atlas,
            montage: self.montage,
            interpolate: self.interpolate,
        }
    }

    /// Builds the reference montage
    pub fn reference(&self) -> Result<Montage> {
        match &self.montage_file {
            Some(path) => Montage::from_file(path),
            None => Ok(generate_montage_locations(self.montage)),
        }
    }

    /// Loads the fOLD tables named by these settings
    pub fn load_fold(&self) -> Result<FoldTable> {
        load_fold(self.fold_files.as_ref(), self.atlas)
    }
}
