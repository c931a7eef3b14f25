//! fOLD workbook reader

use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use log::{debug, info};

use super::table::FoldTable;
use super::value::Value;
use crate::error::{Error, Result};
use crate::types::Atlas;

/// Reads the sheet of `atlas` from a fOLD workbook
///
/// The workbook format is detected from the file content, so the legacy
/// `.xls` files and `.xlsx`/`.ods` conversions are all accepted.
pub fn read_fold_xls<P: AsRef<Path>>(path: P, atlas: Atlas) -> Result<FoldTable> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet = atlas.sheet_index();
    debug!(
        "{}: {} sheets, reading {} from sheet {}",
        path.display(),
        workbook.sheet_names().len(),
        atlas,
        sheet
    );

    let range = workbook
        .worksheet_range_at(sheet)
        .ok_or(Error::MissingSheet(sheet))??;

    let table = table_from_range(&range)?;
    info!(
        "read {} fOLD rows ({} atlas) from {}",
        table.len(),
        atlas,
        path.display()
    );
    Ok(table)
}

/// Converts a worksheet range into a normalised table; the first row is the header
pub fn table_from_range(range: &Range<Data>) -> Result<FoldTable> {
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| Error::InvalidFormat("Sheet has no header row".to_string()))?;

    let columns = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match Value::from(cell) {
            Value::Empty => format!("Unnamed: {}", i),
            value => value.to_string().trim().to_string(),
        })
        .collect();

    let cells = rows
        .map(|row| row.iter().map(Value::from).collect())
        .collect();

    FoldTable::from_cells(columns, cells)
}
