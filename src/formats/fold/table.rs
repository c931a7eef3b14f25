//! In-memory fOLD table with dataframe-style queries

use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::value::Value;
use crate::error::{Error, Result};

pub const SOURCE: &str = "Source";
pub const DETECTOR: &str = "Detector";
pub const LANDMARK: &str = "Landmark";
pub const SPECIFICITY: &str = "Specificity";
pub const BRAIN_SENS: &str = "brainSens";

/// Positions of the columns every fOLD sheet must carry
#[derive(Debug, Clone, Copy, PartialEq)]
struct ColumnIndex {
    source: usize,
    detector: usize,
    landmark: usize,
    specificity: usize,
    brain_sens: usize,
}

impl ColumnIndex {
    fn resolve(columns: &[String]) -> Result<Self> {
        let find = |name: &str| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };

        Ok(Self {
            source: find(SOURCE)?,
            detector: find(DETECTOR)?,
            landmark: find(LANDMARK)?,
            specificity: find(SPECIFICITY)?,
            brain_sens: find(BRAIN_SENS)?,
        })
    }
}

/// A normalised fOLD sheet
///
/// Spacer rows are removed, blank cells carry the value from the row above,
/// and `Specificity` and `brainSens` are percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    index: ColumnIndex,
}

/// Borrowed view of one table row
#[derive(Debug, Clone, Copy)]
pub struct FoldRow<'a> {
    columns: &'a [String],
    values: &'a [Value],
    index: ColumnIndex,
}

impl<'a> FoldRow<'a> {
    /// Source optode label
    pub fn source(&self) -> Option<&'a str> {
        self.values[self.index.source].as_str()
    }

    /// Detector optode label
    pub fn detector(&self) -> Option<&'a str> {
        self.values[self.index.detector].as_str()
    }

    /// Anatomical landmark
    pub fn landmark(&self) -> Option<&'a str> {
        self.values[self.index.landmark].as_str()
    }

    /// Landmark specificity, in percent
    pub fn specificity(&self) -> Option<f64> {
        self.values[self.index.specificity].as_f64()
    }

    /// Brain sensitivity of the optode pair, in percent
    pub fn brain_sensitivity(&self) -> Option<f64> {
        self.values[self.index.brain_sens].as_f64()
    }

    /// Returns the cell in the named column
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }
}

impl FoldTable {
    /// Builds a table from a header row and raw sheet rows
    ///
    /// Rows are padded or truncated to the header width before the
    /// normalisation: spacer rows (no `Specificity`) are dropped, remaining
    /// blanks are filled from the previous row, percentages are scaled.
    /// Errors name the sheet row, counting the header as row 1.
    pub fn from_cells(columns: Vec<String>, cells: Vec<Vec<Value>>) -> Result<Self> {
        let index = ColumnIndex::resolve(&columns)?;
        let width = columns.len();

        let mut numbered: Vec<(usize, Vec<Value>)> = cells
            .into_iter()
            .enumerate()
            .map(|(i, mut row)| {
                row.resize(width, Value::Empty);
                (i + 2, row)
            })
            .filter(|(_, row)| !row[index.specificity].is_empty())
            .collect();

        for r in 1..numbered.len() {
            let (above, below) = numbered.split_at_mut(r);
            let previous = &above[r - 1].1;
            for (cell, prev) in below[0].1.iter_mut().zip(previous) {
                if cell.is_empty() {
                    *cell = prev.clone();
                }
            }
        }

        for (line, row) in numbered.iter_mut() {
            for column in [index.specificity, index.brain_sens] {
                match &mut row[column] {
                    Value::Number(n) => *n *= 100.0,
                    Value::Empty => {}
                    Value::Text(s) => {
                        return Err(Error::InvalidFormat(format!(
                            "Non-numeric {} in sheet row {}: {:?}",
                            columns[column], line, s
                        )))
                    }
                }
            }
        }

        let rows = numbered.into_iter().map(|(_, row)| row).collect();
        Ok(Self { columns, rows, index })
    }

    fn with_rows(&self, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
            index: self.index,
        }
    }

    /// Column names in sheet order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// Returns the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the rows
    pub fn rows(&self) -> impl Iterator<Item = FoldRow<'_>> {
        self.rows.iter().map(move |values| FoldRow {
            columns: &self.columns,
            values,
            index: self.index,
        })
    }

    /// Keeps the rows matching `predicate`
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&FoldRow<'_>) -> bool,
    {
        let rows = self
            .rows()
            .filter(|row| predicate(row))
            .map(|row| row.values.to_vec())
            .collect();
        self.with_rows(rows)
    }

    /// Rows measured by the given source and detector
    pub fn source_detector(&self, source: &str, detector: &str) -> Self {
        self.filter(|row| row.source() == Some(source) && row.detector() == Some(detector))
    }

    /// Rows whose landmark equals `landmark`
    pub fn landmark(&self, landmark: &str) -> Self {
        self.filter(|row| row.landmark() == Some(landmark))
    }

    /// Rows whose landmark contains `text`
    pub fn landmark_contains(&self, text: &str) -> Self {
        self.filter(|row| row.landmark().is_some_and(|l| l.contains(text)))
    }

    /// Returns every cell of a column
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let i = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[i]).collect())
    }

    /// Landmark of every row
    pub fn landmarks(&self) -> Vec<&str> {
        self.rows().filter_map(|row| row.landmark()).collect()
    }

    /// Specificity of every row
    pub fn specificities(&self) -> Vec<f64> {
        self.rows().filter_map(|row| row.specificity()).collect()
    }

    /// Distinct source/detector pairs in first-seen order
    pub fn optode_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = Vec::new();
        for row in self.rows() {
            if let (Some(s), Some(d)) = (row.source(), row.detector()) {
                if !pairs.contains(&(s, d)) {
                    pairs.push((s, d));
                }
            }
        }
        pairs
    }

    /// Appends the rows of `other`; both tables must share their columns
    pub fn concat(&mut self, other: FoldTable) -> Result<()> {
        if self.columns != other.columns {
            return Err(Error::InvalidFormat(format!(
                "Cannot concatenate tables with columns {:?} and {:?}",
                self.columns, other.columns
            )));
        }
        self.rows.extend(other.rows);
        Ok(())
    }
}

impl Serialize for FoldTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RecordRef {
                columns: &self.columns,
                values: row,
            })?;
        }
        seq.end()
    }
}

struct RecordRef<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl Serialize for RecordRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl fmt::Display for FoldTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| cells.iter().map(|r| r[i].len()).fold(c.len(), usize::max))
            .collect();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = *w))
            .collect();
        writeln!(f, "{}", header.join("  ").trim_end())?;

        for row in &cells {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(v, w)| format!("{:<w$}", v, w = *w))
                .collect();
            writeln!(f, "{}", line.join("  ").trim_end())?;
        }
        Ok(())
    }
}
