//! fOLD toolbox sensitivity tables
//!
//! The fOLD workbooks list, for every optode pair of the 10-10 and 10-5
//! systems, the anatomical landmarks the pair is sensitive to. Each atlas is
//! stored on its own sheet.

pub mod reader;
pub mod table;
pub mod value;

#[cfg(test)]
pub(crate) mod testing;

pub use reader::read_fold_xls;
pub use table::{FoldRow, FoldTable};
pub use value::Value;
