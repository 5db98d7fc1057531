//! `xlsxmap-model` defines the workbook description handed to the code generator.
//!
//! The description is produced by an upstream extractor (usually as JSON) and is normalized here
//! into one canonical record type per concept:
//! - [`WorkbookDescription`] / [`SheetDescription`]: ordered sheets with cells, dimensions, images
//! - [`CellRecord`]: one cell's value, formula, raw formatting attributes and merge membership
//! - [`StyleAttrs`]: the typed, per-category attribute subsets derived from a cell
//!
//! Nothing in this crate knows about the generated target code; see `xlsxmap-codegen`.

mod address;
mod cell;
mod error;
mod sheet_name;
mod style;
mod workbook;

pub use address::{parse_a1, A1ParseError, EXCEL_MAX_COLS, EXCEL_MAX_ROWS};
pub use cell::{CellRecord, CellScalar};
pub use error::ModelError;
pub use sheet_name::sanitize_identifier;
pub use style::{
    AlignmentAttrs, BorderAttrs, BorderSide, FillAttrs, FillPattern, FontAttrs, StyleAttrs,
    StyleCategory, DEFAULT_HORIZONTAL_ALIGN, DEFAULT_VERTICAL_ALIGN, MAX_COLOR_CODE_LEN,
};
pub use workbook::{Dimensions, ImageAsset, SheetDescription, WorkbookDescription};
