use std::io::Read;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{CellRecord, ModelError};

/// Ordered sheets of one workbook.
///
/// Serialized as a JSON object keyed by sheet name. Key order is significant: it is the order in
/// which sheets are generated and added to the reconstructed workbook.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkbookDescription {
    pub sheets: IndexMap<String, SheetDescription>,
}

impl WorkbookDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_slice(json: &[u8]) -> Result<Self, ModelError> {
        Ok(serde_json::from_slice(json)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, ModelError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Append a sheet (or replace one with the same name, keeping its original position).
    pub fn push_sheet(&mut self, name: impl Into<String>, sheet: SheetDescription) -> &mut Self {
        self.sheets.insert(name.into(), sheet);
        self
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetDescription> {
        self.sheets.get(name)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// Everything needed to rebuild one sheet.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct SheetDescription {
    #[serde(default)]
    pub cells: Vec<CellRecord>,
    #[serde(default)]
    pub dims: Dimensions,
    #[serde(default)]
    pub assets: Vec<ImageAsset>,
}

impl SheetDescription {
    pub fn with_cell(mut self, cell: CellRecord) -> Self {
        self.cells.push(cell);
        self
    }

    pub fn with_column_width(mut self, column: impl Into<String>, width: f64) -> Self {
        self.dims.cols.insert(column.into(), width);
        self
    }

    pub fn with_row_height(mut self, row: u32, height: f64) -> Self {
        self.dims.rows.insert(row, height);
        self
    }

    pub fn with_asset(mut self, asset: ImageAsset) -> Self {
        self.assets.push(asset);
        self
    }
}

/// Column widths keyed by column label and row heights keyed by 1-based row index.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default, alias = "cols_letter")]
    pub cols: IndexMap<String, f64>,
    #[serde(default, alias = "rows_idx")]
    pub rows: IndexMap<u32, f64>,
}

/// An image anchored on a sheet. `filename` is resolved relative to the generated code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub filename: String,
    pub width: f64,
    pub height: f64,
    pub anchor: String,
}

impl ImageAsset {
    pub fn new(
        filename: impl Into<String>,
        width: f64,
        height: f64,
        anchor: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            width,
            height,
            anchor: anchor.into(),
        }
    }
}
