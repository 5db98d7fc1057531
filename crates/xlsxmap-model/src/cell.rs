use serde::{Deserialize, Serialize};

use crate::style::{
    AlignmentAttrs, BorderAttrs, BorderSide, FillAttrs, FillPattern, FontAttrs,
    DEFAULT_HORIZONTAL_ALIGN, DEFAULT_VERTICAL_ALIGN, MAX_COLOR_CODE_LEN,
};
use crate::{parse_a1, ModelError};

/// Scalar cell value as reported by the extractor.
///
/// Integers and floats are kept apart so the generated code writes back the same numeric type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellScalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for CellScalar {
    fn from(value: bool) -> Self {
        CellScalar::Bool(value)
    }
}

impl From<i64> for CellScalar {
    fn from(value: i64) -> Self {
        CellScalar::Int(value)
    }
}

impl From<f64> for CellScalar {
    fn from(value: f64) -> Self {
        CellScalar::Float(value)
    }
}

impl From<String> for CellScalar {
    fn from(value: String) -> Self {
        CellScalar::Text(value)
    }
}

impl From<&str> for CellScalar {
    fn from(value: &str) -> Self {
        CellScalar::Text(value.to_string())
    }
}

/// One cell as extracted from the source workbook.
///
/// Every field except `coordinate` is optional; an absent field (or JSON `null`) means "not set".
/// `row`/`col` are 1-based and, when present, must describe the same cell as `coordinate`.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct CellRecord {
    pub coordinate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<CellScalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_rotation: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borders: Option<BorderAttrs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_merged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_range: Option<String>,
}

impl CellRecord {
    /// Create a record for the cell at `coordinate` (1-based `row`/`col`).
    pub fn new(coordinate: impl Into<String>, row: u32, col: u32) -> Self {
        Self {
            coordinate: coordinate.into(),
            row: Some(row),
            col: Some(col),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<CellScalar>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.font_bold = Some(bold);
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.font_italic = Some(italic);
        self
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    pub fn with_font_color(mut self, color: impl Into<String>) -> Self {
        self.font_color = Some(color.into());
        self
    }

    pub fn with_horizontal_align(mut self, align: impl Into<String>) -> Self {
        self.horizontal_align = Some(align.into());
        self
    }

    pub fn with_vertical_align(mut self, align: impl Into<String>) -> Self {
        self.vertical_align = Some(align.into());
        self
    }

    pub fn with_text_rotation(mut self, degrees: i32) -> Self {
        self.text_rotation = Some(degrees);
        self
    }

    /// Set one border edge. Unknown edge names are ignored.
    pub fn with_border(mut self, edge: &str, side: BorderSide) -> Self {
        let borders = self.borders.get_or_insert_with(BorderAttrs::default);
        match edge {
            "left" => borders.left = Some(side),
            "right" => borders.right = Some(side),
            "top" => borders.top = Some(side),
            "bottom" => borders.bottom = Some(side),
            "diagonal" => borders.diagonal = Some(side),
            "vertical" => borders.vertical = Some(side),
            "horizontal" => borders.horizontal = Some(side),
            "start" => borders.start = Some(side),
            "end" => borders.end = Some(side),
            _ => {}
        }
        self
    }

    pub fn with_fill_color(mut self, color: impl Into<String>) -> Self {
        self.fill_color = Some(color.into());
        self
    }

    pub fn with_merge_range(mut self, range: impl Into<String>) -> Self {
        self.is_merged = Some(true);
        self.merge_range = Some(range.into());
        self
    }

    /// Formula text, if the cell carries a non-empty one.
    pub fn formula_text(&self) -> Option<&str> {
        self.formula.as_deref().filter(|f| !f.is_empty())
    }

    /// Merge range owned by this cell, if it is flagged as merged.
    pub fn merged_range(&self) -> Option<&str> {
        if self.is_merged != Some(true) {
            return None;
        }
        self.merge_range.as_deref().filter(|r| !r.is_empty())
    }

    /// 1-based `(row, col)`, taken from the structured fields or parsed from `coordinate` when
    /// either is missing.
    pub fn position(&self) -> Result<(u32, u32), ModelError> {
        if let (Some(row), Some(col)) = (self.row, self.col) {
            return Ok((row, col));
        }
        parse_a1(&self.coordinate).map_err(|source| ModelError::InvalidCoordinate {
            coordinate: self.coordinate.clone(),
            source,
        })
    }

    /// Font subset: only attributes that are actually set.
    pub fn font_attrs(&self) -> Option<FontAttrs> {
        let font = FontAttrs {
            bold: self.font_bold == Some(true),
            italic: self.font_italic == Some(true),
            size: self.font_size.filter(|size| *size != 0.0),
            name: non_empty(&self.font_name),
            color: non_empty(&self.font_color).filter(|c| is_color_code(c)),
        };
        (!font.is_empty()).then_some(font)
    }

    /// Alignment subset with spreadsheet defaults omitted.
    pub fn alignment_attrs(&self) -> Option<AlignmentAttrs> {
        let alignment = AlignmentAttrs {
            horizontal: non_empty(&self.horizontal_align)
                .filter(|h| h != DEFAULT_HORIZONTAL_ALIGN),
            vertical: non_empty(&self.vertical_align).filter(|v| v != DEFAULT_VERTICAL_ALIGN),
            text_rotation: self.text_rotation.filter(|degrees| *degrees != 0),
        };
        (!alignment.is_empty()).then_some(alignment)
    }

    /// Border subset: edges are copied as-is, other keys are dropped with a warning.
    pub fn border_attrs(&self) -> Option<BorderAttrs> {
        let mut borders = self.borders.clone()?;
        for key in std::mem::take(&mut borders.unknown).keys() {
            log::warn!("{}: ignoring unsupported border key `{key}`", self.coordinate);
        }
        (!borders.is_empty()).then_some(borders)
    }

    /// Solid fill subset, when the fill color looks like a real color code.
    pub fn fill_attrs(&self) -> Option<FillAttrs> {
        non_empty(&self.fill_color)
            .filter(|color| is_color_code(color) && !color.contains(' '))
            .map(|color| FillAttrs {
                color,
                pattern: FillPattern::Solid,
            })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

fn is_color_code(value: &str) -> bool {
    value.chars().count() <= MAX_COLOR_CODE_LEN
}
