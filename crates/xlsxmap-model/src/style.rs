use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Horizontal alignment that spreadsheets apply when none is set.
pub const DEFAULT_HORIZONTAL_ALIGN: &str = "left";
/// Vertical alignment that spreadsheets apply when none is set.
pub const DEFAULT_VERTICAL_ALIGN: &str = "bottom";
/// Longest color code accepted from the extractor (`AARRGGBB`).
///
/// Longer values are placeholders or descriptive text (e.g. theme references) and are ignored.
pub const MAX_COLOR_CODE_LEN: usize = 8;

/// Style category. Identifiers are numbered independently per category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleCategory {
    Font,
    Fill,
    Border,
    Alignment,
}

impl StyleCategory {
    /// All categories, in the order their declarations are flushed.
    pub const ALL: [StyleCategory; 4] = [
        StyleCategory::Font,
        StyleCategory::Fill,
        StyleCategory::Border,
        StyleCategory::Alignment,
    ];

    /// Prefix used when minting identifiers (`FONT_001`, `ALIGN_002`, ...).
    pub const fn prefix(self) -> &'static str {
        match self {
            StyleCategory::Font => "FONT",
            StyleCategory::Fill => "FILL",
            StyleCategory::Border => "BORDER",
            StyleCategory::Alignment => "ALIGN",
        }
    }

    /// Plural label used for section headers.
    pub const fn plural(self) -> &'static str {
        match self {
            StyleCategory::Font => "fonts",
            StyleCategory::Fill => "fills",
            StyleCategory::Border => "borders",
            StyleCategory::Alignment => "alignments",
        }
    }

    /// Cell attribute the style is assigned to.
    pub const fn cell_attribute(self) -> &'static str {
        match self {
            StyleCategory::Font => "font",
            StyleCategory::Fill => "fill",
            StyleCategory::Border => "border",
            StyleCategory::Alignment => "alignment",
        }
    }
}

impl fmt::Display for StyleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cell_attribute())
    }
}

/// Font attribute subset.
///
/// Field order is the canonical order used for hashing and for rendered declarations.
#[derive(Clone, Debug, PartialEq, Serialize, Default)]
pub struct FontAttrs {
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl FontAttrs {
    pub fn is_empty(&self) -> bool {
        !self.bold
            && !self.italic
            && self.size.is_none()
            && self.name.is_none()
            && self.color.is_none()
    }
}

/// Fill pattern. Only solid fills are reconstructed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FillPattern {
    #[default]
    Solid,
}

impl FillPattern {
    pub const fn as_str(self) -> &'static str {
        match self {
            FillPattern::Solid => "solid",
        }
    }
}

/// Fill attribute subset.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FillAttrs {
    pub color: String,
    #[serde(rename = "type")]
    pub pattern: FillPattern,
}

/// One border edge as reported by the extractor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BorderSide {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl BorderSide {
    pub fn new(style: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            style: Some(style.into()),
            color: Some(color.into()),
        }
    }
}

/// Border attribute subset, keyed by edge.
///
/// Used both as the cell record's raw `borders` mapping and as the interned subset: borders are
/// copied without any defaulting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BorderAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<BorderSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<BorderSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<BorderSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BorderSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagonal: Option<BorderSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<BorderSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<BorderSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<BorderSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<BorderSide>,
    /// Keys that are not an edge (such as openpyxl's `outline` flag). Never rendered; cleared
    /// before the subset is interned.
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_json::Value>,
}

impl BorderAttrs {
    /// Present edges in canonical order.
    pub fn sides(&self) -> impl Iterator<Item = (&'static str, &BorderSide)> {
        [
            ("left", &self.left),
            ("right", &self.right),
            ("top", &self.top),
            ("bottom", &self.bottom),
            ("diagonal", &self.diagonal),
            ("vertical", &self.vertical),
            ("horizontal", &self.horizontal),
            ("start", &self.start),
            ("end", &self.end),
        ]
        .into_iter()
        .filter_map(|(name, side)| side.as_ref().map(|side| (name, side)))
    }

    pub fn is_empty(&self) -> bool {
        self.sides().next().is_none()
    }
}

/// Alignment attribute subset. Defaults are never stored here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Default)]
pub struct AlignmentAttrs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_rotation: Option<i32>,
}

impl AlignmentAttrs {
    pub fn is_empty(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none() && self.text_rotation.is_none()
    }
}

/// A non-empty attribute subset tagged with its category.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleAttrs {
    Font(FontAttrs),
    Fill(FillAttrs),
    Border(BorderAttrs),
    Alignment(AlignmentAttrs),
}

impl StyleAttrs {
    pub fn category(&self) -> StyleCategory {
        match self {
            StyleAttrs::Font(_) => StyleCategory::Font,
            StyleAttrs::Fill(_) => StyleCategory::Fill,
            StyleAttrs::Border(_) => StyleCategory::Border,
            StyleAttrs::Alignment(_) => StyleCategory::Alignment,
        }
    }

    /// Stable textual form of the subset.
    ///
    /// Fields are serialized in declaration order, so two subsets produce the same text exactly
    /// when they are attribute-for-attribute equal. Non-finite numbers have no stable form and are
    /// rejected.
    pub fn canonical_json(&self) -> Result<String, ModelError> {
        let json = match self {
            StyleAttrs::Font(font) => {
                if let Some(size) = font.size.filter(|size| !size.is_finite()) {
                    return Err(ModelError::NonFiniteNumber {
                        field: "font.size",
                        value: size,
                    });
                }
                serde_json::to_string(font)?
            }
            StyleAttrs::Fill(fill) => serde_json::to_string(fill)?,
            StyleAttrs::Border(border) => serde_json::to_string(border)?,
            StyleAttrs::Alignment(alignment) => serde_json::to_string(alignment)?,
        };
        Ok(json)
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}
