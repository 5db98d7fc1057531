//! Target-independent statements produced by the sheet emitter.
//!
//! A [`SheetProgram`] is a flat, ordered list of [`Statement`]s. Renderers own every quoting and
//! formatting rule; nothing in here is target syntax.

use xlsxmap_model::{CellScalar, ImageAsset};

use crate::registry::StyleId;

/// Style identifiers resolved for one cell. `None` means "no style" for that category.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CellStyles {
    pub font: Option<StyleId>,
    pub alignment: Option<StyleId>,
    pub border: Option<StyleId>,
    pub fill: Option<StyleId>,
}

impl CellStyles {
    /// Resolved identifiers in assignment order (font, alignment, border, fill).
    pub fn iter(&self) -> impl Iterator<Item = StyleId> {
        [self.font, self.alignment, self.border, self.fill]
            .into_iter()
            .flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    /// Comment introducing a group of statements.
    Section(String),
    ColumnWidth {
        column: String,
        width: f64,
    },
    RowHeight {
        row: u32,
        height: f64,
    },
    Merge {
        range: String,
    },
    /// Combined call: value (if any) and all four style slots in one statement.
    FormatCell {
        row: u32,
        col: u32,
        value: Option<CellScalar>,
        styles: CellStyles,
    },
    SetValue {
        coordinate: String,
        value: CellScalar,
    },
    SetFormula {
        coordinate: String,
        formula: String,
    },
    /// Assign one shared style to the cell attribute matching `id`'s category.
    AssignStyle {
        coordinate: String,
        id: StyleId,
    },
    /// Load, size and anchor an image inside a recoverable-failure boundary.
    AddImage(ImageAsset),
}

/// Emitted statements for one sheet, plus the names its generated module exposes.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetProgram {
    /// Human-readable sheet title, as it appears in the rebuilt workbook.
    pub title: String,
    pub module_name: String,
    pub builder_name: String,
    pub statements: Vec<Statement>,
}

impl SheetProgram {
    /// Empty program for the sheet whose sanitized name is `clean_name`.
    pub fn new(clean_name: &str, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            module_name: sheet_module_name(clean_name),
            builder_name: format!("build_{clean_name}"),
            statements: Vec::new(),
        }
    }

    /// Append `statements` under a section comment; empty groups are dropped entirely.
    pub fn push_group(&mut self, label: &str, statements: Vec<Statement>) {
        if statements.is_empty() {
            return;
        }
        self.statements.push(Statement::Section(label.to_string()));
        self.statements.extend(statements);
    }

    /// Merge ranges in emission order.
    pub fn merges(&self) -> impl Iterator<Item = &str> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Merge { range } => Some(range.as_str()),
            _ => None,
        })
    }

    /// Every style identifier referenced by the program, in emission order (with repeats).
    pub fn style_refs(&self) -> impl Iterator<Item = StyleId> + '_ {
        self.statements.iter().flat_map(|stmt| match stmt {
            Statement::FormatCell { styles, .. } => styles.iter().collect(),
            Statement::AssignStyle { id, .. } => vec![*id],
            _ => Vec::new(),
        })
    }
}

/// Module (and file stem) name of the unit generated for a sheet.
pub fn sheet_module_name(clean_name: &str) -> String {
    format!("sheet_{clean_name}")
}
