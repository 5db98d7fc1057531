use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use xlsxmap_model::{CellRecord, SheetDescription, StyleAttrs};

use crate::ir::{CellStyles, SheetProgram, Statement};
use crate::registry::StyleRegistry;
use crate::CodegenError;

/// How styles are applied to cells in generated sheet code.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EmissionMode {
    /// One `format_cell` call per cell carrying the value and all four style slots.
    #[default]
    Combined,
    /// Value/formula assignment followed by one assignment per non-empty style category.
    PerAttribute,
}

/// Whether formula cells are formatted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FormulaStyling {
    Apply,
    /// Formula cells get their formula only; their style attributes are never interned.
    Skip,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitOptions {
    pub mode: EmissionMode,
    /// Explicit formula styling policy. When unset, the mode's default applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula_styling: Option<FormulaStyling>,
}

impl EmitOptions {
    pub fn new(mode: EmissionMode) -> Self {
        Self {
            mode,
            formula_styling: None,
        }
    }

    pub fn with_formula_styling(mut self, formula_styling: FormulaStyling) -> Self {
        self.formula_styling = Some(formula_styling);
        self
    }

    /// Effective formula styling: `Apply` for combined calls, `Skip` for per-attribute
    /// assignment, unless set explicitly.
    pub fn formula_styling(&self) -> FormulaStyling {
        self.formula_styling.unwrap_or(match self.mode {
            EmissionMode::Combined => FormulaStyling::Apply,
            EmissionMode::PerAttribute => FormulaStyling::Skip,
        })
    }
}

/// Emit the statements rebuilding one sheet, interning every style it uses into `registry`.
///
/// `clean_name` names the generated module and builder; `title` is the sheet title written into
/// the rebuilt workbook. Cells are visited in input order, so identifier assignment only depends
/// on the order of sheets and cells.
pub fn emit_sheet(
    clean_name: &str,
    title: &str,
    sheet: &SheetDescription,
    registry: &mut StyleRegistry,
    options: &EmitOptions,
) -> Result<SheetProgram, CodegenError> {
    let formula_styling = options.formula_styling();
    let mut seen_ranges: HashSet<&str> = HashSet::new();
    let mut merges = Vec::new();
    let mut cells = Vec::new();
    let mut formulas = Vec::new();

    for cell in &sheet.cells {
        let formula = cell.formula_text();
        let styled = formula.is_none() || formula_styling == FormulaStyling::Apply;
        let styles = if styled {
            intern_cell_styles(cell, registry)?
        } else {
            CellStyles::default()
        };

        match options.mode {
            EmissionMode::Combined => {
                if let Some(formula) = formula {
                    formulas.push(Statement::SetFormula {
                        coordinate: cell.coordinate.clone(),
                        formula: formula.to_string(),
                    });
                }
                if styled {
                    let (row, col) = cell.position()?;
                    let value = match formula {
                        Some(_) => None,
                        None => cell.value.clone(),
                    };
                    cells.push(Statement::FormatCell {
                        row,
                        col,
                        value,
                        styles,
                    });
                }
            }
            EmissionMode::PerAttribute => {
                if let Some(formula) = formula {
                    cells.push(Statement::SetFormula {
                        coordinate: cell.coordinate.clone(),
                        formula: formula.to_string(),
                    });
                } else if let Some(value) = &cell.value {
                    cells.push(Statement::SetValue {
                        coordinate: cell.coordinate.clone(),
                        value: value.clone(),
                    });
                }
                cells.extend(styles.iter().map(|id| Statement::AssignStyle {
                    coordinate: cell.coordinate.clone(),
                    id,
                }));
            }
        }

        match cell.merged_range() {
            Some(range) => {
                if seen_ranges.insert(range) {
                    let merge = Statement::Merge {
                        range: range.to_string(),
                    };
                    match options.mode {
                        EmissionMode::Combined => merges.push(merge),
                        EmissionMode::PerAttribute => cells.push(merge),
                    }
                }
            }
            None if cell.is_merged == Some(true) => {
                log::warn!(
                    "sheet {title:?}: cell {} is marked merged but has no merge range",
                    cell.coordinate
                );
            }
            None => {}
        }
    }

    let dims: Vec<Statement> = sheet
        .dims
        .cols
        .iter()
        .map(|(column, width)| Statement::ColumnWidth {
            column: column.clone(),
            width: *width,
        })
        .chain(
            sheet
                .dims
                .rows
                .iter()
                .map(|(row, height)| Statement::RowHeight {
                    row: *row,
                    height: *height,
                }),
        )
        .collect();
    let images: Vec<Statement> = sheet
        .assets
        .iter()
        .cloned()
        .map(Statement::AddImage)
        .collect();

    let mut program = SheetProgram::new(clean_name, title);
    match options.mode {
        EmissionMode::Combined => {
            program.push_group("Dimensions", dims);
            program.push_group("Merged ranges", merges);
            program.push_group("Values and styles", cells);
            program.push_group("Formulas", formulas);
            program.push_group("Images", images);
        }
        EmissionMode::PerAttribute => {
            program.push_group("Cells", cells);
            program.push_group("Dimensions", dims);
            program.push_group("Images", images);
        }
    }

    log::debug!(
        "sheet {title:?}: {} statements, {} merged ranges",
        program.statements.len(),
        seen_ranges.len()
    );
    Ok(program)
}

/// Resolve the four style slots of `cell`, interning every non-empty subset.
pub fn intern_cell_styles(
    cell: &CellRecord,
    registry: &mut StyleRegistry,
) -> Result<CellStyles, CodegenError> {
    let mut styles = CellStyles::default();
    if let Some(font) = cell.font_attrs() {
        styles.font = Some(registry.intern(&StyleAttrs::Font(font))?);
    }
    if let Some(alignment) = cell.alignment_attrs() {
        styles.alignment = Some(registry.intern(&StyleAttrs::Alignment(alignment))?);
    }
    if let Some(border) = cell.border_attrs() {
        styles.border = Some(registry.intern(&StyleAttrs::Border(border))?);
    }
    if let Some(fill) = cell.fill_attrs() {
        styles.fill = Some(registry.intern(&StyleAttrs::Fill(fill))?);
    }
    Ok(styles)
}
