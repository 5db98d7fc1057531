use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use xlsxmap_model::{sanitize_identifier, StyleCategory, WorkbookDescription};

use crate::config::GeneratorConfig;
use crate::emit::emit_sheet;
use crate::ir::{sheet_module_name, SheetProgram};
use crate::output::{ensure_dir, write_unit};
use crate::python;
use crate::registry::{StyleDeclaration, StyleRegistry};
use crate::CodegenError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Sheet,
    Styles,
    Entry,
}

/// One generated source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub file_name: String,
    pub kind: UnitKind,
    pub contents: String,
}

/// Result of one in-memory generation run.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedWorkbook {
    /// Emitted programs, in sheet order.
    pub sheets: Vec<SheetProgram>,
    /// Shared styles in flush order.
    pub declarations: Vec<StyleDeclaration>,
    /// Sheet units (in sheet order), then the styles unit, then the entry unit.
    pub units: Vec<GeneratedUnit>,
}

impl GeneratedWorkbook {
    pub fn unit(&self, file_name: &str) -> Option<&GeneratedUnit> {
        self.units.iter().find(|unit| unit.file_name == file_name)
    }

    pub fn units_of(&self, kind: UnitKind) -> impl Iterator<Item = &GeneratedUnit> {
        self.units.iter().filter(move |unit| unit.kind == kind)
    }

    /// Distinct styles per category, in flush order.
    pub fn style_counts(&self) -> IndexMap<StyleCategory, usize> {
        StyleCategory::ALL
            .into_iter()
            .map(|category| {
                let count = self
                    .declarations
                    .iter()
                    .filter(|decl| decl.id.category() == category)
                    .count();
                (category, count)
            })
            .collect()
    }

    /// Write every unit into `dir`, creating it if needed.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<GenerationReport, CodegenError> {
        let dir = dir.as_ref();
        ensure_dir(dir)?;

        let mut written = Vec::with_capacity(self.units.len());
        for unit in &self.units {
            let path = write_unit(dir, &unit.file_name, &unit.contents)?;
            log::debug!("wrote {}", path.display());
            written.push(path);
        }

        Ok(GenerationReport {
            out_dir: dir.to_path_buf(),
            sheets: self.sheets.len(),
            styles: self.style_counts(),
            written,
        })
    }
}

/// Summary of a run that was written to disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub out_dir: PathBuf,
    pub sheets: usize,
    pub styles: IndexMap<StyleCategory, usize>,
    pub written: Vec<PathBuf>,
}

/// Turns a [`WorkbookDescription`] into sheet modules, a shared-styles module and an entry
/// point.
///
/// Every run starts from an empty [`StyleRegistry`], so generating the same description twice
/// yields byte-identical units.
#[derive(Clone, Debug, Default)]
pub struct WorkbookGenerator {
    config: GeneratorConfig,
}

impl WorkbookGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate(
        &self,
        workbook: &WorkbookDescription,
    ) -> Result<GeneratedWorkbook, CodegenError> {
        self.config.validate()?;

        let mut registry = StyleRegistry::new();
        let mut modules: HashMap<String, &str> = HashMap::new();
        let mut sheets = Vec::with_capacity(workbook.len());

        for (title, sheet) in &workbook.sheets {
            let clean_name = sanitize_identifier(title);
            let module = sheet_module_name(&clean_name);
            if !python::is_identifier(&module) {
                return Err(CodegenError::InvalidSheetName {
                    sheet: title.clone(),
                    module,
                });
            }
            if let Some(first) = modules.insert(module.clone(), title.as_str()) {
                return Err(CodegenError::ModuleNameCollision {
                    first: first.to_string(),
                    second: title.clone(),
                    module,
                });
            }

            log::debug!(
                "emitting sheet {title:?} as {module} ({} cells, {} images)",
                sheet.cells.len(),
                sheet.assets.len()
            );
            sheets.push(emit_sheet(
                &clean_name,
                title,
                sheet,
                &mut registry,
                &self.config.emit,
            )?);
        }

        let declarations = registry.materialize();

        let mut units = Vec::with_capacity(sheets.len() + 2);
        for program in &sheets {
            units.push(GeneratedUnit {
                file_name: format!("{}.py", program.module_name),
                kind: UnitKind::Sheet,
                contents: python::render_sheet_module(program, &self.config),
            });
        }
        units.push(GeneratedUnit {
            file_name: self.config.styles_file_name(),
            kind: UnitKind::Styles,
            contents: python::render_styles_module(&declarations),
        });
        units.push(GeneratedUnit {
            file_name: self.config.entry_file_name(),
            kind: UnitKind::Entry,
            contents: python::render_entry_module(&sheets, &self.config),
        });

        log::info!(
            "generated {} sheet modules with {} shared styles",
            sheets.len(),
            declarations.len()
        );
        Ok(GeneratedWorkbook {
            sheets,
            declarations,
            units,
        })
    }

    /// Generate and write every unit into `dir`.
    ///
    /// Errors abort the run; units already written stay on disk.
    pub fn generate_to_dir(
        &self,
        workbook: &WorkbookDescription,
        dir: impl AsRef<Path>,
    ) -> Result<GenerationReport, CodegenError> {
        self.generate(workbook)?.write_to_dir(dir)
    }
}
