//! `xlsxmap-codegen` turns a [`WorkbookDescription`](xlsxmap_model::WorkbookDescription) into
//! openpyxl Python modules that rebuild the workbook.
//!
//! The pipeline is:
//! 1. [`emit::emit_sheet`] walks each sheet's cells and produces a [`SheetProgram`], interning
//!    every non-empty font/fill/border/alignment subset into the run's [`StyleRegistry`].
//! 2. The registry is flushed once all sheets are emitted.
//! 3. [`python`] renders one module per sheet, one shared-styles module and one entry point.
//!
//! [`WorkbookGenerator`] drives the whole run; the `xlsxmap` binary wraps it (see [`cli`]).

pub mod cli;
pub mod config;
pub mod emit;
mod error;
pub mod generate;
pub mod ir;
pub mod output;
pub mod python;
pub mod registry;

pub use config::GeneratorConfig;
pub use emit::{emit_sheet, EmissionMode, EmitOptions, FormulaStyling};
pub use error::CodegenError;
pub use generate::{
    GeneratedUnit, GeneratedWorkbook, GenerationReport, UnitKind, WorkbookGenerator,
};
pub use ir::{CellStyles, SheetProgram, Statement};
pub use registry::{StyleDeclaration, StyleId, StyleRegistry};
