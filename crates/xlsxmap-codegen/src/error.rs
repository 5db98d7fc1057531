use std::io;
use std::path::PathBuf;

use thiserror::Error;
use xlsxmap_model::ModelError;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("sheet {sheet:?} maps to module `{module}`, which is not a valid Python identifier")]
    InvalidSheetName { sheet: String, module: String },
    #[error("sheets {first:?} and {second:?} both map to module `{module}`")]
    ModuleNameCollision {
        first: String,
        second: String,
        module: String,
    },
    #[error("invalid generator config: {0}")]
    InvalidConfig(String),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
