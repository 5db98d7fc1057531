use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::emit::EmitOptions;
use crate::python;
use crate::CodegenError;

pub const DEFAULT_OUTPUT_WORKBOOK: &str = "output.xlsx";
pub const DEFAULT_IMAGES_DIR: &str = "images";
pub const DEFAULT_STYLES_MODULE: &str = "common";
pub const DEFAULT_ENTRY_MODULE: &str = "main";

/// Settings for one generation run.
///
/// Every field has a default, so a JSON config file only needs the keys it overrides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub emit: EmitOptions,
    /// Path, relative to the working directory of the generated entry point, of the rebuilt
    /// workbook.
    pub output_workbook: String,
    /// Directory, relative to the generated modules, holding image assets.
    pub images_dir: String,
    pub styles_module: String,
    pub entry_module: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            emit: EmitOptions::default(),
            output_workbook: DEFAULT_OUTPUT_WORKBOOK.to_string(),
            images_dir: DEFAULT_IMAGES_DIR.to_string(),
            styles_module: DEFAULT_STYLES_MODULE.to_string(),
            entry_module: DEFAULT_ENTRY_MODULE.to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, CodegenError> {
        serde_json::from_str(json).map_err(|err| CodegenError::InvalidConfig(err.to_string()))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, CodegenError> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            CodegenError::InvalidConfig(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    pub fn styles_file_name(&self) -> String {
        format!("{}.py", self.styles_module)
    }

    pub fn entry_file_name(&self) -> String {
        format!("{}.py", self.entry_module)
    }

    /// Reject settings that would produce unimportable or clashing modules.
    pub fn validate(&self) -> Result<(), CodegenError> {
        for (field, name) in [
            ("styles_module", &self.styles_module),
            ("entry_module", &self.entry_module),
        ] {
            if !python::is_identifier(name) {
                return Err(CodegenError::InvalidConfig(format!(
                    "{field} `{name}` is not a valid module name"
                )));
            }
            if name.starts_with("sheet_") {
                return Err(CodegenError::InvalidConfig(format!(
                    "{field} `{name}` clashes with generated sheet modules"
                )));
            }
        }
        if self.styles_module == self.entry_module {
            return Err(CodegenError::InvalidConfig(format!(
                "styles_module and entry_module are both `{}`",
                self.styles_module
            )));
        }
        if self.output_workbook.is_empty() {
            return Err(CodegenError::InvalidConfig(
                "output_workbook must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
