use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::CodegenError;

/// Write `contents` to `dir/file_name` through a temp file in `dir`, then rename it into place.
///
/// A failed write leaves any existing file untouched. Units are written independently; nothing is
/// rolled back when a later unit fails.
pub fn write_unit(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, CodegenError> {
    let dest = dir.join(file_name);
    let write_err = |source: io::Error| CodegenError::Write {
        path: dest.clone(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.as_file_mut().flush().map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(&dest).map_err(|err| write_err(err.error))?;

    Ok(dest)
}

pub fn ensure_dir(dir: &Path) -> Result<(), CodegenError> {
    fs::create_dir_all(dir).map_err(|source| CodegenError::Write {
        path: dir.to_path_buf(),
        source,
    })
}
