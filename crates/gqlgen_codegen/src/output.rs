//! Writes generated files to disk.

use crate::{Error, GeneratedFiles, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes every generated file into `dir`, creating it if needed.
///
/// Each file is written to a temporary file in `dir` and renamed over its
/// target, so readers never observe a half-written file. A failure stops the
/// run; files already written stay in place.
pub fn write_files(dir: &Path, files: &GeneratedFiles) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|source| Error::OutputWrite {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(3);
    for (name, contents) in files.files() {
        let path = dir.join(name);
        write_atomic(&path, contents)?;
        tracing::info!(path = %path.display(), bytes = contents.len(), "wrote file");
        written.push(path);
    }
    Ok(written)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let failed = |source| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(failed)?;
    file.write_all(contents.as_bytes()).map_err(failed)?;
    file.persist(path).map_err(|e| failed(e.error))?;
    Ok(())
}
