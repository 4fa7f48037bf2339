//! SDL loading.

use crate::{Error, Result};
use gqlgen_core::SourceMap;
use std::io;
use std::path::{Path, PathBuf};

/// Reads every document in order and joins them with newline separators.
pub fn load_sdl<P: AsRef<Path>>(paths: &[P]) -> Result<SourceMap> {
    let mut sources = SourceMap::new();
    for path in paths {
        let path = path.as_ref();
        let contents = read_utf8(path)?;
        tracing::info!(path = %path.display(), bytes = contents.len(), "read SDL document");
        sources.push(path, &contents);
    }
    Ok(sources)
}

fn read_utf8(path: &Path) -> Result<String> {
    let sdl_read = |source| Error::SdlRead {
        path: PathBuf::from(path),
        source,
    };
    let bytes = std::fs::read(path).map_err(sdl_read)?;
    String::from_utf8(bytes).map_err(|e| sdl_read(io::Error::new(io::ErrorKind::InvalidData, e)))
}
