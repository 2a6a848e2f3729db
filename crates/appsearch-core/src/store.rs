//! Reading and atomically rewriting the catalog store document.
//!
//! The store is always written whole: serialize into a temp file in the same
//! directory, fsync, then rename over the target. Readers see either the old
//! or the new document, never a partial one.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::CatalogStore;

pub fn parse_store(raw: &str) -> Result<CatalogStore> {
    serde_json::from_str(raw).map_err(|e| Error::Configuration(format!("malformed store document: {e}")))
}

pub fn load_store(path: &Path) -> Result<CatalogStore> {
    let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let store = parse_store(&raw).map_err(|e| match e {
        Error::Configuration(msg) => Error::Configuration(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;
    debug!(path = %path.display(), entries = store.apps.len(), "loaded catalog store");
    Ok(store)
}

pub fn save_store_atomic(path: &Path, store: &CatalogStore) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, store)
            .map_err(|e| Error::io(tmp.path(), std::io::Error::other(e)))?;
        writer.write_all(b"\n").map_err(|e| Error::io(tmp.path(), e))?;
        writer.flush().map_err(|e| Error::io(tmp.path(), e))?;
    }
    tmp.as_file().sync_all().map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    debug!(path = %path.display(), entries = store.apps.len(), "persisted catalog store");
    Ok(())
}
