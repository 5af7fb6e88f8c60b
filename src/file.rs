// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::error::StoreError;

pub fn ensure_directory(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() && !dir.is_dir() {
        return Err(StoreError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "path exists but is not a directory"),
        ));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
    }
    Ok(())
}

/// Replace `path` with `contents`: write a sibling temp file, then rename it
/// over the target. A crash mid-write leaves the previous file intact.
pub fn write_replace(path: &Path, contents: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let tmp = tmp_sibling(path);

    let file = File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
    let mut out = BufWriter::new(file);
    out.write_all(contents.as_bytes()).map_err(|e| StoreError::io(&tmp, e))?;
    let file = out.into_inner().map_err(|e| StoreError::io(&tmp, e.into_error()))?;
    file.sync_all().map_err(|e| StoreError::io(&tmp, e))?;

    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
