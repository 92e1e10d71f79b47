//! File persistence shared by every store: whole-file writes through a
//! sibling temp file and a rename, so a crash never leaves a torn file.

use crate::error::{PipelineError, PipelineResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub fn write_atomic(path: &Path, bytes: &[u8]) -> PipelineResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::Io(e, parent.to_path_buf()))?;
    }
    let tmp = temp_sibling(path);
    fs::write(&tmp, bytes).map_err(|e| PipelineError::Io(e, tmp.clone()))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        PipelineError::Io(e, path.to_path_buf())
    })
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

/// `Ok(None)` when the file does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> PipelineResult<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(PipelineError::Io(e, path.to_path_buf())),
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| PipelineError::Json(e, path.to_path_buf()))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> PipelineResult<()> {
    let mut bytes =
        serde_json::to_vec_pretty(value).map_err(|e| PipelineError::Json(e, path.to_path_buf()))?;
    bytes.push(b'\n');
    write_atomic(path, &bytes)
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> PipelineResult<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).map_err(|e| PipelineError::Csv(e, path.to_path_buf()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| PipelineError::Csv(e.into_error().into(), path.to_path_buf()))?;
    write_atomic(path, &bytes)
}

/// `Ok(None)` when the file does not exist.
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> PipelineResult<Option<Vec<T>>> {
    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(e) if matches!(e.kind(), csv::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound) => {
            return Ok(None);
        }
        Err(e) => return Err(PipelineError::Csv(e, path.to_path_buf())),
    };
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map(Some)
        .map_err(|e| PipelineError::Csv(e, path.to_path_buf()))
}
