// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{debug, info};

use crate::model::TableData;

/// Default file name for saved sessions.
pub const STATE_FILE_NAME: &str = "tableData.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// `path` is `None` for documents that did not come from a file.
    #[error("cannot decode table document{}: {source}", location(.path.as_deref()))]
    Decode {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode table document: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StoreError {
    /// Attaches `path` to a decode error; other variants already carry theirs.
    fn at(self, path: &Path) -> Self {
        match self {
            Self::Decode { path: None, source } => {
                Self::Decode { path: Some(path.to_path_buf()), source }
            }
            other => other,
        }
    }
}

fn location(path: Option<&Path>) -> String {
    path.map(|path| format!(" at {path:?}")).unwrap_or_default()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Writes a temp file and renames it into place, without fsync.
    #[default]
    BestEffort,
    /// Also syncs file contents and, on unix, the parent directory.
    Durable,
}

/// Pretty-printed JSON, two-space indented, so saved sessions diff cleanly.
pub fn encode_table(table: &TableData) -> Result<String, StoreError> {
    let mut text = serde_json::to_string_pretty(table).map_err(StoreError::Encode)?;
    text.push('\n');
    Ok(text)
}

/// Decodes a table document without validating it beyond its JSON shape.
pub fn decode_table(text: &str) -> Result<TableData, StoreError> {
    serde_json::from_str(text).map_err(|source| StoreError::Decode { path: None, source })
}

/// A session document on disk.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
    durability: WriteDurability,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), durability: WriteDurability::default() }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn save(&self, table: &TableData) -> Result<(), StoreError> {
        let text = encode_table(table)?;
        write_atomic(&self.path, text.as_bytes(), self.durability)?;
        info!(path = %self.path.display(), rows = table.row_count(), "state saved");
        Ok(())
    }

    pub fn load(&self) -> Result<TableData, StoreError> {
        let text = fs::read_to_string(&self.path)
            .map_err(|source| StoreError::Io { path: self.path.clone(), source })?;
        let table = decode_table(&text).map_err(|err| err.at(&self.path))?;
        debug!(path = %self.path.display(), "state loaded");
        Ok(table)
    }
}

/// Writes `contents` to `path` through a sibling temp file and a rename.
pub fn write_atomic(
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    fs::create_dir_all(&parent)
        .map_err(|source| StoreError::Io { path: parent.clone(), source })?;

    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let tmp_path = parent.join(format!(".capmap.tmp.{}.{}", file_name.to_string_lossy(), nanos));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io { path: tmp_path.clone(), source })?;

    file.write_all(contents)
        .map_err(|source| StoreError::Io { path: tmp_path.clone(), source })?;

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io { path: tmp_path.clone(), source })?;
    }
    drop(file);

    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io { path: path.to_path_buf(), source });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(&parent)
                .map_err(|source| StoreError::Io { path: parent.clone(), source })?;
            dir.sync_all().map_err(|source| StoreError::Io { path: parent.clone(), source })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
