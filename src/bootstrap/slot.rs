// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Single-slot hand-off of an injected document to the host's load path.
//!
//! The injector side can deliver at most one table (`inject` consumes it). The loader side is what
//! the host calls whenever the user asks to load a state file: the first read made while an
//! injected table is waiting returns that table instead of touching the file, every other read
//! goes to disk.

use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info};

use crate::model::TableData;
use crate::store::StoreError;

/// Creates a connected injector/loader pair.
pub fn injection_channel() -> (Injector, StateLoader) {
    let (tx, rx) = oneshot::channel();
    (Injector { tx }, StateLoader { pending: Some(rx) })
}

#[derive(Debug)]
pub struct Injector {
    tx: oneshot::Sender<TableData>,
}

impl Injector {
    /// Parks `table` for the next state read. Hands the table back if the loader is gone.
    pub fn inject(self, table: TableData) -> Result<(), TableData> {
        self.tx.send(table)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateOrigin {
    Injected,
    File(PathBuf),
}

/// Raw document text plus where it came from; decoding stays with the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedState {
    pub text: String,
    pub origin: StateOrigin,
}

#[derive(Debug, Default)]
pub struct StateLoader {
    pending: Option<oneshot::Receiver<TableData>>,
}

impl StateLoader {
    pub fn read_state(&mut self, path: &Path) -> Result<LoadedState, StoreError> {
        if let Some(text) = self.take_injected()? {
            return Ok(LoadedState { text, origin: StateOrigin::Injected });
        }

        let text = fs::read_to_string(path)
            .map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
        Ok(LoadedState { text, origin: StateOrigin::File(path.to_path_buf()) })
    }

    fn take_injected(&mut self) -> Result<Option<String>, StoreError> {
        let Some(mut rx) = self.pending.take() else {
            return Ok(None);
        };

        match rx.try_recv() {
            Ok(table) => {
                info!(rows = table.row_count(), "consuming injected state");
                serde_json::to_string(&table).map(Some).map_err(StoreError::Encode)
            }
            Err(TryRecvError::Empty) => {
                self.pending = Some(rx);
                Ok(None)
            }
            Err(TryRecvError::Closed) => {
                debug!("injector dropped without a document");
                Ok(None)
            }
        }
    }
}
