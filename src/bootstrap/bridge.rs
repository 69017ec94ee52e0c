// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Delivers an injected table into a running host by triggering its load-state path.
//!
//! The host exposes two things: a readiness flag that turns true once its load path can be used,
//! and an entry point that accepts file selections. The bridge parks the table in the injection
//! slot first, waits for the host, then submits a single synthetic selection. The host then loads
//! it exactly as if the user had picked a file, and its `StateLoader` hands over the parked table.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::model::TableData;

use super::slot::Injector;

/// Name of the file the synthetic selection pretends to carry.
pub const SYNTHETIC_FILE_NAME: &str = "params.json";

pub const DEFAULT_MOUNT_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Grace period before the first readiness check.
    pub mount_delay: Duration,
    /// Upper bound on waiting for the host; `None` waits for as long as the host lives.
    pub ready_timeout: Option<Duration>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self { mount_delay: DEFAULT_MOUNT_DELAY, ready_timeout: Some(DEFAULT_READY_TIMEOUT) }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error("state loader was dropped before the injected document could be parked")]
    LoaderClosed,
    #[error("host went away before it became ready")]
    HostClosed,
    #[error("host did not become ready within {0:?}")]
    ReadyTimeout(Duration),
}

/// A file the host is asked to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub name: String,
}

impl FileSelection {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn synthetic() -> Self {
        Self::new(SYNTHETIC_FILE_NAME)
    }
}

/// Creates the host side and the bridge side of the host connection.
pub fn host_channel() -> (HostEndpoint, HostHandle) {
    let (ready_tx, ready_rx) = watch::channel(false);
    let (selection_tx, selection_rx) = mpsc::unbounded_channel();
    (
        HostEndpoint { ready: ready_tx, selections: selection_rx },
        HostHandle { ready: ready_rx, selections: selection_tx },
    )
}

/// Owned by the host (the TUI).
#[derive(Debug)]
pub struct HostEndpoint {
    ready: watch::Sender<bool>,
    selections: mpsc::UnboundedReceiver<FileSelection>,
}

impl HostEndpoint {
    pub fn set_ready(&self, ready: bool) {
        self.ready.send_if_modified(|current| {
            let changed = *current != ready;
            *current = ready;
            changed
        });
    }

    #[cfg(test)]
    pub(crate) fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Non-blocking poll for the next pending selection.
    pub fn try_next_selection(&mut self) -> Option<FileSelection> {
        self.selections.try_recv().ok()
    }
}

/// Held by the bridge.
#[derive(Debug)]
pub struct HostHandle {
    ready: watch::Receiver<bool>,
    selections: mpsc::UnboundedSender<FileSelection>,
}

impl HostHandle {
    async fn wait_until_ready(&mut self, timeout: Option<Duration>) -> Result<(), BridgeError> {
        let wait = async {
            self.ready
                .wait_for(|ready| *ready)
                .await
                .map(|_| ())
                .map_err(|_| BridgeError::HostClosed)
        };
        match timeout {
            Some(limit) => tokio::time::timeout(limit, wait)
                .await
                .map_err(|_| BridgeError::ReadyTimeout(limit))?,
            None => wait.await,
        }
    }
}

#[derive(Debug)]
pub struct BootstrapBridge {
    config: BridgeConfig,
    injector: Injector,
    host: HostHandle,
}

impl BootstrapBridge {
    pub fn new(config: BridgeConfig, injector: Injector, host: HostHandle) -> Self {
        Self { config, injector, host }
    }

    /// Parks `table`, waits for the host and triggers its load path once.
    ///
    /// Consumes the bridge, so a second delivery is impossible by construction.
    pub async fn deliver(self, table: TableData) -> Result<(), BridgeError> {
        let Self { config, injector, mut host } = self;

        injector.inject(table).map_err(|_| BridgeError::LoaderClosed)?;

        tokio::time::sleep(config.mount_delay).await;

        if let Err(err) = host.wait_until_ready(config.ready_timeout).await {
            warn!(%err, "bootstrap injection abandoned");
            return Err(err);
        }

        host.selections
            .send(FileSelection::synthetic())
            .map_err(|_| BridgeError::HostClosed)?;
        info!(file = SYNTHETIC_FILE_NAME, "bootstrap injection triggered");
        Ok(())
    }
}
