// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Getting a table into the editor before the user touches it.
//!
//! `source` and `locator` decide where the base document lives, `slot` parks an injected table for
//! the host's state loader, and `bridge` triggers the host's load path once it is ready.
//! `run_url_bootstrap` ties them together for query-parameter driven starts.

pub mod bridge;
pub mod locator;
pub mod slot;
pub mod source;

use thiserror::Error;
use tracing::{error, info};

pub use bridge::{
    host_channel, BootstrapBridge, BridgeConfig, BridgeError, FileSelection, HostEndpoint,
    HostHandle, SYNTHETIC_FILE_NAME,
};
pub use locator::{DocumentLocator, BASE_DOCUMENT_PATH};
pub use slot::{injection_channel, Injector, LoadedState, StateLoader, StateOrigin};
pub use source::{DataSource, SourceError};

use crate::query::{translate, QueryParams};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No capability parameters; the bridge was dropped unused.
    Skipped,
    /// The host was asked to load a table with `populated` state slots.
    Delivered { populated: usize },
}

/// Fetches the base document, merges `params` into it and hands the result to the host.
///
/// The base is fetched even though the host fetches it too: the merge must start from the
/// document's own headers and rows, not from whatever the host currently shows.
pub async fn run_url_bootstrap(
    params: &QueryParams,
    base: &DataSource,
    bridge: BootstrapBridge,
) -> Result<BootstrapOutcome, BootstrapError> {
    if !params.has_capability_params() {
        return Ok(BootstrapOutcome::Skipped);
    }

    let table = base.fetch_table().await.inspect_err(|err| {
        error!(source = %base, %err, "bootstrap could not fetch the base document");
    })?;

    let Some(merged) = translate(params, &table) else {
        return Ok(BootstrapOutcome::Skipped);
    };
    let populated = merged.populated_slot_count();
    info!(source = %base, populated, "delivering table from query parameters");

    bridge.deliver(merged).await?;
    Ok(BootstrapOutcome::Delivered { populated })
}
