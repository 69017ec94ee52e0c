// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Process-wide `tracing` subscriber setup.
//!
//! The filter comes from `CAPMAP_LOG_FILTER`, then `RUST_LOG`, then defaults to `info`. The terminal UI
//! owns stdout and stderr while it runs, so it logs to a file instead.

use std::fs::OpenOptions;
use std::io::stderr;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing::subscriber::{set_global_default, SetGlobalDefaultError};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

pub const LOG_ENV: &str = "CAPMAP_LOG_FILTER";
const DEFAULT_DIRECTIVE: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    AlreadySet(#[from] SetGlobalDefaultError),
}

pub fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| DEFAULT_DIRECTIVE.into())
}

pub fn init(target: LogTarget) -> Result<(), LoggingError> {
    let (writer, ansi) = match target {
        LogTarget::Stderr => (BoxMakeWriter::new(stderr), true),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|source| LoggingError::Open { path, source })?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
    };

    let subscriber = Registry::default().with(
        fmt::layer().with_target(true).with_ansi(ansi).with_writer(writer).with_filter(filter()),
    );
    set_global_default(subscriber)?;
    Ok(())
}
