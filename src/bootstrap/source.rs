// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Where table documents come from.
//!
//! A `DataSource` is picked once at startup and then read like any other document; callers do not
//! care whether the bytes came from disk or over HTTP.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::model::TableData;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request to {url} failed: {source}")]
    Http {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("cannot decode table document from {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Network(Url),
}

impl DataSource {
    /// `http(s)://` values become network sources, `file://` URLs and everything else a path.
    pub fn parse(value: &str) -> Self {
        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Network(url),
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => Self::File(path),
                Err(()) => Self::File(PathBuf::from(value)),
            },
            _ => Self::File(PathBuf::from(value)),
        }
    }

    /// Same as `parse` for an already parsed URL.
    pub fn from_url(url: Url) -> Self {
        if url.scheme() == "file" {
            if let Ok(path) = url.to_file_path() {
                return Self::File(path);
            }
        }
        Self::Network(url)
    }

    pub async fn read_text(&self) -> Result<String, SourceError> {
        match self {
            Self::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|source| SourceError::Io { path: path.clone(), source }),
            Self::Network(url) => {
                let http = |source: reqwest::Error| SourceError::Http { url: url.clone(), source };
                let response = reqwest::get(url.clone()).await.map_err(http)?;
                let response = response.error_for_status().map_err(http)?;
                response.text().await.map_err(http)
            }
        }
    }

    pub async fn fetch_table(&self) -> Result<TableData, SourceError> {
        let text = self.read_text().await?;
        let table = serde_json::from_str::<TableData>(&text)
            .map_err(|source| SourceError::Decode { origin: self.to_string(), source })?;
        debug!(source = %self, rows = table.row_count(), columns = table.column_count(), "table fetched");
        Ok(table)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Network(url) => write!(f, "{url}"),
        }
    }
}
