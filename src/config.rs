// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Application settings.
//!
//! Layers, lowest first: the embedded `config/default.toml`, an optional user file, then `CAPMAP_*`
//! environment variables (`__` separates sections, e.g. `CAPMAP_STATE__DURABLE=true`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

use crate::bootstrap::BridgeConfig;
use crate::layout::GridMetrics;
use crate::ops::HistoryPolicy;
use crate::render::SvgOptions;
use crate::store::WriteDurability;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");
const ENV_PREFIX: &str = "CAPMAP";
pub const DEFAULT_LOG_FILE_NAME: &str = "capmap.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {0:?} does not exist")]
    MissingFile(PathBuf),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] config::ConfigError),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    pub bootstrap: BootstrapSettings,
    pub state: StateSettings,
    pub history: HistorySettings,
    pub export: ExportSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BootstrapSettings {
    pub mount_delay_ms: u64,
    pub ready_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StateSettings {
    pub path: PathBuf,
    pub durable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HistorySettings {
    pub clear_on_load: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportSettings {
    pub path: PathBuf,
    pub padding: f64,
    pub line_width: f64,
    pub label_width: f64,
    pub column_width: f64,
    pub header_height: f64,
    pub row_height: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LogSettings {
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Loads the layered configuration, reading `CAPMAP_*` variables from the process environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(file, None)
    }

    /// Like [`AppConfig::load`], but takes environment overrides from `env` when given.
    pub fn load_with_env(
        file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(path) = file {
            if !path.is_file() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn bridge(&self) -> BridgeConfig {
        let ready_timeout = match self.bootstrap.ready_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        BridgeConfig { mount_delay: Duration::from_millis(self.bootstrap.mount_delay_ms), ready_timeout }
    }

    pub fn history_policy(&self) -> HistoryPolicy {
        HistoryPolicy { clear_on_load: self.history.clear_on_load }
    }

    pub fn durability(&self) -> WriteDurability {
        if self.state.durable {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        }
    }

    pub fn svg_options(&self) -> SvgOptions {
        let export = &self.export;
        SvgOptions {
            metrics: GridMetrics {
                label_width: export.label_width,
                column_width: export.column_width,
                header_height: export.header_height,
                row_height: export.row_height,
                ..GridMetrics::default()
            },
            padding: export.padding,
            line_width: export.line_width,
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.log.file.clone().unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE_NAME))
    }
}
