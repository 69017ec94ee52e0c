// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Capmap CLI entrypoint.
//!
//! Without a subcommand this runs the interactive editor (`edit`). `translate` turns query
//! parameters into a session document and `export` renders a map as SVG.

use std::error::Error;
use std::path::PathBuf;

use capmap::bootstrap::{
    host_channel, injection_channel, run_url_bootstrap, BootstrapBridge, BootstrapOutcome,
    DataSource, DocumentLocator,
};
use capmap::config::AppConfig;
use capmap::logging::{self, LogTarget};
use capmap::model::TableData;
use capmap::query::{translate, QueryParams};
use capmap::render::export_svg;
use capmap::store::{encode_table, write_atomic, StateFile};
use capmap::tui::{self, EditorSession};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use url::Url;

const DEFAULT_BASE_DOCUMENT: &str = "table.json";

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file layered over the built-in defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    edit: EditArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the interactive editor (default).
    Edit(EditArgs),
    /// Apply capability parameters to the base table and print the session document.
    Translate(TranslateArgs),
    /// Render a map as SVG.
    Export(ExportArgs),
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Args)]
struct SourceArgs {
    /// Base table document: a path or an http(s) URL.
    #[arg(long, value_name = "SOURCE")]
    table: Option<String>,
    /// URL the map is opened from; its query string supplies capability parameters.
    #[arg(long, value_name = "URL")]
    page_url: Option<String>,
    /// Capability parameters as a query string, e.g. `?ca=2&ga=4`. Wins over --page-url.
    #[arg(long, value_name = "QUERY")]
    params: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Args)]
struct EditArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// State file used by save and load.
    #[arg(long, value_name = "PATH")]
    state: Option<PathBuf>,
    /// Use the built-in sample table instead of a base document.
    #[arg(long, conflicts_with = "table")]
    demo: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
struct TranslateArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Write the document here instead of stdout.
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
struct ExportArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Render this session document instead of the base table.
    #[arg(long, value_name = "PATH")]
    state: Option<PathBuf>,
    /// Output path; defaults to `export.path` from the configuration.
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid page URL {value:?}: {source}")]
    PageUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("no capability parameters (keys like `ca` or `gb`) were given")]
    NoCapabilityParams,
    #[error("editor failed: {0}")]
    Editor(String),
}

/// Where the inputs of one run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Inputs {
    base: DataSource,
    params: QueryParams,
}

impl SourceArgs {
    fn resolve(&self) -> Result<Inputs, CliError> {
        let page = self
            .page_url
            .as_deref()
            .map(|value| {
                Url::parse(value)
                    .map_err(|source| CliError::PageUrl { value: value.to_owned(), source })
            })
            .transpose()?;

        let base = match (self.table.as_deref(), page.as_ref()) {
            (Some(table), _) => DataSource::parse(table),
            (None, Some(page)) => DocumentLocator::new(page.clone()).base_document().map_err(
                |source| CliError::PageUrl { value: page.to_string(), source },
            )?,
            (None, None) => DataSource::File(PathBuf::from(DEFAULT_BASE_DOCUMENT)),
        };

        let params = match (self.params.as_deref(), page.as_ref()) {
            (Some(query), _) => QueryParams::parse(query),
            (None, Some(page)) => QueryParams::from_url(page),
            (None, None) => QueryParams::default(),
        };

        Ok(Inputs { base, params })
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("capmap: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let command = cli.command.unwrap_or(Command::Edit(cli.edit));

    match &command {
        Command::Edit(_) => logging::init(LogTarget::File(config.log_file()))?,
        Command::Translate(_) | Command::Export(_) => logging::init(LogTarget::Stderr)?,
    }

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    match command {
        Command::Edit(args) => runtime.block_on(edit(args, config)),
        Command::Translate(args) => runtime.block_on(translate_command(args, &config)),
        Command::Export(args) => runtime.block_on(export_command(args, &config)),
    }
}

async fn edit(args: EditArgs, config: AppConfig) -> Result<(), Box<dyn Error>> {
    let Inputs { base, params } = args.source.resolve()?;
    let (injector, loader) = injection_channel();
    let (endpoint, handle) = host_channel();
    let (base_tx, base_rx) = mpsc::channel(1);
    let bridge = BootstrapBridge::new(config.bridge(), injector, handle);

    let state_path = args.state.unwrap_or_else(|| config.state.path.clone());
    let session = EditorSession {
        policy: config.history_policy(),
        state_file: StateFile::new(state_path).with_durability(config.durability()),
        export_path: config.export.path.clone(),
        svg: config.svg_options(),
        loader,
        host: endpoint,
        base: base_rx,
    };

    let bootstrap = if args.demo {
        let demo = tui::demo_table();
        let patched = translate(&params, &demo);
        base_tx.send(demo).await?;
        tokio::spawn(async move {
            if let Some(table) = patched {
                if let Err(err) = bridge.deliver(table).await {
                    warn!(%err, "demo bootstrap failed");
                }
            }
        })
    } else {
        let fetch_source = base.clone();
        tokio::spawn(async move {
            match fetch_source.fetch_table().await {
                Ok(table) => {
                    let _ = base_tx.send(table).await;
                }
                Err(err) => error!(source = %fetch_source, %err, "base document unavailable"),
            }
        });
        tokio::spawn(async move {
            match run_url_bootstrap(&params, &base, bridge).await {
                Ok(BootstrapOutcome::Skipped) => {}
                Ok(BootstrapOutcome::Delivered { populated }) => {
                    info!(populated, "link state delivered");
                }
                Err(err) => warn!(%err, "link bootstrap failed"),
            }
        })
    };

    let result =
        tokio::task::spawn_blocking(move || tui::run(session).map_err(|err| err.to_string()))
            .await;
    bootstrap.abort();

    result?.map_err(CliError::Editor)?;
    Ok(())
}

async fn translate_command(args: TranslateArgs, config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let Inputs { base, params } = args.source.resolve()?;
    if !params.has_capability_params() {
        return Err(CliError::NoCapabilityParams.into());
    }
    let table = base.fetch_table().await?;
    let translated = translate(&params, &table).ok_or(CliError::NoCapabilityParams)?;
    let document = encode_table(&translated)?;

    match args.output {
        Some(path) => {
            write_atomic(&path, document.as_bytes(), config.durability())?;
            info!(path = %path.display(), populated = translated.populated_slot_count(), "document written");
        }
        None => print!("{document}"),
    }
    Ok(())
}

async fn export_command(args: ExportArgs, config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let table = match &args.state {
        Some(path) => StateFile::new(path).load()?,
        None => {
            let Inputs { base, params } = args.source.resolve()?;
            let table = base.fetch_table().await?;
            apply_params(&params, table)
        }
    };

    let path = args.output.unwrap_or_else(|| config.export.path.clone());
    export_svg(&table, &config.svg_options(), &path, config.durability())?;
    println!("{}", path.display());
    Ok(())
}

fn apply_params(params: &QueryParams, table: TableData) -> TableData {
    translate(params, &table).unwrap_or(table)
}
