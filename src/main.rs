//! Headless driver for the pager.
//!
//! Reads line commands from stdin (`goto N`, `next`, `prev`, `open`,
//! `close`, `narrator ID`, `swipe DX DY VX`, `quit`) and prints the reader
//! state whenever it changes.

use anyhow::{Context, Result, anyhow};
use folio_pager::app::{App, Message, PageView, Session, SessionHandle, parse_command};
use folio_pager::config::{AppConfig, load_config};
use folio_pager::service::{DocumentService, HttpDocumentService};
use folio_pager::settings::{KeyValueStore, TomlFileStore};
use std::env;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let start_override = parse_args()?;
    let mut config = load_config(Path::new("conf/config.toml"));
    if let Some(page) = start_override {
        config.start_page = page;
    }
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        api = %config.api_base_url,
        document = config.document_id,
        start = config.start_page,
        level = %config.log_level,
        "Starting pager"
    );

    let service = HttpDocumentService::from_config(&config)
        .context("Failed to build the document service client")?;
    let settings = TomlFileStore::open(Path::new(&config.cache_dir), &config.api_base_url);
    info!(path = %settings.path().display(), "Using settings store");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    runtime.block_on(drive(config, Arc::new(service), Arc::new(settings)));
    Ok(())
}

fn parse_args() -> Result<Option<u32>> {
    let mut args = env::args().skip(1);
    let Some(raw) = args.next() else {
        return Ok(None);
    };
    let page = raw
        .parse::<u32>()
        .ok()
        .filter(|page| *page > 0)
        .ok_or_else(|| anyhow!("Usage: folio-pager [start-page]; got {raw:?}"))?;
    Ok(Some(page))
}

async fn drive(
    config: AppConfig,
    service: Arc<dyn DocumentService>,
    settings: Arc<dyn KeyValueStore>,
) {
    let viewport_width = config.viewport_width;
    let (session, handle) = Session::new(config, service, settings);
    tokio::spawn(read_commands(handle, viewport_width));

    let mut last_revision = None;
    let app = session
        .run_with(|app| {
            if last_revision != Some(app.revision()) {
                last_revision = Some(app.revision());
                print_status(app);
            }
        })
        .await;
    info!(page = app.current_page().get(), "Pager stopped");
}

async fn read_commands(handle: SessionHandle, viewport_width: f32) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => match parse_command(&line, viewport_width) {
                Some(messages) => {
                    for message in messages {
                        if !handle.send(message) {
                            return;
                        }
                    }
                }
                None => warn!(%line, "Unrecognised command"),
            },
            Ok(None) => break,
            Err(err) => {
                warn!("Failed to read stdin: {err}");
                break;
            }
        }
    }
    handle.send(Message::Quit);
}

fn print_status(app: &App) {
    let view = match app.view() {
        PageView::Loading => "loading".to_string(),
        PageView::Ready(content) => format!("{} words", content.word_count()),
        PageView::Failed(err) => format!("failed: {err}"),
    };
    let drawer = app.drawer();
    let annotations = app.annotations().map_or(0, |set| set.len());
    println!(
        "page {} | {view} | annotations {annotations} | narrators {:?} | drawer {}",
        app.current_page(),
        app.selected_narrators(),
        if drawer.visible { "open" } else { "closed" },
    );
    if let PageView::Ready(content) = app.view() {
        for word in content.word_ids() {
            if let Some((narrator, segments)) = app.visible_variant_diff(word) {
                let marked: String = segments
                    .iter()
                    .map(|segment| {
                        if segment.differs {
                            format!("[{}]", segment.text)
                        } else {
                            segment.text.clone()
                        }
                    })
                    .collect();
                println!("  word {word} narrator {narrator}: {marked}");
            }
        }
    }
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    warn!("Logging initialized; override level with config.log_level or RUST_LOG");
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
