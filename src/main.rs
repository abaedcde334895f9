//! Mosaic - A terminal masonry gallery for paginated image search.
//!
//! # Usage
//!
//! ```bash
//! PEXELS_API_KEY=... mosaic
//! mosaic "open pit" --per-page 40
//! mosaic --columns compact --save
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use mosaic::app::App;
use mosaic::config::{
    ColumnsMode, ConfigFlags, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use mosaic::gallery::ScrollTrigger;
use mosaic::gallery::trigger::DEFAULT_BREAKPOINT;
use mosaic::perf;
use mosaic::source::pexels::{API_KEY_ENV, DEFAULT_ENDPOINT, MAX_PER_PAGE, PexelsSource};
use mosaic::source::{DEFAULT_PER_PAGE, DEFAULT_QUERY};

/// A terminal masonry gallery for paginated image search
#[derive(Parser, Debug)]
#[command(name = "mosaic", version, about, long_about = None)]
struct Cli {
    /// Search query to start with
    #[arg(value_name = "QUERY")]
    query: Option<String>,

    /// Images requested per page (1-80)
    #[arg(long, value_name = "N")]
    per_page: Option<u32>,

    /// Terminal width at which the gallery switches to three columns
    #[arg(long, value_name = "COLS")]
    breakpoint: Option<u16>,

    /// Column count: auto follows the breakpoint
    #[arg(long, value_enum)]
    columns: Option<ColumnsMode>,

    /// Search API endpoint
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// API key (defaults to the PEXELS_API_KEY environment variable)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Enable startup performance logging
    #[arg(long)]
    perf: bool,

    /// Write detailed layout/fetch debug events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults in the config file
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("MOSAIC_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        eprintln!(
            "[warn] Failed to initialize render debug log {}: {}",
            render_debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            err
        );
    }

    let api_key = effective
        .api_key
        .clone()
        .or_else(|| std::env::var(API_KEY_ENV).ok())
        .filter(|key| !key.trim().is_empty());
    let Some(api_key) = api_key else {
        anyhow::bail!("No API key: pass --api-key or set {API_KEY_ENV}");
    };
    let endpoint = effective
        .endpoint
        .clone()
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    let source = PexelsSource::new(endpoint, api_key).context("Failed to set up image source")?;

    let per_page = effective
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);
    let forced = effective.columns.and_then(ColumnsMode::forced_class);
    let trigger = ScrollTrigger::new(effective.breakpoint.unwrap_or(DEFAULT_BREAKPOINT))
        .with_forced_class(forced);

    // Run the application
    let mut app = App::new(Arc::new(source))
        .with_query(cli.query.unwrap_or_else(|| DEFAULT_QUERY.to_string()))
        .with_per_page(per_page)
        .with_trigger(trigger)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
