// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use ebay_harvest::api::build_http_client;
use ebay_harvest::utils::logging::{format_success, format_warning};
use ebay_harvest::{
    Collector, Config, Downloader, EbayClient, HttpImageSource, OperationTimer, Table,
    TokenClient, Validator, write_rows,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "ebay_harvest")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Collect eBay listings and download their product images", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search listings for each term and write them to a CSV table
    Collect {
        /// Search term, repeatable; replaces the configured terms
        #[arg(short, long = "term", value_name = "TERM")]
        terms: Vec<String>,

        /// Maximum rows for the whole run
        #[arg(long, value_name = "NUM")]
        target: Option<usize>,

        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Download one image per table row and record its local path
    Download {
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[arg(long, value_name = "DIR")]
        image_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    ebay_harvest::utils::logging::init_logger(cli.color, cli.verbose);

    info!("eBay Harvest");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using defaults and environment",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration from environment")?
    };

    match cli.command {
        Commands::Collect {
            terms,
            target,
            output,
        } => {
            cmd_collect(config, terms, target, output, cli.color).await?;
        }
        Commands::Download {
            input,
            output,
            image_dir,
        } => {
            cmd_download(config, input, output, image_dir, cli.color).await?;
        }
    }

    Ok(())
}

async fn cmd_collect(
    mut config: Config,
    terms: Vec<String>,
    target: Option<usize>,
    output: Option<PathBuf>,
    color: bool,
) -> Result<()> {
    if !terms.is_empty() {
        config.collector.search_terms = terms;
    }
    if let Some(target) = target {
        config.collector.target_rows = target;
    }
    if let Some(output) = output {
        config.collector.output_file = output;
    }
    config.validate().context("Invalid configuration")?;

    let terms = Validator::validate_search_terms(&config.collector.search_terms)?;
    let (client_id, client_secret) = config.require_credentials()?;

    let http = build_http_client(Duration::from_secs(config.api.request_timeout_secs))?;

    let token = TokenClient::new(
        http.clone(),
        config.api.token_url.clone(),
        config.api.scope.clone(),
    )
    .fetch_token(client_id, client_secret)
    .await
    .context("Authentication failed")?;

    let api = EbayClient::new(http, config.api.search_url.clone(), token)
        .with_marketplace(config.api.marketplace_id.clone());

    info!(
        "Collecting up to {} rows for {} term(s)",
        config.collector.target_rows,
        terms.len()
    );
    let timer = OperationTimer::new("collect");

    let collection = Collector::new(&api, &config.collector)
        .with_progress(color)
        .collect_all(&terms)
        .await;

    write_rows(&config.collector.output_file, &collection.rows)
        .context("Failed to write collected rows")?;
    timer.finish_with_count(collection.rows.len());

    let stats = &collection.stats;
    info!(
        "Pages fetched: {}, items filtered by date: {}, retries: {}",
        stats.pages_fetched, stats.items_filtered, stats.retries
    );
    if stats.terms_truncated > 0 {
        println!(
            "{}",
            format_warning(&format!(
                "{} search term(s) stopped early after a failed page",
                stats.terms_truncated
            ))
        );
    }
    println!(
        "{}",
        format_success(&format!(
            "Saved {} items to '{}'",
            collection.rows.len(),
            config.collector.output_file.display()
        ))
    );

    Ok(())
}

async fn cmd_download(
    mut config: Config,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    image_dir: Option<PathBuf>,
    color: bool,
) -> Result<()> {
    if let Some(input) = input {
        config.downloader.input_file = input;
    }
    if let Some(output) = output {
        config.downloader.output_file = output;
    }
    if let Some(image_dir) = image_dir {
        config.downloader.image_dir = image_dir;
    }

    let downloader_config = &config.downloader;
    Validator::validate_file_path(&downloader_config.input_file)?;

    let mut table = Table::read(&downloader_config.input_file).with_context(|| {
        format!(
            "Failed to read {}",
            downloader_config.input_file.display()
        )
    })?;
    info!(
        "Loaded {} rows from {}",
        table.len(),
        downloader_config.input_file.display()
    );

    let http = build_http_client(downloader_config.request_timeout())?;
    let source = HttpImageSource::new(http);

    let timer = OperationTimer::new("download");
    let stats = Downloader::new(&source, downloader_config)
        .with_progress(color)
        .enrich(&mut table)
        .await?;
    timer.finish_with_count(stats.downloaded);

    table
        .write(&downloader_config.output_file)
        .context("Failed to write enriched table")?;

    if stats.failed > 0 {
        println!(
            "{}",
            format_warning(&format!("{} image(s) could not be downloaded", stats.failed))
        );
    }
    println!(
        "{}",
        format_success(&format!(
            "Downloaded images and saved CSV to '{}' ({} of {} rows have an image)",
            downloader_config.output_file.display(),
            stats.with_path(),
            table.len()
        ))
    );

    Ok(())
}
