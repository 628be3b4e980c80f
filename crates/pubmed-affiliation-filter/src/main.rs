//! PubMed Affiliation Filter - Entry Point
//!
//! Searches PubMed and prints (or saves) the papers with company-affiliated authors.

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pubmed_affiliation_filter::{
    AppError, FilterOptions, PubMedClient,
    classifier::default_classifier,
    config::Config,
    formatters,
    models::OutputFormat,
    pipeline::{self, FilterReport},
};

#[derive(Parser, Debug)]
#[command(name = "pubmed-affiliation-filter")]
#[command(about = "Fetch PubMed papers with authors from pharmaceutical and biotech companies")]
#[command(version)]
struct Cli {
    /// PubMed search query (full PubMed query syntax is supported)
    query: String,

    /// Write results to this file (CSV unless --format json)
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// Output format (default: text on the console, CSV for files)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Minimum number of distinct companies per paper
    #[arg(long, default_value_t = 1)]
    min_companies: usize,

    /// Contact e-mail required by NCBI E-utilities
    #[arg(long, env = "NCBI_EMAIL")]
    email: Option<String>,

    /// NCBI API key (optional, enables higher rate limits)
    #[arg(long, env = "NCBI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Maximum number of PubMed results to fetch
    #[arg(long, default_value_t = 100)]
    max_results: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn write_output(
    report: &FilterReport,
    format: OutputFormat,
    file: Option<&Path>,
) -> Result<(), AppError> {
    let records = &report.accepted;

    match (format, file) {
        (OutputFormat::Json, Some(path)) => {
            let body = serde_json::to_string_pretty(&formatters::papers_json(records))?;
            std::fs::write(path, body)?;
        }
        (_, Some(path)) => formatters::write_csv_file(records, path)?,
        (OutputFormat::Csv, None) => formatters::write_csv(records, std::io::stdout().lock())?,
        (OutputFormat::Json, None) => {
            println!("{}", serde_json::to_string_pretty(&formatters::papers_json(records))?);
        }
        (OutputFormat::Text, None) => print!("{}", formatters::format_papers_text(records)),
    }

    if let Some(path) = file {
        println!("Results saved to {}", path.display());
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::new(cli.email.unwrap_or_default(), cli.api_key)?;
    let client = PubMedClient::new(config)?;

    let options = FilterOptions {
        query: cli.query,
        min_companies: cli.min_companies,
        max_results: cli.max_results,
    };

    // Machine-readable output on stdout keeps the status lines on stderr.
    let format = OutputFormat::resolve(cli.format, cli.file.is_some());
    let status = |line: &str| {
        if format == OutputFormat::Text || cli.file.is_some() {
            println!("{line}");
        } else {
            eprintln!("{line}");
        }
    };

    status(&format!("Query: {}", options.query));
    status("Searching PubMed...");

    let report = pipeline::run(&client, default_classifier(), &options).await?;
    status(&report.summary());

    if report.accepted.is_empty() {
        return Ok(());
    }

    write_output(&report, format, cli.file.as_deref())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.debug { "debug".to_string() } else { cli.log_level.clone() };
    init_tracing(&log_level, cli.json_logs);

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        min_companies = cli.min_companies,
        max_results = cli.max_results,
        "Starting PubMed affiliation filter"
    );

    run(cli).await.map_err(|e| anyhow::anyhow!(e.to_user_message()))
}
