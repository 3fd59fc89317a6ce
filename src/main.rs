mod csv;
mod errors;
mod extract;
mod fetch;
mod page;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::extract::CardRecord;
use crate::fetch::{Engine, Fetcher};

#[derive(Parser)]
#[command(
    name = "cgss_scraper",
    about = "Fetch card stat records from the Starlight Stage wiki into one CSV"
)]
struct Cli {
    /// File with one card name per line (UTF-8)
    src_file: PathBuf,

    /// Browser engine behind the WebDriver endpoint (chrome, edge, firefox)
    #[arg(short, long, default_value = "chrome")]
    engine: String,

    /// Output CSV path
    #[arg(short, long, default_value = "./result.csv")]
    output_path: PathBuf,

    /// Look cards up under their exact name instead of the upgraded
    /// ＋-suffixed variant
    #[arg(long)]
    exact_card: bool,

    /// Log failed cards and continue instead of aborting the whole batch
    #[arg(long)]
    skip_errors: bool,

    /// WebDriver endpoint (default depends on the engine)
    #[arg(long)]
    webdriver_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    // Engine must be valid before anything touches the network.
    let engine: Engine = cli.engine.parse()?;
    let webdriver_url = cli
        .webdriver_url
        .clone()
        .unwrap_or_else(|| engine.default_webdriver_url().to_string());

    let cards = read_card_list(&cli.src_file)?;

    let records = if cards.is_empty() {
        // An empty batch still produces the output file, header included.
        println!("No card names in {}", cli.src_file.display());
        Vec::new()
    } else {
        println!("Configuring WebDriver ({} via {})...", engine, webdriver_url);
        let fetcher = Fetcher::connect(engine, &webdriver_url).await?;

        println!("Looking up {} cards...", cards.len());
        let result = run_batch(&fetcher, &cards, cli.exact_card, cli.skip_errors).await;

        // The session is released on every exit path, early aborts included.
        if let Err(e) = fetcher.close().await {
            warn!("Failed to quit WebDriver session: {e}");
        }
        result?
    };

    let header = extract::schema::header();
    let rows: Vec<Vec<String>> = records.iter().map(CardRecord::csv_cells).collect();
    csv::write_table(&cli.output_path, &header, &rows)?;
    println!(
        "Wrote {} records to {}",
        records.len(),
        cli.output_path.display()
    );

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

/// Resolve and extract each card in input order, one session, one at a time.
/// Default policy: the first failure halts the batch. With `skip_errors` the
/// failure is logged and the card is omitted from the table.
async fn run_batch(
    fetcher: &Fetcher,
    cards: &[String],
    exact_card: bool,
    skip_errors: bool,
) -> anyhow::Result<Vec<CardRecord>> {
    let pb = ProgressBar::new(cards.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut records = Vec::with_capacity(cards.len());
    let mut skipped = 0usize;

    for card in cards {
        let query = request_key(card, exact_card);
        pb.set_message(query.clone());

        let outcome = lookup_card(fetcher, card, &query).await;
        match apply_error_policy(card, outcome, skip_errors) {
            Ok(Some(record)) => {
                info!("{}", query);
                records.push(record);
            }
            Ok(None) => skipped += 1,
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    if skipped > 0 {
        warn!("Skipped {} of {} cards", skipped, cards.len());
    }
    Ok(records)
}

/// One card's fate under the batch error policy: a record to append, a
/// logged skip, or an error that halts the whole batch.
fn apply_error_policy(
    card: &str,
    outcome: anyhow::Result<CardRecord>,
    skip_errors: bool,
) -> anyhow::Result<Option<CardRecord>> {
    match outcome {
        Ok(record) => Ok(Some(record)),
        Err(e) if skip_errors => {
            warn!("Skipping {}: {:#}", card, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

async fn lookup_card(fetcher: &Fetcher, card: &str, query: &str) -> anyhow::Result<CardRecord> {
    let page = fetcher.fetch(query).await?;
    let record = extract::assemble(&page, card)?;
    Ok(record)
}

/// The wiki names upgraded-card pages with a trailing ＋; that variant is
/// the default lookup key unless the caller asked for the exact name.
fn request_key(card: &str, exact_card: bool) -> String {
    if exact_card {
        card.to_string()
    } else {
        format!("{}＋", card)
    }
}

fn read_card_list(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read card list {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
