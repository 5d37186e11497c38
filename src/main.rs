use std::fs;
use std::io::IsTerminal;
use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use newsscan::cli::{Cli, Commands};
use newsscan::config::Config;
use newsscan::domain::KeywordList;
use newsscan::errors::ScanResult;
use newsscan::extract::html_to_text;
use newsscan::matcher::KeywordMatcher;
use newsscan::services::{RunSummary, ScanOptions, ScanService};
use newsscan::sources::{build_client, HttpArticleFetcher, RssFeedReader};
use newsscan::storage::{CsvCorpusWriter, DryRunSink};

fn main() {
    // RUST_LOG may come from a .env file
    Config::load_dotenv();
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> ScanResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    match cli.command {
        Commands::Run { dry_run, limit } => cmd_run(&config, dry_run, limit),
        Commands::Keywords => cmd_keywords(&config),
        Commands::Scan { path, json } => cmd_scan(&config, &path, json),
    }
}

fn cmd_run(config: &Config, dry_run: bool, limit: Option<usize>) -> ScanResult<()> {
    let client = build_client(config.request_timeout, &config.user_agent)?;
    let reader = RssFeedReader::new(
        client.clone(),
        config.feed_url.clone(),
        config.base_url.clone(),
    );
    let fetcher = HttpArticleFetcher::new(client);
    let matcher = KeywordMatcher::with_default_lists(config.match_mode)?;
    let options = ScanOptions {
        max_items: limit.or(config.max_items),
        request_delay: config.request_delay,
    };

    let service = ScanService::new(reader, fetcher, matcher, options);

    println!("Fetching feed: {}\n", config.feed_url);

    // Read the feed before touching the output so a dead feed leaves the corpus alone
    let entries = service.read_feed()?;

    if dry_run {
        let mut sink = DryRunSink::from_config(config)?;
        let summary = service.process(entries, &mut sink)?;

        for (record, text_file) in sink.records() {
            println!("  [DRY RUN] [{}] {}", record.category, record.title);
            println!("    URL: {}", record.link);
            println!("    Keywords: {}", record.keywords_joined());
            println!("    File: {}", text_file.display());
        }
        println!();
        print_summary(&summary);
        println!(
            "Dry run complete. Would record {} articles.",
            summary.written
        );
        return Ok(());
    }

    let mut writer = CsvCorpusWriter::from_config(config)?;
    let summary = service.process(entries, &mut writer)?;

    print_summary(&summary);
    if summary.written > 0 {
        println!(
            "Done. {} matching articles saved to {}",
            summary.written,
            writer.csv_path().display()
        );
    } else {
        println!("No new matches found in the feed.");
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "Scanned {} entries: {} matched, {} skipped, {} duplicates, {} already recorded",
        summary.entries,
        summary.matched,
        summary.skipped(),
        summary.duplicates,
        summary.already_recorded
    );
}

fn cmd_keywords(config: &Config) -> ScanResult<()> {
    let lists = [
        ("Mental health", KeywordList::mental_health()),
        ("LGBT", KeywordList::lgbt()),
    ];

    println!("Match mode: {}\n", config.match_mode);
    for (name, list) in &lists {
        println!("{} ({} terms):", name, list.len());
        for term in list.iter() {
            println!("  {}", term);
        }
        println!();
    }

    Ok(())
}

fn cmd_scan(config: &Config, path: &Path, json: bool) -> ScanResult<()> {
    let html = fs::read_to_string(path)?;
    let text = html_to_text(&html)?;

    let matcher = KeywordMatcher::with_default_lists(config.match_mode)?;
    let hits = matcher.scan(&text);
    let category = hits.category().map(|c| c.as_str()).unwrap_or("none");

    if json {
        let value = serde_json::json!({
            "path": path.display().to_string(),
            "match_mode": matcher.mode().as_str(),
            "category": category,
            "mental_health": hits.mental_health,
            "lgbt": hits.lgbt,
            "characters": text.chars().count(),
        });
        println!("{:#}", value);
        return Ok(());
    }

    println!("{} ({} characters of text)", path.display(), text.chars().count());
    println!("  Category: {}", category);
    if hits.is_match() {
        let keywords: Vec<String> = hits.keywords().into_iter().collect();
        println!("  Keywords: {}", keywords.join(", "));
    } else {
        println!("  No relevant keywords");
    }

    Ok(())
}
