use crate::api::{self, Components};
use crate::services::log::ActivityLogger;
use crate::services::store::CsvStore;
use crate::ApiResponse;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "glean", version, about = "Heuristic product extraction (JSON + CSV)")]
pub struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape one product URL and print the record as JSON
    Extract(ExtractArgs),
    /// Scrape a URL list into an incrementally-written CSV
    Scrape(ScrapeArgs),
    /// Show recent activity log entries, newest first
    Logs(LogsArgs),
}

#[derive(Args)]
struct ExtractArgs {
    url: String,
}

#[derive(Args)]
struct ScrapeArgs {
    /// File with one product URL per line; blank lines and # comments skipped
    #[arg(long)]
    urls: PathBuf,
    /// Output CSV, appended to if it already exists
    #[arg(long)]
    out: PathBuf,
    /// Optional JSON-lines side-channel with structured reviews per product
    #[arg(long = "reviews-out")]
    reviews_out: Option<PathBuf>,
    /// Override the per-page settle delay in milliseconds
    #[arg(long = "settle-ms")]
    settle_ms: Option<u64>,
}

#[derive(Args)]
struct LogsArgs {
    /// Only error entries
    #[arg(long)]
    errors: bool,
    /// Only entries mentioning this host
    #[arg(long)]
    host: Option<String>,
}

pub fn run() -> crate::Result<()> {
    let cli = Cli::parse();
    let mut components = Components::default();

    match cli.cmd {
        Command::Extract(args) => {
            finish(api::scrape_url(&args.url, &components));
            Ok(())
        }
        Command::Scrape(args) => {
            if let Some(ms) = args.settle_ms {
                components.opts.fetch.settle_ms = ms;
            }
            let urls = read_url_list(&args.urls)?;
            let mut sink = CsvStore::open(&args.out, args.reviews_out.as_deref())?;
            let records = api::scrape_batch(&urls, &components, &mut sink)?;
            eprintln!(
                "scraped {} of {} urls -> {}",
                records.len(),
                urls.len(),
                args.out.display()
            );
            Ok(())
        }
        Command::Logs(args) => {
            let logger = ActivityLogger::new()?;
            for line in logger.read_logs(args.host.as_deref(), args.errors)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn read_url_list(path: &Path) -> crate::Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn finish<T: serde::Serialize>(res: crate::Result<T>) {
    match res {
        Ok(v) => print_json(ApiResponse::ok(v)),
        Err(e) => print_json(ApiResponse::<()>::err(e.to_string())),
    }
}
fn print_json<T: serde::Serialize>(val: T) {
    // pretty JSON output
    println!("{}", serde_json::to_string_pretty(&val).unwrap());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_list_skips_blanks_and_comments() {
        let path = std::env::temp_dir().join(format!("glean-urls-{}.txt", std::process::id()));
        std::fs::write(
            &path,
            "# foundations\nhttps://a.example.com/p\n\n  https://b.example.com/p  \n",
        )
        .unwrap();

        let urls = read_url_list(&path).unwrap();
        assert_eq!(
            urls,
            vec!["https://a.example.com/p", "https://b.example.com/p"]
        );

        let _ = std::fs::remove_file(&path);
    }
}
