// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};

use crate::config::consts::{LISTING_URL, MONSTER_PREFIX, REQUEST_PAUSE_MS, TIMEOUT_SECS};
use crate::config::options::{ExportOptions, ScrapeOptions};
use crate::core::net::HttpFetcher;
use crate::progress::StderrProgress;

/// Scrape the d20pfsrd bestiary into a CSV (and optionally SQLite) dataset.
#[derive(Parser, Debug)]
#[command(name = "bestiary_scrape", version, about)]
pub struct Args {
    /// Bestiary index page listing the monster pages
    #[arg(long, value_name = "URL", default_value = LISTING_URL)]
    pub listing: String,

    /// Only links under this prefix are monster pages
    #[arg(long, value_name = "URL", default_value = MONSTER_PREFIX)]
    pub prefix: String,

    /// Output CSV file, or a directory ending in `/`
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<String>,

    /// Also load the records into this SQLite database
    #[arg(long, value_name = "PATH")]
    pub sqlite: Option<PathBuf>,

    /// Keep summoned-creature pages
    #[arg(long)]
    pub include_summons: bool,

    /// Do not follow the "Subpages" block of hub pages
    #[arg(long)]
    pub no_subpages: bool,

    /// Do not fetch the feat index; count feats by commas
    #[arg(long)]
    pub no_feats: bool,

    /// Visit at most N listing entries
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Pause between requests
    #[arg(long, value_name = "MS", default_value_t = REQUEST_PAUSE_MS)]
    pub pause_ms: u64,

    /// Per-request timeout
    #[arg(long, value_name = "S", default_value_t = TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Append logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn scrape_options(&self) -> ScrapeOptions {
        ScrapeOptions {
            listing_url: self.listing.clone(),
            monster_prefix: self.prefix.clone(),
            include_summons: self.include_summons,
            follow_subpages: !self.no_subpages,
            load_feats: !self.no_feats,
            limit: self.limit,
            pause: Duration::from_millis(self.pause_ms),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        let mut export = ExportOptions::default();
        if let Some(out) = &self.out {
            export.set_path(out);
        }
        export.sqlite_path = self.sqlite.clone();
        export
    }
}

pub fn run(args: Args) -> Result<()> {
    crate::log::init(args.verbose, args.log_file.as_deref())
        .map_err(|e| eyre!("cannot set up logging: {e}"))?;

    let scrape = args.scrape_options();
    let export = args.export_options();

    let mut fetcher = HttpFetcher::new(scrape.timeout)?;
    let mut progress = StderrProgress::default();
    let report = crate::scrape::run(&scrape, &mut fetcher, Some(&mut progress))?;

    let written = crate::file::write_export(&report.records, &export)?;
    eprintln!("Wrote {} monsters to {}", written.rows, written.csv_path.display());
    if let Some(db) = &written.sqlite_path {
        eprintln!("SQLite table loaded into {}", db.display());
    }

    if report.duplicates > 0 || report.filtered > 0 {
        eprintln!(
            "Dropped {} duplicate(s) and {} third-party stat block(s)",
            report.duplicates, report.filtered
        );
    }
    if !report.failures.is_empty() {
        eprintln!("Skipped {} page(s):", report.failures.len());
        for f in &report.failures {
            eprintln!("  [{}] {}: {}", f.error.kind(), f.url, f.error);
        }
    }
    Ok(())
}
