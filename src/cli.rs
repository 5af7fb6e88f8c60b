// src/cli.rs
use std::path::PathBuf;

use clap::Parser;

use crate::browser::chrome::ChromeBrowser;
use crate::config::{consts::CONFIG_FILE, ExportFormat, FileConfig, ScrapeOptions};
use crate::progress::Progress;
use crate::runner::{self, RunSummary};
use crate::store::CsvSink;

/// Scrape roll-call votes for one year into three CSV/TSV tables.
#[derive(Debug, Parser)]
#[command(name = "rollcall", version, about)]
pub struct Cli {
    /// Config file (missing file = defaults)
    #[arg(long, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Year to scrape; overrides YEAR in the config
    #[arg(long, env = "YEAR")]
    pub year: Option<i32>,

    /// Output directory
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Output format: csv or tsv
    #[arg(long)]
    pub format: Option<ExportFormat>,

    /// Show the browser window
    #[arg(long)]
    pub headful: bool,

    /// Chromium-family browser binary (Chrome, Chromium, Brave)
    #[arg(long)]
    pub browser: Option<PathBuf>,
}

impl Cli {
    /// Config file first, command-line flags on top.
    pub fn resolve(&self) -> Result<ScrapeOptions, crate::error::ConfigError> {
        let mut file = FileConfig::load(&self.config)?;
        if let Some(y) = self.year { file.year = Some(y); }
        if let Some(o) = &self.out { file.out_dir = Some(o.clone()); }
        if let Some(f) = self.format { file.format = Some(f); }
        if self.headful { file.headless = Some(false); }
        if let Some(b) = &self.browser { file.browser_path = Some(b.clone()); }
        ScrapeOptions::from_config(&file)
    }
}

/// Progress lines on stderr.
struct StderrProgress {
    total: usize,
    done: usize,
}

impl Progress for StderrProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        eprintln!("{total} votes listed");
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_done(&mut self, index: usize, vote_number: &str) {
        self.done += 1;
        eprintln!("[{}/{}] row {index}: vote {vote_number}", self.done, self.total);
    }
    fn item_failed(&mut self, index: usize, reason: &str) {
        self.done += 1;
        eprintln!("[{}/{}] row {index} skipped: {reason}", self.done, self.total);
    }
}

pub fn run() -> color_eyre::Result<()> {
    let cli = Cli::parse();
    let opts = cli.resolve()?;

    let browser = ChromeBrowser::launch(opts.headless, opts.browser_path.clone())?;
    let mut sink = CsvSink::new(&opts.out_dir, opts.format);
    let mut progress = StderrProgress { total: 0, done: 0 };

    let summary = runner::run(browser, &opts, &mut sink, Some(&mut progress))?;
    report(&summary, &opts, &mut progress);
    Ok(())
}

fn report(summary: &RunSummary, opts: &ScrapeOptions, progress: &mut dyn Progress) {
    progress.log(&format!(
        "{}: {}/{} rows, {} votes, {} senators, {} positions, {} warnings → {}",
        summary.period,
        summary.rows_ok(),
        summary.rows_seen,
        summary.dataset.votes().len(),
        summary.dataset.members().len(),
        summary.dataset.attendance().len(),
        summary.warnings,
        opts.out_dir.display()
    ));
    for f in &summary.failures {
        progress.log(&format!("  skipped row {} ({}): {}", f.index, f.row_text, f.reason));
    }
    for f in &summary.flush_failures {
        progress.log(&format!("  row {} ({}): {}", f.index, f.row_text, f.reason));
    }
}
