// src/runner.rs
//! The row loop.
//!
//! Setup (open listing, pick the period, show all rows, capture rows) must
//! succeed or the run fails with nothing written. After that, every failure is
//! contained at the row boundary: the row is logged, recorded in the summary
//! and skipped, and the loop moves on. Each extracted row is flushed before
//! the next one starts. A failed flush does not undo the row: it stays in the
//! dataset, counts as processed, and goes out with the next flush that works.

use crate::{
    browser::{Browser, Locator},
    config::ScrapeOptions,
    error::{ScrapeError, StoreError},
    navigator::{ListingRow, Navigator},
    progress::Progress,
    specs::{rollcall, FieldExtractor, ParseReport},
    store::{Dataset, TableSink},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowFailure {
    pub index: usize,
    pub row_text: String,
    pub reason: String,
}

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub year: i32,
    pub period: String,
    pub rows_seen: usize,
    pub failures: Vec<RowFailure>,
    /// Roll-call warnings (skipped pairs, parity anomalies) across all rows.
    pub warnings: usize,
    /// Rows whose flush failed. Their data is still in `dataset`.
    pub flush_failures: Vec<RowFailure>,
    pub dataset: Dataset,
}

impl RunSummary {
    pub fn rows_ok(&self) -> usize {
        self.rows_seen - self.failures.len()
    }
}

/// Scrape every listing row for `opts.year`, flushing to `sink` after each row.
pub fn run<B: Browser>(
    browser: B,
    opts: &ScrapeOptions,
    sink: &mut dyn TableSink,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, ScrapeError> {
    let mut nav = Navigator::new(browser, opts)?;

    nav.open_listing()?;
    let period = nav.select_period(opts.year)?;
    if let Err(e) = nav.select_show_all() {
        tracing::warn!("{e}; continuing with the rows on the first page");
    }
    let rows = nav.rows()?;
    tracing::info!("{} listing rows for {}", rows.len(), opts.year);

    if let Some(p) = progress.as_deref_mut() {
        p.begin(rows.len());
    }

    let mut summary = RunSummary {
        year: opts.year,
        period,
        rows_seen: rows.len(),
        failures: Vec::new(),
        warnings: 0,
        flush_failures: Vec::new(),
        dataset: Dataset::new(),
    };

    for row in &rows {
        match process_row(&mut nav, row, &opts.selectors.roll_call, &mut summary.dataset, opts.year, sink) {
            Ok(done) => {
                tracing::info!(
                    "row {}: vote {}: {} positions, {} new members",
                    row.index, done.vote_number, done.report.appended, done.report.new_members
                );
                summary.warnings += done.report.warnings.len();
                if let Err(e) = done.flushed {
                    tracing::warn!("row {}: {e}; kept for the next flush", row.index);
                    summary.flush_failures.push(RowFailure {
                        index: row.index,
                        row_text: row.text.clone(),
                        reason: format!("flush failed: {e}"),
                    });
                }
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(row.index, &done.vote_number);
                }
            }
            Err(e) => {
                tracing::warn!("row {} ({}) skipped: {e}", row.index, row.text);
                let reason = e.to_string();
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(row.index, &reason);
                }
                summary.failures.push(RowFailure { index: row.index, row_text: row.text.clone(), reason });
            }
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    tracing::info!(
        "done: {}/{} rows, {} votes, {} members, {} attendance rows, {} warnings, {} failed flushes",
        summary.rows_ok(),
        summary.rows_seen,
        summary.dataset.votes().len(),
        summary.dataset.members().len(),
        summary.dataset.attendance().len(),
        summary.warnings,
        summary.flush_failures.len()
    );
    Ok(summary)
}

struct RowDone {
    vote_number: String,
    report: ParseReport,
    flushed: Result<(), StoreError>,
}

/// Open → extract → append → flush → return. The detail view returns to the
/// listing on every path out of here. Errors before the append skip the row.
fn process_row<B: Browser>(
    nav: &mut Navigator<B>,
    row: &ListingRow,
    roll_call: &Locator,
    dataset: &mut Dataset,
    year: i32,
    sink: &mut dyn TableSink,
) -> Result<RowDone, ScrapeError> {
    let view = nav.open_row(row)?;

    let vote = FieldExtractor::new(view.browser()).vote_record()?;
    if vote.vote_number.is_empty() {
        tracing::warn!("row {}: detail view has no vote number", row.index);
    }

    let fragment = match view.browser().locate(roll_call)? {
        Some(el) => el.html,
        None => {
            tracing::warn!("row {}: no roll-call fragment at {roll_call}", row.index);
            s!()
        }
    };

    let mut attendance = Vec::new();
    let report = rollcall::parse(&fragment, &vote.vote_number, dataset.members_mut(), &mut attendance);

    let vote_number = vote.vote_number.clone();
    dataset.append_vote(vote);
    dataset.append_attendance(attendance);
    let flushed = dataset.flush(year, sink);

    if let Err(e) = view.close() {
        tracing::warn!("row {}: {e}", row.index);
    }
    Ok(RowDone { vote_number, report, flushed })
}
