// src/runner.rs
//! The three pipelines, wired from the components:
//!
//! - enumeration (PDF or HTML): count up from the tab's last PO number;
//! - PO list (HTML): a given list of PO numbers, absent ones get a placeholder;
//! - tickets: a JQL search, each ticket written to two tabs.
//!
//! Everything is sequential. One identifier is fetched, extracted, resolved
//! and reconciled before the next is fetched.

use std::time::{Duration, Instant};

use crate::approvals::ApprovalResolver;
use crate::assemble::{self, Layout, SinkRecord};
use crate::config::options::EnumerateOptions;
use crate::engine::ExtractedRecord;
use crate::enumerate::{Enumerator, Step};
use crate::error::{ReconcileError, Result};
use crate::jira::TicketApi;
use crate::progress::Progress;
use crate::reconcile::{self, Outcome};
use crate::source::{SourceAdapter, TicketSource};
use crate::specs;
use crate::store::Sink;

/// Counts for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub updated: usize,
    pub appended: usize,
    /// Absent identifiers written as a placeholder row
    pub placeholders: usize,
    /// Identifiers passed over after a fetch or key failure
    pub skipped: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    fn count(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Updated(_) => self.updated += 1,
            Outcome::Appended(_) => self.appended += 1,
        }
    }
}

/// Assemble the sink row for an extracted record, resolving approvals when
/// the kind's layout has them.
pub fn build_row(record: &ExtractedRecord, resolver: Option<&ApprovalResolver<'_>>) -> SinkRecord {
    let layout = Layout::for_kind(record.kind());
    let chain = match (layout.approvals, resolver) {
        (true, Some(r)) => Some(r.resolve_text(record.get(specs::TICKET).unwrap_or_default())),
        _ => None,
    };
    assemble::assemble(record, chain.as_ref(), layout)
}

/// Fetch, extract and assemble one identifier without touching any sink.
pub fn show(adapter: &dyn SourceAdapter, resolver: Option<&ApprovalResolver<'_>>, id: &str) -> Result<SinkRecord> {
    let doc = adapter.fetch(id)?;
    if !doc.present {
        return Ok(assemble::no_result_row(id));
    }
    let record = specs::extract(&doc)?;
    for (field, miss) in record.misses() {
        logd!("{id}: {field} {miss:?}");
    }
    Ok(build_row(&record, resolver))
}

/// Upsert one row. A duplicate key is logged and counted as skipped; any
/// other sink failure aborts the run.
fn upsert<S: Sink + ?Sized>(
    sink: &mut S,
    row: &SinkRecord,
    hint: Option<usize>,
    summary: &mut RunSummary,
    progress: &mut dyn Progress,
    started: Instant,
) -> Result<()> {
    match reconcile::reconcile_at(sink, row.key(), row, hint) {
        Ok(outcome) => {
            let elapsed = started.elapsed();
            logf!("{} {}: {outcome:?} in {} ms", sink.name(), row.key(), elapsed.as_millis());
            summary.count(outcome);
            progress.item_done(row.key(), outcome, elapsed);
            Ok(())
        }
        Err(e @ ReconcileError::DuplicateKey { .. }) => {
            loge!("{}: {e}", sink.name());
            summary.skipped += 1;
            progress.item_failed(row.key(), &e.to_string());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/* ---------------- Enumeration ---------------- */

/// Discover and reconcile new POs after the tab's last key.
/// With `dry_run`, rows are reported through `progress` and nothing is written.
pub fn run_enumeration<S: Sink + ?Sized>(
    adapter: &dyn SourceAdapter,
    resolver: Option<&ApprovalResolver<'_>>,
    sink: &mut S,
    opts: &EnumerateOptions,
    dry_run: bool,
    progress: &mut dyn Progress,
) -> Result<RunSummary> {
    let run_start = Instant::now();
    let mut summary = RunSummary::default();
    let mut en = Enumerator::start(adapter, &*sink, opts.start, opts.max_consecutive_failures)?;
    progress.begin(&format!("{} from {}", adapter.kind(), en.cursor()), None);

    while let Some(step) = en.next_step(&*sink)? {
        match step {
            Step::Skipped { id, error } => {
                summary.skipped += 1;
                progress.item_failed(&id.to_string(), &error.to_string());
            }
            Step::Found(found) => {
                let started = Instant::now();
                let row = build_row(&found.record, resolver);
                if dry_run {
                    progress.log(&row.cells().join(" | "));
                    continue;
                }
                upsert(sink, &row, found.slot_hint(), &mut summary, progress, started)?;
            }
        }
    }

    summary.elapsed = run_start.elapsed();
    progress.finish(summary.elapsed);
    Ok(summary)
}

/* ---------------- Explicit PO list ---------------- */

/// Split a PO list file: numbers separated by commas and/or whitespace.
pub fn parse_id_list(text: &str) -> Vec<String> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn run_po_list<S: Sink + ?Sized>(
    ids: &[String],
    adapter: &dyn SourceAdapter,
    resolver: Option<&ApprovalResolver<'_>>,
    sink: &mut S,
    progress: &mut dyn Progress,
) -> Result<RunSummary> {
    let run_start = Instant::now();
    let mut summary = RunSummary::default();
    progress.begin(&format!("{} list", adapter.kind()), Some(ids.len()));

    for id in ids {
        let started = Instant::now();
        let doc = match adapter.fetch(id) {
            Ok(doc) => doc,
            Err(e) => {
                loge!("{} {id}: skipped after fetch failure: {e}", adapter.kind());
                summary.skipped += 1;
                progress.item_failed(id, &e.to_string());
                continue;
            }
        };
        let row = if doc.present {
            build_row(&specs::extract(&doc)?, resolver)
        } else {
            summary.placeholders += 1;
            assemble::no_result_row(id)
        };
        upsert(sink, &row, None, &mut summary, progress, started)?;
    }

    summary.elapsed = run_start.elapsed();
    progress.finish(summary.elapsed);
    Ok(summary)
}

/* ---------------- Tickets ---------------- */

/// Reconcile every ticket matching `jql` into the main tab and the ship-date tab.
/// An absent ticket only gets a placeholder row in the main tab.
pub fn run_tickets<M, D>(
    api: &dyn TicketApi,
    jql: &str,
    main: &mut M,
    ship_dates: &mut D,
    progress: &mut dyn Progress,
) -> Result<RunSummary>
where
    M: Sink + ?Sized,
    D: Sink + ?Sized,
{
    let run_start = Instant::now();
    let mut summary = RunSummary::default();
    let keys = api.search(jql)?;
    progress.begin("tickets", Some(keys.len()));
    let source = TicketSource::new(api);

    for key in &keys {
        let started = Instant::now();
        let doc = match source.fetch(key) {
            Ok(doc) => doc,
            Err(e) => {
                loge!("ticket {key}: skipped after fetch failure: {e}");
                summary.skipped += 1;
                progress.item_failed(key, &e.to_string());
                continue;
            }
        };
        if !doc.present {
            summary.placeholders += 1;
            upsert(main, &assemble::no_result_row(key), None, &mut summary, progress, started)?;
            continue;
        }
        let record = specs::extract(&doc)?;
        upsert(main, &build_row(&record, None), None, &mut summary, progress, started)?;
        upsert(ship_dates, &assemble::ship_date_row(&record), None, &mut summary, progress, started)?;
    }

    summary.elapsed = run_start.elapsed();
    progress.finish(summary.elapsed);
    Ok(summary)
}
