// src/reconcile.rs
//! Reconciler: upsert one record into a keyed tab.
//!
//! The key column is matched whole-cell and case-sensitively. One match is
//! overwritten in place, none appends. More than one match is refused and the
//! tab is left as it was.

use crate::assemble::SinkRecord;
use crate::config::consts::KEY_COL;
use crate::error::ReconcileError;
use crate::store::Sink;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Updated(usize),
    Appended(usize),
}

impl Outcome {
    pub fn row(&self) -> usize {
        match *self {
            Outcome::Updated(r) | Outcome::Appended(r) => r,
        }
    }
}

pub fn reconcile<S: Sink + ?Sized>(sink: &mut S, key: &str, record: &SinkRecord) -> Result<Outcome, ReconcileError> {
    reconcile_at(sink, key, record, None)
}

/// Like [`reconcile`], but a new key goes into row `hint` when that row is
/// vacant (pre-formatted blank rows below the last entry).
pub fn reconcile_at<S: Sink + ?Sized>(
    sink: &mut S,
    key: &str,
    record: &SinkRecord,
    hint: Option<usize>,
) -> Result<Outcome, ReconcileError> {
    let matches = sink.find_rows(KEY_COL, key);
    let outcome = match matches.as_slice() {
        [row] => {
            sink.update_row(*row, record.cells())?;
            Outcome::Updated(*row)
        }
        [] => match hint.filter(|&h| sink.is_vacant(h)) {
            Some(row) => {
                sink.update_row(row, record.cells())?;
                Outcome::Appended(row)
            }
            None => Outcome::Appended(sink.append_row(record.cells())?),
        },
        _ => {
            return Err(ReconcileError::DuplicateKey { key: key.to_string(), rows: matches.clone() });
        }
    };
    logd!("{}: {key} {outcome:?}", sink.name());
    Ok(outcome)
}
