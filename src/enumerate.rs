// src/enumerate.rs
//! Sequential Enumerator: discover new documents by counting up from the
//! sink's last key until the source says "no such document".
//!
//! The enumerator only reads the sink. The caller reconciles each discovery
//! before asking for the next step, so the predecessor of every new id is
//! already in the tab when its row is looked up.

use crate::config::consts::KEY_COL;
use crate::engine::ExtractedRecord;
use crate::error::{EnumerateError, SourceError};
use crate::source::SourceAdapter;
use crate::specs;
use crate::store::Sink;

#[derive(Debug)]
pub struct Discovery {
    pub id: u64,
    pub record: ExtractedRecord,
    /// Row holding `id - 1`, if the predecessor is in the tab
    pub after_row: Option<usize>,
}

impl Discovery {
    /// Row the new record should go into when it is vacant.
    pub fn slot_hint(&self) -> Option<usize> {
        self.after_row.map(|r| r + 1)
    }
}

#[derive(Debug)]
pub enum Step {
    Found(Discovery),
    /// Fetch failed after retries; the id is passed over
    Skipped { id: u64, error: SourceError },
}

pub struct Enumerator<'a> {
    adapter: &'a dyn SourceAdapter,
    cursor: u64,
    failures: usize,
    max_failures: usize,
    done: bool,
}

impl<'a> Enumerator<'a> {
    /// Resume after the last numeric key of `sink`. With no numeric key,
    /// start at `fallback`.
    pub fn start<S: Sink + ?Sized>(
        adapter: &'a dyn SourceAdapter,
        sink: &S,
        fallback: Option<u64>,
        max_failures: usize,
    ) -> Result<Self, EnumerateError> {
        let last = sink.last_populated(KEY_COL).and_then(|(_, v)| v.parse::<u64>().ok());
        let cursor = match (last, fallback) {
            (Some(l), _) => l
                .checked_add(1)
                .ok_or_else(|| EnumerateError::KeyExhausted { tab: sink.name().to_string(), last: l })?,
            (None, Some(f)) => f,
            (None, None) => return Err(EnumerateError::NoStart { tab: sink.name().to_string() }),
        };
        logf!("{}: enumerating {} from {cursor}", sink.name(), adapter.kind());
        Ok(Self { adapter, cursor, failures: 0, max_failures: max_failures.max(1), done: false })
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// `Ok(None)` once the source reports absence or its sentinel.
    pub fn next_step<S: Sink + ?Sized>(&mut self, sink: &S) -> Result<Option<Step>, EnumerateError> {
        if self.done {
            return Ok(None);
        }
        let id = self.cursor;
        let doc = match self.adapter.fetch(&id.to_string()) {
            Ok(doc) => doc,
            Err(error) => {
                self.advance();
                self.failures += 1;
                if self.failures >= self.max_failures {
                    self.done = true;
                    return Err(EnumerateError::TooManyFailures { id, count: self.failures, source: error });
                }
                loge!("{} {id}: skipped after fetch failure: {error}", self.adapter.kind());
                return Ok(Some(Step::Skipped { id, error }));
            }
        };

        if !doc.present {
            logf!("{} {id}: absent, enumeration complete", self.adapter.kind());
            self.done = true;
            return Ok(None);
        }

        let record = match specs::extract(&doc) {
            Ok(r) => r,
            Err(e) => {
                self.done = true;
                return Err(e.into());
            }
        };
        if record.is_sentinel() {
            logf!("{} {id}: sentinel, enumeration complete", self.adapter.kind());
            self.done = true;
            return Ok(None);
        }
        for (field, miss) in record.misses() {
            logw!("{} {id}: {field} defaulted ({miss:?})", self.adapter.kind());
        }

        self.failures = 0;
        self.advance();
        let after_row = id
            .checked_sub(1)
            .and_then(|prev| sink.find_rows(KEY_COL, &prev.to_string()).first().copied());
        Ok(Some(Step::Found(Discovery { id, record, after_row })))
    }

    /// Step past the current id; the last representable id ends the scan.
    fn advance(&mut self) {
        match self.cursor.checked_add(1) {
            Some(next) => self.cursor = next,
            None => self.done = true,
        }
    }

    /// Iterate without writing anything; for dry runs.
    pub fn scan<'e, S: Sink + ?Sized>(&'e mut self, sink: &'e S) -> Scan<'e, 'a, S> {
        Scan { inner: self, sink }
    }
}

pub struct Scan<'e, 'a, S: ?Sized> {
    inner: &'e mut Enumerator<'a>,
    sink: &'e S,
}

impl<S: Sink + ?Sized> Iterator for Scan<'_, '_, S> {
    type Item = Result<Step, EnumerateError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next_step(self.sink).transpose()
    }
}
