// src/assemble.rs
//! Record Assembler: extracted fields + approvals → one sheet row.
//!
//! Pure reshaping. Each kind writes to a sheet whose historical layout is
//! fixed: the extracted fields in declaration order, a run of blank columns
//! filled in by hand downstream, then the approval dates.

use crate::approvals::ApprovalChain;
use crate::config::consts::{KEY_COL, NO_RESULT};
use crate::engine::{ExtractedRecord, FieldStatus};
use crate::source::SourceKind;
use crate::specs::ivc;

/// Column layout of one kind's sheet, after the extracted fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub blanks: usize,
    pub approvals: bool,
}

impl Layout {
    pub fn for_kind(kind: SourceKind) -> Self {
        match kind {
            SourceKind::PdfForm => Layout { blanks: 4, approvals: true },
            SourceKind::HtmlForm => Layout { blanks: 0, approvals: true },
            SourceKind::Ticket => Layout { blanks: 0, approvals: false },
        }
    }
}

/// One row as written to the sink. Column 0 is the natural key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SinkRecord(Vec<String>);

impl SinkRecord {
    pub fn new(cells: Vec<String>) -> Self {
        Self(cells)
    }

    pub fn key(&self) -> &str {
        self.0.get(KEY_COL).map_or("", String::as_str)
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for SinkRecord {
    fn from(cells: Vec<String>) -> Self {
        Self(cells)
    }
}

/// Fields, then `layout.blanks` empty cells, then the three approval dates.
/// A layout with approvals but no chain gets three empty cells. When the key
/// field fell back to its default, the identifier is written in its place.
pub fn assemble(record: &ExtractedRecord, approvals: Option<&ApprovalChain>, layout: Layout) -> SinkRecord {
    let mut cells: Vec<String> = record.values().map(String::from).collect();
    let key_missing = record
        .fields()
        .get(KEY_COL)
        .is_some_and(|f| f.status != FieldStatus::Extracted);
    if key_missing {
        cells[KEY_COL] = record.identifier().to_string();
    }
    cells.extend(std::iter::repeat_n(s!(), layout.blanks));
    if layout.approvals {
        match approvals {
            Some(chain) => cells.extend(chain.to_cells()),
            None => cells.extend(std::iter::repeat_n(s!(), 3)),
        }
    }
    SinkRecord(cells)
}

/// Ship-date tab projection of a ticket record.
pub fn ship_date_row(record: &ExtractedRecord) -> SinkRecord {
    SinkRecord(
        ivc::SHIP_DATE_FIELDS
            .iter()
            .map(|f| record.get(f).unwrap_or_default().to_string())
            .collect(),
    )
}

/// Row written when the identifier has no document at all.
pub fn no_result_row(key: &str) -> SinkRecord {
    SinkRecord(row![key, NO_RESULT])
}
