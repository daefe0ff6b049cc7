// src/specs/mod.rs
//! # Extraction specs
//!
//! One module per source kind. Each spec is a fixed [`FieldTable`] that says
//! *where the ground truth lives* in that kind of document and what to write
//! when it is not there.
//!
//! ## What lives here
//! - The anchor tables: markers, slices, trim sets and defaults.
//! - The output field order for each kind (it is the sheet's column order).
//! - The sentinel field, when a kind signals "no such document" in-band.
//!
//! ## What does **not** live here
//! - Fetching (see `source`), approvals (see `approvals`), column layout
//!   (see `assemble`), or anything that touches the sink.
//!
//! ## Conventions
//! - Anchors are case- and whitespace-sensitive. The first match in document
//!   order wins; a page that legitimately repeats a label yields whichever
//!   copy comes first.
//! - Missing or empty values never abort: the field takes its default and the
//!   reason is kept on the field (`FieldStatus::Defaulted`).
//! - Money and ticket numbers stay text here.
//!
//! ## Current specs
//! - `parc`   – HTML purchase-order print page.
//! - `po_pdf` – first-page text of a purchase-order PDF.
//! - `ivc`    – inventory-control ticket (JSON issue document).

use crate::engine::{self, ExtractedRecord, FieldTable};
use crate::error::ExtractionError;
use crate::source::{RawDocument, SourceKind};

pub mod ivc;
pub mod parc;
pub mod po_pdf;

// Purchase-order field names, shared by the HTML and PDF kinds
pub const PO_NUMBER: &str = "PONumber";
pub const DATE: &str = "Date";
pub const TICKET: &str = "TicketRef";
pub const REQUESTOR: &str = "Requestor";
pub const SEGMENT: &str = "Segment";
pub const VENDOR: &str = "Vendor";
pub const GRAND_TOTAL: &str = "GrandTotal";

pub fn table_for(kind: SourceKind) -> &'static FieldTable {
    match kind {
        SourceKind::HtmlForm => &parc::TABLE,
        SourceKind::PdfForm => &po_pdf::TABLE,
        SourceKind::Ticket => &ivc::TABLE,
    }
}

/// Field Extractor entry point: pick the table for the document's kind and run it.
pub fn extract(doc: &RawDocument) -> Result<ExtractedRecord, ExtractionError> {
    engine::extract(table_for(doc.kind), doc)
}
