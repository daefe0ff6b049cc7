// src/engine/engine.rs
use serde_json::Value;

use crate::approvals::TicketRef;
use crate::core::html::{self, Flat, Markup};
use crate::core::{dates, sanitize};
use crate::engine::types::*;
use crate::error::ExtractionError;
use crate::source::{Content, RawDocument, SourceKind};

/// Content prepared once per document, shared by every anchor.
enum View<'d> {
    Nodes(Vec<Flat<'d>>),
    Lines(Vec<&'d str>),
    Json(&'d Value),
    Empty,
}

/// Run every anchor of `table` over `doc`. Misses fall back to defaults.
pub fn extract(table: &FieldTable, doc: &RawDocument) -> Result<ExtractedRecord, ExtractionError> {
    if doc.kind != table.kind {
        return Err(ExtractionError::ContentMismatch { kind: table.kind, found: doc.kind.as_str() });
    }

    let markup: Markup;
    let view = match (&doc.content, table.kind) {
        (Content::Markup(text), SourceKind::HtmlForm) => {
            markup = Markup::parse(text);
            View::Nodes(markup.flatten())
        }
        (Content::Lines(text), SourceKind::PdfForm) => View::Lines(text.lines().collect()),
        (Content::Json(value), SourceKind::Ticket) => View::Json(value),
        (Content::Empty, _) => View::Empty,
        (other, kind) => {
            return Err(ExtractionError::ContentMismatch { kind, found: other.shape() });
        }
    };

    let fields = table
        .anchors
        .iter()
        .map(|anchor| {
            let id = doc.identifier.as_str();
            match apply(anchor, &view, id) {
                Ok(value) => FieldValue { name: anchor.field, value, status: FieldStatus::Extracted },
                Err(miss) => {
                    logd!("{} {id}: {} defaulted ({miss:?})", table.kind, anchor.field);
                    FieldValue {
                        name: anchor.field,
                        value: s!(anchor.default),
                        status: FieldStatus::Defaulted(miss),
                    }
                }
            }
        })
        .collect();

    Ok(ExtractedRecord::new(table.kind, doc.identifier.clone(), fields, table.sentinel))
}

fn apply(anchor: &FieldAnchor, view: &View<'_>, identifier: &str) -> Result<String, Miss> {
    let raw = locate(anchor, view, identifier)?;
    let trimmed = sanitize::strip_passes(&raw, anchor.strip);
    if trimmed.is_empty() {
        return Err(Miss::EmptySlice);
    }
    match anchor.post {
        Post::None => Ok(trimmed.to_string()),
        Post::TicketRef => trimmed
            .parse::<TicketRef>()
            .map(|t| t.to_string())
            .map_err(|_| Miss::Malformed),
        Post::SheetDate => dates::sheet_date(trimmed).ok_or(Miss::Malformed),
        Post::SiteKey => Ok(sanitize::site_key(trimmed)),
    }
}

fn locate(anchor: &FieldAnchor, view: &View<'_>, identifier: &str) -> Result<String, Miss> {
    match (anchor.marker, view) {
        (Marker::Identifier, _) => Ok(identifier.to_string()),
        (Marker::Text(t), View::Nodes(nodes)) => {
            let at = html::find_text(nodes, t).ok_or(Miss::AnchorMissing)?;
            slice_nodes(nodes, at, anchor.slice)
        }
        (Marker::Class(c), View::Nodes(nodes)) => {
            let at = html::find_class(nodes, c).ok_or(Miss::AnchorMissing)?;
            slice_nodes(nodes, at, anchor.slice)
        }
        (Marker::Line(m), View::Lines(lines)) => {
            let line = lines
                .iter()
                .find(|l| l.contains(m))
                .ok_or(Miss::AnchorMissing)?
                .trim_end();
            slice_line(line, m, anchor.slice).map(str::to_string)
        }
        (Marker::Pointer(paths), View::Json(doc)) => {
            let value = paths
                .iter()
                .filter_map(|p| doc.pointer(p))
                .find(|v| !v.is_null())
                .ok_or(Miss::AnchorMissing)?;
            json_text(value)
        }
        _ => Err(Miss::AnchorMissing),
    }
}

fn slice_nodes(nodes: &[Flat<'_>], at: usize, slice: Slice) -> Result<String, Miss> {
    match slice {
        Slice::Whole => Ok(nodes[at].text()),
        Slice::NextElement(hops) => html::text_after(nodes, at, hops).ok_or(Miss::EmptySlice),
        _ => Err(Miss::Malformed),
    }
}

fn slice_line<'l>(line: &'l str, marker: &str, slice: Slice) -> Result<&'l str, Miss> {
    match slice {
        Slice::Whole => Ok(line),
        Slice::Tail(n) => Ok(sanitize::tail_chars(line, n)),
        Slice::Offset(n) => {
            let start = line.find(marker).ok_or(Miss::AnchorMissing)?;
            Ok(sanitize::skip_chars(&line[start..], n))
        }
        Slice::Between { open, close } => {
            let start = line.rfind(open).ok_or(Miss::EmptySlice)? + open.len();
            let end = close
                .iter()
                .find_map(|c| match *c {
                    Close::Before(s) => line.rfind(s),
                    Close::BackOff(s, n) => line
                        .rfind(s)
                        .map(|p| sanitize::floor_boundary(line, p.saturating_sub(n))),
                })
                .unwrap_or(line.len());
            Ok(if end > start { &line[start..end] } else { "" })
        }
        Slice::NextElement(_) => Err(Miss::Malformed),
    }
}

fn json_text(value: &Value) -> Result<String, Miss> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(Miss::AnchorMissing),
        Value::Array(_) | Value::Object(_) => Err(Miss::Malformed),
    }
}
