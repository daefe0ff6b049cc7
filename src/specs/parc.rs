// src/specs/parc.rs
//! Spec for the HTML purchase-order print page.
//!
//! The page is a label/value layout: each value sits a fixed number of nodes
//! after its label in document order (a whitespace node usually sits between
//! a label cell and the value cell). The grand total is found by its class.
//!
//! A PO number the system does not know still renders the page, with an empty
//! ticket number. That empty ticket is the "no such PO" signal.

use crate::engine::{FieldAnchor, FieldTable, Marker, Post, Slice};
use crate::source::SourceKind;

use super::*;

/// Default of the ticket field; doubles as the enumeration sentinel.
pub const PO_MISSING: &str = "PO Does not currently exist";

const WS: &str = "\r\n ";

pub static TABLE: FieldTable = FieldTable {
    kind: SourceKind::HtmlForm,
    anchors: ANCHORS,
    sentinel: Some(TICKET),
};

const ANCHORS: &[FieldAnchor] = &[
    FieldAnchor {
        field: PO_NUMBER,
        marker: Marker::Identifier,
        slice: Slice::Whole,
        strip: &[],
        post: Post::None,
        default: "",
    },
    FieldAnchor {
        field: DATE,
        marker: Marker::Text("DATE:"),
        slice: Slice::NextElement(2),
        strip: &[WS],
        post: Post::None,
        default: "Date Not Found",
    },
    FieldAnchor {
        field: TICKET,
        marker: Marker::Text("RT NUMBER:"),
        slice: Slice::NextElement(2),
        strip: &[WS],
        post: Post::TicketRef,
        default: PO_MISSING,
    },
    FieldAnchor {
        field: REQUESTOR,
        marker: Marker::Text("Requested By"),
        slice: Slice::NextElement(1),
        // ticket prefix and digits first, then the separator
        strip: &["PUR-1234567890", ": "],
        post: Post::None,
        default: "Ordered By Not Found",
    },
    FieldAnchor {
        field: SEGMENT,
        marker: Marker::Text("Goods/Services for:"),
        slice: Slice::NextElement(1),
        strip: &[" "],
        post: Post::None,
        default: "Segment Not Found",
    },
    FieldAnchor {
        field: VENDOR,
        marker: Marker::Text("Vendor Information:"),
        slice: Slice::NextElement(2),
        strip: &[WS],
        post: Post::None,
        default: "Vendor Not Found",
    },
    FieldAnchor {
        field: GRAND_TOTAL,
        marker: Marker::Class("grandtotalline"),
        slice: Slice::NextElement(1),
        // the label text, layout whitespace and the currency sign
        strip: &["\r\n GRANDTOL$"],
        post: Post::None,
        default: "Grand Total Not Found",
    },
];
