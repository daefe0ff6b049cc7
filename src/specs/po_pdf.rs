// src/specs/po_pdf.rs
//! Spec for the first page of a purchase-order PDF, as text lines.
//!
//! Each field lives on the first line containing its marker. Slices are
//! positional because the form prints label and value on the same line.

use crate::engine::{Close, FieldAnchor, FieldTable, Marker, Post, Slice};
use crate::source::SourceKind;

use super::*;

/// Company address printed on the same line as the PO date.
pub const ADDRESS_LINE: &str = "La Mirada, CA 90638 16700 Valley View, Suite 168";

pub static TABLE: FieldTable = FieldTable {
    kind: SourceKind::PdfForm,
    anchors: ANCHORS,
    sentinel: None,
};

const ANCHORS: &[FieldAnchor] = &[
    FieldAnchor {
        field: PO_NUMBER,
        marker: Marker::Line("PURCHASE ORDER"),
        slice: Slice::Tail(5),
        strip: &[" "],
        post: Post::None,
        default: "PO Not Found",
    },
    FieldAnchor {
        field: DATE,
        marker: Marker::Line(ADDRESS_LINE),
        // address plus one separating space
        slice: Slice::Offset(ADDRESS_LINE.len() + 1),
        strip: &[" ]'"],
        post: Post::None,
        default: "Date Not Found",
    },
    FieldAnchor {
        field: TICKET,
        marker: Marker::Line("CENIC CENIC"),
        slice: Slice::Tail(7),
        strip: &[" CENIPUR-']"],
        post: Post::TicketRef,
        default: "Ticket Not Found",
    },
    FieldAnchor {
        field: REQUESTOR,
        marker: Marker::Line("Deliver To:"),
        slice: Slice::Between { open: "To:", close: &[Close::Before("TERMS")] },
        strip: &[" '"],
        post: Post::None,
        default: "Requestor Not Found",
    },
    FieldAnchor {
        field: SEGMENT,
        marker: Marker::Line("Goods/Services for:"),
        slice: Slice::Between { open: "for:", close: &[] },
        strip: &[" \t"],
        post: Post::None,
        default: "Segment Not Found",
    },
    FieldAnchor {
        field: VENDOR,
        marker: Marker::Line("Vendor:"),
        slice: Slice::Between { open: "Vendor:", close: &[Close::Before("Requested By")] },
        strip: &[" \t"],
        post: Post::None,
        default: "Vendor Not Found",
    },
    FieldAnchor {
        field: GRAND_TOTAL,
        marker: Marker::Line("GRAND TOTAL:"),
        slice: Slice::Between {
            open: "$",
            close: &[Close::Before("Disc"), Close::BackOff("CENIC", 6)],
        },
        strip: &[" )']$"],
        post: Post::None,
        default: "Grand Total Not Found",
    },
];
