// src/specs/ivc.rs
//! Spec for an inventory-control (outbound shipping) ticket.
//!
//! Markers are JSON pointers into the issue document. Arrival prefers the
//! delivery-speed choice and falls back to the free arrival date.

use crate::engine::{FieldAnchor, FieldTable, Marker, Post, Slice};
use crate::source::SourceKind;

pub const KEY: &str = "Ticket";
pub const SITE: &str = "Site";
pub const ITEMS: &str = "Items";
pub const CREATED: &str = "Created";
pub const REQUESTOR: &str = "Requestor";
pub const ARRIVAL: &str = "Arrival";
pub const TRACKING: &str = "Tracking";
pub const STATUS: &str = "Status";

/// Columns of the ship-date tab, in order.
pub const SHIP_DATE_FIELDS: &[&str] = &[KEY, TRACKING, SITE];

pub static TABLE: FieldTable = FieldTable {
    kind: SourceKind::Ticket,
    anchors: ANCHORS,
    sentinel: None,
};

// Pointer literals must stay in step with the custom-field ids in config::consts.
const ANCHORS: &[FieldAnchor] = &[
    FieldAnchor {
        field: KEY,
        marker: Marker::Pointer(&["/key"]),
        slice: Slice::Whole,
        strip: &[],
        post: Post::None,
        default: "No ticket",
    },
    FieldAnchor {
        field: SITE,
        marker: Marker::Pointer(&["/fields/customfield_11507"]),
        slice: Slice::Whole,
        strip: &[" "],
        post: Post::SiteKey,
        default: "Site Not Found",
    },
    FieldAnchor {
        field: ITEMS,
        marker: Marker::Pointer(&["/fields/customfield_11516"]),
        slice: Slice::Whole,
        strip: &[],
        post: Post::None,
        default: "",
    },
    FieldAnchor {
        field: CREATED,
        marker: Marker::Pointer(&["/fields/created"]),
        slice: Slice::Whole,
        strip: &[],
        post: Post::SheetDate,
        default: "Created Not Found",
    },
    FieldAnchor {
        field: REQUESTOR,
        marker: Marker::Pointer(&["/fields/reporter/displayName"]),
        slice: Slice::Whole,
        strip: &[],
        post: Post::None,
        default: "Requestor Not Found",
    },
    FieldAnchor {
        field: ARRIVAL,
        marker: Marker::Pointer(&["/fields/customfield_11600/value", "/fields/customfield_11505"]),
        slice: Slice::Whole,
        strip: &[],
        post: Post::None,
        default: "",
    },
    FieldAnchor {
        field: TRACKING,
        marker: Marker::Pointer(&["/fields/customfield_11509"]),
        slice: Slice::Whole,
        strip: &[],
        post: Post::None,
        default: "",
    },
    FieldAnchor {
        field: STATUS,
        marker: Marker::Pointer(&["/fields/status/name"]),
        slice: Slice::Whole,
        strip: &[],
        post: Post::None,
        default: "Status Not Found",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::consts::*;

    #[test]
    fn pointers_match_configured_field_ids() {
        let pointers: Vec<&str> = ANCHORS
            .iter()
            .flat_map(|a| match a.marker {
                Marker::Pointer(p) => p.to_vec(),
                _ => vec![],
            })
            .collect();
        for id in [SITE_NAME_FIELD, ITEMS_FIELD, TRACKING_FIELD, ARRIVAL_FIELD, DELIVERY_SPEED_FIELD] {
            assert!(pointers.iter().any(|p| p.contains(id)), "no pointer for {id}");
        }
    }
}
