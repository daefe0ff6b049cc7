// tests/extract_ticket.rs
mod common;

use serde_json::json;

use po_recon::assemble::{self, Layout};
use po_recon::runner::build_row;
use po_recon::source::{Content, RawDocument, SourceKind};
use po_recon::specs::{self, ivc};

use common::shipping_issue;

fn issue(key: &str, value: serde_json::Value) -> RawDocument {
    RawDocument::new(SourceKind::Ticket, key, Content::Json(value))
}

#[test]
fn shipping_ticket_fields() {
    let rec = specs::extract(&issue("IVC-101", shipping_issue("IVC-101"))).unwrap();
    let values: Vec<&str> = rec.values().collect();
    assert_eq!(
        values,
        [
            "IVC-101",
            "UC_Davis_Main",
            "2x SFP-10G-LR",
            "01-05-2024",
            "Jane Roe",
            "Overnight",
            "1Z999AA10123456784",
            "Shipped",
        ]
    );
}

#[test]
fn arrival_falls_back_to_the_date_field() {
    let mut value = shipping_issue("IVC-102");
    value["fields"]["customfield_11600"] = serde_json::Value::Null;
    let rec = specs::extract(&issue("IVC-102", value)).unwrap();
    assert_eq!(rec.get(ivc::ARRIVAL), Some("2024-01-10"));
}

#[test]
fn sparse_ticket_uses_defaults() {
    let value = json!({ "key": "IVC-103", "fields": { "created": "not a date", "status": null } });
    let rec = specs::extract(&issue("IVC-103", value)).unwrap();
    assert_eq!(rec.get(ivc::KEY), Some("IVC-103"));
    assert_eq!(rec.get(ivc::SITE), Some("Site Not Found"));
    assert_eq!(rec.get(ivc::ITEMS), Some(""));
    assert_eq!(rec.get(ivc::CREATED), Some("Created Not Found"));
    assert_eq!(rec.get(ivc::STATUS), Some("Status Not Found"));
    assert_eq!(rec.get(ivc::TRACKING), Some(""));
}

#[test]
fn tickets_have_no_approval_columns() {
    let rec = specs::extract(&issue("IVC-101", shipping_issue("IVC-101"))).unwrap();
    let row = build_row(&rec, None);
    assert_eq!(row.len(), ivc::TABLE.anchors.len());
    assert_eq!(row.key(), "IVC-101");
    assert_eq!(Layout::for_kind(SourceKind::Ticket).blanks, 0);
}

#[test]
fn ship_date_projection() {
    let rec = specs::extract(&issue("IVC-101", shipping_issue("IVC-101"))).unwrap();
    let row = assemble::ship_date_row(&rec);
    assert_eq!(row.cells(), &["IVC-101", "1Z999AA10123456784", "UC_Davis_Main"]);
}

#[test]
fn missing_key_is_replaced_by_the_identifier() {
    let rec = specs::extract(&issue("IVC-104", json!({ "fields": {} }))).unwrap();
    assert_eq!(rec.get(ivc::KEY), Some("No ticket"));
    assert_eq!(build_row(&rec, None).key(), "IVC-104");
}
