// tests/runner.rs
mod common;

use po_recon::approvals::{ApprovalResolver, ChainStyle};
use po_recon::config::options::EnumerateOptions;
use po_recon::progress::{NullProgress, Progress};
use po_recon::runner::{run_enumeration, run_po_list, run_tickets, show};
use po_recon::source::{Content, SourceKind};
use po_recon::store::{Sheet, Sink};

use common::{approvals_issue, cells, po_page, shipping_issue, FakeApi, FakeSource};

const FIELD: &str = "customfield_10100";

fn enumerate_opts() -> EnumerateOptions {
    EnumerateOptions { start: None, max_consecutive_failures: 3 }
}

#[derive(Default)]
struct Recorder {
    lines: Vec<String>,
    done: usize,
}

impl Progress for Recorder {
    fn log(&mut self, msg: &str) {
        self.lines.push(msg.to_string());
    }
    fn item_done(&mut self, _key: &str, _outcome: po_recon::reconcile::Outcome, _elapsed: std::time::Duration) {
        self.done += 1;
    }
}

#[test]
fn pdf_enumeration_fills_vacant_rows_then_appends() {
    let mut sink = Sheet::with_rows(
        "NewOrders",
        vec![cells(&["PO"]), cells(&["24001"]), cells(&["", ""]), cells(&[])],
    );
    let src = FakeSource::pdfs(24002..=24004);
    let api = FakeApi::default()
        .with_issue("PUR-4321", approvals_issue(&[Some("2024-01-05T10:00:00Z")]));
    let resolver = ApprovalResolver::new(&api, FIELD, ChainStyle::MarkedNa);

    let summary =
        run_enumeration(&src, Some(&resolver), &mut sink, &enumerate_opts(), false, &mut NullProgress).unwrap();

    assert_eq!(summary.appended, 3);
    assert_eq!(summary.updated, 0);
    // two pre-formatted rows reused, one real append
    assert_eq!(sink.row_count(), 5);
    assert_eq!(sink.column(0), ["PO", "24001", "24002", "24003", "24004"]);

    let row = sink.row(2).unwrap();
    assert_eq!(row.len(), 7 + 4 + 3);
    assert_eq!(&row[7..11], ["", "", "", ""]);
    assert_eq!(&row[11..], ["01-05-2024", "", ""]);
    assert_eq!(api.issue_calls.get(), 3);
}

#[test]
fn noc_pdf_rows_carry_the_na_marker() {
    let mut sink = Sheet::with_rows("NewOrders", vec![cells(&["24001"])]);
    let src = FakeSource::new(SourceKind::PdfForm)
        .with("24002", Content::Lines(common::po_text(24002, "19876")));
    let api = FakeApi::default();
    let resolver = ApprovalResolver::new(&api, FIELD, ChainStyle::MarkedNa);

    run_enumeration(&src, Some(&resolver), &mut sink, &enumerate_opts(), false, &mut NullProgress).unwrap();
    assert_eq!(&sink.row(1).unwrap()[11..], ["", "NA", ""]);
    assert_eq!(api.issue_calls.get(), 0);
}

#[test]
fn rerunning_an_enumeration_changes_nothing() {
    let mut sink = Sheet::with_rows("NewOrders", vec![cells(&["24001"])]);
    let src = FakeSource::pdfs(24002..=24003);
    let api = FakeApi::default();
    let resolver = ApprovalResolver::new(&api, FIELD, ChainStyle::MarkedNa);

    run_enumeration(&src, Some(&resolver), &mut sink, &enumerate_opts(), false, &mut NullProgress).unwrap();
    let after_first = sink.clone();
    let second =
        run_enumeration(&src, Some(&resolver), &mut sink, &enumerate_opts(), false, &mut NullProgress).unwrap();
    assert_eq!(second.appended + second.updated, 0);
    assert_eq!(sink, after_first);
}

#[test]
fn dry_run_writes_nothing() {
    let mut sink = Sheet::with_rows("PoResults", vec![cells(&["24001"])]);
    let src = FakeSource::new(SourceKind::HtmlForm).with("24002", Content::Markup(po_page("4321")));
    let mut progress = Recorder::default();

    let summary = run_enumeration(&src, None, &mut sink, &enumerate_opts(), true, &mut progress).unwrap();
    assert_eq!(summary.appended, 0);
    assert_eq!(sink.row_count(), 1);
    assert_eq!(progress.lines.len(), 1);
    assert!(progress.lines[0].starts_with("24002 | 01/02/2024 | PUR-4321"));
}

#[test]
fn malformed_ticket_row_gets_defaults_and_no_lookup() {
    let mut sink = Sheet::with_rows("PoResults", vec![cells(&["24001"])]);
    let src = FakeSource::new(SourceKind::HtmlForm)
        .with("24002", Content::Markup(po_page("TBD")))
        .with("24003", Content::Markup(po_page("4400")));
    let api = FakeApi::default();
    let resolver = ApprovalResolver::new(&api, FIELD, ChainStyle::Blank);

    let summary =
        run_enumeration(&src, Some(&resolver), &mut sink, &enumerate_opts(), false, &mut NullProgress).unwrap();
    assert_eq!(summary.appended, 2);
    let row = sink.row(1).unwrap();
    assert_eq!(row[0], "24002");
    assert_eq!(row[2], po_recon::specs::parc::PO_MISSING);
    assert_eq!(&row[7..], ["", "", ""]);
    // only the well-formed PUR ticket is looked up
    assert_eq!(api.issue_calls.get(), 1);
}

#[test]
fn po_list_writes_placeholders_for_absent_pages() {
    let mut sink = Sheet::with_rows("PoResults", vec![cells(&["24001", "old"])]);
    let src = FakeSource::new(SourceKind::HtmlForm)
        .with("24001", Content::Markup(po_page("12000")))
        .failing_on("24003");
    let ids = cells(&["24001", "24002", "24003"]);
    let mut progress = Recorder::default();

    let summary = run_po_list(&ids, &src, None, &mut sink, &mut progress).unwrap();
    assert_eq!((summary.updated, summary.appended, summary.placeholders, summary.skipped), (1, 1, 1, 1));
    assert_eq!(progress.done, 2);
    assert_eq!(sink.row(0).unwrap()[2], "NOC-12000");
    assert_eq!(sink.row(1).unwrap(), ["24002", "No result"]);
}

#[test]
fn tickets_reconcile_into_both_tabs() {
    let api = FakeApi::default()
        .with_search(&["IVC-1", "IVC-2", "IVC-3"])
        .with_issue("IVC-1", shipping_issue("IVC-1"))
        .with_issue("IVC-3", shipping_issue("IVC-3"));
    let mut main = Sheet::with_rows("OutboundShipping", vec![cells(&["IVC-3", "stale"])]);
    let mut ship = Sheet::new("ShipDate");

    let summary = run_tickets(&api, "project = IVC", &mut main, &mut ship, &mut NullProgress).unwrap();
    assert_eq!(summary.placeholders, 1);
    assert_eq!(main.column(0), ["IVC-3", "IVC-1", "IVC-2"]);
    assert_eq!(main.row(0).unwrap()[7], "Shipped");
    assert_eq!(main.row(2).unwrap(), ["IVC-2", "No result"]);
    assert_eq!(ship.column(0), ["IVC-1", "IVC-3"]);
    assert_eq!(ship.row(0).unwrap(), ["IVC-1", "1Z999AA10123456784", "UC_Davis_Main"]);
}

#[test]
fn show_assembles_without_a_sink() {
    let src = FakeSource::new(SourceKind::HtmlForm).with("24002", Content::Markup(po_page("4321")));
    let api = FakeApi::default().with_issue(
        "PUR-4321",
        approvals_issue(&[Some("2024-01-05T10:00:00Z"), Some("2024-01-09T08:30:00Z")]),
    );
    let resolver = ApprovalResolver::new(&api, FIELD, ChainStyle::Blank);

    let row = show(&src, Some(&resolver), "24002").unwrap();
    assert_eq!(row.len(), 10);
    assert_eq!(&row.cells()[7..], ["01-05-2024", "01-09-2024", ""]);
    assert_eq!(show(&src, Some(&resolver), "9").unwrap().cells(), ["9", "No result"]);
}
