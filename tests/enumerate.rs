// tests/enumerate.rs
mod common;

use po_recon::enumerate::{Enumerator, Step};
use po_recon::error::EnumerateError;
use po_recon::source::{Content, SourceKind};
use po_recon::store::Sheet;

use common::{cells, po_page, FakeSource};

fn tab_ending_at(last: &str) -> Sheet {
    Sheet::with_rows(
        "NewOrders",
        vec![cells(&["PO", "Date"]), cells(&["24000", "x"]), cells(&[last, "y"]), cells(&["", ""])],
    )
}

fn found_ids(en: &mut Enumerator<'_>, sink: &Sheet) -> Vec<u64> {
    en.scan(sink)
        .map(|step| match step.unwrap() {
            Step::Found(d) => d.id,
            Step::Skipped { id, .. } => panic!("{id} skipped"),
        })
        .collect()
}

#[test]
fn yields_every_id_up_to_the_first_absent_one() {
    let sink = tab_ending_at("24001");
    let src = FakeSource::pdfs(24002..=24004);
    let mut en = Enumerator::start(&src, &sink, None, 3).unwrap();

    assert_eq!(found_ids(&mut en, &sink), vec![24002, 24003, 24004]);
    // one probe past the end, and nothing after it
    assert_eq!(src.fetched(), ["24002", "24003", "24004", "24005"]);
    assert!(en.next_step(&sink).unwrap().is_none());
    assert_eq!(src.fetched().len(), 4);
}

#[test]
fn nothing_new_yields_nothing() {
    let sink = tab_ending_at("24001");
    let src = FakeSource::new(SourceKind::PdfForm);
    let mut en = Enumerator::start(&src, &sink, None, 3).unwrap();
    assert!(found_ids(&mut en, &sink).is_empty());
}

#[test]
fn predecessor_row_is_reported() {
    let sink = tab_ending_at("24001");
    let src = FakeSource::pdfs([24002]);
    let mut en = Enumerator::start(&src, &sink, None, 3).unwrap();
    match en.next_step(&sink).unwrap() {
        Some(Step::Found(d)) => {
            assert_eq!(d.after_row, Some(2));
            assert_eq!(d.slot_hint(), Some(3));
        }
        other => panic!("unexpected step: {other:?}"),
    }
}

#[test]
fn html_sentinel_ends_the_scan() {
    let sink = tab_ending_at("24001");
    let src = FakeSource::new(SourceKind::HtmlForm)
        .with("24002", Content::Markup(po_page("4321")))
        .with("24003", Content::Markup(po_page("")))
        .with("24004", Content::Markup(po_page("4400")));
    let mut en = Enumerator::start(&src, &sink, None, 3).unwrap();
    assert_eq!(found_ids(&mut en, &sink), vec![24002]);
    assert_eq!(src.fetched().len(), 2);
}

#[test]
fn malformed_ticket_does_not_end_the_scan() {
    let sink = tab_ending_at("24001");
    let src = FakeSource::new(SourceKind::HtmlForm)
        .with("24002", Content::Markup(po_page("4321")))
        .with("24003", Content::Markup(po_page("TBD")))
        .with("24004", Content::Markup(po_page("4400")));
    let mut en = Enumerator::start(&src, &sink, None, 3).unwrap();
    assert_eq!(found_ids(&mut en, &sink), vec![24002, 24003, 24004]);
    assert_eq!(src.fetched().len(), 4);
}

#[test]
fn largest_key_has_no_successor() {
    let sink = tab_ending_at(&u64::MAX.to_string());
    let src = FakeSource::new(SourceKind::PdfForm);
    let err = Enumerator::start(&src, &sink, None, 3).err();
    assert!(matches!(err, Some(EnumerateError::KeyExhausted { last: u64::MAX, .. })));

    let src = FakeSource::pdfs([u64::MAX]);
    let mut en = Enumerator::start(&src, &Sheet::new("Empty"), Some(u64::MAX), 3).unwrap();
    assert_eq!(found_ids(&mut en, &sink), vec![u64::MAX]);
    assert_eq!(src.fetched().len(), 1);
}

#[test]
fn start_falls_back_when_the_last_key_is_not_numeric() {
    let sink = tab_ending_at("PO Not Found");
    let src = FakeSource::pdfs([500]);
    let mut en = Enumerator::start(&src, &sink, Some(500), 3).unwrap();
    assert_eq!(en.cursor(), 500);
    assert_eq!(found_ids(&mut en, &sink), vec![500]);

    let err = Enumerator::start(&src, &Sheet::new("Empty"), None, 3).err();
    assert!(matches!(err, Some(EnumerateError::NoStart { tab }) if tab == "Empty"));
}

#[test]
fn fetch_failures_are_skipped_until_the_cap() {
    let sink = tab_ending_at("24001");
    let src = FakeSource::pdfs([24002, 24004]).failing_on("24003");
    let mut en = Enumerator::start(&src, &sink, None, 3).unwrap();

    let steps: Vec<Step> = en.scan(&sink).map(Result::unwrap).collect();
    assert_eq!(steps.len(), 3);
    assert!(matches!(steps[1], Step::Skipped { id: 24003, .. }));
    assert!(matches!(&steps[2], Step::Found(d) if d.id == 24004 && d.after_row.is_none()));

    let src = FakeSource::new(SourceKind::PdfForm).failing_on("24002").failing_on("24003");
    let mut en = Enumerator::start(&src, &sink, None, 2).unwrap();
    assert!(matches!(en.next_step(&sink), Ok(Some(Step::Skipped { id: 24002, .. }))));
    assert!(matches!(
        en.next_step(&sink),
        Err(EnumerateError::TooManyFailures { id: 24003, count: 2, .. })
    ));
    assert!(en.next_step(&sink).unwrap().is_none());
}
