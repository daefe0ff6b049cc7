// tests/common/mod.rs
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use serde_json::{json, Value};

use po_recon::error::{SourceError, TicketError};
use po_recon::jira::TicketApi;
use po_recon::source::{Content, RawDocument, SourceAdapter, SourceKind};

/* ---------------- Fixtures ---------------- */

pub fn po_page(ticket: &str) -> String {
    format!(
        "<html><head><title>PO</title></head><body>\n\
         <div><span>DATE:</span>\n<span>\n   01/02/2024\n</span></div>\n\
         <div><span>RT NUMBER:</span>\n<span>\n   {ticket}\n</span></div>\n\
         <div><span>Requested By</span><span>PUR-{ticket}: Jane Roe</span></div>\n\
         <div><span>Goods/Services for:</span><span> Backbone </span></div>\n\
         <div><span>Vendor Information:</span>\n<span>\n   Acme Networks\n</span></div>\n\
         <div class=\"grandtotalline\">\n   GRAND TOTAL\n   $ 1,234.50\n</div>\n\
         </body></html>"
    )
}

pub const PO_TEXT: &str = "\
CENIC
PURCHASE ORDER 24005
La Mirada, CA 90638 16700 Valley View, Suite 168 01/15/2024
CENIC CENIC PUR-4321
Deliver To: Jane Roe TERMS Net 30
Goods/Services for: Backbone
Vendor: Acme Networks Requested By Jane Roe
GRAND TOTAL: $1,234.50 Disc 0.00
";

/// First-page text for PO `id` pointing at `ticket`.
pub fn po_text(id: u64, ticket: &str) -> String {
    PO_TEXT
        .replace("24005", &id.to_string())
        .replace("PUR-4321", ticket)
}

pub fn shipping_issue(key: &str) -> Value {
    json!({
        "key": key,
        "fields": {
            "customfield_11507": "U.C. Davis Main",
            "customfield_11516": "2x SFP-10G-LR",
            "created": "2024-01-05T10:00:00.000-0800",
            "reporter": { "displayName": "Jane Roe" },
            "customfield_11600": { "value": "Overnight" },
            "customfield_11505": "2024-01-10",
            "customfield_11509": "1Z999AA10123456784",
            "status": { "name": "Shipped" }
        }
    })
}

pub fn approvals_issue(dates: &[Option<&str>]) -> Value {
    let steps: Vec<Value> = dates
        .iter()
        .map(|d| match d {
            Some(iso) => json!({ "completedDate": { "iso8601": iso } }),
            None => json!({ "name": "pending step" }),
        })
        .collect();
    json!({ "fields": { "customfield_10100": steps } })
}

/* ---------------- Fake ticketing system ---------------- */

#[derive(Default)]
pub struct FakeApi {
    pub issues: HashMap<String, Value>,
    pub failing: HashSet<String>,
    pub keys: Vec<String>,
    pub issue_calls: Cell<usize>,
}

impl FakeApi {
    pub fn with_issue(mut self, key: &str, issue: Value) -> Self {
        self.issues.insert(key.to_string(), issue);
        self
    }

    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    pub fn with_search(mut self, keys: &[&str]) -> Self {
        self.keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }
}

impl TicketApi for FakeApi {
    fn issue(&self, key: &str, _fields: &[&str]) -> Result<Option<Value>, TicketError> {
        self.issue_calls.set(self.issue_calls.get() + 1);
        if self.failing.contains(key) {
            return Err(TicketError::Shape(format!("{key}: service unavailable")));
        }
        Ok(self.issues.get(key).cloned())
    }

    fn search(&self, _jql: &str) -> Result<Vec<String>, TicketError> {
        Ok(self.keys.clone())
    }
}

/* ---------------- Fake document source ---------------- */

pub struct FakeSource {
    pub kind: SourceKind,
    pub docs: HashMap<String, Content>,
    pub failing: HashSet<String>,
    pub fetched: RefCell<Vec<String>>,
}

impl FakeSource {
    pub fn new(kind: SourceKind) -> Self {
        Self { kind, docs: HashMap::new(), failing: HashSet::new(), fetched: RefCell::new(Vec::new()) }
    }

    /// PDF text for every id in `ids`.
    pub fn pdfs(ids: impl IntoIterator<Item = u64>) -> Self {
        let mut src = Self::new(SourceKind::PdfForm);
        for id in ids {
            src.docs.insert(id.to_string(), Content::Lines(po_text(id, "PUR-4321")));
        }
        src
    }

    pub fn with(mut self, id: &str, content: Content) -> Self {
        self.docs.insert(id.to_string(), content);
        self
    }

    pub fn failing_on(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }
}

impl SourceAdapter for FakeSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn fetch(&self, id: &str) -> Result<RawDocument, SourceError> {
        self.fetched.borrow_mut().push(id.to_string());
        if self.failing.contains(id) {
            return Err(SourceError::Pdf { path: PathBuf::from(id), reason: "timed out".into() });
        }
        Ok(match self.docs.get(id) {
            Some(content) => RawDocument::new(self.kind, id, content.clone()),
            None => RawDocument::absent(self.kind, id),
        })
    }
}

pub fn cells(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
