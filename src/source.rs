// src/source.rs
//! Source adapters: fetch the raw content for one identifier.
//!
//! Three kinds of document exist. An adapter only fetches; it never looks for
//! fields. When the upstream says the identifier does not exist the adapter
//! returns a document with `present == false` rather than an error.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::options::{HtmlOptions, PdfOptions};
use crate::core::net::{self, RetryPolicy};
use crate::error::{ExtractionError, SourceError};
use crate::jira::TicketApi;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Ticket,
    HtmlForm,
    PdfForm,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Ticket => "ticket",
            SourceKind::HtmlForm => "html",
            SourceKind::PdfForm => "pdf",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ticket" | "ivc" => Ok(SourceKind::Ticket),
            "html" | "parc" => Ok(SourceKind::HtmlForm),
            "pdf" => Ok(SourceKind::PdfForm),
            other => Err(ExtractionError::UnknownKind(other.to_string())),
        }
    }
}

/// What came back from the source, before any field is located.
#[derive(Clone, Debug)]
pub enum Content {
    /// Rendered HTML page
    Markup(String),
    /// Plain text, one form line per text line
    Lines(String),
    /// Structured issue document
    Json(Value),
    Empty,
}

impl Content {
    pub fn shape(&self) -> &'static str {
        match self {
            Content::Markup(_) => "markup",
            Content::Lines(_) => "text",
            Content::Json(_) => "json",
            Content::Empty => "empty",
        }
    }
}

#[derive(Clone, Debug)]
pub struct RawDocument {
    pub kind: SourceKind,
    pub identifier: String,
    pub content: Content,
    pub present: bool,
}

impl RawDocument {
    pub fn new(kind: SourceKind, identifier: impl Into<String>, content: Content) -> Self {
        Self { kind, identifier: identifier.into(), content, present: true }
    }

    pub fn absent(kind: SourceKind, identifier: impl Into<String>) -> Self {
        Self { kind, identifier: identifier.into(), content: Content::Empty, present: false }
    }
}

pub trait SourceAdapter {
    fn kind(&self) -> SourceKind;
    fn fetch(&self, id: &str) -> Result<RawDocument, SourceError>;
}

/* ---------------- HTML purchase-order page ---------------- */

pub struct HtmlSource<'a> {
    client: &'a Client,
    opts: HtmlOptions,
    retry: RetryPolicy,
}

impl<'a> HtmlSource<'a> {
    pub fn new(client: &'a Client, opts: HtmlOptions, retry: RetryPolicy) -> Self {
        Self { client, opts, retry }
    }
}

impl SourceAdapter for HtmlSource<'_> {
    fn kind(&self) -> SourceKind { SourceKind::HtmlForm }

    fn fetch(&self, id: &str) -> Result<RawDocument, SourceError> {
        let url = self.opts.url_for(id);
        logd!("GET {url}");
        Ok(match net::get_text(self.client, &url, &self.retry)? {
            Some(body) => RawDocument::new(SourceKind::HtmlForm, id, Content::Markup(body)),
            None => RawDocument::absent(SourceKind::HtmlForm, id),
        })
    }
}

/* ---------------- PDF purchase-order form ---------------- */

/// First-page text of `<dir>/<stem>.pdf`, or a ready-made `<stem>.txt` dump.
pub struct PdfSource {
    opts: PdfOptions,
}

impl PdfSource {
    pub fn new(opts: PdfOptions) -> Self {
        Self { opts }
    }

    fn stem_path(&self, id: &str, ext: &str) -> PathBuf {
        let stem = self.opts.stem_template.replace("{id}", id);
        self.opts.dir.join(format!("{stem}.{ext}"))
    }

    fn first_page_text(&self, pdf: &Path) -> Result<String, SourceError> {
        let out = Command::new(&self.opts.pdftotext)
            .args(["-f", "1", "-l", "1", "-raw"])
            .arg(pdf)
            .arg("-")
            .output()
            .map_err(|e| SourceError::Io { path: pdf.to_path_buf(), source: e })?;
        if !out.status.success() {
            return Err(SourceError::Pdf {
                path: pdf.to_path_buf(),
                reason: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

impl SourceAdapter for PdfSource {
    fn kind(&self) -> SourceKind { SourceKind::PdfForm }

    fn fetch(&self, id: &str) -> Result<RawDocument, SourceError> {
        let dump = self.stem_path(id, "txt");
        match fs::read_to_string(&dump) {
            Ok(text) => return Ok(RawDocument::new(SourceKind::PdfForm, id, Content::Lines(text))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(SourceError::Io { path: dump, source: e }),
        }

        let pdf = self.stem_path(id, "pdf");
        if !pdf.is_file() {
            logd!("no PO file for {id} at {}", pdf.display());
            return Ok(RawDocument::absent(SourceKind::PdfForm, id));
        }
        let text = self.first_page_text(&pdf)?;
        Ok(RawDocument::new(SourceKind::PdfForm, id, Content::Lines(text)))
    }
}

/* ---------------- Inventory ticket ---------------- */

pub struct TicketSource<'a> {
    api: &'a dyn TicketApi,
}

impl<'a> TicketSource<'a> {
    pub fn new(api: &'a dyn TicketApi) -> Self {
        Self { api }
    }
}

impl SourceAdapter for TicketSource<'_> {
    fn kind(&self) -> SourceKind { SourceKind::Ticket }

    fn fetch(&self, key: &str) -> Result<RawDocument, SourceError> {
        Ok(match self.api.issue(key, &[])? {
            Some(issue) => RawDocument::new(SourceKind::Ticket, key, Content::Json(issue)),
            None => RawDocument::absent(SourceKind::Ticket, key),
        })
    }
}
