// src/store.rs
//! The sink: keyed tabs of rows.
//!
//! [`Sink`] is the whole surface the reconciler and enumerator need. [`Sheet`]
//! keeps a tab in memory; [`CsvTab`] is a sheet that writes itself back to
//! `<dir>/<tab>.<ext>` after every change. A [`Workbook`] hands out tabs from
//! one directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::options::SinkFormat;
use crate::csv;
use crate::error::SinkError;

pub trait Sink {
    fn name(&self) -> &str;
    fn rows(&self) -> &[Vec<String>];
    fn update_row(&mut self, idx: usize, cells: &[String]) -> Result<(), SinkError>;
    /// Returns the new row's index.
    fn append_row(&mut self, cells: &[String]) -> Result<usize, SinkError>;

    fn row_count(&self) -> usize {
        self.rows().len()
    }

    fn row(&self, idx: usize) -> Option<&[String]> {
        self.rows().get(idx).map(Vec::as_slice)
    }

    fn cell(&self, idx: usize, col: usize) -> Option<&str> {
        self.row(idx).and_then(|r| r.get(col)).map(String::as_str)
    }

    /// Rows whose cell in `col` is exactly `value` (whole cell, case-sensitive).
    fn find_rows(&self, col: usize, value: &str) -> Vec<usize> {
        self.rows()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.get(col).is_some_and(|c| c == value))
            .map(|(i, _)| i)
            .collect()
    }

    fn column(&self, col: usize) -> Vec<&str> {
        self.rows()
            .iter()
            .map(|r| r.get(col).map_or("", String::as_str))
            .collect()
    }

    /// Last row with a non-blank cell in `col`, and that cell.
    fn last_populated(&self, col: usize) -> Option<(usize, &str)> {
        self.rows().iter().enumerate().rev().find_map(|(i, r)| {
            r.get(col)
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .map(|c| (i, c))
        })
    }

    /// Row exists and every cell in it is blank.
    fn is_vacant(&self, idx: usize) -> bool {
        self.row(idx).is_some_and(|r| r.iter().all(|c| c.trim().is_empty()))
    }
}

/* ---------------- In memory ---------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), rows: Vec::new() }
    }

    pub fn with_rows(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self { name: name.into(), rows }
    }
}

impl Sink for Sheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn update_row(&mut self, idx: usize, cells: &[String]) -> Result<(), SinkError> {
        let len = self.rows.len();
        let row = self.rows.get_mut(idx).ok_or_else(|| SinkError::RowOutOfRange {
            tab: self.name.clone(),
            row: idx,
            len,
        })?;
        *row = cells.to_vec();
        Ok(())
    }

    fn append_row(&mut self, cells: &[String]) -> Result<usize, SinkError> {
        self.rows.push(cells.to_vec());
        Ok(self.rows.len() - 1)
    }
}

/* ---------------- On disk ---------------- */

/// A tab stored as one delimited file. Every write rewrites the file.
#[derive(Debug)]
pub struct CsvTab {
    sheet: Sheet,
    path: PathBuf,
    sep: char,
}

impl CsvTab {
    pub fn load(name: &str, path: PathBuf, sep: char) -> Result<Self, SinkError> {
        let rows = match fs::read_to_string(&path) {
            Ok(text) => csv::parse_rows(&text, sep),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(SinkError::Io { path, source: e }),
        };
        logd!("tab {name}: {} rows from {}", rows.len(), path.display());
        Ok(Self { sheet: Sheet::with_rows(name, rows), path, sep })
    }

    fn save(&self) -> Result<(), SinkError> {
        let io_err = |e| SinkError::Io { path: self.path.clone(), source: e };
        // write beside the target, then swap in
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, csv::rows_to_string(self.sheet.rows(), self.sep)).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl Sink for CsvTab {
    fn name(&self) -> &str {
        self.sheet.name()
    }

    fn rows(&self) -> &[Vec<String>] {
        self.sheet.rows()
    }

    fn update_row(&mut self, idx: usize, cells: &[String]) -> Result<(), SinkError> {
        self.sheet.update_row(idx, cells)?;
        self.save()
    }

    fn append_row(&mut self, cells: &[String]) -> Result<usize, SinkError> {
        let idx = self.sheet.append_row(cells)?;
        self.save()?;
        Ok(idx)
    }
}

/// A directory of tabs, one file each.
#[derive(Clone, Debug)]
pub struct Workbook {
    dir: PathBuf,
    format: SinkFormat,
}

impl Workbook {
    /// Creates the directory if needed. Failing here aborts the run.
    pub fn open(dir: &Path, format: SinkFormat) -> Result<Self, SinkError> {
        fs::create_dir_all(dir).map_err(|e| SinkError::Io { path: dir.to_path_buf(), source: e })?;
        Ok(Self { dir: dir.to_path_buf(), format })
    }

    pub fn tab_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{}", self.format.ext()))
    }

    pub fn tab(&self, name: &str) -> Result<CsvTab, SinkError> {
        CsvTab::load(name, self.tab_path(name), self.format.delim())
    }
}
