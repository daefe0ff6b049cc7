// src/config/options.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::consts::*;
use crate::core::net::RetryPolicy;
use crate::error::ConfigError;

/// Everything a run needs, loaded once and passed down explicitly.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub ticketing: TicketingOptions,
    pub html: HtmlOptions,
    pub pdf: PdfOptions,
    pub sink: SinkOptions,
    pub net: NetOptions,
    pub enumerate: EnumerateOptions,
    pub log: LogOptions,
}

impl Options {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let opts = Self::from_toml(&text)?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.html.url_template.contains("{id}") {
            return Err(ConfigError::Invalid(s!("html.url_template must contain {id}")));
        }
        if !self.pdf.stem_template.contains("{id}") {
            return Err(ConfigError::Invalid(s!("pdf.stem_template must contain {id}")));
        }
        if self.net.max_attempts == 0 {
            return Err(ConfigError::Invalid(s!("net.max_attempts must be at least 1")));
        }
        if self.net.timeout_secs == 0 {
            return Err(ConfigError::Invalid(s!("net.timeout_secs must be greater than 0")));
        }
        if self.enumerate.max_consecutive_failures == 0 {
            return Err(ConfigError::Invalid(s!(
                "enumerate.max_consecutive_failures must be at least 1"
            )));
        }
        let tabs = &self.sink.tabs;
        for (name, tab) in [
            ("orders", &tabs.orders),
            ("parc", &tabs.parc),
            ("shipping", &tabs.shipping),
            ("ship_date", &tabs.ship_date),
        ] {
            if tab.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("sink.tabs.{name} is empty")));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketingOptions {
    pub url: String,
    /// Environment variable holding the user name
    pub user_env: String,
    /// Environment variable holding the password or API token
    pub password_env: String,
    pub approvals_field: String,
    pub shipping_jql: String,
}

impl Default for TicketingOptions {
    fn default() -> Self {
        Self {
            url: s!(TICKETING_URL),
            user_env: s!(USER_ENV),
            password_env: s!(PASSWORD_ENV),
            approvals_field: s!(APPROVALS_FIELD),
            shipping_jql: s!(SHIPPING_JQL),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlOptions {
    pub url_template: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self { url_template: s!(PO_PAGE_URL) }
    }
}

impl HtmlOptions {
    pub fn url_for(&self, id: &str) -> String {
        self.url_template.replace("{id}", id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfOptions {
    pub dir: PathBuf,
    /// File stem without extension; `.txt` and `.pdf` are tried in that order
    pub stem_template: String,
    pub pdftotext: String,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(PDF_DIR),
            stem_template: s!(PDF_STEM),
            pdftotext: s!(PDFTOTEXT),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkFormat {
    #[default]
    Csv,
    Tsv,
}

impl SinkFormat {
    pub fn ext(&self) -> &'static str {
        match self { SinkFormat::Csv => "csv", SinkFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> char {
        match self { SinkFormat::Csv => ',', SinkFormat::Tsv => '\t' }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkOptions {
    pub dir: PathBuf,
    pub format: SinkFormat,
    pub tabs: TabNames,
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(STORE_DIR),
            format: SinkFormat::Csv,
            tabs: TabNames::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabNames {
    pub orders: String,
    pub parc: String,
    pub shipping: String,
    pub ship_date: String,
}

impl Default for TabNames {
    fn default() -> Self {
        Self {
            orders: s!(ORDERS_TAB),
            parc: s!(PARC_TAB),
            shipping: s!(SHIPPING_TAB),
            ship_date: s!(SHIP_DATE_TAB),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetOptions {
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: u32,
}

impl Default for NetOptions {
    fn default() -> Self {
        Self {
            timeout_secs: TIMEOUT_SECS,
            max_attempts: MAX_ATTEMPTS,
            initial_delay_ms: INITIAL_DELAY_MS,
            max_delay_ms: MAX_DELAY_MS,
            multiplier: BACKOFF_MULTIPLIER,
        }
    }
}

impl NetOptions {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_delay_ms: self.initial_delay_ms,
            max_delay_ms: self.max_delay_ms,
            multiplier: self.multiplier,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerateOptions {
    /// First identifier to try when the sink has no numeric key yet
    pub start: Option<u64>,
    pub max_consecutive_failures: usize,
}

impl Default for EnumerateOptions {
    fn default() -> Self {
        Self { start: None, max_consecutive_failures: MAX_CONSECUTIVE_FAILURES }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    /// `None` logs to stderr
    pub file: Option<PathBuf>,
    pub filter: String,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self { file: Some(PathBuf::from(LOG_FILE)), filter: s!(LOG_FILTER) }
    }
}
