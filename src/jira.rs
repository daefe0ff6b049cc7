// src/jira.rs
//! Ticketing-system client.
//!
//! Two calls are needed: fetch one issue's fields and run a JQL search.
//! Both sit behind [`TicketApi`] so the resolver and the ticket pipeline can be
//! driven by a fake in tests.

use std::env;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::config::consts::SEARCH_PAGE_SIZE;
use crate::config::options::TicketingOptions;
use crate::core::net::{with_retry, RetryPolicy};
use crate::error::{NetError, TicketError};

pub trait TicketApi {
    /// Issue document for `key`, limited to `fields` (all fields when empty).
    /// `Ok(None)` when the issue does not exist.
    fn issue(&self, key: &str, fields: &[&str]) -> Result<Option<Value>, TicketError>;

    /// Issue keys matching `jql`, in the order the server returns them.
    fn search(&self, jql: &str) -> Result<Vec<String>, TicketError>;
}

pub struct JiraClient<'a> {
    http: &'a Client,
    base: String,
    user: String,
    password: String,
    retry: RetryPolicy,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPage {
    #[serde(default)]
    start_at: usize,
    #[serde(default)]
    total: usize,
    #[serde(default)]
    issues: Vec<IssueKey>,
}

#[derive(Deserialize)]
struct IssueKey {
    key: String,
}

impl<'a> JiraClient<'a> {
    pub fn new(http: &'a Client, base: &str, user: String, password: String, retry: RetryPolicy) -> Self {
        Self { http, base: base.trim_end_matches('/').to_string(), user, password, retry }
    }

    /// Credentials come from the environment variables named in the options.
    pub fn from_env(http: &'a Client, opts: &TicketingOptions, retry: RetryPolicy) -> Result<Self, TicketError> {
        let user = env::var(&opts.user_env).map_err(|_| TicketError::Credentials(opts.user_env.clone()))?;
        let password = env::var(&opts.password_env)
            .map_err(|_| TicketError::Credentials(opts.password_env.clone()))?;
        Ok(Self::new(http, &opts.url, user, password, retry))
    }

    fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Option<Value>, NetError> {
        with_retry(&self.retry, url, || {
            let resp = self
                .http
                .get(url)
                .basic_auth(&self.user, Some(&self.password))
                .query(query)
                .send()?;
            match resp.status() {
                StatusCode::NOT_FOUND => Ok(None),
                s if s.is_success() => Ok(Some(resp.json::<Value>()?)),
                s => Err(NetError::Status { status: s.as_u16(), url: url.to_string() }),
            }
        })
    }
}

impl TicketApi for JiraClient<'_> {
    fn issue(&self, key: &str, fields: &[&str]) -> Result<Option<Value>, TicketError> {
        let url = format!("{}/rest/api/2/issue/{}", self.base, key);
        let mut query = Vec::new();
        if !fields.is_empty() {
            query.push(("fields", fields.join(",")));
        }
        Ok(self.get_json(&url, &query)?)
    }

    fn search(&self, jql: &str) -> Result<Vec<String>, TicketError> {
        let url = format!("{}/rest/api/2/search", self.base);
        let mut keys = Vec::new();
        let mut start = 0usize;
        loop {
            let query = [
                ("jql", jql.to_string()),
                ("fields", s!("key")),
                ("startAt", start.to_string()),
                ("maxResults", SEARCH_PAGE_SIZE.to_string()),
            ];
            let body = self
                .get_json(&url, &query)?
                .ok_or_else(|| TicketError::Shape(s!("search endpoint returned 404")))?;
            let page: SearchPage = serde_json::from_value(body)?;
            let got = page.issues.len();
            keys.extend(page.issues.into_iter().map(|i| i.key));
            start = page.start_at + got;
            if got == 0 || start >= page.total {
                break;
            }
        }
        logd!("search returned {} keys", keys.len());
        Ok(keys)
    }
}
