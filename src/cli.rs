// src/cli.rs
//! Command-line front end.
//!
//! Setup happens here, once: options, logging, the HTTP client, ticketing
//! credentials and the workbook. Everything below gets them as parameters.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, WrapErr};

use crate::approvals::{ApprovalResolver, ChainStyle};
use crate::config::consts::CONFIG_FILE;
use crate::config::Options;
use crate::core::net;
use crate::jira::JiraClient;
use crate::progress::Progress;
use crate::reconcile::Outcome;
use crate::runner::{self, RunSummary};
use crate::source::{HtmlSource, PdfSource, SourceAdapter, SourceKind, TicketSource};
use crate::store::Workbook;

/// Reconcile purchase orders and inventory tickets into the tracking sheets.
#[derive(Debug, Parser)]
#[command(name = "po_recon")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log to stderr instead of the log file
    #[arg(long, global = true)]
    pub log_stderr: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Discover new PO PDFs after the last PO in the orders tab
    Pdf {
        /// Print rows instead of writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Reconcile PO pages from the purchasing site
    Parc {
        /// File of PO numbers (comma or whitespace separated)
        #[arg(short, long, conflicts_with = "enumerate")]
        input: Option<PathBuf>,

        /// Count up from the last PO in the tab instead of reading a list
        #[arg(short, long)]
        enumerate: bool,

        /// Print rows instead of writing them (enumeration only)
        #[arg(long)]
        dry_run: bool,
    },

    /// Reconcile recently updated outbound-shipping tickets
    Ivc,

    /// Fetch and print one record without touching the sheets
    Show {
        /// Source kind: pdf, parc/html or ivc/ticket
        kind: SourceKind,
        /// PO number or ticket key
        id: String,
    },
}

/// Prints one line per identifier.
struct ConsoleProgress {
    out: io::Stdout,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, label: &str, total: Option<usize>) {
        let _ = match total {
            Some(n) => writeln!(self.out, "{label}: {n} to process"),
            None => writeln!(self.out, "{label}"),
        };
    }

    fn log(&mut self, msg: &str) {
        let _ = writeln!(self.out, "{msg}");
    }

    fn item_done(&mut self, key: &str, outcome: Outcome, elapsed: Duration) {
        let what = match outcome {
            Outcome::Updated(r) => format!("updated row {}", r + 1),
            Outcome::Appended(r) => format!("added at row {}", r + 1),
        };
        let _ = writeln!(self.out, "{key}: {what} ({:.2}s)", elapsed.as_secs_f64());
    }

    fn item_failed(&mut self, key: &str, reason: &str) {
        let _ = writeln!(self.out, "{key}: skipped ({reason})");
    }

    fn finish(&mut self, elapsed: Duration) {
        let _ = writeln!(self.out, "done in {:.2}s", elapsed.as_secs_f64());
    }
}

fn load_options(cli: &Cli) -> eyre::Result<Options> {
    let mut opts = match &cli.config {
        Some(path) => Options::load(path).wrap_err_with(|| format!("loading {}", path.display()))?,
        None => {
            let default = PathBuf::from(CONFIG_FILE);
            if default.is_file() { Options::load(&default)? } else { Options::default() }
        }
    };
    if cli.log_stderr {
        opts.log.file = None;
    }
    Ok(opts)
}

fn report(summary: &RunSummary) {
    println!(
        "{} updated, {} added, {} placeholders, {} skipped",
        summary.updated, summary.appended, summary.placeholders, summary.skipped
    );
}

pub fn run() -> eyre::Result<()> {
    let cli = Cli::parse();
    let opts = load_options(&cli)?;
    crate::log::init(&opts.log).wrap_err("setting up logging")?;
    logf!("po_recon {} starting: {:?}", env!("CARGO_PKG_VERSION"), cli.command);

    let http = net::client(Duration::from_secs(opts.net.timeout_secs))?;
    let retry = opts.net.retry_policy();
    let mut progress = ConsoleProgress { out: io::stdout() };

    match cli.command {
        Command::Pdf { dry_run } => {
            let api = JiraClient::from_env(&http, &opts.ticketing, retry)?;
            let resolver = ApprovalResolver::new(
                &api,
                opts.ticketing.approvals_field.as_str(),
                ChainStyle::for_kind(SourceKind::PdfForm),
            );
            let adapter = PdfSource::new(opts.pdf.clone());
            let mut tab = Workbook::open(&opts.sink.dir, opts.sink.format)?.tab(&opts.sink.tabs.orders)?;
            let summary = runner::run_enumeration(
                &adapter,
                Some(&resolver),
                &mut tab,
                &opts.enumerate,
                dry_run,
                &mut progress,
            )?;
            report(&summary);
        }
        Command::Parc { input, enumerate, dry_run } => {
            let api = JiraClient::from_env(&http, &opts.ticketing, retry.clone())?;
            let resolver = ApprovalResolver::new(
                &api,
                opts.ticketing.approvals_field.as_str(),
                ChainStyle::for_kind(SourceKind::HtmlForm),
            );
            let adapter = HtmlSource::new(&http, opts.html.clone(), retry);
            let mut tab = Workbook::open(&opts.sink.dir, opts.sink.format)?.tab(&opts.sink.tabs.parc)?;
            let summary = match input {
                Some(path) if !enumerate => {
                    let text = fs::read_to_string(&path)
                        .wrap_err_with(|| format!("reading {}", path.display()))?;
                    let ids = runner::parse_id_list(&text);
                    runner::run_po_list(&ids, &adapter, Some(&resolver), &mut tab, &mut progress)?
                }
                _ => runner::run_enumeration(
                    &adapter,
                    Some(&resolver),
                    &mut tab,
                    &opts.enumerate,
                    dry_run,
                    &mut progress,
                )?,
            };
            report(&summary);
        }
        Command::Ivc => {
            let api = JiraClient::from_env(&http, &opts.ticketing, retry)?;
            let book = Workbook::open(&opts.sink.dir, opts.sink.format)?;
            let mut main = book.tab(&opts.sink.tabs.shipping)?;
            let mut ship_dates = book.tab(&opts.sink.tabs.ship_date)?;
            let summary = runner::run_tickets(
                &api,
                &opts.ticketing.shipping_jql,
                &mut main,
                &mut ship_dates,
                &mut progress,
            )?;
            report(&summary);
        }
        Command::Show { kind, id } => {
            let api = JiraClient::from_env(&http, &opts.ticketing, retry.clone())?;
            let resolver =
                ApprovalResolver::new(&api, opts.ticketing.approvals_field.as_str(), ChainStyle::for_kind(kind));
            let adapter: Box<dyn SourceAdapter + '_> = match kind {
                SourceKind::PdfForm => Box::new(PdfSource::new(opts.pdf.clone())),
                SourceKind::HtmlForm => Box::new(HtmlSource::new(&http, opts.html.clone(), retry)),
                SourceKind::Ticket => Box::new(TicketSource::new(&api)),
            };
            let row = runner::show(adapter.as_ref(), Some(&resolver), &id)?;
            println!("{}", row.cells().join("\t"));
        }
    }
    Ok(())
}
