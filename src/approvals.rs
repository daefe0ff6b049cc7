// src/approvals.rs
//! Ticket references and approval chains.
//!
//! A purchase order points at a procurement ticket. `PUR` tickets carry a
//! three-step approval workflow; `NOC` tickets have none and are never looked
//! up. Resolution never fails as a whole: each slot degrades on its own and
//! keeps the reason in its [`SlotState`].

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::config::consts::{NOC_THRESHOLD, NOT_APPLICABLE};
use crate::core::dates;
use crate::jira::TicketApi;
use crate::source::SourceKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prefix {
    Noc,
    Pur,
}

impl Prefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prefix::Noc => "NOC",
            Prefix::Pur => "PUR",
        }
    }

    /// Ticket numbers at or above the threshold are NOC tickets.
    pub fn for_number(number: u32) -> Self {
        if number >= NOC_THRESHOLD { Prefix::Noc } else { Prefix::Pur }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TicketRef {
    pub prefix: Prefix,
    pub number: u32,
}

impl TicketRef {
    pub fn from_number(number: u32) -> Self {
        Self { prefix: Prefix::for_number(number), number }
    }

    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TicketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix.as_str(), self.number)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadTicketRef(pub String);

impl fmt::Display for BadTicketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a ticket reference: {:?}", self.0)
    }
}

impl std::error::Error for BadTicketRef {}

/// Accepts `4321`, `PUR-4321` or `NOC-12345`. An explicit prefix is kept as is;
/// bare digits go through the threshold rule.
impl FromStr for TicketRef {
    type Err = BadTicketRef;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let bad = || BadTicketRef(t.to_string());
        let (prefix, digits) = match t.split_once('-') {
            Some(("PUR", d)) => (Some(Prefix::Pur), d),
            Some(("NOC", d)) => (Some(Prefix::Noc), d),
            Some(_) => return Err(bad()),
            None => (None, t),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let number: u32 = digits.parse().map_err(|_| bad())?;
        Ok(match prefix {
            Some(prefix) => TicketRef { prefix, number },
            None => TicketRef::from_number(number),
        })
    }
}

/* ---------------- Approval chain ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Manager,
    Director,
    Finance,
}

/// Positional order of the workflow steps.
pub const ROLES: [Role; 3] = [Role::Manager, Role::Director, Role::Finance];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// Step completed; the value is its date
    Completed,
    /// Step exists but has no completion date yet
    Pending,
    /// Fewer steps than slots
    Missing,
    /// Completion date present but unreadable
    Malformed,
    /// The ticket lookup itself failed
    LookupFailed,
    /// NOC ticket or no ticket at all
    NotApplicable,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    pub role: Role,
    pub value: String,
    pub state: SlotState,
}

impl Slot {
    fn empty(role: Role, state: SlotState) -> Self {
        Self { role, value: s!(), state }
    }
}

/// How a kind's sheet writes the "no workflow" chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainStyle {
    /// All three cells empty
    Blank,
    /// `NA` in the director slot
    MarkedNa,
}

impl ChainStyle {
    pub fn for_kind(kind: SourceKind) -> Self {
        match kind {
            SourceKind::PdfForm => ChainStyle::MarkedNa,
            SourceKind::HtmlForm | SourceKind::Ticket => ChainStyle::Blank,
        }
    }
}

/// Exactly three slots, in [`ROLES`] order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApprovalChain {
    slots: [Slot; 3],
}

impl ApprovalChain {
    fn filled(state: SlotState) -> Self {
        Self { slots: ROLES.map(|r| Slot::empty(r, state)) }
    }

    /// Chain for a ticket without a workflow.
    pub fn not_applicable(style: ChainStyle) -> Self {
        let mut chain = Self::filled(SlotState::NotApplicable);
        if style == ChainStyle::MarkedNa {
            chain.slots[1].value = s!(NOT_APPLICABLE);
        }
        chain
    }

    /// Chain for a PUR ticket whose lookup failed outright.
    pub fn lookup_failed() -> Self {
        Self::filled(SlotState::LookupFailed)
    }

    pub fn slots(&self) -> &[Slot; 3] {
        &self.slots
    }

    pub fn slot(&self, role: Role) -> &Slot {
        &self.slots[role as usize]
    }

    pub fn values(&self) -> [&str; 3] {
        [&self.slots[0].value, &self.slots[1].value, &self.slots[2].value]
    }

    pub fn to_cells(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.value.clone()).collect()
    }
}

/// Reads completion dates of the approval workflow off a PUR ticket.
pub struct ApprovalResolver<'a> {
    api: &'a dyn TicketApi,
    field: String,
    style: ChainStyle,
}

impl<'a> ApprovalResolver<'a> {
    pub fn new(api: &'a dyn TicketApi, field: impl Into<String>, style: ChainStyle) -> Self {
        Self { api, field: field.into(), style }
    }

    /// NOC tickets return without any lookup.
    pub fn resolve(&self, ticket: &TicketRef) -> ApprovalChain {
        if ticket.prefix == Prefix::Noc {
            return ApprovalChain::not_applicable(self.style);
        }
        let key = ticket.key();
        match self.api.issue(&key, &[self.field.as_str()]) {
            Ok(Some(issue)) => self.read_steps(&key, &issue),
            Ok(None) => {
                logd!("{key}: ticket not found, approvals left empty");
                ApprovalChain::lookup_failed()
            }
            Err(e) => {
                logw!("{key}: approval lookup failed: {e}");
                ApprovalChain::lookup_failed()
            }
        }
    }

    /// Resolve straight from the extracted ticket text. Anything that is not
    /// a ticket reference (a "not found" default) yields the no-workflow chain.
    pub fn resolve_text(&self, raw: &str) -> ApprovalChain {
        match raw.parse::<TicketRef>() {
            Ok(t) => self.resolve(&t),
            Err(_) => ApprovalChain::not_applicable(self.style),
        }
    }

    fn read_steps(&self, key: &str, issue: &Value) -> ApprovalChain {
        let steps = issue
            .get("fields")
            .and_then(|f| f.get(&self.field))
            .and_then(Value::as_array);
        let slots = ROLES.map(|role| {
            let idx = role as usize;
            let slot = match steps.and_then(|s| s.get(idx)) {
                None => Slot::empty(role, SlotState::Missing),
                Some(step) => match step.pointer("/completedDate/iso8601").and_then(Value::as_str) {
                    None => Slot::empty(role, SlotState::Pending),
                    Some(raw) => match dates::sheet_date(raw) {
                        Some(value) => Slot { role, value, state: SlotState::Completed },
                        None => Slot::empty(role, SlotState::Malformed),
                    },
                },
            };
            if slot.state != SlotState::Completed {
                logd!("{key}: {role:?} approval {:?}", slot.state);
            }
            slot
        });
        ApprovalChain { slots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_splits_prefixes() {
        assert_eq!("4321".parse::<TicketRef>().unwrap().to_string(), "PUR-4321");
        assert_eq!("9999".parse::<TicketRef>().unwrap().prefix, Prefix::Pur);
        assert_eq!("10000".parse::<TicketRef>().unwrap().prefix, Prefix::Noc);
        assert_eq!("19876".parse::<TicketRef>().unwrap().to_string(), "NOC-19876");
    }

    #[test]
    fn explicit_prefix_is_kept() {
        let t: TicketRef = "NOC-42".parse().unwrap();
        assert_eq!(t, TicketRef { prefix: Prefix::Noc, number: 42 });
        assert_eq!("PUR-12345".parse::<TicketRef>().unwrap().prefix, Prefix::Pur);
    }

    #[test]
    fn junk_is_rejected() {
        for s in ["", "PUR-", "ABC-12", "12a", "Ticket Not Found", "-5"] {
            assert!(s.parse::<TicketRef>().is_err(), "{s:?} parsed");
        }
    }

    #[test]
    fn na_style_marks_middle_slot() {
        assert_eq!(ApprovalChain::not_applicable(ChainStyle::MarkedNa).values(), ["", "NA", ""]);
        assert_eq!(ApprovalChain::not_applicable(ChainStyle::Blank).values(), ["", "", ""]);
    }
}
