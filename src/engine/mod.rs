// src/engine/mod.rs
//! Declarative field extraction.
//!
//! A source kind is described by a [`FieldTable`]: one [`FieldAnchor`] per
//! output field saying where the value starts (marker), what to cut (slice),
//! which characters to trim, and what to write when nothing usable is there.
//! The engine interprets a table over one document. It never does I/O.

mod engine;
pub mod types;

pub use engine::extract;
pub use types::*;
