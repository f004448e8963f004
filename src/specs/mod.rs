// src/specs/mod.rs
//! # Page “specs”
//!
//! How to read the two kinds of page the watcher touches: the MPEC **index** and a single
//! **circular**. Everything here is pure text processing over an already-fetched body.
//!
//! ## What lives here
//! - Candidate discovery on the index (`index`): `MPEC <id> (<title>)` entries, the title
//!   rejection vocabulary, and the packed-year URL scheme.
//! - Sub-section slicing (`sections`): each block of a circular is bounded by a start label and
//!   the nearest of several end labels.
//! - Declarative field tables (`elements`, `roster`): one label-anchored pattern per field,
//!   each evaluated on its own so one bad field never hides the others.
//! - Assembly into a `Record` (`circular`), gated on the facility code appearing in the
//!   observer roster.
//!
//! ## What does **not** live here
//! - Networking, pauses, skipping already-archived circulars (`scrape`, `runner`).
//! - Persistence (`store`) and the digest (`notify`).
//!
//! ## Conventions
//! - A pattern that does not match is not an error; the field stays unknown/unset.
//! - Numbers are kept only when finite.
//! - Tests run offline against inline text or `tests/fixtures/`.
pub mod circular;
pub mod elements;
pub mod index;
pub mod roster;
pub mod sections;
