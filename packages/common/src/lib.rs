//! Shared diagnostic types for the mapwright engine.
//!
//! Every stage of the pipeline (name parsing, line grammars, whole-document
//! loading, mutations) reports through the types in this crate: a
//! categorized [`ParseError`], a non-blocking [`ParseWarning`], and the
//! [`ParseOutcome`] envelope that carries a value alongside whatever it took
//! to produce it.

pub mod error;
pub mod outcome;

pub use error::{ErrorCategory, ParseError, ParseWarning};
pub use outcome::{ParseOutcome, ParseStrategy};
