//! # Mapwright Parser
//!
//! Parses Wardley map text into typed elements and recovers from damage
//! instead of rejecting it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ recovery: whole-document repair ladder      │
//! │  (quote balance → encoding → line skipping) │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ parser: map text → Vec<MapElement>          │
//! │  grammar: one parse function per line form  │
//! │  recovering_parser: quoted-name cascade     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ name_codec / name_matcher / name_validator  │
//! │  raw ↔ source names, equivalence, limits    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Total over strict**: every string input yields an element or a
//!    recovered placeholder, never a panic. Hard failure is reserved for
//!    absent input.
//! 2. **Diagnostics travel with values**: recovery notices and errors are
//!    returned in the outcome, not logged into the void.
//! 3. **Spans are the contract with the editor**: each parsed name and
//!    coordinate block records the byte range it came from so rewrites can
//!    splice without reformatting the rest of the line.

pub mod ast;
pub mod grammar;
pub mod name_codec;
pub mod name_matcher;
pub mod name_validator;
pub mod parser;
pub mod recovering_parser;
pub mod recovery;
pub mod tokenizer;

#[cfg(feature = "pretty-errors")]
pub mod pretty;

pub use ast::{
    AnchorDecl, Attitude, AttitudeDecl, ComponentClass, ComponentDecl, DeliveryMethod, EvolveDecl,
    LabelOffset, LinkDecl, LinkKind, MapElement, NoteDecl, PipelineBlock, PipelineComponent, Span,
    TitleDecl,
};
pub use grammar::{classify_line, LineKind};
pub use name_codec::{escape_for_source, needs_quoting, unescape_from_source};
pub use name_matcher::{find_by_name, names_match, normalize_name};
pub use name_validator::{
    sanitize_name, validate_and_recover, validate_name, NameValidationOptions, RecoveredName,
    ValidationResult, RECOVERED_NAME_FALLBACK,
};
pub use parser::{parse_map, ParsedMap};
pub use recovering_parser::{parse_quoted_name, ParsedName};
pub use recovery::{load_with_recovery, LoadOutcome, LoadStrategy};
pub use tokenizer::{tokenize, Token};

// Re-export the shared diagnostic types so downstream crates rarely need a
// direct mapwright-common dependency.
pub use mapwright_common::{ErrorCategory, ParseError, ParseOutcome, ParseStrategy, ParseWarning};
