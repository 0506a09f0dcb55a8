//! # Mapwright Editor
//!
//! Structural mutations over map text.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: map text → typed elements + spans   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: line-scoped rewriting               │
//! │  - Validate, then apply; never partial      │
//! │  - Conflict detection against stale edits   │
//! │  - Renames follow links and evolve lines    │
//! │  - Formatting outside the target span kept  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ caller: UI state, undo snapshots, rendering │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The text is the source of truth**: every mutation is a pure
//!    function from the current document text to a new text; parsed
//!    elements are a derived view.
//! 2. **Validate before writing**: a failed mutation leaves the document
//!    byte-identical, always.
//! 3. **Cooperative conflict detection**: the caller says what it thinks
//!    the current value is; a mismatch means someone else edited the line
//!    first and the write is refused. This is a check, not a lock.
//!
//! ## Usage
//!
//! ```rust
//! use mapwright_editor::{MapDocument, Mutation};
//!
//! let mut doc = MapDocument::from_source(
//!     "component Kettle [0.43, 0.35]\nKettle->Power".to_string(),
//! );
//!
//! doc.apply(&Mutation::RenameComponent {
//!     line: 1,
//!     expected_name: "Kettle".to_string(),
//!     new_name: "Electric Kettle".to_string(),
//! })
//! .unwrap();
//!
//! assert!(doc.source().contains("Electric Kettle->Power"));
//! ```

mod document;
mod errors;
mod mutations;
mod rename;

pub use document::{MapDocument, MutationOutcome};
pub use errors::EditorError;
pub use mutations::{Mutation, MutationError};

// Re-export the coordinate types that travel through mutations.
pub use mapwright_geometry::{PstBounds, PstCoordinates};
pub use mapwright_parser::LinkKind;
