//! Semantic views over parsed map elements.
//!
//! Today that is the dependency graph: a directed graph built from link
//! lines, with transitive-descendant queries the link-highlighting UI
//! drives. Graph construction is cycle-safe and queries are total:
//! unknown names answer empty, never error.

pub mod graph;

pub use graph::{DependencyGraph, DependencyNode};
