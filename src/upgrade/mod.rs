//! The upgrade search
//!
//! This module provides:
//! - Candidate selection: which published versions are worth trying
//! - The search engine: newest-first probing with an ascending fallback scan
//! - The `VersionTrial` seam the engine drives (apply / validate / restore)

mod engine;
mod probe;
mod select;

pub use engine::{search, SearchResult, TrialError, Validation, VersionTrial};
pub use probe::DeclarationProbe;
pub use select::{select, Selection};
