//! Common types and utilities for the tyfix constraint-fix engine.
//!
//! This crate provides foundational types used across all tyfix crates:
//! - String interning (`Atom`, `Interner`)
//! - Source spans (`Span`)
//! - The diagnostic message catalogue (codes, templates, categories)
//! - Centralized limits

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Diagnostic message catalogue
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};

// Centralized limits and thresholds
pub mod limits;
