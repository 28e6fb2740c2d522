//! Constraint Fixes
//!
//! When a constraint-based type checker cannot satisfy a constraint it does
//! not stop. It records a *fix*, an immutable description of the repair
//! that would make the constraint hold, and keeps solving. Once a solution
//! is accepted, each recorded fix renders itself as a user-facing
//! diagnostic.
//!
//! This crate provides:
//!
//! - **`FixKind`**: flat tag of every concrete fix variant
//! - **`ConstraintFix`**: header (kind, locator, warning flag) plus payload
//! - **Fix families**: contextual mismatches, member references, argument
//!   lists, generic requirements, key paths, property wrappers and
//!   expression-shape repairs, each with its factories and fallible attempts
//! - **`ConstraintSystem`**: the solving session that owns fixes per branch
//! - **Diagnostic pass**: `Solution::diagnose` renders fixes in source order
//!
//! Types are interned (`TypeId`), declarations live in a `DeclStore`, and
//! expressions and locators in `la_arena` arenas.

pub mod config;
pub mod decl;
pub mod diagnostics;
pub mod expr;
pub mod fix;
pub mod format;
pub mod intern;
pub mod locator;
pub mod relation;
pub mod system;
pub mod tracing_config;
pub mod types;

pub use config::{FixConfig, FixOptions};
pub use decl::{DeclId, DeclInfo, DeclKind, DeclStore};
pub use diagnostics::{DiagnosticArg, DiagnosticCollector, DiagnosticSeverity, FixIt, PendingDiagnostic};
pub use expr::{Argument, ExprArena, ExprId, ExprKind};
pub use fix::{ConstraintFix, FailureContext, FixFamily, FixKind, FixPayload, FixVariant};
pub use format::TypeFormatter;
pub use intern::TypeInterner;
pub use locator::{ConstraintLocator, LocatorId, LocatorPathElt};
pub use system::{BranchId, ConstraintSystem, FixId, Solution, SolverScore};
pub use types::{FunctionShape, ParamFlags, ParamInfo, TupleElement, TypeData, TypeId};

// Test modules: most are loaded by their source files via #[path = "../tests/..."].
#[cfg(test)]
#[path = "../tests/test_fixtures.rs"]
pub(crate) mod test_fixtures;
// contextual_tests, optional_tests, member_ref_tests, arguments_tests,
// generic_tests, key_path_tests, property_wrapper_tests, expression_tests:
// loaded from the fix family modules
#[cfg(test)]
#[path = "../tests/scenario_tests.rs"]
mod scenario_tests;
