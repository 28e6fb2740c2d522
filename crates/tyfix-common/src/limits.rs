//! Centralized limits and thresholds for fix diagnostics.
//!
//! Centralizing these values prevents duplicate definitions with inconsistent
//! values and keeps the defaults used by `FixOptions` in one place.

// =============================================================================
// Diagnostic Note Limits
// =============================================================================

/// Maximum number of per-position notes attached to a generic argument
/// mismatch.
///
/// A mismatch between two applications of a generic declaration reports one
/// note per differing argument position. Declarations with many parameters
/// would otherwise bury the primary error.
///
/// ```text
/// let x: Pair<Int, String> = Pair<String, Int>(...)
/// // error: cannot convert value of type 'Pair<String, Int>' to 'Pair<Int, String>'
/// // note:  arguments to generic parameter 'A' ('String' and 'Int') are expected to be equal
/// // note:  arguments to generic parameter 'B' ('Int' and 'String') are expected to be equal
/// ```
pub const MAX_GENERIC_ARGUMENT_NOTES: usize = 4;

/// Maximum number of parameters listed by name in a single
/// "missing arguments" diagnostic before the list is truncated with `...`.
pub const MAX_MISSING_ARGUMENTS_LISTED: usize = 3;

// =============================================================================
// Solver Limits
// =============================================================================

/// Maximum nesting depth of solving branches.
///
/// Branches are pushed for every disjunction the solver explores. Exceeding
/// this depth indicates a runaway search in the caller; `begin_branch`
/// asserts against it.
pub const MAX_BRANCH_DEPTH: usize = 256;

/// Maximum depth followed when simplifying a type through type variable
/// bindings. Guards against accidental binding cycles.
pub const MAX_SIMPLIFY_DEPTH: u32 = 64;

/// Maximum length of a superclass chain walked when checking class
/// conversions.
pub const MAX_SUPERCLASS_CHAIN: usize = 128;
