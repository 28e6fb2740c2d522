//! Context handed to a fix when it renders its diagnostic.
//!
//! The fix does not keep a reference to the session that created it. The
//! diagnostic pass builds one `FailureContext` per fix and passes in the
//! session, the accepted solution (type variable bindings and expression
//! types) and the diagnostic sink.

use crate::config::FixOptions;
use crate::decl::{DeclId, DeclInfo, DeclStore};
use crate::diagnostics::{DiagnosticCollector, DiagnosticSeverity, PendingDiagnostic};
use crate::expr::{Argument, ExprArena, ExprId, ExprKind};
use crate::format::TypeFormatter;
use crate::intern::TypeInterner;
use crate::locator::{ConstraintLocator, LocatorPathElt};
use crate::system::{ConstraintSystem, Solution};
use crate::types::TypeId;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::trace;
use tyfix_common::diagnostics::diagnostic_codes;
use tyfix_common::interner::Atom;
use tyfix_common::span::Span;

use super::ConstraintFix;

/// Where a contextual conversion comes from, as far as wording goes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContextualPurpose {
    /// Type written by the user (`let x: T = ...`, `as T`).
    Specified,
    Argument,
    Return,
    Assignment,
    CollectionElement,
}

impl ContextualPurpose {
    /// Message used for a plain `from` to `to` conversion failure.
    pub const fn conversion_code(self) -> u32 {
        match self {
            ContextualPurpose::Specified => diagnostic_codes::CANNOT_CONVERT_TO_SPECIFIED_TYPE,
            ContextualPurpose::Argument => diagnostic_codes::CANNOT_CONVERT_ARGUMENT,
            ContextualPurpose::Return => diagnostic_codes::CANNOT_CONVERT_RETURN,
            ContextualPurpose::Assignment => diagnostic_codes::CANNOT_ASSIGN_VALUE,
            ContextualPurpose::CollectionElement => diagnostic_codes::CANNOT_CONVERT_ELEMENT,
        }
    }
}

pub struct FailureContext<'a> {
    cs: &'a ConstraintSystem,
    solution: &'a Solution,
    root: ExprId,
    parents: &'a FxHashMap<ExprId, ExprId>,
    sink: &'a mut DiagnosticCollector,
    locator: &'a ConstraintLocator,
    is_warning: bool,
}

impl<'a> FailureContext<'a> {
    pub fn new(
        cs: &'a ConstraintSystem,
        solution: &'a Solution,
        root: ExprId,
        parents: &'a FxHashMap<ExprId, ExprId>,
        sink: &'a mut DiagnosticCollector,
        fix: &ConstraintFix,
    ) -> Self {
        FailureContext {
            cs,
            solution,
            root,
            parents,
            sink,
            locator: cs.get_locator(fix.locator()),
            is_warning: fix.is_warning(),
        }
    }

    // =========================================================================
    // Session Facilities
    // =========================================================================

    pub fn cs(&self) -> &'a ConstraintSystem {
        self.cs
    }

    pub fn types(&self) -> &'a TypeInterner {
        self.cs.types()
    }

    pub fn decls(&self) -> &'a DeclStore {
        self.cs.decls()
    }

    pub fn exprs(&self) -> &'a ExprArena {
        self.cs.exprs()
    }

    pub fn options(&self) -> &'a FixOptions {
        self.cs.options()
    }

    pub fn root(&self) -> ExprId {
        self.root
    }

    pub fn locator(&self) -> &'a ConstraintLocator {
        self.locator
    }

    pub fn is_warning(&self) -> bool {
        self.is_warning
    }

    // =========================================================================
    // Anchors
    // =========================================================================

    /// Locator anchor as recorded.
    pub fn raw_anchor(&self) -> ExprId {
        self.locator.anchor()
    }

    /// Anchor narrowed by the locator path: the argument for an
    /// argument-to-parameter conversion, the destination of an assignment.
    pub fn anchor(&self) -> ExprId {
        let exprs = self.exprs();
        let raw = self.raw_anchor();
        let mut anchor = raw;
        for elt in self.locator.path() {
            match *elt {
                LocatorPathElt::ApplyArgToParam { arg_idx, .. } => {
                    if let Some(arg) = exprs
                        .call_arguments(raw)
                        .and_then(|args| args.get(arg_idx as usize))
                    {
                        anchor = arg.expr;
                    }
                }
                LocatorPathElt::AssignDest => {
                    if let ExprKind::Assign { dest, .. } = exprs.kind(anchor) {
                        anchor = *dest;
                    }
                }
                _ => {}
            }
        }
        exprs.semantics_provider(anchor)
    }

    pub fn anchor_span(&self) -> Span {
        self.exprs().span(self.anchor())
    }

    pub fn parent(&self, expr: ExprId) -> Option<ExprId> {
        self.parents.get(&expr).copied()
    }

    /// Arguments of the call or subscript the locator is anchored on.
    pub fn call_arguments(&self) -> Option<&'a [Argument]> {
        self.exprs().call_arguments(self.raw_anchor())
    }

    /// Member reference at the raw anchor, looking through calls.
    fn member_ref(&self) -> Option<ExprId> {
        let exprs = self.exprs();
        let mut expr = exprs.semantics_provider(self.raw_anchor());
        loop {
            match exprs.kind(expr) {
                ExprKind::UnresolvedDot { .. } | ExprKind::MemberRef { .. } => return Some(expr),
                ExprKind::Call { callee, .. } => expr = exprs.semantics_provider(*callee),
                _ => return None,
            }
        }
    }

    /// Base expression of the member reference at the raw anchor.
    pub fn member_base(&self) -> Option<ExprId> {
        match self.exprs().kind(self.member_ref()?) {
            ExprKind::UnresolvedDot { base, .. } | ExprKind::MemberRef { base, .. } => Some(*base),
            _ => None,
        }
    }

    /// Span of the member name at the raw anchor.
    pub fn member_name_span(&self) -> Option<Span> {
        match self.exprs().kind(self.member_ref()?) {
            ExprKind::UnresolvedDot { name_span, .. } | ExprKind::MemberRef { name_span, .. } => {
                Some(*name_span)
            }
            _ => None,
        }
    }

    /// Declaration referenced by `expr`, looking through calls.
    pub fn referenced_decl(&self, expr: ExprId) -> Option<DeclId> {
        let exprs = self.exprs();
        match exprs.kind(exprs.semantics_provider(expr)) {
            ExprKind::DeclRef(decl) => Some(*decl),
            ExprKind::MemberRef { member, .. } => Some(*member),
            ExprKind::Call { callee, .. } => self.referenced_decl(*callee),
            _ => None,
        }
    }

    /// Declaration being applied at the raw anchor, if any.
    pub fn callee_decl(&self) -> Option<DeclId> {
        self.referenced_decl(self.raw_anchor())
    }

    pub fn decl(&self, decl: DeclId) -> Option<&'a DeclInfo> {
        self.decls().get(decl)
    }

    pub fn decl_name(&self, decl: DeclId) -> Atom {
        self.decls().name(decl)
    }

    pub fn atom_str(&self, atom: Atom) -> Arc<str> {
        self.types().resolve_atom(atom)
    }

    // =========================================================================
    // Resolved Types
    // =========================================================================

    /// Substitute the solution's bindings into `ty`.
    pub fn resolve(&self, ty: TypeId) -> TypeId {
        self.solution.simplify_type(self.types(), ty)
    }

    /// Resolved type with l-value and inout wrappers stripped.
    pub fn resolve_rvalue(&self, ty: TypeId) -> TypeId {
        self.types().rvalue(self.resolve(ty))
    }

    /// Resolved type of an expression in the accepted solution.
    pub fn expr_type(&self, expr: ExprId) -> Option<TypeId> {
        self.solution.expr_type(expr).map(|ty| self.resolve(ty))
    }

    /// Render a type for composite message arguments.
    pub fn format_type(&self, ty: TypeId) -> String {
        TypeFormatter::new(self.types(), self.decls()).format(ty)
    }

    pub fn contextual_purpose(&self) -> ContextualPurpose {
        for elt in self.locator.path().iter().rev() {
            match elt {
                LocatorPathElt::ApplyArgToParam { .. } => return ContextualPurpose::Argument,
                LocatorPathElt::FunctionResult | LocatorPathElt::ClosureResult => {
                    return ContextualPurpose::Return;
                }
                LocatorPathElt::AssignDest => return ContextualPurpose::Assignment,
                LocatorPathElt::SequenceElementType => {
                    return ContextualPurpose::CollectionElement;
                }
                LocatorPathElt::ContextualType => break,
                _ => {}
            }
        }
        match self.exprs().kind(self.raw_anchor()) {
            ExprKind::Assign { .. } => ContextualPurpose::Assignment,
            ExprKind::Return(_) => ContextualPurpose::Return,
            _ => ContextualPurpose::Specified,
        }
    }

    // =========================================================================
    // Emission
    // =========================================================================

    /// Write `diagnostic` to the sink.
    ///
    /// Applies the anchor span when none is set, downgrades to a note when
    /// `as_note` is requested, and to a warning for warning-level fixes.
    pub fn emit(&mut self, mut diagnostic: PendingDiagnostic, as_note: bool) -> bool {
        if diagnostic.span.is_none() {
            diagnostic.span = Some(self.anchor_span());
        }
        if as_note {
            diagnostic.severity = DiagnosticSeverity::Note;
        } else if self.is_warning && !self.options().warnings_as_errors {
            diagnostic.severity = DiagnosticSeverity::Warning;
        }
        if !self.options().emit_fix_its {
            diagnostic.strip_fix_its();
        }
        trace!(code = diagnostic.code, severity = ?diagnostic.severity, "emitting fix diagnostic");
        self.sink.push(diagnostic);
        true
    }
}
