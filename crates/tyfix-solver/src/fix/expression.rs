//! Fixes that repair the shape of a single expression.

use crate::decl::DeclFlags;
use crate::diagnostics::{FixIt, PendingDiagnostic};
use crate::expr::ExprKind;
use crate::locator::LocatorId;
use crate::system::{ConstraintSystem, FixId};
use crate::types::TypeId;
use std::borrow::Cow;
use tyfix_common::diagnostics::diagnostic_codes;
use tyfix_common::span::Span;

use super::{ConstraintFix, FailureContext, FixBehavior, FixKind};

// =============================================================================
// Assignment
// =============================================================================

/// Assignment to something that is not assignable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TreatRValueAsLValue;

impl TreatRValueAsLValue {
    pub fn create(cs: &mut ConstraintSystem, locator: LocatorId) -> FixId {
        cs.record_fix(ConstraintFix::new(FixKind::TreatRValueAsLValue, locator, TreatRValueAsLValue))
    }
}

impl FixBehavior for TreatRValueAsLValue {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("treat rvalue as lvalue")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let exprs = ctx.exprs();
        let mut dest = ctx.anchor();
        if let ExprKind::Assign { dest: inner, .. } = exprs.kind(dest) {
            dest = exprs.semantics_provider(*inner);
        }
        let span = exprs.span(dest);

        if let ExprKind::DeclRef(decl) = exprs.kind(dest)
            && let Some(info) = ctx.decl(*decl)
            && info.flags.contains(DeclFlags::LET)
        {
            let mut diagnostic =
                PendingDiagnostic::error(diagnostic_codes::ASSIGN_TO_LET, vec![info.name.into()]).with_span(span);
            if !info.span.is_empty() {
                diagnostic = diagnostic.with_related(
                    PendingDiagnostic::note(diagnostic_codes::CHANGE_LET_TO_VAR, Vec::new()).with_span(info.span),
                );
            }
            return ctx.emit(diagnostic, as_note);
        }

        let Some(ty) = ctx.expr_type(dest) else {
            return false;
        };
        let ty = ctx.types().rvalue(ty);
        let diagnostic = PendingDiagnostic::error(diagnostic_codes::ASSIGN_TO_IMMUTABLE, vec![ty.into()]).with_span(span);
        ctx.emit(diagnostic, as_note)
    }
}

// =============================================================================
// Function Values
// =============================================================================

/// Non-escaping function value passed where `@escaping` is required.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MarkExplicitlyEscaping {
    convert_to: Option<TypeId>,
}

impl MarkExplicitlyEscaping {
    pub fn convert_to(&self) -> Option<TypeId> {
        self.convert_to
    }

    pub fn create(cs: &mut ConstraintSystem, convert_to: Option<TypeId>, locator: LocatorId) -> FixId {
        cs.record_fix(ConstraintFix::new(
            FixKind::ExplicitlyEscaping,
            locator,
            MarkExplicitlyEscaping { convert_to },
        ))
    }
}

impl FixBehavior for MarkExplicitlyEscaping {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("add @escaping")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let exprs = ctx.exprs();
        if let ExprKind::DeclRef(decl) = exprs.kind(ctx.anchor())
            && let Some(info) = ctx.decl(*decl)
        {
            let mut diagnostic =
                PendingDiagnostic::error(diagnostic_codes::PASSING_NON_ESCAPING_PARAM, vec![info.name.into()]);
            if !info.span.is_empty() {
                diagnostic = diagnostic.with_related(
                    PendingDiagnostic::note(diagnostic_codes::PARAMETER_NON_ESCAPING, vec![info.name.into()])
                        .with_span(info.span),
                );
            }
            return ctx.emit(diagnostic, as_note);
        }
        let Some(convert_to) = self.convert_to else {
            return false;
        };
        let convert_to = ctx.resolve(convert_to);
        ctx.emit(
            PendingDiagnostic::error(diagnostic_codes::CONVERTING_NON_ESCAPING, vec![convert_to.into()]),
            as_note,
        )
    }
}

/// `@autoclosure` parameter forwarded without being called.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AutoClosureForwarding;

impl AutoClosureForwarding {
    pub fn create(cs: &mut ConstraintSystem, locator: LocatorId) -> FixId {
        cs.record_fix(ConstraintFix::new(FixKind::AutoClosureForwarding, locator, AutoClosureForwarding))
    }
}

impl FixBehavior for AutoClosureForwarding {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("fix @autoclosure forwarding")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let diagnostic = PendingDiagnostic::error(diagnostic_codes::AUTOCLOSURE_FORWARDING, Vec::new())
            .with_fix_it(FixIt::insert_after(ctx.anchor_span(), "()"));
        ctx.emit(diagnostic, as_note)
    }
}

/// Function value used where its result is expected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InsertExplicitCall;

impl InsertExplicitCall {
    pub fn create(cs: &mut ConstraintSystem, locator: LocatorId) -> FixId {
        cs.record_fix(ConstraintFix::new(FixKind::InsertCall, locator, InsertExplicitCall))
    }
}

impl FixBehavior for InsertExplicitCall {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("insert explicit `()` to make a call")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let anchor = ctx.anchor();
        let Some(function) = ctx.expr_type(anchor).and_then(|ty| ctx.types().function_of(ctx.types().rvalue(ty)))
        else {
            return false;
        };
        let diagnostic = PendingDiagnostic::error(diagnostic_codes::FUNCTION_NOT_CALLED, vec![function.result.into()])
            .with_fix_it(FixIt::insert_after(ctx.anchor_span(), "()"));
        ctx.emit(diagnostic, as_note)
    }
}

/// `return value` in a function returning nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RemoveReturn;

impl RemoveReturn {
    pub fn create(cs: &mut ConstraintSystem, locator: LocatorId) -> FixId {
        cs.record_fix(ConstraintFix::new(FixKind::RemoveReturn, locator, RemoveReturn))
    }
}

impl FixBehavior for RemoveReturn {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("remove or omit return type")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let exprs = ctx.exprs();
        let anchor = ctx.anchor();
        let ExprKind::Return(Some(value)) = exprs.kind(anchor) else {
            return false;
        };
        let diagnostic = PendingDiagnostic::error(diagnostic_codes::UNEXPECTED_RETURN_VALUE, Vec::new())
            .with_span(exprs.span(*value));
        ctx.emit(diagnostic, as_note)
    }
}

// =============================================================================
// Subscripts
// =============================================================================

/// `base.subscript(args)` written instead of `base[args]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UseSubscriptOperator;

impl UseSubscriptOperator {
    pub fn create(cs: &mut ConstraintSystem, locator: LocatorId) -> FixId {
        cs.record_fix(ConstraintFix::new(FixKind::UseSubscriptOperator, locator, UseSubscriptOperator))
    }
}

impl FixBehavior for UseSubscriptOperator {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("replace '.subscript(...)' with subscript operator")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let exprs = ctx.exprs();
        let Some(base) = ctx.member_base() else {
            return false;
        };
        let Some(base_ty) = ctx.expr_type(base).map(|ty| ctx.types().rvalue(ty)) else {
            return false;
        };
        let mut diagnostic = PendingDiagnostic::error(diagnostic_codes::USE_SUBSCRIPT_OPERATOR, vec![base_ty.into()]);
        if let Some(name_span) = ctx.member_name_span() {
            diagnostic = diagnostic.with_span(name_span);
        }

        let raw = exprs.semantics_provider(ctx.raw_anchor());
        if let ExprKind::Call { callee, .. } = exprs.kind(raw) {
            let call = exprs.span(raw);
            let callee = exprs.span(*callee);
            let base = exprs.span(base);
            if call.len() > callee.len() {
                diagnostic = diagnostic.with_fix_its([
                    FixIt::replace(Span::new(base.end, callee.end + 1), "["),
                    FixIt::replace(Span::new(call.end - 1, call.end), "]"),
                ]);
            }
        }
        ctx.emit(diagnostic, as_note)
    }
}

#[cfg(test)]
#[path = "../../tests/expression_tests.rs"]
mod expression_tests;
