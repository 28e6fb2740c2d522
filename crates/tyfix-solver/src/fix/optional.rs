//! Optional unwrapping fixes.

use crate::diagnostics::{FixIt, PendingDiagnostic};
use crate::expr::ExprKind;
use crate::locator::LocatorId;
use crate::system::{ConstraintSystem, FixId};
use crate::types::TypeId;
use std::borrow::Cow;
use tyfix_common::diagnostics::diagnostic_codes;
use tyfix_common::interner::Atom;
use tyfix_common::span::Span;

use super::contextual::contextual_leaf;
use super::{ConstraintFix, FailureContext, FixBehavior, FixKind};

contextual_leaf! {
    /// Unwrap an optional value used where its wrapped type is expected.
    ForceOptional => ForceOptional
}

impl ForceOptional {
    pub fn create(cs: &mut ConstraintSystem, from: TypeId, to: TypeId, locator: LocatorId) -> FixId {
        Self::record(cs, from, to, locator)
    }
}

impl FixBehavior for ForceOptional {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("force optional")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let (from, to) = self.mismatch().resolved(ctx);
        if ctx.types().optional_object(from).is_none() {
            return false;
        }
        let span = ctx.anchor_span();
        let diagnostic = PendingDiagnostic::error(
            diagnostic_codes::OPTIONAL_NOT_UNWRAPPED,
            vec![from.into(), to.into()],
        )
        .with_related(
            PendingDiagnostic::note(diagnostic_codes::COALESCE_OPTIONAL, Vec::new())
                .with_span(span)
                .with_fix_it(FixIt::insert_after(span, " ?? <#default value#>")),
        )
        .with_related(
            PendingDiagnostic::note(diagnostic_codes::FORCE_UNWRAP_OPTIONAL, Vec::new())
                .with_span(span)
                .with_fix_it(FixIt::insert_after(span, "!")),
        );
        ctx.emit(diagnostic, as_note)
    }
}

/// Member lookup on an optional base.
///
/// Tagged `UnwrapOptionalBaseWithOptionalResult` when the member's own type
/// is optional, in which case chaining is the only suggestion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnwrapOptionalBase {
    member: Atom,
}

impl UnwrapOptionalBase {
    pub fn member_name(&self) -> Atom {
        self.member
    }

    pub fn create(cs: &mut ConstraintSystem, member: Atom, locator: LocatorId) -> FixId {
        cs.record_fix(ConstraintFix::new(
            FixKind::UnwrapOptionalBase,
            locator,
            UnwrapOptionalBase { member },
        ))
    }

    pub fn create_with_optional_result(cs: &mut ConstraintSystem, member: Atom, locator: LocatorId) -> FixId {
        cs.record_fix(ConstraintFix::new(
            FixKind::UnwrapOptionalBaseWithOptionalResult,
            locator,
            UnwrapOptionalBase { member },
        ))
    }
}

impl FixBehavior for UnwrapOptionalBase {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("unwrap optional base of member lookup")
    }

    fn diagnose(&self, kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let Some(base) = ctx.member_base() else {
            return false;
        };
        let Some(base_ty) = ctx.expr_type(base).map(|ty| ctx.types().rvalue(ty)) else {
            return false;
        };
        let Some(wrapped) = ctx.types().optional_object(base_ty) else {
            return false;
        };
        let base_span = ctx.exprs().span(base);
        let mut diagnostic = PendingDiagnostic::error(
            diagnostic_codes::OPTIONAL_BASE_NOT_UNWRAPPED,
            vec![base_ty.into(), self.member.into(), wrapped.into()],
        )
        .with_span(ctx.member_name_span().unwrap_or(base_span))
        .with_related(
            PendingDiagnostic::note(diagnostic_codes::CHAIN_OPTIONAL, vec![self.member.into()])
                .with_span(base_span)
                .with_fix_it(FixIt::insert_after(base_span, "?")),
        );
        if kind == FixKind::UnwrapOptionalBase {
            diagnostic = diagnostic.with_related(
                PendingDiagnostic::note(diagnostic_codes::FORCE_UNWRAP_OPTIONAL, Vec::new())
                    .with_span(base_span)
                    .with_fix_it(FixIt::insert_after(base_span, "!")),
            );
        }
        ctx.emit(diagnostic, as_note)
    }
}

/// A `!` or `?` applied to a value that is not optional.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RemoveUnwrap {
    base: TypeId,
}

impl RemoveUnwrap {
    pub fn base_type(&self) -> TypeId {
        self.base
    }

    pub fn create(cs: &mut ConstraintSystem, base: TypeId, locator: LocatorId) -> FixId {
        cs.record_fix(ConstraintFix::new(FixKind::RemoveUnwrap, locator, RemoveUnwrap { base }))
    }
}

impl FixBehavior for RemoveUnwrap {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("remove unwrap operator `!` or `?`")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let exprs = ctx.exprs();
        let anchor = ctx.anchor();
        let base = ctx.resolve_rvalue(self.base);
        let (code, sub) = match exprs.kind(anchor) {
            ExprKind::ForceValue(sub) => (diagnostic_codes::FORCE_UNWRAP_NON_OPTIONAL, *sub),
            ExprKind::BindOptional(sub) => (diagnostic_codes::OPTIONAL_CHAIN_NON_OPTIONAL, *sub),
            _ => return false,
        };
        let operator = Span::new(exprs.span(sub).end, exprs.span(anchor).end);
        let diagnostic = PendingDiagnostic::error(code, vec![base.into()]).with_fix_it(FixIt::remove(operator));
        ctx.emit(diagnostic, as_note)
    }
}

#[cfg(test)]
#[path = "../../tests/optional_tests.rs"]
mod optional_tests;
