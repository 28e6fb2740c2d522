//! Generic argument and requirement fixes.
//!
//! Requirement failures are reported against the declaration whose
//! requirement failed: the callee at the fix's anchor. Without one there is
//! nothing meaningful to point at and no diagnostic is emitted.

use crate::decl::DeclId;
use crate::diagnostics::{DiagnosticArg, FixIt, PendingDiagnostic};
use crate::expr::{ExprKind, StmtKind};
use crate::locator::LocatorId;
use crate::system::{ConstraintSystem, FixId};
use crate::types::TypeId;
use std::borrow::Cow;
use tyfix_common::diagnostics::diagnostic_codes;

use super::contextual::ContextualMismatch;
use super::{ConstraintFix, FailureContext, FixBehavior, FixKind};

/// Attach a "declared here" note for `decl` when it has a location.
fn with_declared_here(ctx: &FailureContext<'_>, diagnostic: PendingDiagnostic, decl: DeclId) -> PendingDiagnostic {
    match ctx.decl(decl) {
        Some(info) if !info.span.is_empty() => diagnostic.with_related(
            PendingDiagnostic::note(diagnostic_codes::DECLARED_HERE, vec![info.name.into()]).with_span(info.span),
        ),
        _ => diagnostic,
    }
}

// =============================================================================
// GenericArgumentsMismatch
// =============================================================================

/// Two applications of the same generic declaration disagree in some of
/// their generic arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericArgumentsMismatch {
    mismatch: ContextualMismatch,
    positions: Box<[u32]>,
}

impl GenericArgumentsMismatch {
    pub fn actual_type(&self) -> TypeId {
        self.mismatch.from_type()
    }

    pub fn required_type(&self) -> TypeId {
        self.mismatch.to_type()
    }

    pub fn mismatch(&self) -> &ContextualMismatch {
        &self.mismatch
    }

    /// Mismatching generic argument positions, ascending.
    pub fn mismatches(&self) -> &[u32] {
        &self.positions
    }

    /// # Panics
    ///
    /// Unless `actual` and `required` apply the same generic declaration and
    /// `positions` is strictly ascending and within its argument count.
    pub fn create(
        cs: &mut ConstraintSystem,
        actual: TypeId,
        required: TypeId,
        positions: &[u32],
        locator: LocatorId,
    ) -> FixId {
        let types = cs.types();
        let (Some((actual_decl, actual_args)), Some((required_decl, _))) =
            (types.bound_generic_parts(actual), types.bound_generic_parts(required))
        else {
            panic!("generic argument mismatch needs two bound generic types");
        };
        assert_eq!(actual_decl, required_decl, "generic argument mismatch across different declarations");
        assert!(
            positions.windows(2).all(|pair| pair[0] < pair[1]),
            "mismatch positions must be strictly ascending"
        );
        assert!(
            positions.iter().all(|&pos| (pos as usize) < actual_args.len()),
            "mismatch position out of range"
        );
        let payload = GenericArgumentsMismatch {
            mismatch: ContextualMismatch::new(actual, required),
            positions: positions.into(),
        };
        cs.record_fix(ConstraintFix::new(FixKind::GenericArgumentsMismatch, locator, payload))
    }
}

impl FixBehavior for GenericArgumentsMismatch {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("fix generic argument mismatch")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let (actual, required) = self.mismatch.resolved(ctx);
        let types = ctx.types();
        let (Some((decl, actual_args)), Some((_, required_args))) =
            (types.bound_generic_parts(actual), types.bound_generic_parts(required))
        else {
            return false;
        };
        let params = ctx.decl(decl).map(|info| info.generic_params.as_slice()).unwrap_or_default();

        let code = ctx.contextual_purpose().conversion_code();
        let mut diagnostic = PendingDiagnostic::error(code, vec![actual.into(), required.into()]);
        for &pos in self.positions.iter().take(ctx.options().max_generic_argument_notes) {
            let idx = pos as usize;
            let (Some(&lhs), Some(&rhs)) = (actual_args.get(idx), required_args.get(idx)) else {
                continue;
            };
            let param: DiagnosticArg = match params.get(idx) {
                Some(&param) => param.into(),
                None => format!("#{idx}").into(),
            };
            diagnostic = diagnostic.with_related(PendingDiagnostic::note(
                diagnostic_codes::GENERIC_ARGUMENT_NOT_EQUAL,
                vec![param, lhs.into(), rhs.into()],
            ));
        }
        ctx.emit(diagnostic, as_note)
    }
}

// =============================================================================
// Requirements
// =============================================================================

/// Same-type requirement `lhs == rhs` does not hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SkipSameTypeRequirement {
    lhs: TypeId,
    rhs: TypeId,
}

impl SkipSameTypeRequirement {
    pub fn lhs_type(&self) -> TypeId {
        self.lhs
    }

    pub fn rhs_type(&self) -> TypeId {
        self.rhs
    }

    pub fn create(cs: &mut ConstraintSystem, lhs: TypeId, rhs: TypeId, locator: LocatorId) -> FixId {
        cs.record_fix(ConstraintFix::new(
            FixKind::SkipSameTypeRequirement,
            locator,
            SkipSameTypeRequirement { lhs, rhs },
        ))
    }
}

impl FixBehavior for SkipSameTypeRequirement {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("skip same-type generic requirement")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let Some(decl) = ctx.callee_decl() else {
            return false;
        };
        let diagnostic = PendingDiagnostic::error(
            diagnostic_codes::SAME_TYPE_REQUIREMENT,
            vec![ctx.decl_name(decl).into(), ctx.resolve(self.lhs).into(), ctx.resolve(self.rhs).into()],
        );
        let diagnostic = with_declared_here(ctx, diagnostic, decl);
        ctx.emit(diagnostic, as_note)
    }
}

/// Superclass requirement `lhs: rhs` does not hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SkipSuperclassRequirement {
    lhs: TypeId,
    rhs: TypeId,
}

impl SkipSuperclassRequirement {
    pub fn lhs_type(&self) -> TypeId {
        self.lhs
    }

    pub fn rhs_type(&self) -> TypeId {
        self.rhs
    }

    pub fn create(cs: &mut ConstraintSystem, lhs: TypeId, rhs: TypeId, locator: LocatorId) -> FixId {
        cs.record_fix(ConstraintFix::new(
            FixKind::SkipSuperclassRequirement,
            locator,
            SkipSuperclassRequirement { lhs, rhs },
        ))
    }
}

impl FixBehavior for SkipSuperclassRequirement {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("skip superclass generic requirement")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let Some(decl) = ctx.callee_decl() else {
            return false;
        };
        let diagnostic = PendingDiagnostic::error(
            diagnostic_codes::SUPERCLASS_REQUIREMENT,
            vec![ctx.decl_name(decl).into(), ctx.resolve(self.lhs).into(), ctx.resolve(self.rhs).into()],
        );
        let diagnostic = with_declared_here(ctx, diagnostic, decl);
        ctx.emit(diagnostic, as_note)
    }
}

/// A type does not conform to a protocol it is required to.
///
/// Either a generic requirement of the callee or a contextual conversion to
/// an existential.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MissingConformance {
    is_contextual: bool,
    ty: TypeId,
    protocol: TypeId,
}

impl MissingConformance {
    pub fn is_contextual(&self) -> bool {
        self.is_contextual
    }

    pub fn non_conforming_type(&self) -> TypeId {
        self.ty
    }

    pub fn protocol_type(&self) -> TypeId {
        self.protocol
    }

    pub fn for_requirement(cs: &mut ConstraintSystem, ty: TypeId, protocol: TypeId, locator: LocatorId) -> FixId {
        Self::record(cs, false, ty, protocol, locator)
    }

    pub fn for_contextual(cs: &mut ConstraintSystem, ty: TypeId, protocol: TypeId, locator: LocatorId) -> FixId {
        Self::record(cs, true, ty, protocol, locator)
    }

    fn record(
        cs: &mut ConstraintSystem,
        is_contextual: bool,
        ty: TypeId,
        protocol: TypeId,
        locator: LocatorId,
    ) -> FixId {
        let payload = MissingConformance {
            is_contextual,
            ty,
            protocol,
        };
        cs.record_fix(ConstraintFix::new(FixKind::AddConformance, locator, payload))
    }
}

impl FixBehavior for MissingConformance {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("add missing protocol conformance")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let ty = ctx.resolve_rvalue(self.ty);
        let protocol = ctx.resolve(self.protocol);
        if ty.is_error() {
            return false;
        }
        if self.is_contextual {
            let diagnostic =
                PendingDiagnostic::error(diagnostic_codes::CONTEXTUAL_CONFORMANCE, vec![ty.into(), protocol.into()]);
            return ctx.emit(diagnostic, as_note);
        }
        let Some(decl) = ctx.callee_decl() else {
            return false;
        };
        let diagnostic = PendingDiagnostic::error(
            diagnostic_codes::CONFORMANCE_REQUIREMENT,
            vec![ctx.decl_name(decl).into(), ty.into(), protocol.into()],
        );
        let diagnostic = with_declared_here(ctx, diagnostic, decl);
        ctx.emit(diagnostic, as_note)
    }
}

// =============================================================================
// Inference
// =============================================================================

/// Generic parameters that could not be inferred from the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplicitlySpecifyGenericArguments {
    params: Box<[TypeId]>,
}

impl ExplicitlySpecifyGenericArguments {
    pub fn params(&self) -> &[TypeId] {
        &self.params
    }

    /// # Panics
    ///
    /// If `params` is empty.
    pub fn create(cs: &mut ConstraintSystem, params: &[TypeId], locator: LocatorId) -> FixId {
        assert!(!params.is_empty(), "no generic parameters to specify");
        let payload = ExplicitlySpecifyGenericArguments { params: params.into() };
        cs.record_fix(ConstraintFix::new(
            FixKind::ExplicitlySpecifyGenericArguments,
            locator,
            payload,
        ))
    }
}

impl FixBehavior for ExplicitlySpecifyGenericArguments {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("default missing generic arguments to `Any`")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let diagnostic = match &*self.params {
            [param] => PendingDiagnostic::error(diagnostic_codes::GENERIC_PARAMETER_NOT_INFERRED, vec![(*param).into()]),
            params => {
                let listed: Vec<String> =
                    params.iter().map(|&param| format!("'{}'", ctx.format_type(param))).collect();
                PendingDiagnostic::error(
                    diagnostic_codes::GENERIC_PARAMETERS_NOT_INFERRED,
                    vec![listed.join(", ").into()],
                )
            }
        };

        let exprs = ctx.exprs();
        let raw = ctx.raw_anchor();
        let callee = match exprs.kind(raw) {
            ExprKind::Call { callee, .. } => *callee,
            _ => raw,
        };
        let arguments = vec!["Any"; self.params.len()].join(", ");
        let note = PendingDiagnostic::note(diagnostic_codes::SPECIFY_GENERIC_ARGUMENTS, Vec::new())
            .with_span(exprs.span(callee))
            .with_fix_it(FixIt::insert_after(exprs.span(callee), format!("<{arguments}>")));
        ctx.emit(diagnostic.with_related(note), as_note)
    }
}

/// Construct a function builder cannot transform.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnhandledConstruct {
    Stmt(StmtKind),
    Decl(DeclId),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SkipUnhandledConstructInFunctionBuilder {
    unhandled: UnhandledConstruct,
    builder: DeclId,
}

impl SkipUnhandledConstructInFunctionBuilder {
    pub fn unhandled(&self) -> UnhandledConstruct {
        self.unhandled
    }

    pub fn builder(&self) -> DeclId {
        self.builder
    }

    pub fn create(
        cs: &mut ConstraintSystem,
        unhandled: UnhandledConstruct,
        builder: DeclId,
        locator: LocatorId,
    ) -> FixId {
        cs.record_fix(ConstraintFix::new(
            FixKind::SkipUnhandledConstructInFunctionBuilder,
            locator,
            SkipUnhandledConstructInFunctionBuilder { unhandled, builder },
        ))
    }
}

impl FixBehavior for SkipUnhandledConstructInFunctionBuilder {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("skip unhandled constructs when applying a function builder")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let (construct, span) = match self.unhandled {
            UnhandledConstruct::Stmt(stmt) => (stmt.description(), None),
            UnhandledConstruct::Decl(decl) => ("a declaration", ctx.decl(decl).map(|info| info.span)),
        };
        let mut diagnostic = PendingDiagnostic::error(
            diagnostic_codes::FUNCTION_BUILDER_UNHANDLED,
            vec![construct.into(), ctx.decl_name(self.builder).into()],
        );
        if let Some(span) = span.filter(|span| !span.is_empty()) {
            diagnostic = diagnostic.with_span(span);
        }
        ctx.emit(diagnostic, as_note)
    }
}

#[cfg(test)]
#[path = "../../tests/generic_tests.rs"]
mod generic_tests;
