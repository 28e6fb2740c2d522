//! Property wrapper access fixes.
//!
//! A wrapped property `foo` exposes its wrapper as `_foo` and its projected
//! value as `$foo`. These fixes handle code that reaches for the wrong one.

use crate::decl::DeclId;
use crate::diagnostics::{FixIt, PendingDiagnostic};
use crate::locator::LocatorId;
use crate::system::{ConstraintSystem, FixId};
use crate::types::TypeId;
use std::borrow::Cow;
use tyfix_common::diagnostics::diagnostic_codes;
use tyfix_common::span::Span;

use super::{ConstraintFix, FailureContext, FixBehavior, FixKind};

fn wrapper_role(using_storage_wrapper: bool) -> &'static str {
    if using_storage_wrapper {
        "projected value"
    } else {
        "property wrapper"
    }
}

fn name_span(ctx: &FailureContext<'_>) -> Span {
    ctx.member_name_span().unwrap_or_else(|| ctx.anchor_span())
}

/// Wrapped value used where the wrapper (or its projection) is expected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UsePropertyWrapper {
    wrapped: DeclId,
    using_storage_wrapper: bool,
    base: TypeId,
    wrapper: TypeId,
}

impl UsePropertyWrapper {
    pub fn wrapped(&self) -> DeclId {
        self.wrapped
    }

    /// `$foo` rather than `_foo`.
    pub fn using_storage_wrapper(&self) -> bool {
        self.using_storage_wrapper
    }

    pub fn base_type(&self) -> TypeId {
        self.base
    }

    pub fn wrapper_type(&self) -> TypeId {
        self.wrapper
    }

    pub fn create(
        cs: &mut ConstraintSystem,
        wrapped: DeclId,
        using_storage_wrapper: bool,
        base: TypeId,
        wrapper: TypeId,
        locator: LocatorId,
    ) -> FixId {
        let payload = UsePropertyWrapper {
            wrapped,
            using_storage_wrapper,
            base,
            wrapper,
        };
        cs.record_fix(ConstraintFix::new(FixKind::UsePropertyWrapper, locator, payload))
    }
}

impl FixBehavior for UsePropertyWrapper {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("insert '$' or '_' to use property wrapper type instead of wrapped type")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let name = ctx.atom_str(ctx.decl_name(self.wrapped));
        let prefix = if self.using_storage_wrapper { "$" } else { "_" };
        let span = name_span(ctx);
        let diagnostic = PendingDiagnostic::error(
            diagnostic_codes::USE_PROPERTY_WRAPPER,
            vec![
                name.clone().into(),
                wrapper_role(self.using_storage_wrapper).into(),
                ctx.resolve(self.wrapper).into(),
                format!("{prefix}{name}").into(),
            ],
        )
        .with_span(span)
        .with_fix_it(FixIt::insert(span, prefix));
        ctx.emit(diagnostic, as_note)
    }
}

/// Wrapper (`_foo`) or projection (`$foo`) used where the wrapped value is
/// expected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UseWrappedValue {
    property_wrapper: DeclId,
    using_storage_wrapper: bool,
    base: TypeId,
    wrapper: TypeId,
}

impl UseWrappedValue {
    /// The `_foo` or `$foo` declaration that was referenced.
    pub fn property_wrapper(&self) -> DeclId {
        self.property_wrapper
    }

    pub fn using_storage_wrapper(&self) -> bool {
        self.using_storage_wrapper
    }

    pub fn base_type(&self) -> TypeId {
        self.base
    }

    pub fn wrapper_type(&self) -> TypeId {
        self.wrapper
    }

    pub fn create(
        cs: &mut ConstraintSystem,
        property_wrapper: DeclId,
        base: TypeId,
        wrapper: TypeId,
        locator: LocatorId,
    ) -> FixId {
        let name = cs.types().resolve_atom(cs.decls().name(property_wrapper));
        let payload = UseWrappedValue {
            property_wrapper,
            using_storage_wrapper: !name.starts_with('_'),
            base,
            wrapper,
        };
        cs.record_fix(ConstraintFix::new(FixKind::UseWrappedValue, locator, payload))
    }
}

impl FixBehavior for UseWrappedValue {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("remove '$' or _ to use wrapped value instead of wrapper type")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let name = ctx.atom_str(ctx.decl_name(self.property_wrapper));
        let Some(wrapped) = name.get(1..).filter(|rest| !rest.is_empty()) else {
            return false;
        };
        let span = name_span(ctx);
        let mut diagnostic = PendingDiagnostic::error(
            diagnostic_codes::USE_WRAPPED_VALUE,
            vec![
                wrapper_role(self.using_storage_wrapper).into(),
                name.clone().into(),
                ctx.resolve(self.wrapper).into(),
                wrapped.into(),
            ],
        )
        .with_span(span);
        if !span.is_empty() {
            diagnostic = diagnostic.with_fix_it(FixIt::remove(Span::new(span.start, span.start + 1)));
        }
        ctx.emit(diagnostic, as_note)
    }
}

#[cfg(test)]
#[path = "../../tests/property_wrapper_tests.rs"]
mod property_wrapper_tests;
