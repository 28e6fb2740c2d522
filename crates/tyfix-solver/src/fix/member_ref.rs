//! Member reference fixes.
//!
//! Most leaves share [`InvalidMemberRef`]: the base type the lookup ran on,
//! the member that was found (if any) and the name that was written.

use crate::decl::{DeclFlags, DeclId};
use crate::diagnostics::{FixIt, PendingDiagnostic};
use crate::expr::ExprKind;
use crate::locator::LocatorId;
use crate::system::{ConstraintSystem, FixId};
use crate::types::TypeId;
use std::borrow::Cow;
use tyfix_common::diagnostics::diagnostic_codes;
use tyfix_common::interner::Atom;
use tyfix_common::span::Span;

use super::{ConstraintFix, FailureContext, FixBehavior, FixKind};

/// Payload shared by member reference leaves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvalidMemberRef {
    base: TypeId,
    member: Option<DeclId>,
    name: Atom,
}

impl InvalidMemberRef {
    const fn new(base: TypeId, member: Option<DeclId>, name: Atom) -> Self {
        InvalidMemberRef { base, member, name }
    }

    pub fn base_type(&self) -> TypeId {
        self.base
    }

    pub fn member(&self) -> Option<DeclId> {
        self.member
    }

    pub fn member_name(&self) -> Atom {
        self.name
    }
}

macro_rules! member_ref_leaf {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            member_ref: InvalidMemberRef,
        }

        impl $name {
            #[inline]
            pub fn base_type(&self) -> TypeId {
                self.member_ref.base_type()
            }

            #[inline]
            pub fn member(&self) -> Option<DeclId> {
                self.member_ref.member()
            }

            #[inline]
            pub fn member_name(&self) -> Atom {
                self.member_ref.member_name()
            }

            pub fn create(
                cs: &mut ConstraintSystem,
                base: TypeId,
                member: Option<DeclId>,
                name: Atom,
                locator: LocatorId,
            ) -> FixId {
                Self::check(cs, member);
                let payload = $name {
                    member_ref: InvalidMemberRef::new(base, member, name),
                };
                cs.record_fix(ConstraintFix::new(FixKind::$name, locator, payload))
            }
        }
    };
}

fn declared_here(ctx: &FailureContext<'_>, decl: Option<DeclId>) -> Option<PendingDiagnostic> {
    let info = ctx.decl(decl?)?;
    if info.span.is_empty() {
        return None;
    }
    Some(PendingDiagnostic::note(diagnostic_codes::DECLARED_HERE, vec![info.name.into()]).with_span(info.span))
}

/// Span of the member name when written, else the anchor.
fn member_span(ctx: &FailureContext<'_>) -> Span {
    ctx.member_name_span().unwrap_or_else(|| ctx.anchor_span())
}

// =============================================================================
// Invalid Member References
// =============================================================================

member_ref_leaf! {
    /// Member that cannot be used on a value of protocol type.
    AllowMemberRefOnExistential
}

impl AllowMemberRefOnExistential {
    fn check(_cs: &ConstraintSystem, _member: Option<DeclId>) {}
}

impl FixBehavior for AllowMemberRefOnExistential {
    fn name(&self, _kind: FixKind, cs: &ConstraintSystem) -> Cow<'static, str> {
        let name = cs.types().resolve_atom(self.member_name());
        Cow::Owned(format!("allow access to invalid member '{name}' on value of protocol type"))
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let base = ctx.resolve_rvalue(self.base_type());
        let diagnostic = PendingDiagnostic::error(
            diagnostic_codes::MEMBER_ON_EXISTENTIAL,
            vec![self.member_name().into(), base.into()],
        )
        .with_span(member_span(ctx));
        ctx.emit(diagnostic, as_note)
    }
}

member_ref_leaf! {
    /// Instance member referenced on a type, or a static member on an instance.
    AllowTypeOrInstanceMember
}

impl AllowTypeOrInstanceMember {
    fn check(cs: &ConstraintSystem, member: Option<DeclId>) {
        let Some(member) = member else {
            panic!("AllowTypeOrInstanceMember requires the referenced member");
        };
        assert!(cs.decls().contains(member), "unknown member declaration {member:?}");
    }
}

impl FixBehavior for AllowTypeOrInstanceMember {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("allow access to instance member on type or a type member on instance")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let base = ctx.resolve_rvalue(self.base_type());
        let name = self.member_name();
        let diagnostic = match ctx.types().metatype_instance(base) {
            Some(instance) => PendingDiagnostic::error(
                diagnostic_codes::INSTANCE_MEMBER_ON_TYPE,
                vec![name.into(), instance.into()],
            ),
            None => {
                let mut diagnostic = PendingDiagnostic::error(
                    diagnostic_codes::STATIC_MEMBER_ON_INSTANCE,
                    vec![name.into(), base.into()],
                );
                if let Some(base_expr) = ctx.member_base() {
                    let type_name = ctx.format_type(base);
                    diagnostic =
                        diagnostic.with_fix_it(FixIt::replace(ctx.exprs().span(base_expr), type_name));
                }
                diagnostic
            }
        };
        let diagnostic = diagnostic.with_span(member_span(ctx));
        ctx.emit(diagnostic, as_note)
    }
}

member_ref_leaf! {
    /// Member that is not accessible from the reference site.
    AllowInaccessibleMember
}

impl AllowInaccessibleMember {
    fn check(_cs: &ConstraintSystem, _member: Option<DeclId>) {}
}

impl FixBehavior for AllowInaccessibleMember {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("allow inaccessible member reference")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let Some(info) = self.member().and_then(|member| ctx.decl(member)) else {
            return false;
        };
        let mut diagnostic = PendingDiagnostic::error(
            diagnostic_codes::INACCESSIBLE_MEMBER,
            vec![self.member_name().into(), info.access.as_str().into()],
        )
        .with_span(member_span(ctx));
        if let Some(note) = declared_here(ctx, self.member()) {
            diagnostic = diagnostic.with_related(note);
        }
        ctx.emit(diagnostic, as_note)
    }
}

member_ref_leaf! {
    /// `mutating` member used on an immutable base.
    AllowMutatingMemberOnRValueBase
}

impl AllowMutatingMemberOnRValueBase {
    fn check(_cs: &ConstraintSystem, _member: Option<DeclId>) {}
}

impl FixBehavior for AllowMutatingMemberOnRValueBase {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("allow `mutating` method on r-value base")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let base = ctx.resolve_rvalue(self.base_type());
        let mut diagnostic =
            PendingDiagnostic::error(diagnostic_codes::MUTATING_ON_RVALUE, vec![base.into()])
                .with_span(member_span(ctx));
        let let_binding = ctx
            .member_base()
            .and_then(|base_expr| match ctx.exprs().kind(ctx.exprs().semantics_provider(base_expr)) {
                ExprKind::DeclRef(decl) => ctx.decl(*decl),
                _ => None,
            })
            .filter(|info| info.flags.contains(DeclFlags::LET) && !info.span.is_empty());
        if let Some(info) = let_binding {
            diagnostic = diagnostic
                .with_related(PendingDiagnostic::note(diagnostic_codes::CHANGE_LET_TO_VAR, Vec::new()).with_span(info.span));
        }
        ctx.emit(diagnostic, as_note)
    }
}

// =============================================================================
// Missing Members
// =============================================================================

/// Pretend a member that does not exist is there, typed by its use.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DefineMemberBasedOnUse {
    base: TypeId,
    name: Atom,
}

impl DefineMemberBasedOnUse {
    pub fn base_type(&self) -> TypeId {
        self.base
    }

    pub fn member_name(&self) -> Atom {
        self.name
    }

    pub fn create(cs: &mut ConstraintSystem, base: TypeId, name: Atom, locator: LocatorId) -> FixId {
        cs.record_fix(ConstraintFix::new(
            FixKind::DefineMemberBasedOnUse,
            locator,
            DefineMemberBasedOnUse { base, name },
        ))
    }
}

impl FixBehavior for DefineMemberBasedOnUse {
    fn name(&self, _kind: FixKind, cs: &ConstraintSystem) -> Cow<'static, str> {
        let name = cs.types().resolve_atom(self.name);
        Cow::Owned(format!("define missing member named '{name}' based on its use"))
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let base = ctx.resolve_rvalue(self.base);
        if base.is_error() {
            return false;
        }
        let diagnostic = match ctx.types().metatype_instance(base) {
            Some(instance) => PendingDiagnostic::error(
                diagnostic_codes::TYPE_HAS_NO_MEMBER,
                vec![instance.into(), self.name.into()],
            ),
            None => PendingDiagnostic::error(diagnostic_codes::NO_MEMBER, vec![base.into(), self.name.into()]),
        }
        .with_span(member_span(ctx));
        ctx.emit(diagnostic, as_note)
    }
}

// =============================================================================
// Partial Application and Initializers
// =============================================================================

/// Partially applied `mutating` method. Warning-level under some language
/// modes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AllowInvalidPartialApplication;

impl AllowInvalidPartialApplication {
    pub fn create(cs: &mut ConstraintSystem, is_warning: bool, locator: LocatorId) -> FixId {
        cs.record_fix(
            ConstraintFix::new(FixKind::AllowInvalidPartialApplication, locator, AllowInvalidPartialApplication)
                .with_warning(is_warning),
        )
    }
}

impl FixBehavior for AllowInvalidPartialApplication {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("allow partially applied 'mutating' method")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let diagnostic = PendingDiagnostic::error(diagnostic_codes::PARTIAL_APPLY_MUTATING, Vec::new());
        ctx.emit(diagnostic, as_note)
    }
}

/// Why an initializer reference through a metatype is invalid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InitRefKind {
    /// Non-`required` initializer called on a dynamic class metatype.
    DynamicOnMetatype,
    /// Initializer called on a protocol metatype.
    ProtocolMetatype,
    /// `T(...)` on a metatype value instead of `T.init(...)`.
    NonConstMetatype,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AllowInvalidInitRef {
    kind: InitRefKind,
    base_type: TypeId,
    init: DeclId,
    is_statically_derived: bool,
    base_span: Span,
}

impl AllowInvalidInitRef {
    pub fn ref_kind(&self) -> InitRefKind {
        self.kind
    }

    pub fn base_type(&self) -> TypeId {
        self.base_type
    }

    pub fn init(&self) -> DeclId {
        self.init
    }

    pub fn is_statically_derived(&self) -> bool {
        self.is_statically_derived
    }

    pub fn base_span(&self) -> Span {
        self.base_span
    }

    pub fn dynamic_on_metatype(
        cs: &mut ConstraintSystem,
        base_type: TypeId,
        init: DeclId,
        base_span: Span,
        locator: LocatorId,
    ) -> FixId {
        Self::record(cs, InitRefKind::DynamicOnMetatype, base_type, init, false, base_span, locator)
    }

    pub fn on_protocol_metatype(
        cs: &mut ConstraintSystem,
        base_type: TypeId,
        init: DeclId,
        is_statically_derived: bool,
        base_span: Span,
        locator: LocatorId,
    ) -> FixId {
        Self::record(
            cs,
            InitRefKind::ProtocolMetatype,
            base_type,
            init,
            is_statically_derived,
            base_span,
            locator,
        )
    }

    pub fn on_non_const_metatype(
        cs: &mut ConstraintSystem,
        base_type: TypeId,
        init: DeclId,
        base_span: Span,
        locator: LocatorId,
    ) -> FixId {
        Self::record(cs, InitRefKind::NonConstMetatype, base_type, init, false, base_span, locator)
    }

    fn record(
        cs: &mut ConstraintSystem,
        kind: InitRefKind,
        base_type: TypeId,
        init: DeclId,
        is_statically_derived: bool,
        base_span: Span,
        locator: LocatorId,
    ) -> FixId {
        let payload = AllowInvalidInitRef {
            kind,
            base_type,
            init,
            is_statically_derived,
            base_span,
        };
        cs.record_fix(ConstraintFix::new(FixKind::AllowInvalidInitRef, locator, payload))
    }
}

impl FixBehavior for AllowInvalidInitRef {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("allow invalid initializer reference")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let base = ctx.resolve_rvalue(self.base_type);
        let instance = ctx.types().metatype_instance(base).unwrap_or(base);
        let span = if self.base_span.is_empty() {
            ctx.anchor_span()
        } else {
            self.base_span
        };
        let mut diagnostic = match self.kind {
            InitRefKind::DynamicOnMetatype => {
                let mut diagnostic =
                    PendingDiagnostic::error(diagnostic_codes::DYNAMIC_CONSTRUCT_CLASS, vec![instance.into()]);
                if let Some(note) = declared_here(ctx, Some(self.init)) {
                    diagnostic = diagnostic.with_related(note);
                }
                diagnostic
            }
            InitRefKind::ProtocolMetatype if self.is_statically_derived => {
                PendingDiagnostic::error(diagnostic_codes::CONSTRUCT_PROTOCOL_METATYPE, vec![instance.into()])
            }
            // `P.Type` reached through a value names the value's type.
            InitRefKind::ProtocolMetatype => {
                PendingDiagnostic::error(diagnostic_codes::CONSTRUCT_PROTOCOL_VALUE, vec![base.into()])
            }
            InitRefKind::NonConstMetatype => {
                PendingDiagnostic::error(diagnostic_codes::INIT_REF_ON_NON_CONST_METATYPE, Vec::new())
                    .with_fix_it(FixIt::insert_after(span, ".init"))
            }
        };
        diagnostic = diagnostic.with_span(span);
        ctx.emit(diagnostic, as_note)
    }
}

#[cfg(test)]
#[path = "../../tests/member_ref_tests.rs"]
mod member_ref_tests;
