//! Key path fixes.

use crate::decl::{DeclId, DeclKind};
use crate::diagnostics::PendingDiagnostic;
use crate::locator::LocatorId;
use crate::system::{ConstraintSystem, FixId};
use crate::types::TypeId;
use std::borrow::Cow;
use tyfix_common::diagnostics::diagnostic_codes;

use super::{ConstraintFix, FailureContext, FixBehavior, FixKind};

/// Key path rooted at `AnyObject`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AllowAnyObjectKeyPathRoot;

impl AllowAnyObjectKeyPathRoot {
    pub fn create(cs: &mut ConstraintSystem, locator: LocatorId) -> FixId {
        cs.record_fix(ConstraintFix::new(
            FixKind::AllowAnyObjectKeyPathRoot,
            locator,
            AllowAnyObjectKeyPathRoot,
        ))
    }
}

impl FixBehavior for AllowAnyObjectKeyPathRoot {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("allow anyobject as root type for a keypath")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        ctx.emit(
            PendingDiagnostic::error(diagnostic_codes::KEY_PATH_ANY_OBJECT_ROOT, Vec::new()),
            as_note,
        )
    }
}

/// Subscript index in a key path whose type is not `Hashable`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TreatKeyPathSubscriptIndexAsHashable {
    ty: TypeId,
}

impl TreatKeyPathSubscriptIndexAsHashable {
    pub fn non_conforming_type(&self) -> TypeId {
        self.ty
    }

    pub fn create(cs: &mut ConstraintSystem, ty: TypeId, locator: LocatorId) -> FixId {
        cs.record_fix(ConstraintFix::new(
            FixKind::TreatKeyPathSubscriptIndexAsHashable,
            locator,
            TreatKeyPathSubscriptIndexAsHashable { ty },
        ))
    }
}

impl FixBehavior for TreatKeyPathSubscriptIndexAsHashable {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("treat keypath subscript index as conforming to Hashable")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let ty = ctx.resolve_rvalue(self.ty);
        ctx.emit(
            PendingDiagnostic::error(diagnostic_codes::KEY_PATH_SUBSCRIPT_NOT_HASHABLE, vec![ty.into()]),
            as_note,
        )
    }
}

/// Why a key path component cannot refer to a member.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyPathRefKind {
    StaticMember,
    MutatingGetter,
    Method,
}

/// Key path component that refers to a member key paths cannot reach.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AllowInvalidRefInKeyPath {
    kind: KeyPathRefKind,
    member: DeclId,
}

impl AllowInvalidRefInKeyPath {
    pub fn ref_kind(&self) -> KeyPathRefKind {
        self.kind
    }

    pub fn member(&self) -> DeclId {
        self.member
    }

    /// Record the fix when `member` is a method, a static member or a
    /// property with a mutating getter, checked in that order.
    pub fn for_ref(cs: &mut ConstraintSystem, member: DeclId, locator: LocatorId) -> Option<FixId> {
        let info = cs.decls().get(member)?;
        let kind = if info.kind == DeclKind::Func {
            KeyPathRefKind::Method
        } else if info.is_static() {
            KeyPathRefKind::StaticMember
        } else if info.kind == DeclKind::Var && info.has_mutating_getter() {
            KeyPathRefKind::MutatingGetter
        } else {
            return None;
        };
        Some(cs.record_fix(ConstraintFix::new(
            FixKind::AllowInvalidRefInKeyPath,
            locator,
            AllowInvalidRefInKeyPath { kind, member },
        )))
    }
}

impl FixBehavior for AllowInvalidRefInKeyPath {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed(match self.kind {
            KeyPathRefKind::StaticMember => "allow reference to a static member as a key path component",
            KeyPathRefKind::MutatingGetter => "allow reference to a member with mutating getter as a key path component",
            KeyPathRefKind::Method => "allow reference to a method as a key path component",
        })
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let code = match self.kind {
            KeyPathRefKind::StaticMember => diagnostic_codes::KEY_PATH_STATIC_MEMBER,
            KeyPathRefKind::MutatingGetter => diagnostic_codes::KEY_PATH_MUTATING_GETTER,
            KeyPathRefKind::Method => diagnostic_codes::KEY_PATH_METHOD,
        };
        let name = ctx.decl_name(self.member);
        ctx.emit(PendingDiagnostic::error(code, vec![name.into()]), as_note)
    }
}

#[cfg(test)]
#[path = "../../tests/key_path_tests.rs"]
mod key_path_tests;
