//! Constraint fixes.
//!
//! When the solver finds that a constraint cannot hold as stated it records
//! a *fix*: an immutable description of how the mismatch could be repaired,
//! then keeps solving under the relaxed assumption. After a solution has
//! been accepted, every recorded fix is asked once to explain itself as a
//! diagnostic.
//!
//! ## Structure
//!
//! | Layer | Type | Role |
//! |-------|------|------|
//! | Tag | [`FixKind`] | flat discriminant, O(1) kind queries |
//! | Header | [`ConstraintFix`] | kind, locator, warning flag, payload |
//! | Payload | [`FixPayload`] | one struct per concrete variant |
//! | Behavior | `FixBehavior` | debug label and diagnosis, per variant |
//!
//! Payload structs have private fields and no public constructor. They are
//! created through named factories (`create`, `attempt`, `for_ref`, ...)
//! which record the fix against the session's current branch and hand back
//! a [`FixId`](crate::system::FixId). Fallible attempts return `None` when
//! the repair does not apply and record nothing.
//!
//! Variable-length payloads (labels, generic argument positions,
//! synthesized parameters) are `Box<[T]>` fixed at construction and only
//! exposed as slices.

use crate::locator::LocatorId;
use crate::system::ConstraintSystem;
use crate::expr::ExprId;
use std::borrow::Cow;
use std::fmt;

mod arguments;
mod contextual;
mod expression;
mod failure;
mod generic;
mod key_path;
mod member_ref;
mod optional;
mod property_wrapper;

pub use arguments::{
    AddMissingArguments, AllowClosureParamDestructuring, AllowTupleSplatForSingleParameter,
    MoveOutOfOrderArgument, ParamBinding, RelabelArguments,
};
pub use contextual::{
    AddAddressOf, AllowArgumentMismatch, AllowAutoClosurePointerConversion, AllowInOutConversion,
    AllowTupleTypeMismatch, CoerceToCheckedCast, CollectionElementContextualMismatch,
    ContextualMismatch, DropThrowsAttribute, ExpandArrayIntoVarargs,
    ExplicitlyConstructRawRepresentable, ForceDowncast, IgnoreAssignmentDestinationType,
    IgnoreContextualType, KeyPathContextualMismatch, RemoveAddressOf,
    UseValueTypeOfRawRepresentative,
};
pub use expression::{
    AutoClosureForwarding, InsertExplicitCall, MarkExplicitlyEscaping, RemoveReturn,
    TreatRValueAsLValue, UseSubscriptOperator,
};
pub use failure::{ContextualPurpose, FailureContext};
pub use generic::{
    ExplicitlySpecifyGenericArguments, GenericArgumentsMismatch, MissingConformance,
    SkipSameTypeRequirement, SkipSuperclassRequirement, SkipUnhandledConstructInFunctionBuilder,
    UnhandledConstruct,
};
pub use key_path::{
    AllowAnyObjectKeyPathRoot, AllowInvalidRefInKeyPath, KeyPathRefKind,
    TreatKeyPathSubscriptIndexAsHashable,
};
pub use member_ref::{
    AllowInaccessibleMember, AllowInvalidInitRef, AllowInvalidPartialApplication,
    AllowMemberRefOnExistential, AllowMutatingMemberOnRValueBase, AllowTypeOrInstanceMember,
    DefineMemberBasedOnUse, InitRefKind, InvalidMemberRef,
};
pub use optional::{ForceOptional, RemoveUnwrap, UnwrapOptionalBase};
pub use property_wrapper::{UsePropertyWrapper, UseWrappedValue};

// =============================================================================
// FixKind
// =============================================================================

macro_rules! define_fix_kinds {
    ($($(#[$meta:meta])* $kind:ident = $value:literal => $family:ident,)*) => {
        /// Discriminant of every concrete fix variant.
        ///
        /// Values are explicit and never reused; a retired variant keeps its
        /// number reserved.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum FixKind {
            $($(#[$meta])* $kind = $value,)*
        }

        impl FixKind {
            /// Every kind, in discriminant order.
            pub const ALL: &'static [FixKind] = &[$(FixKind::$kind,)*];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(FixKind::$kind => stringify!($kind),)*
                }
            }

            pub const fn family(self) -> FixFamily {
                match self {
                    $(FixKind::$kind => FixFamily::$family,)*
                }
            }
        }
    };
}

define_fix_kinds! {
    /// Two types disagree in a context with no more specific repair.
    ContextualMismatch = 0 => Contextual,
    /// Introduce a `!` to force an optional unwrap.
    ForceOptional = 1 => Contextual,
    /// Introduce an `as!` to force a downcast.
    ForceDowncast = 2 => Contextual,
    /// Introduce a `&` to form an inout argument.
    AddressOf = 3 => Contextual,
    /// Remove an extraneous `&`.
    RemoveAddressOf = 4 => Contextual,
    /// Drop `throws` from a function type to make it convertible.
    DropThrowsAttribute = 5 => Contextual,
    /// Generic arguments of two applications of one declaration differ.
    GenericArgumentsMismatch = 6 => Contextual,
    KeyPathContextualMismatch = 7 => Contextual,
    AllowAutoClosurePointerConversion = 8 => Contextual,
    AllowTupleTypeMismatch = 9 => Contextual,
    CollectionElementContextualMismatch = 10 => Contextual,
    IgnoreContextualType = 11 => Contextual,
    IgnoreAssignmentDestinationType = 12 => Contextual,
    /// Argument and `inout` parameter must have identical types.
    AllowInOutConversion = 13 => Contextual,
    /// Replace `as` with `as!`.
    CoerceToCheckedCast = 14 => Contextual,
    AllowArgumentTypeMismatch = 15 => Contextual,
    ExpandArrayIntoVarargs = 16 => Contextual,
    ExplicitlyConstructRawRepresentable = 17 => Contextual,
    UseValueTypeOfRawRepresentative = 18 => Contextual,

    /// Pretend a missing member exists, typed by its use.
    DefineMemberBasedOnUse = 19 => MemberReference,
    AllowMemberRefOnExistential = 20 => MemberReference,
    AllowTypeOrInstanceMember = 21 => MemberReference,
    AllowInaccessibleMember = 22 => MemberReference,
    AllowMutatingMemberOnRValueBase = 23 => MemberReference,
    AllowInvalidPartialApplication = 24 => MemberReference,
    AllowInvalidInitRef = 25 => MemberReference,
    /// Unwrap an optional base of a member lookup.
    UnwrapOptionalBase = 26 => MemberReference,
    /// Same as `UnwrapOptionalBase`, where the lookup result is optional too.
    UnwrapOptionalBaseWithOptionalResult = 27 => MemberReference,
    UseSubscriptOperator = 28 => MemberReference,

    RelabelArguments = 29 => ArgumentList,
    AddMissingArguments = 30 => ArgumentList,
    MoveOutOfOrderArgument = 31 => ArgumentList,
    AllowTupleSplatForSingleParameter = 32 => ArgumentList,
    AllowClosureParameterDestructuring = 33 => ArgumentList,

    /// Add a missing protocol conformance.
    AddConformance = 34 => GenericRequirement,
    SkipSameTypeRequirement = 35 => GenericRequirement,
    SkipSuperclassRequirement = 36 => GenericRequirement,
    ExplicitlySpecifyGenericArguments = 37 => GenericRequirement,
    SkipUnhandledConstructInFunctionBuilder = 38 => GenericRequirement,

    AllowAnyObjectKeyPathRoot = 39 => KeyPath,
    TreatKeyPathSubscriptIndexAsHashable = 40 => KeyPath,
    AllowInvalidRefInKeyPath = 41 => KeyPath,

    UsePropertyWrapper = 42 => PropertyWrapper,
    UseWrappedValue = 43 => PropertyWrapper,

    AutoClosureForwarding = 44 => Other,
    /// Insert `()` to call a function value.
    InsertCall = 45 => Other,
    /// Remove a `!` or `?` applied to a non-optional.
    RemoveUnwrap = 46 => Other,
    TreatRValueAsLValue = 47 => Other,
    /// Mark a function type `@escaping`.
    ExplicitlyEscaping = 48 => Other,
    RemoveReturn = 49 => Other,
}

impl fmt::Display for FixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Group of variants that share payload shape and diagnostic logic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FixFamily {
    /// `(from, to)` type pair repairs.
    Contextual,
    /// Member lookup repairs.
    MemberReference,
    /// Call-argument binding repairs.
    ArgumentList,
    GenericRequirement,
    KeyPath,
    PropertyWrapper,
    Other,
}

// =============================================================================
// Payloads
// =============================================================================

/// Per-variant debug label and diagnosis.
pub(crate) trait FixBehavior {
    /// Pure label for solver tracing; never shown to users.
    fn name(&self, kind: FixKind, cs: &ConstraintSystem) -> Cow<'static, str>;

    /// Emit at most one diagnostic (with attached notes) through `ctx`.
    ///
    /// Returns `false` when, with everything resolved, no message is
    /// warranted.
    fn diagnose(&self, kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool;
}

mod sealed {
    pub trait Sealed {}
}

/// A payload struct that can be stored in a [`ConstraintFix`].
pub trait FixVariant: sealed::Sealed + Sized {
    /// Kinds this variant may be tagged with.
    const KINDS: &'static [FixKind];

    fn from_payload(payload: &FixPayload) -> Option<&Self>;

    #[doc(hidden)]
    fn into_payload(self) -> FixPayload;
}

macro_rules! define_fix_payloads {
    ($($variant:ident => [$($kind:ident),+],)*) => {
        /// Payload of a recorded fix, one variant per concrete fix type.
        #[derive(Clone, Debug, PartialEq)]
        pub enum FixPayload {
            $($variant($variant),)*
        }

        impl FixPayload {
            fn behavior(&self) -> &dyn FixBehavior {
                match self {
                    $(FixPayload::$variant(payload) => payload,)*
                }
            }
        }

        $(
            impl sealed::Sealed for $variant {}

            impl FixVariant for $variant {
                const KINDS: &'static [FixKind] = &[$(FixKind::$kind),+];

                fn from_payload(payload: &FixPayload) -> Option<&Self> {
                    match payload {
                        FixPayload::$variant(payload) => Some(payload),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn into_payload(self) -> FixPayload {
                    FixPayload::$variant(self)
                }
            }
        )*
    };
}

define_fix_payloads! {
    ContextualMismatch => [ContextualMismatch],
    ForceOptional => [ForceOptional],
    ForceDowncast => [ForceDowncast],
    AddAddressOf => [AddressOf],
    RemoveAddressOf => [RemoveAddressOf],
    DropThrowsAttribute => [DropThrowsAttribute],
    GenericArgumentsMismatch => [GenericArgumentsMismatch],
    KeyPathContextualMismatch => [KeyPathContextualMismatch],
    AllowAutoClosurePointerConversion => [AllowAutoClosurePointerConversion],
    AllowTupleTypeMismatch => [AllowTupleTypeMismatch],
    CollectionElementContextualMismatch => [CollectionElementContextualMismatch],
    IgnoreContextualType => [IgnoreContextualType],
    IgnoreAssignmentDestinationType => [IgnoreAssignmentDestinationType],
    AllowInOutConversion => [AllowInOutConversion],
    CoerceToCheckedCast => [CoerceToCheckedCast],
    AllowArgumentMismatch => [AllowArgumentTypeMismatch],
    ExpandArrayIntoVarargs => [ExpandArrayIntoVarargs],
    ExplicitlyConstructRawRepresentable => [ExplicitlyConstructRawRepresentable],
    UseValueTypeOfRawRepresentative => [UseValueTypeOfRawRepresentative],
    DefineMemberBasedOnUse => [DefineMemberBasedOnUse],
    AllowMemberRefOnExistential => [AllowMemberRefOnExistential],
    AllowTypeOrInstanceMember => [AllowTypeOrInstanceMember],
    AllowInaccessibleMember => [AllowInaccessibleMember],
    AllowMutatingMemberOnRValueBase => [AllowMutatingMemberOnRValueBase],
    AllowInvalidPartialApplication => [AllowInvalidPartialApplication],
    AllowInvalidInitRef => [AllowInvalidInitRef],
    UnwrapOptionalBase => [UnwrapOptionalBase, UnwrapOptionalBaseWithOptionalResult],
    UseSubscriptOperator => [UseSubscriptOperator],
    RelabelArguments => [RelabelArguments],
    AddMissingArguments => [AddMissingArguments],
    MoveOutOfOrderArgument => [MoveOutOfOrderArgument],
    AllowTupleSplatForSingleParameter => [AllowTupleSplatForSingleParameter],
    AllowClosureParamDestructuring => [AllowClosureParameterDestructuring],
    MissingConformance => [AddConformance],
    SkipSameTypeRequirement => [SkipSameTypeRequirement],
    SkipSuperclassRequirement => [SkipSuperclassRequirement],
    ExplicitlySpecifyGenericArguments => [ExplicitlySpecifyGenericArguments],
    SkipUnhandledConstructInFunctionBuilder => [SkipUnhandledConstructInFunctionBuilder],
    AllowAnyObjectKeyPathRoot => [AllowAnyObjectKeyPathRoot],
    TreatKeyPathSubscriptIndexAsHashable => [TreatKeyPathSubscriptIndexAsHashable],
    AllowInvalidRefInKeyPath => [AllowInvalidRefInKeyPath],
    UsePropertyWrapper => [UsePropertyWrapper],
    UseWrappedValue => [UseWrappedValue],
    AutoClosureForwarding => [AutoClosureForwarding],
    InsertExplicitCall => [InsertCall],
    RemoveUnwrap => [RemoveUnwrap],
    TreatRValueAsLValue => [TreatRValueAsLValue],
    MarkExplicitlyEscaping => [ExplicitlyEscaping],
    RemoveReturn => [RemoveReturn],
}

// =============================================================================
// ConstraintFix
// =============================================================================

/// A recorded fix: common header plus variant payload.
///
/// Immutable once recorded. Scoring bookkeeping lives in the session, not
/// here.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstraintFix {
    kind: FixKind,
    locator: LocatorId,
    is_warning: bool,
    payload: FixPayload,
}

impl ConstraintFix {
    /// Build a fix header around `payload`.
    ///
    /// # Panics
    ///
    /// If `kind` is not one of the kinds documented for `T`.
    pub(crate) fn new<T: FixVariant>(kind: FixKind, locator: LocatorId, payload: T) -> Self {
        assert!(
            T::KINDS.contains(&kind),
            "fix kind {kind} does not match payload (expected one of {:?})",
            T::KINDS
        );
        ConstraintFix {
            kind,
            locator,
            is_warning: false,
            payload: payload.into_payload(),
        }
    }

    #[must_use]
    pub(crate) fn with_warning(mut self, is_warning: bool) -> Self {
        self.is_warning = is_warning;
        self
    }

    #[inline]
    pub fn kind(&self) -> FixKind {
        self.kind
    }

    #[inline]
    pub fn is_warning(&self) -> bool {
        self.is_warning
    }

    #[inline]
    pub fn locator(&self) -> LocatorId {
        self.locator
    }

    #[inline]
    pub fn payload(&self) -> &FixPayload {
        &self.payload
    }

    /// Typed access to the payload.
    pub fn get<T: FixVariant>(&self) -> Option<&T> {
        T::from_payload(&self.payload)
    }

    /// Expression the fix is anchored to, without simplification.
    pub fn anchor(&self, cs: &ConstraintSystem) -> ExprId {
        cs.get_locator(self.locator).anchor()
    }

    /// Debug label.
    pub fn name(&self, cs: &ConstraintSystem) -> Cow<'static, str> {
        self.payload.behavior().name(self.kind, cs)
    }

    /// Render this fix against the resolved expression tree.
    ///
    /// `as_note` requests a note attached to a diagnostic emitted elsewhere
    /// instead of a standalone diagnostic. Returns whether anything was
    /// emitted.
    pub fn diagnose(&self, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        self.payload.behavior().diagnose(self.kind, ctx, as_note)
    }

    /// `[fix: <name>] @ <locator>` for solver tracing.
    pub fn describe(&self, cs: &ConstraintSystem) -> String {
        format!("[fix: {}] @ {}", self.name(cs), cs.get_locator(self.locator))
    }
}

#[cfg(test)]
#[path = "../../tests/fix_kind_tests.rs"]
mod fix_kind_tests;
