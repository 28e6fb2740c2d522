//! Contextual mismatch family.
//!
//! Every fix here carries the `(from, to)` type pair of a failed conversion
//! and shares [`ContextualMismatch`] as its payload base. Leaves specialise
//! the wording and the suggested edit.

use crate::diagnostics::{FixIt, PendingDiagnostic};
use crate::expr::ExprKind;
use crate::format::TypeFormatter;
use crate::locator::LocatorId;
use crate::relation::{CheckedCastKind, classify_checked_cast, is_convertible, look_through_optionals, raw_representable_type};
use crate::system::{ConstraintSystem, FixId};
use crate::types::{ParamFlags, TypeData, TypeId};
use std::borrow::Cow;
use tracing::trace;
use tyfix_common::diagnostics::diagnostic_codes;
use tyfix_common::span::Span;

use super::{ConstraintFix, FailureContext, FixBehavior, FixKind};

/// Declare a leaf payload wrapping a [`ContextualMismatch`].
macro_rules! contextual_leaf {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            mismatch: $crate::fix::ContextualMismatch,
        }

        impl $name {
            #[inline]
            pub fn from_type(&self) -> $crate::types::TypeId {
                self.mismatch.from_type()
            }

            #[inline]
            pub fn to_type(&self) -> $crate::types::TypeId {
                self.mismatch.to_type()
            }

            #[inline]
            pub fn mismatch(&self) -> &$crate::fix::ContextualMismatch {
                &self.mismatch
            }

            fn record(
                cs: &mut $crate::system::ConstraintSystem,
                from: $crate::types::TypeId,
                to: $crate::types::TypeId,
                locator: $crate::locator::LocatorId,
            ) -> $crate::system::FixId {
                let payload = $name {
                    mismatch: $crate::fix::ContextualMismatch::new(from, to),
                };
                cs.record_fix($crate::fix::ConstraintFix::new(
                    $crate::fix::FixKind::$kind,
                    locator,
                    payload,
                ))
            }
        }
    };
}

pub(crate) use contextual_leaf;

fn emit_pair(ctx: &mut FailureContext<'_>, code: u32, from: TypeId, to: TypeId, as_note: bool) -> bool {
    ctx.emit(PendingDiagnostic::error(code, vec![from.into(), to.into()]), as_note)
}

// =============================================================================
// ContextualMismatch
// =============================================================================

/// Two types disagree and nothing more specific applies.
///
/// Also the shared base of every leaf in this family.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ContextualMismatch {
    from: TypeId,
    to: TypeId,
}

impl ContextualMismatch {
    pub(crate) const fn new(from: TypeId, to: TypeId) -> Self {
        ContextualMismatch { from, to }
    }

    #[inline]
    pub fn from_type(&self) -> TypeId {
        self.from
    }

    #[inline]
    pub fn to_type(&self) -> TypeId {
        self.to
    }

    pub fn create(cs: &mut ConstraintSystem, from: TypeId, to: TypeId, locator: LocatorId) -> FixId {
        cs.record_fix(ConstraintFix::new(
            FixKind::ContextualMismatch,
            locator,
            ContextualMismatch::new(from, to),
        ))
    }

    /// `(from, to)` with the solution applied; `from` is taken as an r-value.
    pub(crate) fn resolved(&self, ctx: &FailureContext<'_>) -> (TypeId, TypeId) {
        (ctx.resolve_rvalue(self.from), ctx.resolve(self.to))
    }

    /// Generic "cannot convert" wording for the locator's purpose.
    pub(crate) fn diagnose_conversion(&self, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let (from, to) = self.resolved(ctx);
        if from == to {
            return false;
        }
        let code = ctx.contextual_purpose().conversion_code();
        emit_pair(ctx, code, from, to, as_note)
    }
}

impl FixBehavior for ContextualMismatch {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("fix contextual mismatch")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        self.diagnose_conversion(ctx, as_note)
    }
}

// =============================================================================
// Casts and Address-of
// =============================================================================

contextual_leaf! {
    /// Introduce `as! T` on a value whose static type is a supertype of `T`.
    ForceDowncast => ForceDowncast
}

impl ForceDowncast {
    pub fn create(cs: &mut ConstraintSystem, from: TypeId, to: TypeId, locator: LocatorId) -> FixId {
        Self::record(cs, from, to, locator)
    }
}

impl FixBehavior for ForceDowncast {
    fn name(&self, _kind: FixKind, cs: &ConstraintSystem) -> Cow<'static, str> {
        let to = TypeFormatter::new(cs.types(), cs.decls()).format(self.to_type());
        Cow::Owned(format!("force downcast (as! {to})"))
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let (from, to) = self.mismatch.resolved(ctx);
        let insertion = format!(" as! {}", ctx.format_type(to));
        let diagnostic = PendingDiagnostic::error(
            diagnostic_codes::MISSING_FORCED_DOWNCAST,
            vec![from.into(), to.into()],
        )
        .with_fix_it(FixIt::insert_after(ctx.anchor_span(), insertion));
        ctx.emit(diagnostic, as_note)
    }
}

contextual_leaf! {
    /// Introduce `&` to pass a value to an `inout` parameter.
    AddAddressOf => AddressOf
}

impl AddAddressOf {
    pub fn create(cs: &mut ConstraintSystem, from: TypeId, to: TypeId, locator: LocatorId) -> FixId {
        Self::record(cs, from, to, locator)
    }
}

impl FixBehavior for AddAddressOf {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("add address-of")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let from = ctx.resolve_rvalue(self.from_type());
        let diagnostic = PendingDiagnostic::error(diagnostic_codes::MISSING_ADDRESS_OF, vec![from.into()])
            .with_fix_it(FixIt::insert(ctx.anchor_span(), "&"));
        ctx.emit(diagnostic, as_note)
    }
}

contextual_leaf! {
    /// Remove a `&` applied where no `inout` is expected.
    RemoveAddressOf => RemoveAddressOf
}

impl RemoveAddressOf {
    pub fn create(cs: &mut ConstraintSystem, from: TypeId, to: TypeId, locator: LocatorId) -> FixId {
        Self::record(cs, from, to, locator)
    }
}

impl FixBehavior for RemoveAddressOf {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("remove extraneous use of `&`")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let exprs = ctx.exprs();
        let anchor = ctx.anchor();
        let mut diagnostic = PendingDiagnostic::error(diagnostic_codes::EXTRANEOUS_ADDRESS_OF, Vec::new());
        if let ExprKind::InOut(sub) = exprs.kind(anchor) {
            let ampersand = Span::new(exprs.span(anchor).start, exprs.span(*sub).start);
            diagnostic = diagnostic.with_fix_it(FixIt::remove(ampersand));
        }
        ctx.emit(diagnostic, as_note)
    }
}

contextual_leaf! {
    /// A throwing function is passed where a non-throwing one is expected.
    DropThrowsAttribute => DropThrowsAttribute
}

impl DropThrowsAttribute {
    /// # Panics
    ///
    /// Unless both types are function types that differ in `throws`.
    pub fn create(cs: &mut ConstraintSystem, from: TypeId, to: TypeId, locator: LocatorId) -> FixId {
        let types = cs.types();
        let (Some(from_fn), Some(to_fn)) = (types.function_of(from), types.function_of(to)) else {
            panic!("DropThrowsAttribute requires two function types");
        };
        assert!(
            from_fn.throws != to_fn.throws,
            "DropThrowsAttribute requires function types that differ in `throws`"
        );
        Self::record(cs, from, to, locator)
    }
}

impl FixBehavior for DropThrowsAttribute {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("drop 'throws' attribute")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let (from, to) = self.mismatch.resolved(ctx);
        emit_pair(ctx, diagnostic_codes::THROWING_TO_NON_THROWING, from, to, as_note)
    }
}

contextual_leaf! {
    /// Replace a plain `as` coercion that can only succeed at run time with `as!`.
    CoerceToCheckedCast => CoerceToCheckedCast
}

impl CoerceToCheckedCast {
    /// Record the fix when the anchor is an `as` coercion (or the source of
    /// an assignment is one) whose operand types call for a runtime check.
    pub fn attempt(cs: &mut ConstraintSystem, from: TypeId, to: TypeId, locator: LocatorId) -> Option<FixId> {
        let from = cs.simplify_type(from);
        let to = cs.simplify_type(to);
        let types = cs.types();
        if types.contains_type_variables(from) || types.contains_type_variables(to) {
            trace!("coerce-to-checked-cast: unresolved operand types");
            return None;
        }

        let exprs = cs.exprs();
        let anchor = exprs.semantics_provider(cs.get_locator(locator).anchor());
        let coerce = match exprs.kind(anchor) {
            ExprKind::Coerce { .. } => anchor,
            ExprKind::Assign { src, .. } => exprs.semantics_provider(*src),
            _ => return None,
        };
        if !matches!(exprs.kind(coerce), ExprKind::Coerce { .. }) {
            return None;
        }

        match classify_checked_cast(types, cs.decls(), from, to) {
            CheckedCastKind::ValueCast | CheckedCastKind::ArrayDowncast | CheckedCastKind::DictionaryDowncast => {
                Some(Self::record(cs, from, to, locator))
            }
            CheckedCastKind::Coercion | CheckedCastKind::Unresolved => None,
        }
    }
}

impl FixBehavior for CoerceToCheckedCast {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("as to as!")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let (from, to) = self.mismatch.resolved(ctx);
        let exprs = ctx.exprs();
        let mut coerce = ctx.anchor();
        if let ExprKind::Assign { src, .. } = exprs.kind(coerce) {
            coerce = exprs.semantics_provider(*src);
        }
        let ExprKind::Coerce { as_span, .. } = exprs.kind(coerce) else {
            return false;
        };
        let diagnostic = PendingDiagnostic::error(
            diagnostic_codes::MISSING_FORCED_DOWNCAST,
            vec![from.into(), to.into()],
        )
        .with_span(exprs.span(coerce))
        .with_fix_it(FixIt::insert_after(*as_span, "!"));
        ctx.emit(diagnostic, as_note)
    }
}

// =============================================================================
// Specialised Contexts
// =============================================================================

contextual_leaf! {
    /// Key path value type does not match its contextual type.
    KeyPathContextualMismatch => KeyPathContextualMismatch
}

impl KeyPathContextualMismatch {
    pub fn create(cs: &mut ConstraintSystem, from: TypeId, to: TypeId, locator: LocatorId) -> FixId {
        Self::record(cs, from, to, locator)
    }
}

impl FixBehavior for KeyPathContextualMismatch {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("fix key path contextual mismatch")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let (from, to) = self.mismatch.resolved(ctx);
        let value = match ctx.types().lookup(from) {
            Some(TypeData::KeyPath { value, .. }) => value,
            _ => from,
        };
        if value == to {
            return false;
        }
        emit_pair(ctx, diagnostic_codes::KEY_PATH_VALUE_MISMATCH, value, to, as_note)
    }
}

contextual_leaf! {
    /// Pointer conversion into an `@autoclosure` parameter.
    AllowAutoClosurePointerConversion => AllowAutoClosurePointerConversion
}

impl AllowAutoClosurePointerConversion {
    pub fn create(cs: &mut ConstraintSystem, from: TypeId, to: TypeId, locator: LocatorId) -> FixId {
        Self::record(cs, from, to, locator)
    }
}

impl FixBehavior for AllowAutoClosurePointerConversion {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("allow pointer conversion for autoclosure result type")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let (from, to) = self.mismatch.resolved(ctx);
        emit_pair(ctx, diagnostic_codes::AUTOCLOSURE_POINTER_CONVERSION, from, to, as_note)
    }
}

contextual_leaf! {
    /// Tuples that differ in element types or arity.
    AllowTupleTypeMismatch => AllowTupleTypeMismatch
}

impl AllowTupleTypeMismatch {
    pub fn create(cs: &mut ConstraintSystem, from: TypeId, to: TypeId, locator: LocatorId) -> FixId {
        Self::record(cs, from, to, locator)
    }
}

impl FixBehavior for AllowTupleTypeMismatch {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("fix tuple mismatches in type and arity")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let (from, to) = self.mismatch.resolved(ctx);
        let types = ctx.types();
        if types.tuple_elements(from).is_none() || types.tuple_elements(to).is_none() {
            return self.mismatch.diagnose_conversion(ctx, as_note);
        }
        emit_pair(ctx, diagnostic_codes::TUPLE_TYPE_MISMATCH, from, to, as_note)
    }
}

contextual_leaf! {
    /// Element of a collection literal does not match the element type.
    CollectionElementContextualMismatch => CollectionElementContextualMismatch
}

impl CollectionElementContextualMismatch {
    pub fn create(cs: &mut ConstraintSystem, from: TypeId, to: TypeId, locator: LocatorId) -> FixId {
        Self::record(cs, from, to, locator)
    }
}

impl FixBehavior for CollectionElementContextualMismatch {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("fix collection element contextual mismatch")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let (from, to) = self.mismatch.resolved(ctx);
        if from == to {
            return false;
        }
        emit_pair(ctx, diagnostic_codes::CANNOT_CONVERT_ELEMENT, from, to, as_note)
    }
}

contextual_leaf! {
    /// Solve as if the written contextual type were absent.
    IgnoreContextualType => IgnoreContextualType
}

impl IgnoreContextualType {
    pub fn create(cs: &mut ConstraintSystem, from: TypeId, to: TypeId, locator: LocatorId) -> FixId {
        Self::record(cs, from, to, locator)
    }
}

impl FixBehavior for IgnoreContextualType {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("ignore specified contextual type")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        self.mismatch.diagnose_conversion(ctx, as_note)
    }
}

contextual_leaf! {
    /// Solve as if the assignment destination were untyped.
    IgnoreAssignmentDestinationType => IgnoreAssignmentDestinationType
}

impl IgnoreAssignmentDestinationType {
    pub fn create(cs: &mut ConstraintSystem, from: TypeId, to: TypeId, locator: LocatorId) -> FixId {
        Self::record(cs, from, to, locator)
    }
}

impl FixBehavior for IgnoreAssignmentDestinationType {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("ignore type of the assignment destination")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let (from, to) = self.mismatch.resolved(ctx);
        if from == to {
            return false;
        }
        emit_pair(ctx, diagnostic_codes::CANNOT_ASSIGN_VALUE, from, to, as_note)
    }
}

contextual_leaf! {
    /// Argument and `inout` parameter have different object types.
    AllowInOutConversion => AllowInOutConversion
}

impl AllowInOutConversion {
    pub fn create(cs: &mut ConstraintSystem, from: TypeId, to: TypeId, locator: LocatorId) -> FixId {
        Self::record(cs, from, to, locator)
    }

    /// Record the fix when an l-value argument meets an `inout` parameter
    /// of a different, fully resolved object type.
    pub fn attempt(cs: &mut ConstraintSystem, arg: TypeId, param: TypeId, locator: LocatorId) -> Option<FixId> {
        let arg = cs.simplify_type(arg);
        let param = cs.simplify_type(param);
        let types = cs.types();
        let Some(TypeData::InOut(param_object)) = types.lookup(param) else {
            return None;
        };
        let arg_object = match types.lookup(arg)? {
            TypeData::LValue(object) | TypeData::InOut(object) => object,
            _ => return None,
        };
        if arg_object == param_object
            || types.contains_type_variables(arg_object)
            || types.contains_type_variables(param_object)
        {
            return None;
        }
        Some(Self::record(cs, arg_object, param_object, locator))
    }
}

impl FixBehavior for AllowInOutConversion {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("allow conversions between argument/parameter marked as `inout`")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let from = ctx.resolve_rvalue(self.from_type());
        let to = ctx.resolve_rvalue(self.to_type());
        emit_pair(ctx, diagnostic_codes::INOUT_TYPE_MISMATCH, from, to, as_note)
    }
}

// =============================================================================
// Argument Conversions
// =============================================================================

contextual_leaf! {
    /// Argument type does not convert to its parameter type.
    AllowArgumentMismatch => AllowArgumentTypeMismatch
}

impl AllowArgumentMismatch {
    pub fn create(cs: &mut ConstraintSystem, from: TypeId, to: TypeId, locator: LocatorId) -> FixId {
        Self::record(cs, from, to, locator)
    }
}

impl FixBehavior for AllowArgumentMismatch {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("allow argument to parameter type conversion mismatch")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let (from, to) = self.mismatch.resolved(ctx);
        if from == to {
            return false;
        }
        let mut diagnostic = PendingDiagnostic::error(
            diagnostic_codes::CANNOT_CONVERT_ARGUMENT,
            vec![from.into(), to.into()],
        );
        if let Some(info) = ctx.callee_decl().and_then(|callee| ctx.decl(callee))
            && !info.span.is_empty()
        {
            diagnostic = diagnostic.with_related(
                PendingDiagnostic::note(diagnostic_codes::DECLARED_HERE, vec![info.name.into()])
                    .with_span(info.span),
            );
        }
        ctx.emit(diagnostic, as_note)
    }
}

contextual_leaf! {
    /// An array passed where a variadic parameter expects its elements.
    ExpandArrayIntoVarargs => ExpandArrayIntoVarargs
}

impl ExpandArrayIntoVarargs {
    /// Record the fix when the locator targets a variadic parameter and the
    /// argument is an array whose element converts to the parameter type.
    pub fn attempt(cs: &mut ConstraintSystem, arg: TypeId, param: TypeId, locator: LocatorId) -> Option<FixId> {
        let (_, _, flags) = cs.get_locator(locator).arg_to_param()?;
        if !flags.contains(ParamFlags::VARIADIC) {
            return None;
        }
        let arg = cs.simplify_type(arg);
        let param = cs.simplify_type(param);
        let types = cs.types();
        let element = types.array_element(types.rvalue(arg))?;
        if !is_convertible(types, cs.decls(), element, param) {
            return None;
        }
        Some(Self::record(cs, arg, param, locator))
    }
}

impl FixBehavior for ExpandArrayIntoVarargs {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("cannot pass Array elements as variadic arguments")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let (from, to) = self.mismatch.resolved(ctx);
        let anchor = ctx.anchor();
        let span = ctx.exprs().span(anchor);
        let mut diagnostic = PendingDiagnostic::error(
            diagnostic_codes::ARRAY_INTO_VARARGS,
            vec![from.into(), to.into()],
        );
        if matches!(ctx.exprs().kind(anchor), ExprKind::ArrayLiteral(_)) && span.len() >= 2 {
            diagnostic = diagnostic.with_fix_its([
                FixIt::remove(Span::new(span.start, span.start + 1)),
                FixIt::remove(Span::new(span.end - 1, span.end)),
            ]);
        }
        ctx.emit(diagnostic, as_note)
    }
}

contextual_leaf! {
    /// Argument is the raw value of the raw-representable parameter type.
    ExplicitlyConstructRawRepresentable => ExplicitlyConstructRawRepresentable
}

impl ExplicitlyConstructRawRepresentable {
    /// Record `(arg, param)` when `param`, looking through optionals, is
    /// raw-representable by exactly `arg`.
    pub fn attempt(cs: &mut ConstraintSystem, arg: TypeId, param: TypeId, locator: LocatorId) -> Option<FixId> {
        let types = cs.types();
        let (arg, _) = look_through_optionals(types, types.rvalue(cs.simplify_type(arg)));
        let (param, _) = look_through_optionals(types, cs.simplify_type(param));
        if types.is_type_variable(arg) || types.is_type_variable(param) {
            return None;
        }
        let raw = raw_representable_type(types, cs.decls(), param)?;
        if raw != arg {
            return None;
        }
        Some(Self::record(cs, arg, param, locator))
    }
}

impl FixBehavior for ExplicitlyConstructRawRepresentable {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("explicitly construct a raw representable type")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let (raw, rawrep) = self.mismatch.resolved(ctx);
        let span = ctx.anchor_span();
        let code = ctx.contextual_purpose().conversion_code();
        let note = PendingDiagnostic::note(
            diagnostic_codes::CONSTRUCT_RAW_REPRESENTABLE,
            vec![rawrep.into(), raw.into()],
        )
        .with_span(span)
        .with_fix_its([
            FixIt::insert(span, format!("{}(rawValue: ", ctx.format_type(rawrep))),
            FixIt::insert_after(span, ")!"),
        ]);
        let diagnostic =
            PendingDiagnostic::error(code, vec![raw.into(), rawrep.into()]).with_related(note);
        ctx.emit(diagnostic, as_note)
    }
}

contextual_leaf! {
    /// Raw-representable argument where its raw value type is expected.
    UseValueTypeOfRawRepresentative => UseValueTypeOfRawRepresentative
}

impl UseValueTypeOfRawRepresentative {
    /// Record `(arg, param)` when `arg`, looking through optionals, is
    /// raw-representable by exactly `param`.
    pub fn attempt(cs: &mut ConstraintSystem, arg: TypeId, param: TypeId, locator: LocatorId) -> Option<FixId> {
        let types = cs.types();
        let (arg, _) = look_through_optionals(types, types.rvalue(cs.simplify_type(arg)));
        let (param, _) = look_through_optionals(types, cs.simplify_type(param));
        if types.is_type_variable(arg) || types.is_type_variable(param) {
            return None;
        }
        let raw = raw_representable_type(types, cs.decls(), arg)?;
        if raw != param {
            return None;
        }
        Some(Self::record(cs, arg, param, locator))
    }
}

impl FixBehavior for UseValueTypeOfRawRepresentative {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("use `.rawValue` of a raw representable type")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let (rawrep, raw) = self.mismatch.resolved(ctx);
        let span = ctx.anchor_span();
        let code = ctx.contextual_purpose().conversion_code();
        let note = PendingDiagnostic::note(diagnostic_codes::USE_RAW_VALUE, vec![rawrep.into(), raw.into()])
            .with_span(span)
            .with_fix_it(FixIt::insert_after(span, ".rawValue"));
        let diagnostic =
            PendingDiagnostic::error(code, vec![rawrep.into(), raw.into()]).with_related(note);
        ctx.emit(diagnostic, as_note)
    }
}

#[cfg(test)]
#[path = "../../tests/contextual_tests.rs"]
mod contextual_tests;
