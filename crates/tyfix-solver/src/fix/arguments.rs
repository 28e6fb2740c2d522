//! Argument list fixes: labels, arity, order and tuple shape of call
//! arguments.

use crate::diagnostics::{DiagnosticArg, FixIt, PendingDiagnostic};
use crate::expr::{Argument, ExprKind};
use crate::locator::LocatorId;
use crate::system::{ConstraintSystem, FixId};
use crate::types::{ParamInfo, TupleElement, TypeId};
use smallvec::{SmallVec, smallvec};
use std::borrow::Cow;
use tracing::trace;
use tyfix_common::diagnostics::diagnostic_codes;
use tyfix_common::interner::Atom;
use tyfix_common::span::Span;

use super::{ConstraintFix, FailureContext, FixBehavior, FixKind};

/// Argument indices bound to one parameter.
pub type ParamBinding = SmallVec<[u32; 1]>;

// =============================================================================
// Labels
// =============================================================================

/// Call arguments carry the wrong labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelabelArguments {
    labels: Box<[Atom]>,
}

impl RelabelArguments {
    /// Correct labels, one per argument; `Atom::NONE` for unlabeled.
    pub fn labels(&self) -> &[Atom] {
        &self.labels
    }

    pub fn create(cs: &mut ConstraintSystem, labels: &[Atom], locator: LocatorId) -> FixId {
        let payload = RelabelArguments {
            labels: labels.into(),
        };
        cs.record_fix(ConstraintFix::new(FixKind::RelabelArguments, locator, payload))
    }
}

/// `a:_:c:` style rendering of a label list.
fn label_list(ctx: &FailureContext<'_>, labels: impl Iterator<Item = Atom>) -> String {
    labels
        .map(|label| {
            if label.is_none() {
                "_:".to_string()
            } else {
                format!("{}:", ctx.atom_str(label))
            }
        })
        .collect()
}

impl FixBehavior for RelabelArguments {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("re-label argument(s)")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let Some(args) = ctx.call_arguments() else {
            return false;
        };
        if args.iter().map(|arg| arg.label).eq(self.labels.iter().copied()) {
            return false;
        }

        let have = label_list(ctx, args.iter().map(|arg| arg.label));
        let expected = label_list(ctx, self.labels.iter().copied());
        let mut diagnostic = if args.iter().all(|arg| arg.label.is_none()) {
            PendingDiagnostic::error(diagnostic_codes::MISSING_ARGUMENT_LABELS, vec![expected.into()])
        } else if self.labels.iter().all(|label| label.is_none()) {
            PendingDiagnostic::error(diagnostic_codes::EXTRANEOUS_ARGUMENT_LABELS, vec![have.into()])
        } else {
            PendingDiagnostic::error(
                diagnostic_codes::INCORRECT_ARGUMENT_LABELS,
                vec![have.into(), expected.into()],
            )
        };

        let exprs = ctx.exprs();
        for (arg, &label) in args.iter().zip(self.labels.iter()) {
            if arg.label == label {
                continue;
            }
            let fix_it = match (arg.label_span, label.is_none()) {
                (Some(span), true) => FixIt::remove(span),
                (Some(span), false) => FixIt::replace(span, format!("{}:", ctx.atom_str(label))),
                (None, false) => FixIt::insert(exprs.span(arg.expr), format!("{}: ", ctx.atom_str(label))),
                (None, true) => continue,
            };
            diagnostic = diagnostic.with_fix_it(fix_it);
        }
        ctx.emit(diagnostic, as_note)
    }
}

// =============================================================================
// Arity
// =============================================================================

/// Parameters with no corresponding argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddMissingArguments {
    synthesized: Box<[ParamInfo]>,
}

impl AddMissingArguments {
    /// Synthesized arguments in declared parameter order.
    pub fn synthesized_args(&self) -> &[ParamInfo] {
        &self.synthesized
    }

    pub fn create(cs: &mut ConstraintSystem, synthesized: &[ParamInfo], locator: LocatorId) -> FixId {
        let payload = AddMissingArguments {
            synthesized: synthesized.into(),
        };
        cs.record_fix(ConstraintFix::new(FixKind::AddMissingArguments, locator, payload))
    }

    /// Synthesize one argument per missing parameter, each typed with a
    /// fresh type variable, and record the fix.
    pub fn synthesize(cs: &mut ConstraintSystem, missing: &[ParamInfo], locator: LocatorId) -> FixId {
        let synthesized: Vec<ParamInfo> = missing
            .iter()
            .map(|param| ParamInfo::new(param.label, cs.create_type_variable()).with_flags(param.flags))
            .collect();
        Self::create(cs, &synthesized, locator)
    }
}

impl FixBehavior for AddMissingArguments {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("synthesize missing argument(s)")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        if self.synthesized.is_empty() {
            return false;
        }
        let existing = ctx.call_arguments().map_or(0, <[Argument]>::len);
        let describe = |offset: usize, param: &ParamInfo| {
            if param.label.is_none() {
                format!("#{}", existing + offset + 1)
            } else {
                format!("'{}'", ctx.atom_str(param.label))
            }
        };

        let mut diagnostic = if let [param] = &*self.synthesized {
            PendingDiagnostic::error(diagnostic_codes::MISSING_ARGUMENT, vec![describe(0, param).into()])
        } else {
            let limit = ctx.options().max_missing_arguments_listed;
            let mut listed: Vec<String> = self
                .synthesized
                .iter()
                .enumerate()
                .take(limit)
                .map(|(offset, param)| describe(offset, param))
                .collect();
            if self.synthesized.len() > limit {
                listed.push("...".to_string());
            }
            PendingDiagnostic::error(diagnostic_codes::MISSING_ARGUMENTS, vec![listed.join(", ").into()])
        };

        let raw = ctx.raw_anchor();
        let call_span = ctx.exprs().span(raw);
        if matches!(ctx.exprs().kind(raw), ExprKind::Call { .. }) && !call_span.is_empty() {
            let mut text = String::new();
            for (offset, param) in self.synthesized.iter().enumerate() {
                if existing + offset > 0 {
                    text.push_str(", ");
                }
                if !param.label.is_none() {
                    text.push_str(&ctx.atom_str(param.label));
                    text.push_str(": ");
                }
                let ty = ctx.resolve(param.ty);
                if ctx.types().is_type_variable(ty) {
                    text.push_str("<#value#>");
                } else {
                    text.push_str(&format!("<#{}#>", ctx.format_type(ty)));
                }
            }
            diagnostic = diagnostic.with_fix_it(FixIt::insert(Span::at(call_span.end - 1), text));
        }
        ctx.emit(diagnostic, as_note)
    }
}

// =============================================================================
// Order
// =============================================================================

/// Argument written after one it should precede.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutOfOrderArgument {
    arg_idx: u32,
    prev_arg_idx: u32,
    bindings: Box<[ParamBinding]>,
}

impl MoveOutOfOrderArgument {
    pub fn arg_idx(&self) -> u32 {
        self.arg_idx
    }

    pub fn prev_arg_idx(&self) -> u32 {
        self.prev_arg_idx
    }

    /// Parameter-to-argument bindings at the time of the fix.
    pub fn bindings(&self) -> &[ParamBinding] {
        &self.bindings
    }

    /// # Panics
    ///
    /// If both indices name the same argument.
    pub fn create(
        cs: &mut ConstraintSystem,
        arg_idx: u32,
        prev_arg_idx: u32,
        bindings: &[ParamBinding],
        locator: LocatorId,
    ) -> FixId {
        assert_ne!(arg_idx, prev_arg_idx, "an argument cannot be out of order with itself");
        let payload = MoveOutOfOrderArgument {
            arg_idx,
            prev_arg_idx,
            bindings: bindings.into(),
        };
        cs.record_fix(ConstraintFix::new(FixKind::MoveOutOfOrderArgument, locator, payload))
    }
}

impl FixBehavior for MoveOutOfOrderArgument {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("move out-of-order argument to correct position")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let Some(args) = ctx.call_arguments() else {
            return false;
        };
        let (Some(arg), Some(prev)) = (args.get(self.arg_idx as usize), args.get(self.prev_arg_idx as usize))
        else {
            return false;
        };
        let describe = |idx: u32, arg: &Argument| {
            if arg.label.is_none() {
                format!("unnamed argument #{}", idx + 1)
            } else {
                format!("argument '{}'", ctx.atom_str(arg.label))
            }
        };
        let diagnostic = PendingDiagnostic::error(
            diagnostic_codes::ARGUMENT_OUT_OF_ORDER,
            vec![describe(self.arg_idx, arg).into(), describe(self.prev_arg_idx, prev).into()],
        )
        .with_span(ctx.exprs().span(arg.expr));
        ctx.emit(diagnostic, as_note)
    }
}

// =============================================================================
// Tuple Shape
// =============================================================================

/// Several arguments passed to a single parameter of tuple type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AllowTupleSplatForSingleParameter {
    param_type: TypeId,
}

impl AllowTupleSplatForSingleParameter {
    pub fn param_type(&self) -> TypeId {
        self.param_type
    }

    /// Collapse `args` into one tuple argument when the callee takes a
    /// single plain parameter whose type is either a tuple of matching
    /// arity or a still unresolved type variable. `inout`, variadic and
    /// `@autoclosure` parameters, and `inout` or variadic arguments, cannot
    /// be folded into a tuple element.
    ///
    /// On success `args` holds the combined argument, `bindings` maps the
    /// only parameter to it, and the fix is recorded. On failure nothing is
    /// touched.
    pub fn attempt(
        cs: &mut ConstraintSystem,
        args: &mut Vec<ParamInfo>,
        params: &[ParamInfo],
        bindings: &mut Vec<ParamBinding>,
        locator: LocatorId,
    ) -> Option<FixId> {
        let [param] = params else {
            return None;
        };
        if args.len() < 2 {
            return None;
        }
        if param.is_inout() || param.is_variadic() || param.is_autoclosure() {
            trace!("tuple splat: parameter is not a plain value");
            return None;
        }
        let types = cs.types();
        let param_ty = cs.simplify_type(param.ty);
        if !types.is_type_variable(param_ty) {
            let elements = types.tuple_elements(param_ty)?;
            if elements.len() != args.len() {
                trace!(params = elements.len(), args = args.len(), "tuple splat: arity mismatch");
                return None;
            }
        }
        if args.iter().any(|arg| arg.is_inout() || arg.is_variadic()) {
            return None;
        }

        let combined: Vec<TupleElement> = args
            .iter()
            .enumerate()
            .map(|(idx, arg)| {
                // The first label belongs to the parameter, not the tuple.
                let label = if idx == 0 && arg.label == param.label {
                    Atom::NONE
                } else {
                    arg.label
                };
                TupleElement::new(label, arg.ty)
            })
            .collect();
        let tuple = types.tuple(combined);

        *args = vec![ParamInfo::new(param.label, tuple)];
        bindings.clear();
        bindings.push(smallvec![0]);
        let payload = AllowTupleSplatForSingleParameter { param_type: param.ty };
        Some(cs.record_fix(ConstraintFix::new(
            FixKind::AllowTupleSplatForSingleParameter,
            locator,
            payload,
        )))
    }
}

impl FixBehavior for AllowTupleSplatForSingleParameter {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("allow single parameter tuple splat")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let param = ctx.resolve(self.param_type);
        let callee: DiagnosticArg = match ctx.callee_decl() {
            Some(decl) => ctx.decl_name(decl).into(),
            None => "function".into(),
        };
        let mut diagnostic = PendingDiagnostic::error(diagnostic_codes::SINGLE_TUPLE_PARAM, vec![callee, param.into()]);
        if let Some(args) = ctx.call_arguments()
            && let (Some(first), Some(last)) = (args.first(), args.last())
        {
            let exprs = ctx.exprs();
            let start = first.label_span.map_or(exprs.span(first.expr).start, |span| span.start);
            let end = exprs.span(last.expr);
            diagnostic = diagnostic.with_related(
                PendingDiagnostic::note(diagnostic_codes::PASS_TUPLE, Vec::new())
                    .with_span(Span::new(start, end.end))
                    .with_fix_its([FixIt::insert(Span::at(start), "("), FixIt::insert_after(end, ")")]),
            );
        }
        ctx.emit(diagnostic, as_note)
    }
}

/// Closure parameter list destructures a tuple the contextual function type
/// passes as a single parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AllowClosureParamDestructuring {
    contextual: TypeId,
}

impl AllowClosureParamDestructuring {
    pub fn contextual_type(&self) -> TypeId {
        self.contextual
    }

    /// # Panics
    ///
    /// If `contextual` is not a function type.
    pub fn create(cs: &mut ConstraintSystem, contextual: TypeId, locator: LocatorId) -> FixId {
        assert!(
            cs.types().function_of(contextual).is_some(),
            "closure destructuring needs a function contextual type"
        );
        let payload = AllowClosureParamDestructuring { contextual };
        cs.record_fix(ConstraintFix::new(
            FixKind::AllowClosureParameterDestructuring,
            locator,
            payload,
        ))
    }
}

impl FixBehavior for AllowClosureParamDestructuring {
    fn name(&self, _kind: FixKind, _cs: &ConstraintSystem) -> Cow<'static, str> {
        Cow::Borrowed("allow closure parameter destructuring")
    }

    fn diagnose(&self, _kind: FixKind, ctx: &mut FailureContext<'_>, as_note: bool) -> bool {
        let contextual = ctx.resolve(self.contextual);
        let Some(param) = ctx.types().params_of(contextual).and_then(|params| params.first().copied()) else {
            return false;
        };
        let diagnostic =
            PendingDiagnostic::error(diagnostic_codes::CLOSURE_TUPLE_DESTRUCTURING, vec![param.ty.into()]);
        ctx.emit(diagnostic, as_note)
    }
}

#[cfg(test)]
#[path = "../../tests/arguments_tests.rs"]
mod arguments_tests;
