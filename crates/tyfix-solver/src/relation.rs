//! Type relations used by fix attempts and diagnostics.
//!
//! Attempts only recognise fixed structural patterns (raw-representable
//! construction, array-to-varargs, plausible forced casts); none of this
//! decides full subtyping.

use crate::decl::{DeclKind, DeclStore};
use crate::intern::TypeInterner;
use crate::types::{FunctionShape, ParamInfo, TupleElement, TypeData, TypeId, TypeVarId};
use indexmap::IndexMap;
use tyfix_common::limits;

/// Type variable bindings of a solving branch or solution.
pub type Bindings = IndexMap<TypeVarId, TypeId>;

// =============================================================================
// Substitution
// =============================================================================

/// Replace bound type variables in `ty` by their bindings, recursively.
///
/// Unbound variables are left in place.
pub fn simplify_type(types: &TypeInterner, bindings: &Bindings, ty: TypeId) -> TypeId {
    simplify_inner(types, bindings, ty, 0)
}

fn simplify_inner(types: &TypeInterner, bindings: &Bindings, ty: TypeId, depth: u32) -> TypeId {
    if depth > limits::MAX_SIMPLIFY_DEPTH || ty.is_intrinsic() {
        return ty;
    }
    let Some(data) = types.lookup(ty) else {
        return ty;
    };
    let recur = |inner: TypeId| simplify_inner(types, bindings, inner, depth + 1);
    match data {
        TypeData::TypeVariable(var) => match bindings.get(&var) {
            Some(&bound) if bound != ty => recur(bound),
            _ => ty,
        },
        TypeData::Intrinsic(_)
        | TypeData::Nominal(_)
        | TypeData::Existential(_)
        | TypeData::GenericParam { .. } => ty,
        TypeData::BoundGeneric { decl, args } => {
            let args = types.type_list(args).iter().map(|&arg| recur(arg)).collect();
            types.bound_generic(decl, args)
        }
        TypeData::Optional(inner) => types.optional(recur(inner)),
        TypeData::Array(element) => types.array(recur(element)),
        TypeData::Dictionary { key, value } => types.dictionary(recur(key), recur(value)),
        TypeData::Tuple(list) => {
            let elements = types
                .tuple_list(list)
                .iter()
                .map(|element| TupleElement::new(element.label, recur(element.ty)))
                .collect();
            types.tuple(elements)
        }
        TypeData::Function(shape) => {
            let Some(shape) = types.function_shape(shape) else {
                return ty;
            };
            let params = shape
                .params
                .iter()
                .map(|param| ParamInfo {
                    ty: recur(param.ty),
                    ..*param
                })
                .collect();
            types.function(FunctionShape {
                params,
                result: recur(shape.result),
                throws: shape.throws,
                escaping: shape.escaping,
            })
        }
        TypeData::Metatype(instance) => types.metatype(recur(instance)),
        TypeData::LValue(object) => types.lvalue(recur(object)),
        TypeData::InOut(object) => types.inout(recur(object)),
        TypeData::KeyPath { kind, root, value } => types.key_path(kind, recur(root), recur(value)),
        TypeData::Pointer { kind, pointee } => types.pointer(kind, recur(pointee)),
    }
}

/// Strip any number of optional layers, returning the payload and the depth.
pub fn look_through_optionals(types: &TypeInterner, mut ty: TypeId) -> (TypeId, u32) {
    let mut depth = 0;
    while let Some(inner) = types.optional_object(ty) {
        ty = inner;
        depth += 1;
    }
    (ty, depth)
}

/// Raw value type of a raw-representable nominal type.
pub fn raw_representable_type(types: &TypeInterner, decls: &DeclStore, ty: TypeId) -> Option<TypeId> {
    match types.lookup(ty)? {
        TypeData::Nominal(decl) => decls.get(decl)?.raw_type,
        _ => None,
    }
}

// =============================================================================
// Conversions
// =============================================================================

fn class_decl(types: &TypeInterner, decls: &DeclStore, ty: TypeId) -> Option<crate::decl::DeclId> {
    let decl = match types.lookup(ty)? {
        TypeData::Nominal(decl) | TypeData::BoundGeneric { decl, .. } => decl,
        _ => return None,
    };
    (decls.kind(decl)? == DeclKind::Class).then_some(decl)
}

/// Whether a value of type `from` implicitly converts to `to`.
///
/// Type variables convert to anything: the solver has not committed them.
pub fn is_convertible(types: &TypeInterner, decls: &DeclStore, from: TypeId, to: TypeId) -> bool {
    if from == to || to == TypeId::ANY || from == TypeId::NEVER {
        return true;
    }
    if types.is_type_variable(from) || types.is_type_variable(to) {
        return true;
    }
    let (Some(from_data), Some(to_data)) = (types.lookup(from), types.lookup(to)) else {
        return false;
    };
    match (from_data, to_data) {
        (TypeData::LValue(object), _) => is_convertible(types, decls, object, to),
        (TypeData::Optional(a), TypeData::Optional(b)) => is_convertible(types, decls, a, b),
        (_, TypeData::Optional(b)) => is_convertible(types, decls, from, b),
        (TypeData::Array(a), TypeData::Array(b)) => is_convertible(types, decls, a, b),
        (
            TypeData::Dictionary { key: k1, value: v1 },
            TypeData::Dictionary { key: k2, value: v2 },
        ) => k1 == k2 && is_convertible(types, decls, v1, v2),
        (TypeData::Tuple(a), TypeData::Tuple(b)) => {
            let (a, b) = (types.tuple_list(a), types.tuple_list(b));
            a.len() == b.len()
                && a.iter().zip(b.iter()).all(|(x, y)| {
                    (x.label == y.label || x.label.is_none() || y.label.is_none())
                        && is_convertible(types, decls, x.ty, y.ty)
                })
        }
        (_, TypeData::Existential(protocol)) => match types.lookup(from) {
            Some(TypeData::Nominal(decl)) | Some(TypeData::BoundGeneric { decl, .. }) => {
                decls.conforms_to(decl, protocol)
            }
            Some(TypeData::Existential(other)) => decls.conforms_to(other, protocol),
            _ => false,
        },
        _ if to == TypeId::ANY_OBJECT => class_decl(types, decls, from).is_some(),
        _ => match (class_decl(types, decls, from), class_decl(types, decls, to)) {
            (Some(derived), Some(base)) => {
                matches!(types.lookup(to), Some(TypeData::Nominal(_)))
                    && decls.is_subclass_of(derived, base)
            }
            _ => false,
        },
    }
}

/// Outcome of checking an `as` / `as!` cast between two resolved types.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CheckedCastKind {
    /// The cast always succeeds; a plain coercion suffices.
    Coercion,
    /// Runtime check of a single value.
    ValueCast,
    ArrayDowncast,
    DictionaryDowncast,
    /// The types are unrelated; no cast can succeed.
    Unresolved,
}

/// Classify a checked cast from `from` to `to`.
pub fn classify_checked_cast(
    types: &TypeInterner,
    decls: &DeclStore,
    from: TypeId,
    to: TypeId,
) -> CheckedCastKind {
    let from = types.rvalue(from);
    if is_convertible(types, decls, from, to) {
        return CheckedCastKind::Coercion;
    }
    let (from_obj, _) = look_through_optionals(types, from);
    let (to_obj, _) = look_through_optionals(types, to);
    if let (Some(a), Some(b)) = (types.array_element(from_obj), types.array_element(to_obj)) {
        return match classify_checked_cast(types, decls, a, b) {
            CheckedCastKind::Unresolved => CheckedCastKind::Unresolved,
            _ => CheckedCastKind::ArrayDowncast,
        };
    }
    if let (
        Some(TypeData::Dictionary { key: k1, value: v1 }),
        Some(TypeData::Dictionary { key: k2, value: v2 }),
    ) = (types.lookup(from_obj), types.lookup(to_obj))
    {
        let keys = classify_checked_cast(types, decls, k1, k2);
        let values = classify_checked_cast(types, decls, v1, v2);
        return if keys == CheckedCastKind::Unresolved || values == CheckedCastKind::Unresolved {
            CheckedCastKind::Unresolved
        } else {
            CheckedCastKind::DictionaryDowncast
        };
    }
    // Downcast from a supertype, or a cast through an existential.
    if is_convertible(types, decls, to_obj, from_obj)
        || types.is_existential(from_obj)
        || types.is_existential(to_obj)
    {
        return CheckedCastKind::ValueCast;
    }
    CheckedCastKind::Unresolved
}

#[cfg(test)]
#[path = "../tests/relation_tests.rs"]
mod relation_tests;
