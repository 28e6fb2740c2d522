use super::*;
use crate::decl::{DeclId, DeclInfo};

struct Fixture {
    types: TypeInterner,
    decls: DeclStore,
    base: TypeId,
    derived: TypeId,
    s: TypeId,
    p: TypeId,
    color: TypeId,
}

fn fixture() -> Fixture {
    let types = TypeInterner::new();
    let mut decls = DeclStore::new();
    let p_decl = decls.register(DeclInfo::new(DeclKind::Protocol, types.intern_string("P")));
    let base_decl = decls.register(DeclInfo::new(DeclKind::Class, types.intern_string("Base")));
    let derived_decl = decls.register(
        DeclInfo::new(DeclKind::Class, types.intern_string("Derived"))
            .with_superclass(base_decl)
            .with_conformances(vec![p_decl]),
    );
    let s_decl = decls.register(DeclInfo::new(DeclKind::Struct, types.intern_string("S")));
    let color_decl = decls.register(DeclInfo::new(DeclKind::Enum, types.intern_string("Color")).with_raw_type(TypeId::INT));
    Fixture {
        base: types.nominal(base_decl),
        derived: types.nominal(derived_decl),
        s: types.nominal(s_decl),
        p: types.existential(p_decl),
        color: types.nominal(color_decl),
        types,
        decls,
    }
}

fn var(types: &TypeInterner, n: u32) -> TypeId {
    types.type_variable(TypeVarId(n))
}

#[test]
fn test_simplify_substitutes_bindings() {
    let types = TypeInterner::new();
    let t0 = var(&types, 0);
    let t1 = var(&types, 1);
    let mut bindings = Bindings::default();
    bindings.insert(TypeVarId(0), t1);
    bindings.insert(TypeVarId(1), TypeId::STRING);

    assert_eq!(simplify_type(&types, &bindings, t0), TypeId::STRING);
    assert_eq!(
        simplify_type(&types, &bindings, types.array(t0)),
        types.array(TypeId::STRING)
    );
    let function = types.function(FunctionShape::new(vec![ParamInfo::unlabeled(t0)], t1));
    let expected = types.function(FunctionShape::new(vec![ParamInfo::unlabeled(TypeId::STRING)], TypeId::STRING));
    assert_eq!(simplify_type(&types, &bindings, function), expected);
}

#[test]
fn test_simplify_leaves_unbound_variables() {
    let types = TypeInterner::new();
    let t2 = var(&types, 2);
    let bindings = Bindings::default();
    assert_eq!(simplify_type(&types, &bindings, types.optional(t2)), types.optional(t2));
}

#[test]
fn test_simplify_stops_on_self_binding() {
    let types = TypeInterner::new();
    let t0 = var(&types, 0);
    let mut bindings = Bindings::default();
    bindings.insert(TypeVarId(0), t0);
    assert_eq!(simplify_type(&types, &bindings, t0), t0);
}

#[test]
fn test_look_through_optionals_counts_depth() {
    let types = TypeInterner::new();
    let twice = types.optional(types.optional(TypeId::INT));
    assert_eq!(look_through_optionals(&types, twice), (TypeId::INT, 2));
    assert_eq!(look_through_optionals(&types, TypeId::INT), (TypeId::INT, 0));
}

#[test]
fn test_raw_representable_type() {
    let fx = fixture();
    assert_eq!(raw_representable_type(&fx.types, &fx.decls, fx.color), Some(TypeId::INT));
    assert_eq!(raw_representable_type(&fx.types, &fx.decls, fx.s), None);
    assert_eq!(raw_representable_type(&fx.types, &fx.decls, TypeId::INT), None);
}

#[test]
fn test_class_conversions() {
    let fx = fixture();
    let (types, decls) = (&fx.types, &fx.decls);
    assert!(is_convertible(types, decls, fx.derived, fx.base));
    assert!(!is_convertible(types, decls, fx.base, fx.derived));
    assert!(is_convertible(types, decls, fx.derived, TypeId::ANY_OBJECT));
    assert!(!is_convertible(types, decls, fx.s, TypeId::ANY_OBJECT));
    assert!(is_convertible(types, decls, types.array(fx.derived), types.array(fx.base)));
}

#[test]
fn test_optional_and_existential_conversions() {
    let fx = fixture();
    let (types, decls) = (&fx.types, &fx.decls);
    assert!(is_convertible(types, decls, TypeId::INT, types.optional(TypeId::INT)));
    assert!(!is_convertible(types, decls, types.optional(TypeId::INT), TypeId::INT));
    assert!(is_convertible(types, decls, fx.derived, fx.p));
    assert!(!is_convertible(types, decls, fx.s, fx.p));
    assert!(is_convertible(types, decls, fx.s, TypeId::ANY));
    assert!(is_convertible(types, decls, types.lvalue(TypeId::INT), TypeId::INT));
    assert!(is_convertible(types, decls, var(types, 0), TypeId::STRING));
}

#[test]
fn test_checked_cast_classification() {
    let fx = fixture();
    let (types, decls) = (&fx.types, &fx.decls);
    assert_eq!(classify_checked_cast(types, decls, fx.derived, fx.base), CheckedCastKind::Coercion);
    assert_eq!(classify_checked_cast(types, decls, fx.base, fx.derived), CheckedCastKind::ValueCast);
    assert_eq!(classify_checked_cast(types, decls, TypeId::ANY, TypeId::INT), CheckedCastKind::ValueCast);
    assert_eq!(
        classify_checked_cast(types, decls, types.array(fx.base), types.array(fx.derived)),
        CheckedCastKind::ArrayDowncast
    );
    assert_eq!(
        classify_checked_cast(
            types,
            decls,
            types.dictionary(TypeId::STRING, fx.base),
            types.dictionary(TypeId::STRING, fx.derived)
        ),
        CheckedCastKind::DictionaryDowncast
    );
    assert_eq!(classify_checked_cast(types, decls, TypeId::INT, TypeId::STRING), CheckedCastKind::Unresolved);
    assert_eq!(
        classify_checked_cast(types, decls, types.array(TypeId::INT), types.array(TypeId::STRING)),
        CheckedCastKind::Unresolved
    );
}

#[test]
fn test_class_decl_ignores_structs() {
    let fx = fixture();
    assert!(class_decl(&fx.types, &fx.decls, fx.s).is_none());
    assert_eq!(class_decl(&fx.types, &fx.decls, fx.base), Some(DeclId(2)));
}
