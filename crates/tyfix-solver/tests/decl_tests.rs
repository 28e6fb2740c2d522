use super::*;
use crate::TypeInterner;

#[test]
fn test_decl_id_validity() {
    assert!(!DeclId::INVALID.is_valid());
    assert!(DeclId(1).is_valid());
}

#[test]
fn test_decl_store_register_and_get() {
    let types = TypeInterner::new();
    let mut store = DeclStore::new();
    assert!(store.is_empty());

    let name = types.intern_string("count");
    let id = store.register(
        DeclInfo::new(DeclKind::Var, name)
            .with_span(Span::new(4, 9))
            .with_access(AccessLevel::Private)
            .with_flags(DeclFlags::STATIC | DeclFlags::LET)
            .with_type(TypeId::INT),
    );
    assert_eq!(id, DeclId(1));
    assert!(store.contains(id));
    assert_eq!(store.len(), 1);

    let info = store.get(id).expect("registered");
    assert_eq!(info.kind, DeclKind::Var);
    assert_eq!(info.name, name);
    assert_eq!(info.access, AccessLevel::Private);
    assert!(info.is_static());
    assert!(!info.is_mutating());
    assert_eq!(info.interface_type, Some(TypeId::INT));
}

#[test]
fn test_unknown_decl_lookups() {
    let store = DeclStore::new();
    assert!(store.get(DeclId::INVALID).is_none());
    assert!(store.get(DeclId(7)).is_none());
    assert_eq!(store.name(DeclId(7)), Atom::NONE);
    assert_eq!(store.kind(DeclId(7)), None);
}

#[test]
fn test_method_requires_parent() {
    let types = TypeInterner::new();
    let mut store = DeclStore::new();
    let owner = store.register(DeclInfo::new(DeclKind::Struct, types.intern_string("S")));
    let method = store.register(DeclInfo::new(DeclKind::Func, types.intern_string("bump")).with_parent(owner));
    let free = store.register(DeclInfo::new(DeclKind::Func, types.intern_string("f")));
    assert!(store.get(method).expect("method").is_method());
    assert!(!store.get(free).expect("function").is_method());
}

#[test]
fn test_subclass_chain() {
    let types = TypeInterner::new();
    let mut store = DeclStore::new();
    let root = store.register(DeclInfo::new(DeclKind::Class, types.intern_string("Root")));
    let mid = store.register(DeclInfo::new(DeclKind::Class, types.intern_string("Mid")).with_superclass(root));
    let leaf = store.register(DeclInfo::new(DeclKind::Class, types.intern_string("Leaf")).with_superclass(mid));

    assert!(store.is_subclass_of(leaf, root));
    assert!(store.is_subclass_of(leaf, leaf));
    assert!(!store.is_subclass_of(root, leaf));
}

#[test]
fn test_conformance_is_inherited() {
    let types = TypeInterner::new();
    let mut store = DeclStore::new();
    let proto = store.register(DeclInfo::new(DeclKind::Protocol, types.intern_string("P")));
    let base = store.register(DeclInfo::new(DeclKind::Class, types.intern_string("Base")).with_conformances(vec![proto]));
    let derived = store.register(DeclInfo::new(DeclKind::Class, types.intern_string("Derived")).with_superclass(base));
    let other = store.register(DeclInfo::new(DeclKind::Struct, types.intern_string("Other")));

    assert!(store.conforms_to(derived, proto));
    assert!(store.conforms_to(proto, proto));
    assert!(!store.conforms_to(other, proto));
}

#[test]
fn test_kind_descriptions() {
    assert!(DeclKind::Protocol.is_nominal());
    assert!(!DeclKind::Func.is_nominal());
    assert_eq!(DeclKind::Init.description(), "initializer");
    assert_eq!(AccessLevel::FilePrivate.as_str(), "fileprivate");
    assert_eq!(AccessLevel::default(), AccessLevel::Internal);
}
