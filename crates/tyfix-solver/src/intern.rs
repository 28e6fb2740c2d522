//! Type interning.
//!
//! Every distinct `TypeData` is stored once and addressed by `TypeId`.
//! Variable-length parts (generic argument lists, tuple elements, function
//! signatures) are interned separately so that `TypeData` stays small and
//! cheap to hash.
//!
//! Interning goes through `&self`; tables sit behind `RwLock`s so the
//! diagnostic pass can build display types while holding shared references
//! to the session.

use crate::decl::DeclId;
use crate::types::{
    FunctionShape, FunctionShapeId, IntrinsicKind, KeyPathKind, ParamInfo, PointerKind,
    TupleElement, TupleListId, TypeData, TypeId, TypeListId, TypeVarId,
};
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};
use tyfix_common::interner::{Atom, Interner};

struct SliceInterner<T> {
    items: Vec<Arc<[T]>>,
    map: FxHashMap<Arc<[T]>, u32>,
}

impl<T> SliceInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        let empty: Arc<[T]> = Arc::from(Vec::new());
        let mut map = FxHashMap::default();
        map.insert(empty.clone(), 0);
        SliceInterner {
            items: vec![empty],
            map,
        }
    }

    fn intern(&mut self, items: Vec<T>) -> u32 {
        if items.is_empty() {
            return 0;
        }

        if let Some(&id) = self.map.get(items.as_slice()) {
            return id;
        }

        let arc: Arc<[T]> = items.into();
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Arc<[T]> {
        self.items
            .get(id as usize)
            .unwrap_or(&self.items[0])
            .clone()
    }
}

struct ValueInterner<T> {
    items: Vec<Arc<T>>,
    map: FxHashMap<Arc<T>, u32>,
}

impl<T> ValueInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        ValueInterner {
            items: Vec::new(),
            map: FxHashMap::default(),
        }
    }

    fn intern(&mut self, value: T) -> u32 {
        if let Some(&id) = self.map.get(&value) {
            return id;
        }

        let arc = Arc::new(value);
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<T>> {
        self.items.get(id as usize).cloned()
    }
}

#[derive(Default)]
struct TypeTable {
    data: Vec<TypeData>,
    map: FxHashMap<TypeData, TypeId>,
}

/// Type interning table.
pub struct TypeInterner {
    types: RwLock<TypeTable>,
    /// String interner for member names, labels and declaration names
    pub string_interner: Interner,
    type_lists: RwLock<SliceInterner<TypeId>>,
    tuple_lists: RwLock<SliceInterner<TupleElement>>,
    function_shapes: RwLock<ValueInterner<FunctionShape>>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    /// Create a new type interner with pre-registered intrinsics.
    pub fn new() -> Self {
        let mut table = TypeTable::default();
        for kind in IntrinsicKind::ALL {
            let data = TypeData::Intrinsic(kind);
            let id = TypeId(table.data.len() as u32);
            debug_assert_eq!(id, kind.type_id());
            table.data.push(data.clone());
            table.map.insert(data, id);
        }
        let string_interner = Interner::new();
        string_interner.intern_common();
        TypeInterner {
            types: RwLock::new(table),
            string_interner,
            type_lists: RwLock::new(SliceInterner::new()),
            tuple_lists: RwLock::new(SliceInterner::new()),
            function_shapes: RwLock::new(ValueInterner::new()),
        }
    }

    /// Intern a type, returning the existing id for structurally equal data.
    pub fn intern(&self, data: TypeData) -> TypeId {
        if let Some(&id) = self
            .types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .map
            .get(&data)
        {
            return id;
        }
        let mut table = self.types.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(&id) = table.map.get(&data) {
            return id;
        }
        let id = TypeId(table.data.len() as u32);
        table.data.push(data.clone());
        table.map.insert(data, id);
        id
    }

    /// Look up the structure of an interned type.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .data
            .get(id.0 as usize)
            .cloned()
    }

    /// Number of interned types, intrinsics included.
    pub fn len(&self) -> usize {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .data
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Strings
    // =========================================================================

    #[inline]
    pub fn intern_string(&self, s: &str) -> Atom {
        self.string_interner.intern(s)
    }

    #[inline]
    pub fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        self.string_interner.resolve(atom)
    }

    // =========================================================================
    // Interned Sub-structures
    // =========================================================================

    pub fn intern_type_list(&self, types: Vec<TypeId>) -> TypeListId {
        TypeListId(
            self.type_lists
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .intern(types),
        )
    }

    pub fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        self.type_lists
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id.0)
    }

    pub fn intern_tuple_list(&self, elements: Vec<TupleElement>) -> TupleListId {
        TupleListId(
            self.tuple_lists
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .intern(elements),
        )
    }

    pub fn tuple_list(&self, id: TupleListId) -> Arc<[TupleElement]> {
        self.tuple_lists
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id.0)
    }

    pub fn intern_function_shape(&self, shape: FunctionShape) -> FunctionShapeId {
        FunctionShapeId(
            self.function_shapes
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .intern(shape),
        )
    }

    pub fn function_shape(&self, id: FunctionShapeId) -> Option<Arc<FunctionShape>> {
        self.function_shapes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id.0)
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn nominal(&self, decl: DeclId) -> TypeId {
        self.intern(TypeData::Nominal(decl))
    }

    pub fn bound_generic(&self, decl: DeclId, args: Vec<TypeId>) -> TypeId {
        let args = self.intern_type_list(args);
        self.intern(TypeData::BoundGeneric { decl, args })
    }

    pub fn existential(&self, protocol: DeclId) -> TypeId {
        self.intern(TypeData::Existential(protocol))
    }

    pub fn optional(&self, wrapped: TypeId) -> TypeId {
        self.intern(TypeData::Optional(wrapped))
    }

    pub fn array(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::Array(element))
    }

    pub fn dictionary(&self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(TypeData::Dictionary { key, value })
    }

    pub fn tuple(&self, elements: Vec<TupleElement>) -> TypeId {
        let list = self.intern_tuple_list(elements);
        self.intern(TypeData::Tuple(list))
    }

    pub fn function(&self, shape: FunctionShape) -> TypeId {
        let shape = self.intern_function_shape(shape);
        self.intern(TypeData::Function(shape))
    }

    pub fn metatype(&self, instance: TypeId) -> TypeId {
        self.intern(TypeData::Metatype(instance))
    }

    pub fn lvalue(&self, object: TypeId) -> TypeId {
        self.intern(TypeData::LValue(object))
    }

    pub fn inout(&self, object: TypeId) -> TypeId {
        self.intern(TypeData::InOut(object))
    }

    pub fn type_variable(&self, var: TypeVarId) -> TypeId {
        self.intern(TypeData::TypeVariable(var))
    }

    pub fn generic_param(&self, name: Atom, depth: u16, index: u16) -> TypeId {
        self.intern(TypeData::GenericParam { name, depth, index })
    }

    pub fn key_path(&self, kind: KeyPathKind, root: TypeId, value: TypeId) -> TypeId {
        self.intern(TypeData::KeyPath { kind, root, value })
    }

    pub fn pointer(&self, kind: PointerKind, pointee: TypeId) -> TypeId {
        self.intern(TypeData::Pointer { kind, pointee })
    }

    // =========================================================================
    // Structural Queries
    // =========================================================================

    pub fn optional_object(&self, ty: TypeId) -> Option<TypeId> {
        match self.lookup(ty)? {
            TypeData::Optional(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn array_element(&self, ty: TypeId) -> Option<TypeId> {
        match self.lookup(ty)? {
            TypeData::Array(element) => Some(element),
            _ => None,
        }
    }

    pub fn tuple_elements(&self, ty: TypeId) -> Option<Arc<[TupleElement]>> {
        match self.lookup(ty)? {
            TypeData::Tuple(list) => Some(self.tuple_list(list)),
            _ => None,
        }
    }

    pub fn function_of(&self, ty: TypeId) -> Option<Arc<FunctionShape>> {
        match self.lookup(ty)? {
            TypeData::Function(shape) => self.function_shape(shape),
            _ => None,
        }
    }

    /// Parameters of a function type, or `None` for non-function types.
    pub fn params_of(&self, ty: TypeId) -> Option<Vec<ParamInfo>> {
        self.function_of(ty).map(|shape| shape.params.clone())
    }

    /// Declaration and arguments of a bound generic type.
    pub fn bound_generic_parts(&self, ty: TypeId) -> Option<(DeclId, Arc<[TypeId]>)> {
        match self.lookup(ty)? {
            TypeData::BoundGeneric { decl, args } => Some((decl, self.type_list(args))),
            _ => None,
        }
    }

    pub fn metatype_instance(&self, ty: TypeId) -> Option<TypeId> {
        match self.lookup(ty)? {
            TypeData::Metatype(instance) => Some(instance),
            _ => None,
        }
    }

    /// Strip l-value and inout wrappers.
    pub fn rvalue(&self, ty: TypeId) -> TypeId {
        match self.lookup(ty) {
            Some(TypeData::LValue(inner)) | Some(TypeData::InOut(inner)) => self.rvalue(inner),
            _ => ty,
        }
    }

    pub fn is_type_variable(&self, ty: TypeId) -> bool {
        matches!(self.lookup(ty), Some(TypeData::TypeVariable(_)))
    }

    pub fn is_existential(&self, ty: TypeId) -> bool {
        ty == TypeId::ANY
            || ty == TypeId::ANY_OBJECT
            || matches!(self.lookup(ty), Some(TypeData::Existential(_)))
    }

    /// Whether `ty` mentions an unresolved type variable anywhere.
    pub fn contains_type_variables(&self, ty: TypeId) -> bool {
        let Some(data) = self.lookup(ty) else {
            return false;
        };
        match data {
            TypeData::TypeVariable(_) => true,
            TypeData::Intrinsic(_)
            | TypeData::Nominal(_)
            | TypeData::Existential(_)
            | TypeData::GenericParam { .. } => false,
            TypeData::BoundGeneric { args, .. } => self
                .type_list(args)
                .iter()
                .any(|&arg| self.contains_type_variables(arg)),
            TypeData::Optional(inner)
            | TypeData::Array(inner)
            | TypeData::Metatype(inner)
            | TypeData::LValue(inner)
            | TypeData::InOut(inner)
            | TypeData::Pointer { pointee: inner, .. } => self.contains_type_variables(inner),
            TypeData::Dictionary { key, value } => {
                self.contains_type_variables(key) || self.contains_type_variables(value)
            }
            TypeData::KeyPath { root, value, .. } => {
                self.contains_type_variables(root) || self.contains_type_variables(value)
            }
            TypeData::Tuple(list) => self
                .tuple_list(list)
                .iter()
                .any(|element| self.contains_type_variables(element.ty)),
            TypeData::Function(shape) => self.function_shape(shape).is_some_and(|shape| {
                self.contains_type_variables(shape.result)
                    || shape
                        .params
                        .iter()
                        .any(|param| self.contains_type_variables(param.ty))
            }),
        }
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod intern_tests;
