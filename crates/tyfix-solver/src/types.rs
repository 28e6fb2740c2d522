//! Type representation consumed by constraint fixes.
//!
//! Types are interned: a `TypeId` is a u32 handle into the `TypeInterner`
//! and two structurally equal types always share the same id, so equality
//! is an integer comparison.
//!
//! Fixes store `TypeId`s exactly as the solver handed them over. Those types
//! may still mention unresolved type variables (`TypeData::TypeVariable`);
//! the diagnostic pass substitutes the accepted solution's bindings before
//! anything is rendered.

use crate::decl::DeclId;
use bitflags::bitflags;
use tyfix_common::interner::Atom;

// =============================================================================
// TypeId
// =============================================================================

/// Interned type handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const ERROR: TypeId = TypeId(0);
    pub const ANY: TypeId = TypeId(1);
    pub const ANY_OBJECT: TypeId = TypeId(2);
    pub const VOID: TypeId = TypeId(3);
    pub const NEVER: TypeId = TypeId(4);
    pub const INT: TypeId = TypeId(5);
    pub const DOUBLE: TypeId = TypeId(6);
    pub const STRING: TypeId = TypeId(7);
    pub const BOOL: TypeId = TypeId(8);

    /// First id handed out for non-intrinsic types.
    pub const FIRST_USER: u32 = 9;

    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }
}

/// Built-in types with a fixed `TypeId`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Error,
    Any,
    AnyObject,
    Void,
    Never,
    Int,
    Double,
    String,
    Bool,
}

impl IntrinsicKind {
    /// All intrinsics in `TypeId` order.
    pub const ALL: [IntrinsicKind; 9] = [
        IntrinsicKind::Error,
        IntrinsicKind::Any,
        IntrinsicKind::AnyObject,
        IntrinsicKind::Void,
        IntrinsicKind::Never,
        IntrinsicKind::Int,
        IntrinsicKind::Double,
        IntrinsicKind::String,
        IntrinsicKind::Bool,
    ];

    pub const fn type_id(self) -> TypeId {
        TypeId(self as u32)
    }

    pub const fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Error => "<<error type>>",
            IntrinsicKind::Any => "Any",
            IntrinsicKind::AnyObject => "AnyObject",
            IntrinsicKind::Void => "Void",
            IntrinsicKind::Never => "Never",
            IntrinsicKind::Int => "Int",
            IntrinsicKind::Double => "Double",
            IntrinsicKind::String => "String",
            IntrinsicKind::Bool => "Bool",
        }
    }
}

// =============================================================================
// Interned Sub-structures
// =============================================================================

/// Interned list of types (generic arguments).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeListId(pub u32);

/// Interned list of tuple elements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TupleListId(pub u32);

/// Interned function signature.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShapeId(pub u32);

/// Inference variable allocated by the solving session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVarId(pub u32);

bitflags! {
    /// Per-parameter attributes that affect argument binding.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ParamFlags: u8 {
        const INOUT = 1 << 0;
        const VARIADIC = 1 << 1;
        const AUTOCLOSURE = 1 << 2;
        const ESCAPING = 1 << 3;
        const DEFAULTED = 1 << 4;
    }
}

/// A function parameter (or a call argument once it has been typed).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    /// External label, `Atom::NONE` for `_`.
    pub label: Atom,
    pub ty: TypeId,
    pub flags: ParamFlags,
}

impl ParamInfo {
    pub const fn new(label: Atom, ty: TypeId) -> Self {
        ParamInfo {
            label,
            ty,
            flags: ParamFlags::empty(),
        }
    }

    pub const fn unlabeled(ty: TypeId) -> Self {
        Self::new(Atom::NONE, ty)
    }

    #[must_use]
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub const fn is_inout(&self) -> bool {
        self.flags.contains(ParamFlags::INOUT)
    }

    #[inline]
    pub const fn is_variadic(&self) -> bool {
        self.flags.contains(ParamFlags::VARIADIC)
    }

    #[inline]
    pub const fn is_autoclosure(&self) -> bool {
        self.flags.contains(ParamFlags::AUTOCLOSURE)
    }
}

/// Function signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub params: Vec<ParamInfo>,
    pub result: TypeId,
    pub throws: bool,
    pub escaping: bool,
}

impl FunctionShape {
    pub fn new(params: Vec<ParamInfo>, result: TypeId) -> Self {
        FunctionShape {
            params,
            result,
            throws: false,
            escaping: false,
        }
    }

    #[must_use]
    pub fn throwing(mut self) -> Self {
        self.throws = true;
        self
    }

    #[must_use]
    pub fn escaping(mut self) -> Self {
        self.escaping = true;
        self
    }
}

/// Tuple element with an optional label.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TupleElement {
    pub label: Atom,
    pub ty: TypeId,
}

impl TupleElement {
    pub const fn new(label: Atom, ty: TypeId) -> Self {
        TupleElement { label, ty }
    }

    pub const fn unlabeled(ty: TypeId) -> Self {
        TupleElement {
            label: Atom::NONE,
            ty,
        }
    }
}

/// Capability of a key path type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyPathKind {
    ReadOnly,
    Writable,
    ReferenceWritable,
}

/// Flavour of an unsafe pointer type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Immutable,
    Mutable,
    Raw,
}

// =============================================================================
// TypeData
// =============================================================================

/// Structural type representation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    /// Non-generic nominal type (struct, class, enum).
    Nominal(DeclId),
    /// Application of a generic nominal declaration, e.g. `Box<Int>`.
    BoundGeneric { decl: DeclId, args: TypeListId },
    /// Protocol used as a type.
    Existential(DeclId),
    Optional(TypeId),
    Array(TypeId),
    Dictionary { key: TypeId, value: TypeId },
    Tuple(TupleListId),
    Function(FunctionShapeId),
    Metatype(TypeId),
    /// Assignable storage of the wrapped type.
    LValue(TypeId),
    InOut(TypeId),
    TypeVariable(TypeVarId),
    GenericParam { name: Atom, depth: u16, index: u16 },
    KeyPath { kind: KeyPathKind, root: TypeId, value: TypeId },
    Pointer { kind: PointerKind, pointee: TypeId },
}
