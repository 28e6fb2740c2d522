//! Declaration identifiers and storage.
//!
//! Fixes reference declarations (members, initializers, generic owners,
//! protocols) by `DeclId`. The store is only as rich as the diagnostics
//! need: names, kinds, access levels, a handful of flags and the nominal
//! relationships (superclass, conformances, raw value type).

use crate::types::TypeId;
use bitflags::bitflags;
use tracing::trace;
use tyfix_common::interner::Atom;
use tyfix_common::limits;
use tyfix_common::span::Span;

// =============================================================================
// DeclId
// =============================================================================

/// Declaration identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

impl DeclId {
    /// Sentinel value for invalid `DeclId`.
    pub const INVALID: Self = Self(0);

    /// First valid `DeclId`.
    pub const FIRST_VALID: u32 = 1;

    /// Check if this `DeclId` is valid.
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

// =============================================================================
// DeclKind / AccessLevel / DeclFlags
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Struct,
    Class,
    Enum,
    Protocol,
    TypeAlias,
    GenericParam,
    /// Free function, or a method when the declaration has a parent.
    Func,
    Init,
    Var,
    Param,
    Subscript,
    EnumCase,
}

impl DeclKind {
    pub const fn is_nominal(self) -> bool {
        matches!(
            self,
            DeclKind::Struct | DeclKind::Class | DeclKind::Enum | DeclKind::Protocol
        )
    }

    /// Short description used in diagnostics ("a declaration", ...).
    pub const fn description(self) -> &'static str {
        match self {
            DeclKind::Struct => "struct",
            DeclKind::Class => "class",
            DeclKind::Enum => "enum",
            DeclKind::Protocol => "protocol",
            DeclKind::TypeAlias => "type alias",
            DeclKind::GenericParam => "generic parameter",
            DeclKind::Func => "function",
            DeclKind::Init => "initializer",
            DeclKind::Var => "property",
            DeclKind::Param => "parameter",
            DeclKind::Subscript => "subscript",
            DeclKind::EnumCase => "enum case",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessLevel {
    Private,
    FilePrivate,
    #[default]
    Internal,
    Public,
    Open,
}

impl AccessLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            AccessLevel::Private => "private",
            AccessLevel::FilePrivate => "fileprivate",
            AccessLevel::Internal => "internal",
            AccessLevel::Public => "public",
            AccessLevel::Open => "open",
        }
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DeclFlags: u16 {
        const STATIC = 1 << 0;
        const MUTATING = 1 << 1;
        const MUTATING_GETTER = 1 << 2;
        const REQUIRED = 1 << 3;
        const FINAL = 1 << 4;
        /// Immutable binding (`let`).
        const LET = 1 << 5;
        /// Property whose storage is mediated by a property wrapper.
        const WRAPPED = 1 << 6;
        /// Function builder type.
        const FUNCTION_BUILDER = 1 << 7;
    }
}

// =============================================================================
// DeclInfo
// =============================================================================

/// Everything the fix diagnostics need to know about a declaration.
#[derive(Clone, Debug)]
pub struct DeclInfo {
    pub kind: DeclKind,
    pub name: Atom,
    pub span: Span,
    pub access: AccessLevel,
    pub flags: DeclFlags,
    /// Enclosing nominal declaration for members.
    pub parent: Option<DeclId>,
    /// Type of the declaration as seen from its interface.
    pub interface_type: Option<TypeId>,
    /// Generic parameters in declaration order.
    pub generic_params: Vec<TypeId>,
    pub superclass: Option<DeclId>,
    pub conformances: Vec<DeclId>,
    /// Raw value type of a raw-representable enum.
    pub raw_type: Option<TypeId>,
}

impl DeclInfo {
    pub fn new(kind: DeclKind, name: Atom) -> Self {
        DeclInfo {
            kind,
            name,
            span: Span::DUMMY,
            access: AccessLevel::default(),
            flags: DeclFlags::empty(),
            parent: None,
            interface_type: None,
            generic_params: Vec::new(),
            superclass: None,
            conformances: Vec::new(),
            raw_type: None,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn with_access(mut self, access: AccessLevel) -> Self {
        self.access = access;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: DeclFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: DeclId) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_type(mut self, ty: TypeId) -> Self {
        self.interface_type = Some(ty);
        self
    }

    #[must_use]
    pub fn with_generic_params(mut self, params: Vec<TypeId>) -> Self {
        self.generic_params = params;
        self
    }

    #[must_use]
    pub fn with_superclass(mut self, superclass: DeclId) -> Self {
        self.superclass = Some(superclass);
        self
    }

    #[must_use]
    pub fn with_conformances(mut self, protocols: Vec<DeclId>) -> Self {
        self.conformances = protocols;
        self
    }

    #[must_use]
    pub fn with_raw_type(mut self, raw: TypeId) -> Self {
        self.raw_type = Some(raw);
        self
    }

    #[inline]
    pub const fn is_static(&self) -> bool {
        self.flags.contains(DeclFlags::STATIC)
    }

    #[inline]
    pub const fn is_mutating(&self) -> bool {
        self.flags.contains(DeclFlags::MUTATING)
    }

    #[inline]
    pub const fn has_mutating_getter(&self) -> bool {
        self.flags.contains(DeclFlags::MUTATING_GETTER)
    }

    /// Function declared inside a nominal type.
    #[inline]
    pub const fn is_method(&self) -> bool {
        matches!(self.kind, DeclKind::Func) && self.parent.is_some()
    }
}

// =============================================================================
// DeclStore
// =============================================================================

/// Storage for declarations.
#[derive(Default)]
pub struct DeclStore {
    decls: Vec<DeclInfo>,
}

impl DeclStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration and return its id.
    pub fn register(&mut self, info: DeclInfo) -> DeclId {
        self.decls.push(info);
        let id = DeclId(self.decls.len() as u32);
        trace!(decl = id.0, kind = ?self.decls[self.decls.len() - 1].kind, "registered declaration");
        id
    }

    pub fn get(&self, id: DeclId) -> Option<&DeclInfo> {
        let index = id.0.checked_sub(DeclId::FIRST_VALID)?;
        self.decls.get(index as usize)
    }

    pub fn contains(&self, id: DeclId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Name of a declaration, `Atom::NONE` for unknown ids.
    pub fn name(&self, id: DeclId) -> Atom {
        self.get(id).map_or(Atom::NONE, |info| info.name)
    }

    pub fn kind(&self, id: DeclId) -> Option<DeclKind> {
        self.get(id).map(|info| info.kind)
    }

    /// Whether class `derived` is `base` or inherits from it.
    pub fn is_subclass_of(&self, derived: DeclId, base: DeclId) -> bool {
        let mut current = Some(derived);
        for _ in 0..limits::MAX_SUPERCLASS_CHAIN {
            match current {
                Some(id) if id == base => return true,
                Some(id) => current = self.get(id).and_then(|info| info.superclass),
                None => return false,
            }
        }
        false
    }

    /// Whether `decl` (or one of its superclasses) declares conformance to
    /// `protocol`.
    pub fn conforms_to(&self, decl: DeclId, protocol: DeclId) -> bool {
        if decl == protocol {
            return true;
        }
        let mut current = Some(decl);
        for _ in 0..limits::MAX_SUPERCLASS_CHAIN {
            let Some(id) = current else {
                return false;
            };
            let Some(info) = self.get(id) else {
                return false;
            };
            if info.conformances.contains(&protocol) {
                return true;
            }
            current = info.superclass;
        }
        false
    }
}

#[cfg(test)]
#[path = "../tests/decl_tests.rs"]
mod decl_tests;
