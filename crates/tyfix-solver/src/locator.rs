//! Constraint locators.
//!
//! A locator names the place in an expression's constraint derivation where
//! a constraint (and therefore a fix) originates: an anchor expression plus
//! a path of derivation steps. Locators are uniqued by the session and
//! referenced by `LocatorId`, so a fix always carries one.

use crate::expr::ExprId;
use crate::types::ParamFlags;
use la_arena::Idx;
use smallvec::SmallVec;
use std::fmt;

pub type LocatorId = Idx<ConstraintLocator>;

/// Kind of generic requirement a `TypeParameterRequirement` step refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RequirementKind {
    Conformance,
    Superclass,
    SameType,
    Layout,
}

/// One step of a locator path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LocatorPathElt {
    /// The argument list of an application.
    ApplyArgument,
    /// The function being applied.
    ApplyFunction,
    /// Conversion of argument `arg_idx` to parameter `param_idx`.
    ApplyArgToParam {
        arg_idx: u32,
        param_idx: u32,
        flags: ParamFlags,
    },
    /// Conversion to a type written by the user.
    ContextualType,
    FunctionResult,
    ClosureResult,
    /// Parameter `n` of a function type being matched.
    FunctionArgument(u32),
    Member,
    UnresolvedMember,
    MemberRefBase,
    SubscriptMember,
    ConstructorMember,
    KeyPathComponent(u32),
    KeyPathRoot,
    KeyPathValue,
    GenericArgument(u32),
    TupleElement(u32),
    TypeParameterRequirement { index: u32, kind: RequirementKind },
    ConditionalRequirement { index: u32, kind: RequirementKind },
    /// Destination of an assignment.
    AssignDest,
    /// Element of a collection literal or sequence.
    SequenceElementType,
    OptionalPayload,
    AutoclosureResult,
    RValueAdjustment,
}

impl LocatorPathElt {
    pub const fn is_requirement(&self) -> bool {
        matches!(
            self,
            LocatorPathElt::TypeParameterRequirement { .. }
                | LocatorPathElt::ConditionalRequirement { .. }
        )
    }
}

impl fmt::Display for LocatorPathElt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocatorPathElt::ApplyArgument => f.write_str("apply argument"),
            LocatorPathElt::ApplyFunction => f.write_str("apply function"),
            LocatorPathElt::ApplyArgToParam {
                arg_idx, param_idx, ..
            } => write!(f, "comparing call argument #{arg_idx} to parameter #{param_idx}"),
            LocatorPathElt::ContextualType => f.write_str("contextual type"),
            LocatorPathElt::FunctionResult => f.write_str("function result"),
            LocatorPathElt::ClosureResult => f.write_str("closure result"),
            LocatorPathElt::FunctionArgument(n) => write!(f, "function argument #{n}"),
            LocatorPathElt::Member => f.write_str("member"),
            LocatorPathElt::UnresolvedMember => f.write_str("unresolved member"),
            LocatorPathElt::MemberRefBase => f.write_str("base of member reference"),
            LocatorPathElt::SubscriptMember => f.write_str("subscript member"),
            LocatorPathElt::ConstructorMember => f.write_str("constructor member"),
            LocatorPathElt::KeyPathComponent(n) => write!(f, "key path component #{n}"),
            LocatorPathElt::KeyPathRoot => f.write_str("key path root"),
            LocatorPathElt::KeyPathValue => f.write_str("key path value"),
            LocatorPathElt::GenericArgument(n) => write!(f, "generic argument #{n}"),
            LocatorPathElt::TupleElement(n) => write!(f, "tuple element #{n}"),
            LocatorPathElt::TypeParameterRequirement { index, kind } => {
                write!(f, "type parameter requirement #{index} ({kind:?})")
            }
            LocatorPathElt::ConditionalRequirement { index, kind } => {
                write!(f, "conditional requirement #{index} ({kind:?})")
            }
            LocatorPathElt::AssignDest => f.write_str("assignment destination"),
            LocatorPathElt::SequenceElementType => f.write_str("sequence element type"),
            LocatorPathElt::OptionalPayload => f.write_str("optional payload"),
            LocatorPathElt::AutoclosureResult => f.write_str("@autoclosure result"),
            LocatorPathElt::RValueAdjustment => f.write_str("rvalue adjustment"),
        }
    }
}

/// Anchor expression plus derivation path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConstraintLocator {
    anchor: ExprId,
    path: SmallVec<[LocatorPathElt; 4]>,
}

impl ConstraintLocator {
    pub fn new(anchor: ExprId, path: &[LocatorPathElt]) -> Self {
        ConstraintLocator {
            anchor,
            path: SmallVec::from_slice(path),
        }
    }

    #[inline]
    pub fn anchor(&self) -> ExprId {
        self.anchor
    }

    #[inline]
    pub fn path(&self) -> &[LocatorPathElt] {
        &self.path
    }

    pub fn last(&self) -> Option<&LocatorPathElt> {
        self.path.last()
    }

    /// Whether the final path element matches `pred`.
    pub fn is_last(&self, pred: impl FnOnce(&LocatorPathElt) -> bool) -> bool {
        self.path.last().is_some_and(pred)
    }

    /// Last `ApplyArgToParam` step, if any.
    pub fn arg_to_param(&self) -> Option<(u32, u32, ParamFlags)> {
        self.path.iter().rev().find_map(|elt| match *elt {
            LocatorPathElt::ApplyArgToParam {
                arg_idx,
                param_idx,
                flags,
            } => Some((arg_idx, param_idx, flags)),
            _ => None,
        })
    }

    pub fn contains(&self, elt: &LocatorPathElt) -> bool {
        self.path.contains(elt)
    }

    pub fn is_for_requirement(&self) -> bool {
        self.path.iter().any(LocatorPathElt::is_requirement)
    }
}

impl fmt::Display for ConstraintLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "locator@{}", u32::from(self.anchor.into_raw()))?;
        if self.path.is_empty() {
            return Ok(());
        }
        f.write_str(" [")?;
        for (i, elt) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{elt}")?;
        }
        f.write_str("]")
    }
}
