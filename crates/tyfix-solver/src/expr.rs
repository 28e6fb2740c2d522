//! Resolved expression tree.
//!
//! Fixes are anchored to expressions through their locator and render
//! diagnostics against the tree once solving has finished. Nodes live in a
//! `la_arena::Arena` owned by the session and are addressed by `ExprId`.

use crate::decl::DeclId;
use crate::types::TypeId;
use la_arena::{Arena, Idx};
use rustc_hash::FxHashMap;
use tyfix_common::interner::Atom;
use tyfix_common::span::Span;

pub type ExprId = Idx<Expr>;

/// A labelled call, subscript or tuple argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Argument {
    pub label: Atom,
    /// Span of the label including the colon, when written.
    pub label_span: Option<Span>,
    pub expr: ExprId,
}

impl Argument {
    pub fn unlabeled(expr: ExprId) -> Self {
        Argument {
            label: Atom::NONE,
            label_span: None,
            expr,
        }
    }

    pub fn labeled(label: Atom, label_span: Span, expr: ExprId) -> Self {
        Argument {
            label,
            label_span: Some(label_span),
            expr,
        }
    }
}

/// Statement shapes a function builder may refuse to transform.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StmtKind {
    If,
    Guard,
    Switch,
    For,
    While,
    RepeatWhile,
    Do,
    Defer,
    Throw,
    Break,
    Continue,
    Return,
}

impl StmtKind {
    pub const fn description(self) -> &'static str {
        match self {
            StmtKind::If => "an 'if' statement",
            StmtKind::Guard => "a 'guard' statement",
            StmtKind::Switch => "a 'switch' statement",
            StmtKind::For => "a 'for' loop",
            StmtKind::While => "a 'while' loop",
            StmtKind::RepeatWhile => "a 'repeat-while' loop",
            StmtKind::Do => "a 'do' statement",
            StmtKind::Defer => "a 'defer' statement",
            StmtKind::Throw => "a 'throw' statement",
            StmtKind::Break => "a 'break' statement",
            StmtKind::Continue => "a 'continue' statement",
            StmtKind::Return => "a 'return' statement",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    IntegerLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(Atom),
    BoolLiteral(bool),
    NilLiteral,
    /// Reference to a variable, parameter or function.
    DeclRef(DeclId),
    /// Type used in expression position, e.g. `S` in `S.init`.
    TypeExpr(TypeId),
    /// Member reference whose declaration is not resolved.
    UnresolvedDot { base: ExprId, name: Atom, name_span: Span },
    MemberRef { base: ExprId, member: DeclId, name_span: Span },
    Call { callee: ExprId, args: Vec<Argument> },
    Subscript { base: ExprId, args: Vec<Argument> },
    Tuple(Vec<Argument>),
    Paren(ExprId),
    /// `&x`
    InOut(ExprId),
    /// `x!`
    ForceValue(ExprId),
    /// `x?`
    BindOptional(ExprId),
    /// `x as T`; `as_span` covers the `as` keyword.
    Coerce { sub: ExprId, ty: TypeId, as_span: Span },
    /// `x as! T`
    ForcedCheckedCast { sub: ExprId, ty: TypeId, as_span: Span },
    Assign { dest: ExprId, src: ExprId },
    ArrayLiteral(Vec<ExprId>),
    Closure { params: Vec<Atom>, body: Vec<ExprId> },
    Return(Option<ExprId>),
    /// `\Root.a.b`
    KeyPath { root: Option<TypeId>, components: Vec<Atom> },
    /// Statement inside a closure body.
    Stmt(StmtKind),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// Arena owning every expression of the checked body.
#[derive(Default)]
pub struct ExprArena {
    exprs: Arena<Expr>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.exprs.alloc(Expr { kind, span })
    }

    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id]
    }

    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.exprs[id].kind
    }

    pub fn span(&self, id: ExprId) -> Span {
        self.exprs[id].span
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Look through parentheses.
    pub fn semantics_provider(&self, mut id: ExprId) -> ExprId {
        while let ExprKind::Paren(inner) = self.kind(id) {
            id = *inner;
        }
        id
    }

    /// Direct children in source order.
    pub fn children(&self, id: ExprId) -> Vec<ExprId> {
        match self.kind(id) {
            ExprKind::IntegerLiteral(_)
            | ExprKind::FloatLiteral(_)
            | ExprKind::StringLiteral(_)
            | ExprKind::BoolLiteral(_)
            | ExprKind::NilLiteral
            | ExprKind::DeclRef(_)
            | ExprKind::TypeExpr(_)
            | ExprKind::KeyPath { .. }
            | ExprKind::Stmt(_)
            | ExprKind::Return(None) => Vec::new(),
            ExprKind::UnresolvedDot { base, .. } | ExprKind::MemberRef { base, .. } => vec![*base],
            ExprKind::Call { callee: base, args } | ExprKind::Subscript { base, args } => {
                std::iter::once(*base)
                    .chain(args.iter().map(|arg| arg.expr))
                    .collect()
            }
            ExprKind::Tuple(args) => args.iter().map(|arg| arg.expr).collect(),
            ExprKind::Paren(sub)
            | ExprKind::InOut(sub)
            | ExprKind::ForceValue(sub)
            | ExprKind::BindOptional(sub)
            | ExprKind::Coerce { sub, .. }
            | ExprKind::ForcedCheckedCast { sub, .. }
            | ExprKind::Return(Some(sub)) => vec![*sub],
            ExprKind::Assign { dest, src } => vec![*dest, *src],
            ExprKind::ArrayLiteral(elements) => elements.clone(),
            ExprKind::Closure { body, .. } => body.clone(),
        }
    }

    /// Child-to-parent map for the tree rooted at `root`.
    pub fn parent_map(&self, root: ExprId) -> FxHashMap<ExprId, ExprId> {
        let mut parents = FxHashMap::default();
        let mut worklist = vec![root];
        while let Some(id) = worklist.pop() {
            for child in self.children(id) {
                parents.insert(child, id);
                worklist.push(child);
            }
        }
        parents
    }

    /// Arguments of a call or subscript expression.
    pub fn call_arguments(&self, id: ExprId) -> Option<&[Argument]> {
        match self.kind(id) {
            ExprKind::Call { args, .. } | ExprKind::Subscript { args, .. } => Some(args),
            _ => None,
        }
    }
}

impl std::ops::Index<ExprId> for ExprArena {
    type Output = Expr;

    fn index(&self, id: ExprId) -> &Expr {
        &self.exprs[id]
    }
}
