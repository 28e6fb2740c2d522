//! Solving session.
//!
//! `ConstraintSystem` owns everything a fix needs to be created and later
//! rendered: the type interner, declarations, the expression arena, uniqued
//! locators and a stack of solving branches.
//!
//! ## Branches
//!
//! Every branch owns its own fix arena. Exploring an alternative pushes a
//! branch; abandoning it drops the whole arena at once, and accepting it
//! folds its fixes (in recording order), bindings and score into the parent.
//! Fixes are never shared between branches.
//!
//! ```text
//! root ── begin_branch ── record fixes ── discard_branch   (fixes dropped)
//!                      └─ record fixes ── commit_branch    (fixes moved up)
//! ```
//!
//! `finalize_solution` folds the remaining stack and returns a [`Solution`]
//! whose fixes are rendered by [`Solution::diagnose`].

use crate::config::FixOptions;
use crate::decl::DeclStore;
use crate::diagnostics::DiagnosticCollector;
use crate::expr::{ExprArena, ExprId, ExprKind};
use crate::fix::{ConstraintFix, FailureContext};
use crate::intern::TypeInterner;
use crate::locator::{ConstraintLocator, LocatorId, LocatorPathElt};
use crate::relation::{Bindings, simplify_type};
use crate::types::{TypeData, TypeId, TypeVarId};
use la_arena::{Arena, Idx};
use rustc_hash::FxHashMap;
use tracing::{debug, debug_span};
use tyfix_common::interner::Atom;
use tyfix_common::limits;
use tyfix_common::span::Span;

// =============================================================================
// Identifiers and Scoring
// =============================================================================

/// Identity of a solving branch, unique within a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BranchId(u32);

/// Handle to a fix recorded in a specific branch.
///
/// Valid while that branch is alive; once the branch is discarded or
/// committed, or the root is finalized, the handle no longer resolves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FixId {
    branch: BranchId,
    index: Idx<ConstraintFix>,
}

impl FixId {
    pub fn branch(self) -> BranchId {
        self.branch
    }
}

/// Solver-held bookkeeping about recorded fixes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SolverScore {
    /// Error-level fixes.
    pub fixes: u32,
    /// Warning-level fixes, weighted more cheaply by the solver.
    pub warnings: u32,
}

impl SolverScore {
    fn record(&mut self, is_warning: bool) {
        if is_warning {
            self.warnings += 1;
        } else {
            self.fixes += 1;
        }
    }

    pub fn total(self) -> u32 {
        self.fixes + self.warnings
    }
}

struct SolverBranch {
    id: BranchId,
    fixes: Arena<ConstraintFix>,
    bindings: Bindings,
    expr_types: FxHashMap<ExprId, TypeId>,
    score: SolverScore,
}

impl SolverBranch {
    fn new(id: BranchId) -> Self {
        SolverBranch {
            id,
            fixes: Arena::new(),
            bindings: Bindings::default(),
            expr_types: FxHashMap::default(),
            score: SolverScore::default(),
        }
    }
}

// =============================================================================
// ConstraintSystem
// =============================================================================

pub struct ConstraintSystem {
    types: TypeInterner,
    decls: DeclStore,
    exprs: ExprArena,
    locators: Arena<ConstraintLocator>,
    locator_map: FxHashMap<ConstraintLocator, LocatorId>,
    options: FixOptions,
    next_type_var: u32,
    next_branch: u32,
    /// Never empty: index 0 is the root branch.
    branches: Vec<SolverBranch>,
}

impl Default for ConstraintSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintSystem {
    pub fn new() -> Self {
        Self::with_options(FixOptions::default())
    }

    pub fn with_options(options: FixOptions) -> Self {
        ConstraintSystem {
            types: TypeInterner::new(),
            decls: DeclStore::new(),
            exprs: ExprArena::new(),
            locators: Arena::new(),
            locator_map: FxHashMap::default(),
            options,
            next_type_var: 0,
            next_branch: 1,
            branches: vec![SolverBranch::new(BranchId(0))],
        }
    }

    // =========================================================================
    // Collaborators
    // =========================================================================

    #[inline]
    pub fn types(&self) -> &TypeInterner {
        &self.types
    }

    #[inline]
    pub fn decls(&self) -> &DeclStore {
        &self.decls
    }

    #[inline]
    pub fn decls_mut(&mut self) -> &mut DeclStore {
        &mut self.decls
    }

    #[inline]
    pub fn exprs(&self) -> &ExprArena {
        &self.exprs
    }

    #[inline]
    pub fn options(&self) -> &FixOptions {
        &self.options
    }

    pub fn intern_string(&self, s: &str) -> Atom {
        self.types.intern_string(s)
    }

    pub fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.exprs.alloc(kind, span)
    }

    /// Unique locator for `anchor` + `path`.
    pub fn locator(&mut self, anchor: ExprId, path: &[LocatorPathElt]) -> LocatorId {
        let locator = ConstraintLocator::new(anchor, path);
        if let Some(&id) = self.locator_map.get(&locator) {
            return id;
        }
        let id = self.locators.alloc(locator.clone());
        self.locator_map.insert(locator, id);
        id
    }

    pub fn get_locator(&self, id: LocatorId) -> &ConstraintLocator {
        &self.locators[id]
    }

    // =========================================================================
    // Type Variables and Expression Types
    // =========================================================================

    pub fn create_type_variable(&mut self) -> TypeId {
        let var = TypeVarId(self.next_type_var);
        self.next_type_var += 1;
        self.types.type_variable(var)
    }

    /// Bind type variable `var` in the current branch.
    ///
    /// # Panics
    ///
    /// If `var` is not a type variable.
    pub fn bind(&mut self, var: TypeId, ty: TypeId) {
        let Some(TypeData::TypeVariable(id)) = self.types.lookup(var) else {
            panic!("bind called on non-variable type {var:?}");
        };
        self.current_mut().bindings.insert(id, ty);
    }

    /// Substitute the current branch's bindings into `ty`.
    pub fn simplify_type(&self, ty: TypeId) -> TypeId {
        simplify_type(&self.types, &self.current().bindings, ty)
    }

    pub fn set_expr_type(&mut self, expr: ExprId, ty: TypeId) {
        self.current_mut().expr_types.insert(expr, ty);
    }

    pub fn expr_type(&self, expr: ExprId) -> Option<TypeId> {
        self.current().expr_types.get(&expr).copied()
    }

    // =========================================================================
    // Fix Recording
    // =========================================================================

    /// Record `fix` against the current branch.
    pub(crate) fn record_fix(&mut self, fix: ConstraintFix) -> FixId {
        let description = tracing::enabled!(tracing::Level::DEBUG).then(|| fix.describe(self));
        let branch = self.current_mut();
        branch.score.record(fix.is_warning());
        let index = branch.fixes.alloc(fix);
        let id = FixId {
            branch: branch.id,
            index,
        };
        if let Some(description) = description {
            debug!(branch = id.branch.0, "recorded {description}");
        }
        id
    }

    /// Look up a fix recorded in a live branch.
    pub fn fix(&self, id: FixId) -> Option<&ConstraintFix> {
        let branch = self.branches.iter().find(|branch| branch.id == id.branch)?;
        let raw = u32::from(id.index.into_raw()) as usize;
        (raw < branch.fixes.len()).then(|| &branch.fixes[id.index])
    }

    /// Fixes recorded in the current branch, in recording order.
    pub fn current_fixes(&self) -> impl Iterator<Item = &ConstraintFix> {
        self.current().fixes.iter().map(|(_, fix)| fix)
    }

    pub fn score(&self) -> SolverScore {
        self.current().score
    }

    // =========================================================================
    // Branches
    // =========================================================================

    pub fn depth(&self) -> usize {
        self.branches.len() - 1
    }

    pub fn current_branch(&self) -> BranchId {
        self.current().id
    }

    /// Start exploring an alternative.
    ///
    /// The new branch inherits bindings, expression types and score from
    /// the current one, and starts with an empty fix arena.
    pub fn begin_branch(&mut self) -> BranchId {
        assert!(
            self.depth() < limits::MAX_BRANCH_DEPTH,
            "solving branch depth exceeded {}",
            limits::MAX_BRANCH_DEPTH
        );
        let id = self.fresh_branch_id();
        let parent = self.current();
        let branch = SolverBranch {
            id,
            fixes: Arena::new(),
            bindings: parent.bindings.clone(),
            expr_types: parent.expr_types.clone(),
            score: parent.score,
        };
        self.branches.push(branch);
        debug!(branch = id.0, depth = self.depth(), "begin branch");
        id
    }

    /// Abandon the current branch, dropping all of its fixes at once.
    ///
    /// # Panics
    ///
    /// On the root branch.
    pub fn discard_branch(&mut self) {
        assert!(self.depth() > 0, "cannot discard the root branch");
        if let Some(branch) = self.branches.pop() {
            debug!(branch = branch.id.0, fixes = branch.fixes.len(), "discard branch");
        }
    }

    /// Accept the current branch into its parent.
    ///
    /// Returns the new handles of the moved fixes, in recording order.
    ///
    /// # Panics
    ///
    /// On the root branch.
    pub fn commit_branch(&mut self) -> Vec<FixId> {
        assert!(self.depth() > 0, "cannot commit the root branch");
        let Some(child) = self.branches.pop() else {
            return Vec::new();
        };
        debug!(branch = child.id.0, fixes = child.fixes.len(), "commit branch");
        let parent = self.current_mut();
        parent.bindings = child.bindings;
        parent.expr_types = child.expr_types;
        parent.score = child.score;
        let parent_id = parent.id;
        child
            .fixes
            .iter()
            .map(|(_, fix)| FixId {
                branch: parent_id,
                index: parent.fixes.alloc(fix.clone()),
            })
            .collect()
    }

    /// Fold every open branch into the root and take the accepted solution.
    ///
    /// The root branch is left empty, ready for another solving attempt.
    /// It takes a new id, so handles into the finalized root stop resolving.
    pub fn finalize_solution(&mut self) -> Solution {
        while self.depth() > 0 {
            self.commit_branch();
        }
        let fresh = self.fresh_branch_id();
        let root = &mut self.branches[0];
        root.id = fresh;
        let solution = Solution {
            fixes: std::mem::take(&mut root.fixes),
            bindings: std::mem::take(&mut root.bindings),
            expr_types: std::mem::take(&mut root.expr_types),
            score: std::mem::take(&mut root.score),
        };
        debug!(fixes = solution.fixes.len(), "finalized solution");
        solution
    }

    fn fresh_branch_id(&mut self) -> BranchId {
        let id = BranchId(self.next_branch);
        self.next_branch += 1;
        id
    }

    fn current(&self) -> &SolverBranch {
        &self.branches[self.branches.len() - 1]
    }

    fn current_mut(&mut self) -> &mut SolverBranch {
        let last = self.branches.len() - 1;
        &mut self.branches[last]
    }
}

// =============================================================================
// Solution
// =============================================================================

/// The accepted branch: its fixes, bindings and score.
pub struct Solution {
    fixes: Arena<ConstraintFix>,
    bindings: Bindings,
    expr_types: FxHashMap<ExprId, TypeId>,
    score: SolverScore,
}

impl Solution {
    /// Fixes in recording order.
    pub fn fixes(&self) -> impl Iterator<Item = &ConstraintFix> {
        self.fixes.iter().map(|(_, fix)| fix)
    }

    pub fn fix_count(&self) -> usize {
        self.fixes.len()
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn score(&self) -> SolverScore {
        self.score
    }

    pub fn simplify_type(&self, types: &TypeInterner, ty: TypeId) -> TypeId {
        simplify_type(types, &self.bindings, ty)
    }

    pub fn expr_type(&self, expr: ExprId) -> Option<TypeId> {
        self.expr_types.get(&expr).copied()
    }

    /// Fixes ordered by anchor source position; ties keep recording order.
    pub fn ordered_fixes<'s>(&'s self, cs: &ConstraintSystem) -> Vec<&'s ConstraintFix> {
        let mut fixes: Vec<&ConstraintFix> = self.fixes().collect();
        fixes.sort_by_key(|fix| cs.exprs().span(fix.anchor(cs)).start);
        fixes
    }

    /// Render every fix once, in anchor order, into `sink`.
    ///
    /// Returns the number of fixes that emitted a diagnostic.
    pub fn diagnose(
        &self,
        cs: &ConstraintSystem,
        root: ExprId,
        sink: &mut DiagnosticCollector,
    ) -> usize {
        let _span = debug_span!("diagnose_solution", fixes = self.fixes.len()).entered();
        let parents = cs.exprs().parent_map(root);
        let mut emitted = 0;
        for fix in self.ordered_fixes(cs) {
            let mut ctx = FailureContext::new(cs, self, root, &parents, sink, fix);
            if fix.diagnose(&mut ctx, false) {
                emitted += 1;
            } else {
                debug!("{} produced no diagnostic", fix.describe(cs));
            }
        }
        emitted
    }
}

#[cfg(test)]
#[path = "../tests/system_tests.rs"]
mod system_tests;
