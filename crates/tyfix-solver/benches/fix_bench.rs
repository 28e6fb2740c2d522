//! Fix recording and diagnosis benchmarks.
//!
//! Measures branch bookkeeping while fixes are recorded, and the cost of
//! rendering an accepted solution.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tyfix_common::span::Span;
use tyfix_solver::fix::{AddAddressOf, ContextualMismatch, ForceOptional};
use tyfix_solver::{ConstraintSystem, DiagnosticCollector, ExprId, ExprKind, LocatorPathElt, TypeId};

const SIZES: [usize; 3] = [16, 128, 1024];

/// `n` integer literals laid out one per line-ish, each with its own type.
fn literals(cs: &mut ConstraintSystem, n: usize) -> Vec<ExprId> {
    (0..n)
        .map(|i| {
            let start = (i * 8) as u32;
            let expr = cs.alloc_expr(ExprKind::IntegerLiteral(i as i64), Span::new(start, start + 4));
            cs.set_expr_type(expr, TypeId::INT);
            expr
        })
        .collect()
}

fn record_mismatches(cs: &mut ConstraintSystem, exprs: &[ExprId]) {
    let optional_int = cs.types().optional(TypeId::INT);
    for (i, &expr) in exprs.iter().enumerate() {
        let locator = cs.locator(expr, &[LocatorPathElt::ContextualType]);
        match i % 3 {
            0 => {
                ContextualMismatch::create(cs, TypeId::INT, TypeId::STRING, locator);
            }
            1 => {
                ForceOptional::create(cs, optional_int, TypeId::INT, locator);
            }
            _ => {
                AddAddressOf::create(cs, TypeId::INT, TypeId::INT, locator);
            }
        }
    }
}

fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("record");
    for n in SIZES {
        group.bench_with_input(BenchmarkId::new("commit", n), &n, |b, &n| {
            b.iter(|| {
                let mut cs = ConstraintSystem::new();
                let exprs = literals(&mut cs, n);
                cs.begin_branch();
                record_mismatches(&mut cs, &exprs);
                black_box(cs.commit_branch().len())
            });
        });
        group.bench_with_input(BenchmarkId::new("discard", n), &n, |b, &n| {
            b.iter(|| {
                let mut cs = ConstraintSystem::new();
                let exprs = literals(&mut cs, n);
                cs.begin_branch();
                record_mismatches(&mut cs, &exprs);
                cs.discard_branch();
                black_box(cs.score())
            });
        });
    }
    group.finish();
}

fn bench_diagnose(c: &mut Criterion) {
    let mut group = c.benchmark_group("diagnose");
    for n in SIZES {
        group.bench_with_input(BenchmarkId::new("render", n), &n, |b, &n| {
            let mut cs = ConstraintSystem::new();
            let exprs = literals(&mut cs, n);
            record_mismatches(&mut cs, &exprs);
            let solution = cs.finalize_solution();
            let root = exprs[0];
            b.iter(|| {
                let mut sink = DiagnosticCollector::new();
                solution.diagnose(&cs, root, &mut sink);
                black_box(sink.render(cs.types(), cs.decls()).len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_record, bench_diagnose);
criterion_main!(benches);
