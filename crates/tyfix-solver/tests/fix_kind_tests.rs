use super::*;
use crate::diagnostics::{DiagnosticCollector, DiagnosticSeverity};
use crate::expr::{ExprKind, StmtKind};
use crate::locator::{LocatorId, LocatorPathElt};
use crate::system::FixId;
use crate::test_fixtures::TestWorld;
use crate::types::{FunctionShape, ParamFlags, ParamInfo, TupleElement, TypeId};
use smallvec::smallvec;
use tyfix_common::span::Span;

#[test]
fn test_kind_discriminants_are_contiguous() {
    assert_eq!(FixKind::ALL.len(), 50);
    for (index, kind) in FixKind::ALL.iter().enumerate() {
        assert_eq!(*kind as u8 as usize, index, "{kind}");
    }
    assert_eq!(FixKind::RemoveReturn as u8, 49);
}

#[test]
fn test_kind_names() {
    assert_eq!(FixKind::AddressOf.as_str(), "AddressOf");
    assert_eq!(FixKind::UnwrapOptionalBaseWithOptionalResult.to_string(), "UnwrapOptionalBaseWithOptionalResult");
    assert_eq!(format!("{}", FixKind::InsertCall), "InsertCall");
}

#[test]
fn test_kind_families() {
    assert_eq!(FixKind::ForceOptional.family(), FixFamily::Contextual);
    assert_eq!(FixKind::UseValueTypeOfRawRepresentative.family(), FixFamily::Contextual);
    assert_eq!(FixKind::UnwrapOptionalBase.family(), FixFamily::MemberReference);
    assert_eq!(FixKind::UseSubscriptOperator.family(), FixFamily::MemberReference);
    assert_eq!(FixKind::AllowClosureParameterDestructuring.family(), FixFamily::ArgumentList);
    assert_eq!(FixKind::AddConformance.family(), FixFamily::GenericRequirement);
    assert_eq!(FixKind::AllowInvalidRefInKeyPath.family(), FixFamily::KeyPath);
    assert_eq!(FixKind::UseWrappedValue.family(), FixFamily::PropertyWrapper);
    assert_eq!(FixKind::RemoveUnwrap.family(), FixFamily::Other);
}

#[test]
fn test_variant_kinds() {
    assert_eq!(
        UnwrapOptionalBase::KINDS,
        &[FixKind::UnwrapOptionalBase, FixKind::UnwrapOptionalBaseWithOptionalResult]
    );
    assert_eq!(AddAddressOf::KINDS, &[FixKind::AddressOf]);
    assert_eq!(MissingConformance::KINDS, &[FixKind::AddConformance]);
}

/// Records one fix of every kind through its public factory.
fn record_every_kind(world: &mut TestWorld) -> Vec<(FixKind, LocatorId, FixId)> {
    let anchor = world.int(1, 0);
    let loc = world.locator(anchor, &[LocatorPathElt::ContextualType]);
    let sub = world.expr(ExprKind::NilLiteral, 20, 21);
    let coerce = world.expr(
        ExprKind::Coerce {
            sub,
            ty: world.derived,
            as_span: Span::new(22, 24),
        },
        20,
        32,
    );
    let coerce_loc = world.locator(coerce, &[LocatorPathElt::ContextualType]);
    let array_arg = world.int(2, 40);
    let (_, variadic_loc) = world.apply_f(array_arg, ParamFlags::VARIADIC);

    let (s, base, derived, color, p) = (world.s, world.base, world.derived, world.color, world.p);
    let (count_decl, bump_decl, x_decl, f_decl) = (world.count_decl, world.bump_decl, world.x_decl, world.f_decl);
    let box_t = world.box_t;
    let name = world.atom("value");
    let label = world.atom("a");
    let optional_int = world.cs.types().optional(TypeId::INT);
    let lvalue_s = world.cs.types().lvalue(s);
    let inout_s = world.cs.types().inout(s);
    let ints = world.cs.types().array(TypeId::INT);
    let plain = world.cs.types().function(FunctionShape::new(Vec::new(), TypeId::VOID));
    let throwing = world.cs.types().function(FunctionShape::new(Vec::new(), TypeId::VOID).throwing());
    let box_int = world.box_of(TypeId::INT);
    let box_string = world.box_of(TypeId::STRING);
    let pair = world.cs.types().tuple(vec![
        TupleElement::unlabeled(TypeId::INT),
        TupleElement::unlabeled(TypeId::STRING),
    ]);
    let metatype = world.cs.types().metatype(p);

    let cs = &mut world.cs;
    let mut args = vec![ParamInfo::unlabeled(TypeId::INT), ParamInfo::unlabeled(TypeId::STRING)];
    let mut bindings: Vec<ParamBinding> = vec![smallvec![0], smallvec![1]];
    let splat = AllowTupleSplatForSingleParameter::attempt(
        cs,
        &mut args,
        &[ParamInfo::unlabeled(pair)],
        &mut bindings,
        loc,
    )
    .expect("tuple splat");

    let mut recorded = vec![
        (FixKind::ContextualMismatch, loc, ContextualMismatch::create(cs, TypeId::INT, TypeId::STRING, loc)),
        (FixKind::ForceOptional, loc, ForceOptional::create(cs, optional_int, TypeId::INT, loc)),
        (FixKind::ForceDowncast, loc, ForceDowncast::create(cs, base, derived, loc)),
        (FixKind::AddressOf, loc, AddAddressOf::create(cs, lvalue_s, inout_s, loc)),
        (FixKind::RemoveAddressOf, loc, RemoveAddressOf::create(cs, inout_s, s, loc)),
        (FixKind::DropThrowsAttribute, loc, DropThrowsAttribute::create(cs, throwing, plain, loc)),
        (
            FixKind::GenericArgumentsMismatch,
            loc,
            GenericArgumentsMismatch::create(cs, box_int, box_string, &[0], loc),
        ),
        (FixKind::KeyPathContextualMismatch, loc, KeyPathContextualMismatch::create(cs, s, TypeId::INT, loc)),
        (
            FixKind::AllowAutoClosurePointerConversion,
            loc,
            AllowAutoClosurePointerConversion::create(cs, ints, TypeId::INT, loc),
        ),
        (FixKind::AllowTupleTypeMismatch, loc, AllowTupleTypeMismatch::create(cs, pair, TypeId::INT, loc)),
        (
            FixKind::CollectionElementContextualMismatch,
            loc,
            CollectionElementContextualMismatch::create(cs, TypeId::STRING, TypeId::INT, loc),
        ),
        (FixKind::IgnoreContextualType, loc, IgnoreContextualType::create(cs, TypeId::INT, TypeId::BOOL, loc)),
        (
            FixKind::IgnoreAssignmentDestinationType,
            loc,
            IgnoreAssignmentDestinationType::create(cs, TypeId::INT, TypeId::BOOL, loc),
        ),
        (FixKind::AllowInOutConversion, loc, AllowInOutConversion::create(cs, s, TypeId::INT, loc)),
        (
            FixKind::CoerceToCheckedCast,
            coerce_loc,
            CoerceToCheckedCast::attempt(cs, base, derived, coerce_loc).expect("checked cast"),
        ),
        (
            FixKind::AllowArgumentTypeMismatch,
            loc,
            AllowArgumentMismatch::create(cs, TypeId::STRING, TypeId::INT, loc),
        ),
        (
            FixKind::ExpandArrayIntoVarargs,
            variadic_loc,
            ExpandArrayIntoVarargs::attempt(cs, ints, TypeId::INT, variadic_loc).expect("varargs"),
        ),
        (
            FixKind::ExplicitlyConstructRawRepresentable,
            loc,
            ExplicitlyConstructRawRepresentable::attempt(cs, TypeId::INT, color, loc).expect("construct"),
        ),
        (
            FixKind::UseValueTypeOfRawRepresentative,
            loc,
            UseValueTypeOfRawRepresentative::attempt(cs, color, TypeId::INT, loc).expect("raw value"),
        ),
        (FixKind::DefineMemberBasedOnUse, loc, DefineMemberBasedOnUse::create(cs, s, name, loc)),
        (
            FixKind::AllowMemberRefOnExistential,
            loc,
            AllowMemberRefOnExistential::create(cs, p, None, name, loc),
        ),
        (
            FixKind::AllowTypeOrInstanceMember,
            loc,
            AllowTypeOrInstanceMember::create(cs, s, Some(count_decl), name, loc),
        ),
        (
            FixKind::AllowInaccessibleMember,
            loc,
            AllowInaccessibleMember::create(cs, s, Some(count_decl), name, loc),
        ),
        (
            FixKind::AllowMutatingMemberOnRValueBase,
            loc,
            AllowMutatingMemberOnRValueBase::create(cs, s, Some(bump_decl), name, loc),
        ),
        (
            FixKind::AllowInvalidPartialApplication,
            loc,
            AllowInvalidPartialApplication::create(cs, false, loc),
        ),
        (
            FixKind::AllowInvalidInitRef,
            loc,
            AllowInvalidInitRef::dynamic_on_metatype(cs, metatype, f_decl, Span::new(0, 1), loc),
        ),
        (
            FixKind::AllowInvalidInitRef,
            loc,
            AllowInvalidInitRef::on_protocol_metatype(cs, metatype, f_decl, true, Span::new(0, 1), loc),
        ),
        (
            FixKind::AllowInvalidInitRef,
            loc,
            AllowInvalidInitRef::on_non_const_metatype(cs, metatype, f_decl, Span::new(0, 1), loc),
        ),
        (FixKind::UnwrapOptionalBase, loc, UnwrapOptionalBase::create(cs, name, loc)),
        (
            FixKind::UnwrapOptionalBaseWithOptionalResult,
            loc,
            UnwrapOptionalBase::create_with_optional_result(cs, name, loc),
        ),
        (FixKind::UseSubscriptOperator, loc, UseSubscriptOperator::create(cs, loc)),
        (FixKind::RelabelArguments, loc, RelabelArguments::create(cs, &[label], loc)),
        (
            FixKind::AddMissingArguments,
            loc,
            AddMissingArguments::create(cs, &[ParamInfo::unlabeled(TypeId::INT)], loc),
        ),
        (
            FixKind::AddMissingArguments,
            loc,
            AddMissingArguments::synthesize(cs, &[ParamInfo::new(label, TypeId::INT)], loc),
        ),
        (
            FixKind::MoveOutOfOrderArgument,
            loc,
            MoveOutOfOrderArgument::create(cs, 1, 0, &[smallvec![1], smallvec![0]], loc),
        ),
        (FixKind::AllowTupleSplatForSingleParameter, loc, splat),
        (
            FixKind::AllowClosureParameterDestructuring,
            loc,
            AllowClosureParamDestructuring::create(cs, plain, loc),
        ),
        (FixKind::AddConformance, loc, MissingConformance::for_requirement(cs, s, p, loc)),
        (FixKind::AddConformance, loc, MissingConformance::for_contextual(cs, s, p, loc)),
        (FixKind::SkipSameTypeRequirement, loc, SkipSameTypeRequirement::create(cs, TypeId::INT, s, loc)),
        (FixKind::SkipSuperclassRequirement, loc, SkipSuperclassRequirement::create(cs, s, base, loc)),
        (
            FixKind::ExplicitlySpecifyGenericArguments,
            loc,
            ExplicitlySpecifyGenericArguments::create(cs, &[box_t], loc),
        ),
        (
            FixKind::SkipUnhandledConstructInFunctionBuilder,
            loc,
            SkipUnhandledConstructInFunctionBuilder::create(cs, UnhandledConstruct::Stmt(StmtKind::If), x_decl, loc),
        ),
        (FixKind::AllowAnyObjectKeyPathRoot, loc, AllowAnyObjectKeyPathRoot::create(cs, loc)),
        (
            FixKind::TreatKeyPathSubscriptIndexAsHashable,
            loc,
            TreatKeyPathSubscriptIndexAsHashable::create(cs, s, loc),
        ),
        (
            FixKind::AllowInvalidRefInKeyPath,
            loc,
            AllowInvalidRefInKeyPath::for_ref(cs, bump_decl, loc).expect("method reference"),
        ),
        (FixKind::UsePropertyWrapper, loc, UsePropertyWrapper::create(cs, x_decl, true, s, base, loc)),
        (FixKind::UseWrappedValue, loc, UseWrappedValue::create(cs, x_decl, s, base, loc)),
        (FixKind::AutoClosureForwarding, loc, AutoClosureForwarding::create(cs, loc)),
        (FixKind::InsertCall, loc, InsertExplicitCall::create(cs, loc)),
        (FixKind::RemoveUnwrap, loc, RemoveUnwrap::create(cs, TypeId::INT, loc)),
        (FixKind::TreatRValueAsLValue, loc, TreatRValueAsLValue::create(cs, loc)),
        (FixKind::ExplicitlyEscaping, loc, MarkExplicitlyEscaping::create(cs, None, loc)),
        (FixKind::RemoveReturn, loc, RemoveReturn::create(cs, loc)),
    ];
    recorded.sort_by_key(|(kind, _, _)| *kind);
    recorded
}

#[test]
fn test_every_factory_records_its_kind() {
    let mut world = TestWorld::new();
    let recorded = record_every_kind(&mut world);

    for &(kind, locator, id) in &recorded {
        let fix = world.cs.fix(id).unwrap_or_else(|| panic!("{kind} was not recorded"));
        assert_eq!(fix.kind(), kind);
        assert_eq!(fix.locator(), locator, "{kind}");
    }
    let mut kinds: Vec<FixKind> = recorded.iter().map(|(kind, _, _)| *kind).collect();
    kinds.dedup();
    assert_eq!(kinds, FixKind::ALL);
    assert_eq!(world.cs.current_fixes().count(), recorded.len());
}

#[test]
#[should_panic(expected = "does not match payload")]
fn test_mismatched_kind_panics() {
    let mut world = TestWorld::new();
    let anchor = world.int(1, 0);
    let locator = world.locator(anchor, &[]);
    let _ = ConstraintFix::new(
        FixKind::ForceDowncast,
        locator,
        ContextualMismatch::new(TypeId::INT, TypeId::STRING),
    );
}

#[test]
fn test_typed_payload_access() {
    let mut world = TestWorld::new();
    let anchor = world.int(1, 0);
    let locator = world.locator(anchor, &[LocatorPathElt::ContextualType]);
    let id = ContextualMismatch::create(&mut world.cs, TypeId::INT, TypeId::STRING, locator);

    let fix = world.cs.fix(id).expect("recorded fix");
    assert_eq!(fix.kind(), FixKind::ContextualMismatch);
    assert_eq!(fix.locator(), locator);
    assert_eq!(fix.anchor(&world.cs), anchor);
    assert!(!fix.is_warning());
    let payload = fix.get::<ContextualMismatch>().expect("contextual payload");
    assert_eq!(payload.from_type(), TypeId::INT);
    assert_eq!(payload.to_type(), TypeId::STRING);
    assert!(fix.get::<ForceDowncast>().is_none());
    assert!(matches!(fix.payload(), FixPayload::ContextualMismatch(_)));
}

#[test]
fn test_describe_uses_name_and_locator() {
    let mut world = TestWorld::new();
    let anchor = world.int(1, 0);
    let locator = world.locator(anchor, &[LocatorPathElt::ContextualType]);
    let mismatch = ContextualMismatch::create(&mut world.cs, TypeId::INT, TypeId::STRING, locator);
    let downcast = ForceDowncast::create(&mut world.cs, world.base, world.derived, locator);

    let cs = &world.cs;
    let mismatch = cs.fix(mismatch).expect("mismatch");
    assert_eq!(mismatch.describe(cs), "[fix: fix contextual mismatch] @ locator@0 [contextual type]");
    let downcast = cs.fix(downcast).expect("downcast");
    assert_eq!(downcast.name(cs), "force downcast (as! Derived)");
}

#[test]
fn test_diagnose_as_note() {
    let mut world = TestWorld::new();
    let anchor = world.int(1, 0);
    let locator = world.locator(anchor, &[LocatorPathElt::ContextualType]);
    ContextualMismatch::create(&mut world.cs, TypeId::INT, TypeId::STRING, locator);

    let solution = world.cs.finalize_solution();
    let cs = &world.cs;
    let parents = cs.exprs().parent_map(anchor);
    let mut sink = DiagnosticCollector::new();
    let fix = solution.fixes().next().expect("one fix");
    let mut ctx = FailureContext::new(cs, &solution, anchor, &parents, &mut sink, fix);
    assert!(fix.diagnose(&mut ctx, true));

    let diagnostics = sink.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, DiagnosticSeverity::Note);
    assert_eq!(diagnostics[0].span, Some(cs.exprs().span(anchor)));
}
