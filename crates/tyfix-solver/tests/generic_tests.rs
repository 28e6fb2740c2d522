use super::*;
use crate::config::FixOptions;
use crate::decl::{DeclFlags, DeclInfo, DeclKind};
use crate::expr::ExprId;
use crate::locator::{LocatorPathElt, RequirementKind};
use crate::test_fixtures::{TestWorld, fix_its};
use tyfix_common::span::Span;

/// `1` at 8..9 converted to a written type.
fn contextual(world: &mut TestWorld) -> (ExprId, LocatorId) {
    let value = world.int(1, 8);
    let locator = world.locator(value, &[LocatorPathElt::ContextualType]);
    (value, locator)
}

/// `f()` with `f` at 0..1, anchored on a requirement of `f`.
fn requirement_of_f(world: &mut TestWorld, kind: RequirementKind) -> (ExprId, LocatorId) {
    let callee = world.decl_ref(world.f_decl, 0, 1);
    let call = world.call(callee, Vec::new(), 3);
    let locator = world.locator(call, &[LocatorPathElt::TypeParameterRequirement { index: 0, kind }]);
    (call, locator)
}

// =============================================================================
// GenericArgumentsMismatch
// =============================================================================

#[test]
fn test_generic_arguments_mismatch() {
    let mut world = TestWorld::new();
    let (value, locator) = contextual(&mut world);
    let actual = world.box_of(TypeId::INT);
    let required = world.box_of(TypeId::STRING);
    let id = GenericArgumentsMismatch::create(&mut world.cs, actual, required, &[0], locator);
    let fix = world.cs.fix(id).expect("fix");
    let payload = fix.get::<GenericArgumentsMismatch>().expect("payload");
    assert_eq!(payload.actual_type(), actual);
    assert_eq!(payload.required_type(), required);
    assert_eq!(payload.mismatches(), &[0]);

    let diagnostics = world.diagnose(value);
    let diagnostic = &diagnostics[0];
    assert_eq!(
        diagnostic.message_text,
        "cannot convert value of type 'Box<Int>' to specified type 'Box<String>'"
    );
    assert_eq!(diagnostic.related_information.len(), 1);
    assert_eq!(
        diagnostic.related_information[0].message_text,
        "arguments to generic parameter 'T' ('Int' and 'String') are expected to be equal"
    );
    // Notes without a location of their own sit on the conversion.
    assert_eq!(diagnostic.related_information[0].start, 8);
}

#[test]
fn test_generic_arguments_mismatch_without_parameter_names() {
    let mut world = TestWorld::new();
    let pair_name = world.atom("Pair");
    let pair = world
        .cs
        .decls_mut()
        .register(DeclInfo::new(DeclKind::Struct, pair_name));
    let (value, locator) = contextual(&mut world);
    let actual = world.cs.types().bound_generic(pair, vec![TypeId::INT, TypeId::BOOL]);
    let required = world.cs.types().bound_generic(pair, vec![TypeId::INT, TypeId::DOUBLE]);
    GenericArgumentsMismatch::create(&mut world.cs, actual, required, &[1], locator);

    let diagnostics = world.diagnose(value);
    assert_eq!(
        diagnostics[0].related_information[0].message_text,
        "arguments to generic parameter '#1' ('Bool' and 'Double') are expected to be equal"
    );
}

#[test]
fn test_generic_argument_notes_are_limited() {
    let mut world = TestWorld::with_options(FixOptions {
        max_generic_argument_notes: 0,
        ..FixOptions::default()
    });
    let (value, locator) = contextual(&mut world);
    let actual = world.box_of(TypeId::INT);
    let required = world.box_of(TypeId::STRING);
    GenericArgumentsMismatch::create(&mut world.cs, actual, required, &[0], locator);
    let diagnostics = world.diagnose(value);
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].related_information.is_empty());
}

#[test]
#[should_panic(expected = "needs two bound generic types")]
fn test_generic_arguments_mismatch_needs_generic_types() {
    let mut world = TestWorld::new();
    let (_, locator) = contextual(&mut world);
    let required = world.box_of(TypeId::STRING);
    GenericArgumentsMismatch::create(&mut world.cs, TypeId::INT, required, &[0], locator);
}

#[test]
#[should_panic(expected = "strictly ascending")]
fn test_generic_arguments_mismatch_positions_ascend() {
    let mut world = TestWorld::new();
    let (_, locator) = contextual(&mut world);
    let actual = world.box_of(TypeId::INT);
    let required = world.box_of(TypeId::STRING);
    GenericArgumentsMismatch::create(&mut world.cs, actual, required, &[0, 0], locator);
}

#[test]
#[should_panic(expected = "out of range")]
fn test_generic_arguments_mismatch_positions_in_range() {
    let mut world = TestWorld::new();
    let (_, locator) = contextual(&mut world);
    let actual = world.box_of(TypeId::INT);
    let required = world.box_of(TypeId::STRING);
    GenericArgumentsMismatch::create(&mut world.cs, actual, required, &[1], locator);
}

// =============================================================================
// Requirements
// =============================================================================

#[test]
fn test_same_type_requirement() {
    let mut world = TestWorld::new();
    let (call, locator) = requirement_of_f(&mut world, RequirementKind::SameType);
    SkipSameTypeRequirement::create(&mut world.cs, TypeId::INT, TypeId::STRING, locator);

    let diagnostics = world.diagnose(call);
    assert_eq!(
        diagnostics[0].message_text,
        "'f' requires the types 'Int' and 'String' be equivalent"
    );
    assert_eq!(diagnostics[0].related_information[0].message_text, "'f' declared here");
    assert_eq!(diagnostics[0].related_information[0].start, 1090);
}

#[test]
fn test_superclass_requirement() {
    let mut world = TestWorld::new();
    let (call, locator) = requirement_of_f(&mut world, RequirementKind::Superclass);
    let id = SkipSuperclassRequirement::create(&mut world.cs, world.s, world.base, locator);
    let payload = *world
        .cs
        .fix(id)
        .and_then(|fix| fix.get::<SkipSuperclassRequirement>())
        .expect("payload");
    assert_eq!((payload.lhs_type(), payload.rhs_type()), (world.s, world.base));

    assert_eq!(
        world.messages(call),
        vec!["'f' requires that 'S' inherit from 'Base'"]
    );
}

#[test]
fn test_requirements_need_a_callee() {
    let mut world = TestWorld::new();
    let (value, locator) = contextual(&mut world);
    SkipSameTypeRequirement::create(&mut world.cs, TypeId::INT, TypeId::STRING, locator);
    SkipSuperclassRequirement::create(&mut world.cs, world.s, world.base, locator);
    MissingConformance::for_requirement(&mut world.cs, world.s, world.p, locator);
    assert!(world.diagnose(value).is_empty());
}

#[test]
fn test_missing_conformance_for_requirement() {
    let mut world = TestWorld::new();
    let (call, locator) = requirement_of_f(&mut world, RequirementKind::Conformance);
    let id = MissingConformance::for_requirement(&mut world.cs, world.s, world.p, locator);
    let fix = world.cs.fix(id).expect("fix");
    assert_eq!(fix.kind(), FixKind::AddConformance);
    assert!(!fix.get::<MissingConformance>().expect("payload").is_contextual());

    let diagnostics = world.diagnose(call);
    assert_eq!(diagnostics[0].message_text, "'f' requires that 'S' conform to 'P'");
    assert_eq!(diagnostics[0].related_information.len(), 1);
}

#[test]
fn test_missing_conformance_for_contextual_type() {
    let mut world = TestWorld::new();
    let (value, locator) = contextual(&mut world);
    let id = MissingConformance::for_contextual(&mut world.cs, world.s, world.p, locator);
    let payload = *world
        .cs
        .fix(id)
        .and_then(|fix| fix.get::<MissingConformance>())
        .expect("payload");
    assert!(payload.is_contextual());
    assert_eq!(payload.non_conforming_type(), world.s);
    assert_eq!(payload.protocol_type(), world.p);
    MissingConformance::for_contextual(&mut world.cs, TypeId::ERROR, world.p, locator);

    assert_eq!(
        world.messages(value),
        vec!["value of type 'S' does not conform to specified type 'P'"]
    );
}

// =============================================================================
// Inference
// =============================================================================

#[test]
fn test_single_generic_parameter_not_inferred() {
    let mut world = TestWorld::new();
    let callee = world.decl_ref(world.f_decl, 0, 1);
    let call = world.call(callee, Vec::new(), 3);
    let locator = world.locator(call, &[]);
    ExplicitlySpecifyGenericArguments::create(&mut world.cs, &[world.box_t], locator);

    let diagnostics = world.diagnose(call);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.message_text, "generic parameter 'T' could not be inferred");
    assert_eq!((diagnostic.start, diagnostic.length), (0, 3));
    assert_eq!(
        diagnostic.related_information[0].message_text,
        "explicitly specify the generic arguments to fix this issue"
    );
    assert_eq!(diagnostic.related_information[0].start, 0);
    assert_eq!(fix_its(diagnostic), vec![(1, 0, "<Any>".to_string())]);
}

#[test]
fn test_several_generic_parameters_not_inferred() {
    let mut world = TestWorld::new();
    let u_name = world.atom("U");
    let u = world.cs.types().generic_param(u_name, 0, 1);
    // `Box` in expression position, no call.
    let anchor = world.expr(ExprKind::TypeExpr(world.s), 4, 7);
    let locator = world.locator(anchor, &[]);
    let id = ExplicitlySpecifyGenericArguments::create(&mut world.cs, &[world.box_t, u], locator);
    assert_eq!(
        world
            .cs
            .fix(id)
            .and_then(|fix| fix.get::<ExplicitlySpecifyGenericArguments>())
            .map(|p| p.params().len()),
        Some(2)
    );

    let diagnostics = world.diagnose(anchor);
    assert_eq!(
        diagnostics[0].message_text,
        "generic parameters 'T', 'U' could not be inferred"
    );
    assert_eq!(fix_its(&diagnostics[0]), vec![(7, 0, "<Any, Any>".to_string())]);
}

#[test]
#[should_panic(expected = "no generic parameters to specify")]
fn test_generic_arguments_need_parameters() {
    let mut world = TestWorld::new();
    let (_, locator) = contextual(&mut world);
    ExplicitlySpecifyGenericArguments::create(&mut world.cs, &[], locator);
}

fn register_builder(world: &mut TestWorld) -> DeclId {
    let name = world.atom("ViewBuilder");
    world.cs.decls_mut().register(
        DeclInfo::new(DeclKind::Struct, name)
            .with_span(Span::new(1400, 1411))
            .with_flags(DeclFlags::FUNCTION_BUILDER),
    )
}

#[test]
fn test_unhandled_statement_in_function_builder() {
    let mut world = TestWorld::new();
    let builder = register_builder(&mut world);
    let stmt = world.expr(ExprKind::Stmt(StmtKind::If), 3, 20);
    let closure = world.expr(
        ExprKind::Closure {
            params: Vec::new(),
            body: vec![stmt],
        },
        0,
        22,
    );
    let locator = world.locator(stmt, &[]);
    let id = SkipUnhandledConstructInFunctionBuilder::create(
        &mut world.cs,
        UnhandledConstruct::Stmt(StmtKind::If),
        builder,
        locator,
    );
    let payload = *world
        .cs
        .fix(id)
        .and_then(|fix| fix.get::<SkipUnhandledConstructInFunctionBuilder>())
        .expect("payload");
    assert_eq!(payload.unhandled(), UnhandledConstruct::Stmt(StmtKind::If));
    assert_eq!(payload.builder(), builder);

    let diagnostics = world.diagnose(closure);
    assert_eq!(
        diagnostics[0].message_text,
        "closure containing an 'if' statement cannot be used with function builder 'ViewBuilder'"
    );
    assert_eq!((diagnostics[0].start, diagnostics[0].length), (3, 17));
}

#[test]
fn test_unhandled_declaration_in_function_builder() {
    let mut world = TestWorld::new();
    let builder = register_builder(&mut world);
    let closure = world.expr(
        ExprKind::Closure {
            params: Vec::new(),
            body: Vec::new(),
        },
        0,
        22,
    );
    let locator = world.locator(closure, &[]);
    SkipUnhandledConstructInFunctionBuilder::create(
        &mut world.cs,
        UnhandledConstruct::Decl(world.x_decl),
        builder,
        locator,
    );

    let diagnostics = world.diagnose(closure);
    assert_eq!(
        diagnostics[0].message_text,
        "closure containing a declaration cannot be used with function builder 'ViewBuilder'"
    );
    assert_eq!(diagnostics[0].start, 1100);
}
