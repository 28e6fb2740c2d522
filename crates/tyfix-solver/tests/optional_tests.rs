use super::*;
use crate::expr::ExprId;
use crate::locator::LocatorPathElt;
use crate::test_fixtures::{TestWorld, fix_its};

/// `x.count` where `x` has type `base_ty`; the name sits at 2..7.
fn member_on(world: &mut TestWorld, base_ty: TypeId) -> ExprId {
    let base = world.typed(ExprKind::DeclRef(world.x_decl), 0, 1, base_ty);
    world.dot(base, "count")
}

#[test]
fn test_force_optional() {
    let mut world = TestWorld::new();
    let value = world.int(1, 8);
    let locator = world.locator(value, &[LocatorPathElt::ContextualType]);
    let optional_int = world.cs.types().optional(TypeId::INT);
    let id = ForceOptional::create(&mut world.cs, optional_int, TypeId::INT, locator);
    assert_eq!(world.cs.fix(id).expect("fix").name(&world.cs), "force optional");

    let diagnostics = world.diagnose(value);
    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(
        diagnostic.message_text,
        "value of optional type 'Int?' must be unwrapped to a value of type 'Int'"
    );
    let notes: Vec<&str> = diagnostic
        .related_information
        .iter()
        .map(|note| note.message_text.as_str())
        .collect();
    assert_eq!(
        notes,
        vec![
            "coalesce using '??' to provide a default when the optional value contains 'nil'",
            "force-unwrap using '!' to abort execution if the optional value contains 'nil'",
        ]
    );
    assert_eq!(
        fix_its(diagnostic),
        vec![
            (9, 0, " ?? <#default value#>".to_string()),
            (9, 0, "!".to_string()),
        ]
    );
}

#[test]
fn test_force_optional_needs_optional_source() {
    let mut world = TestWorld::new();
    let value = world.int(1, 8);
    let locator = world.locator(value, &[LocatorPathElt::ContextualType]);
    ForceOptional::create(&mut world.cs, TypeId::STRING, TypeId::INT, locator);
    assert!(world.diagnose(value).is_empty());
}

#[test]
fn test_unwrap_optional_base() {
    let mut world = TestWorld::new();
    let optional_s = world.cs.types().optional(world.s);
    let member = member_on(&mut world, optional_s);
    let locator = world.locator(member, &[LocatorPathElt::Member]);
    let count = world.atom("count");
    let id = UnwrapOptionalBase::create(&mut world.cs, count, locator);
    let fix = world.cs.fix(id).expect("fix");
    assert_eq!(fix.kind(), FixKind::UnwrapOptionalBase);
    assert_eq!(fix.get::<UnwrapOptionalBase>().map(|p| p.member_name()), Some(count));

    let diagnostics = world.diagnose(member);
    let diagnostic = &diagnostics[0];
    assert_eq!(
        diagnostic.message_text,
        "value of optional type 'S?' must be unwrapped to refer to member 'count' of wrapped base type 'S'"
    );
    assert_eq!((diagnostic.start, diagnostic.length), (2, 5));
    assert_eq!(diagnostic.related_information.len(), 2);
    assert_eq!(
        diagnostic.related_information[0].message_text,
        "chain the optional using '?' to access member 'count' only for non-'nil' base values"
    );
    assert_eq!(diagnostic.related_information[0].start, 0);
    assert_eq!(
        fix_its(diagnostic),
        vec![(1, 0, "?".to_string()), (1, 0, "!".to_string())]
    );
}

#[test]
fn test_unwrap_optional_base_with_optional_result_only_chains() {
    let mut world = TestWorld::new();
    let optional_s = world.cs.types().optional(world.s);
    let member = member_on(&mut world, optional_s);
    // `x.count()` anchors on the call; the member is found through it.
    let call = world.call(member, Vec::new(), 9);
    let locator = world.locator(call, &[]);
    let count = world.atom("count");
    let id = UnwrapOptionalBase::create_with_optional_result(&mut world.cs, count, locator);
    assert_eq!(
        world.cs.fix(id).expect("fix").kind(),
        FixKind::UnwrapOptionalBaseWithOptionalResult
    );

    let diagnostics = world.diagnose(call);
    assert_eq!(diagnostics[0].start, 2);
    assert_eq!(diagnostics[0].related_information.len(), 1);
    assert_eq!(fix_its(&diagnostics[0]), vec![(1, 0, "?".to_string())]);
}

#[test]
fn test_unwrap_optional_base_needs_optional_base() {
    let mut world = TestWorld::new();
    let s = world.s;
    let member = member_on(&mut world, s);
    let locator = world.locator(member, &[LocatorPathElt::Member]);
    let count = world.atom("count");
    UnwrapOptionalBase::create(&mut world.cs, count, locator);

    // Not a member reference at all.
    let value = world.int(1, 20);
    let locator = world.locator(value, &[]);
    UnwrapOptionalBase::create(&mut world.cs, count, locator);

    assert!(world.diagnose(member).is_empty());
}

#[test]
fn test_remove_force_unwrap() {
    let mut world = TestWorld::new();
    let sub = world.decl_ref(world.x_decl, 0, 1);
    let force = world.expr(ExprKind::ForceValue(sub), 0, 2);
    let locator = world.locator(force, &[]);
    let id = RemoveUnwrap::create(&mut world.cs, world.s, locator);
    assert_eq!(
        world.cs.fix(id).and_then(|fix| fix.get::<RemoveUnwrap>()).map(|p| p.base_type()),
        Some(world.s)
    );

    let diagnostics = world.diagnose(force);
    assert_eq!(diagnostics[0].message_text, "cannot force unwrap value of non-optional type 'S'");
    assert_eq!(fix_its(&diagnostics[0]), vec![(1, 1, String::new())]);
}

#[test]
fn test_remove_optional_chain() {
    let mut world = TestWorld::new();
    let sub = world.decl_ref(world.x_decl, 0, 1);
    let chain = world.expr(ExprKind::BindOptional(sub), 0, 2);
    let locator = world.locator(chain, &[]);
    let lvalue_s = world.cs.types().lvalue(world.s);
    RemoveUnwrap::create(&mut world.cs, lvalue_s, locator);

    // Neither `!` nor `?`: nothing to remove.
    let plain = world.decl_ref(world.x_decl, 5, 6);
    let locator = world.locator(plain, &[]);
    RemoveUnwrap::create(&mut world.cs, world.s, locator);

    assert_eq!(
        world.messages(chain),
        vec!["cannot use optional chaining on non-optional value of type 'S'"]
    );
}
