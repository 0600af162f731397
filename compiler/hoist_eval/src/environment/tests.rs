use super::*;
use hoist_ir::StringInterner;

fn num(n: f64) -> Value {
    Value::Number(n)
}

#[test]
fn test_var_in_block_lands_in_function_scope() {
    let interner = StringInterner::new();
    let total = interner.intern("total");

    let mut env = Environment::new();
    env.push_scope(ScopeKind::Block);
    env.declare(total, DeclKind::Var, Some(num(60.0))).unwrap();
    env.pop_scope();

    assert_eq!(env.lookup(total), Ok(num(60.0)));
}

#[test]
fn test_block_scoped_binding_not_visible_outside() {
    let interner = StringInterner::new();
    let pi = interner.intern("pi");

    let mut env = Environment::new();
    env.push_scope(ScopeKind::Block);
    env.declare(pi, DeclKind::Const, Some(num(2.5))).unwrap();
    assert_eq!(env.lookup(pi), Ok(num(2.5)));
    env.pop_scope();

    assert_eq!(env.lookup(pi), Err(ScopeError::Unresolved { name: pi }));
}

#[test]
fn test_hoisted_var_reads_undefined() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let mut env = Environment::new();
    env.declare(x, DeclKind::Var, None).unwrap();
    assert_eq!(env.lookup(x), Ok(Value::Undefined));

    env.declare(x, DeclKind::Var, Some(num(5.0))).unwrap();
    assert_eq!(env.lookup(x), Ok(num(5.0)));

    // A bare redeclaration keeps the current value.
    env.declare(x, DeclKind::Var, None).unwrap();
    assert_eq!(env.lookup(x), Ok(num(5.0)));
}

#[test]
fn test_dead_zone_until_initialized() {
    let interner = StringInterner::new();
    let y = interner.intern("y");

    let mut env = Environment::new();
    env.declare(y, DeclKind::Let, None).unwrap();
    assert!(env.is_declared(y));
    assert_eq!(env.lookup(y), Err(ScopeError::Uninitialized { name: y }));
    assert_eq!(
        env.assign(y, num(1.0)),
        Err(ScopeError::Uninitialized { name: y })
    );

    env.initialize(y, num(20.0)).unwrap();
    assert_eq!(env.lookup(y), Ok(num(20.0)));
}

#[test]
fn test_dead_zone_shadows_outer_binding() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let mut env = Environment::new();
    env.declare(x, DeclKind::Let, Some(num(1.0))).unwrap();
    env.push_scope(ScopeKind::Block);
    env.declare(x, DeclKind::Let, None).unwrap();

    // The inner binding exists, so the outer one is not reachable.
    assert_eq!(env.lookup(x), Err(ScopeError::Uninitialized { name: x }));
    env.pop_scope();
    assert_eq!(env.lookup(x), Ok(num(1.0)));
}

#[test]
fn test_const_assignment() {
    let interner = StringInterner::new();
    let limit = interner.intern("limit");

    let mut env = Environment::new();
    env.declare(limit, DeclKind::Const, None).unwrap();
    env.initialize(limit, num(3.0)).unwrap();

    assert_eq!(
        env.assign(limit, num(4.0)),
        Err(ScopeError::ConstAssignment { name: limit })
    );
    assert_eq!(
        env.initialize(limit, num(4.0)),
        Err(ScopeError::ConstAssignment { name: limit })
    );
    assert_eq!(env.lookup(limit), Ok(num(3.0)));
}

#[test]
fn test_assign_updates_nearest_binding() {
    let interner = StringInterner::new();
    let count = interner.intern("count");

    let mut env = Environment::new();
    env.declare(count, DeclKind::Let, Some(num(0.0))).unwrap();
    env.push_scope(ScopeKind::Block);
    env.assign(count, num(1.0)).unwrap();
    env.pop_scope();

    assert_eq!(env.lookup(count), Ok(num(1.0)));
}

#[test]
fn test_assign_undeclared_is_unresolved() {
    let interner = StringInterner::new();
    let ghost = interner.intern("ghost");

    let mut env = Environment::new();
    assert_eq!(
        env.assign(ghost, num(1.0)),
        Err(ScopeError::Unresolved { name: ghost })
    );
    assert!(!env.is_declared(ghost));
}

#[test]
fn test_duplicate_lexical_declarations() {
    let interner = StringInterner::new();
    let a = interner.intern("a");

    let mut env = Environment::new();
    env.declare(a, DeclKind::Let, Some(num(1.0))).unwrap();
    assert_eq!(
        env.declare(a, DeclKind::Const, Some(num(2.0))),
        Err(ScopeError::Duplicate { name: a })
    );
    assert_eq!(
        env.declare(a, DeclKind::Var, None),
        Err(ScopeError::Duplicate { name: a })
    );

    // Shadowing in a nested block is fine.
    env.push_scope(ScopeKind::Block);
    env.declare(a, DeclKind::Let, Some(num(3.0))).unwrap();
    assert_eq!(env.lookup(a), Ok(num(3.0)));
}

#[test]
fn test_var_then_let_conflict() {
    let interner = StringInterner::new();
    let b = interner.intern("b");

    let mut env = Environment::new();
    env.declare(b, DeclKind::Var, None).unwrap();
    assert_eq!(
        env.declare(b, DeclKind::Let, None),
        Err(ScopeError::Duplicate { name: b })
    );
}

#[test]
fn test_var_hoisting_through_lexical_block_binding_conflicts() {
    let interner = StringInterner::new();
    let c = interner.intern("c");

    let mut env = Environment::new();
    env.push_scope(ScopeKind::Block);
    env.declare(c, DeclKind::Let, Some(num(1.0))).unwrap();
    env.push_scope(ScopeKind::Block);

    assert_eq!(
        env.declare(c, DeclKind::Var, Some(num(2.0))),
        Err(ScopeError::Duplicate { name: c })
    );
}

#[test]
fn test_var_stops_at_function_scope() {
    let interner = StringInterner::new();
    let local = interner.intern("local");

    let mut env = Environment::new();
    let closure = env.capture();
    env.push_function_scope(closure);
    env.push_scope(ScopeKind::Block);
    env.declare(local, DeclKind::Var, Some(num(7.0))).unwrap();
    env.pop_scope();
    assert_eq!(env.lookup(local), Ok(num(7.0)));

    env.pop_scope();
    assert_eq!(env.lookup(local), Err(ScopeError::Unresolved { name: local }));
}

#[test]
fn test_function_declaration_scoping() {
    let interner = StringInterner::new();
    let f = interner.intern("f");
    let g = interner.intern("g");

    let mut env = Environment::new();
    env.declare_function(f, num(1.0)).unwrap();
    // Redeclaring a function replaces it.
    env.declare_function(f, num(2.0)).unwrap();
    assert_eq!(env.lookup(f), Ok(num(2.0)));

    env.push_scope(ScopeKind::Block);
    env.declare_function(g, num(3.0)).unwrap();
    assert_eq!(
        env.declare(g, DeclKind::Let, None),
        Err(ScopeError::Duplicate { name: g })
    );
    env.pop_scope();
    assert!(!env.is_declared(g));
}

#[test]
fn test_function_declaration_conflicts_with_let() {
    let interner = StringInterner::new();
    let h = interner.intern("h");

    let mut env = Environment::new();
    env.declare(h, DeclKind::Let, None).unwrap();
    assert_eq!(
        env.declare_function(h, num(1.0)),
        Err(ScopeError::Duplicate { name: h })
    );
}

#[test]
fn test_intrinsics_are_shadowable() {
    let interner = StringInterner::new();
    let console = interner.intern("console");

    let mut env = Environment::new();
    env.define_intrinsic(console, num(1.0));
    assert_eq!(env.lookup(console), Ok(num(1.0)));

    env.declare(console, DeclKind::Const, Some(num(2.0))).unwrap();
    assert_eq!(env.lookup(console), Ok(num(2.0)));
}

#[test]
fn test_pop_never_removes_global() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let mut env = Environment::new();
    env.declare(x, DeclKind::Let, Some(num(1.0))).unwrap();
    env.pop_scope();
    env.pop_scope();

    assert_eq!(env.depth(), 1);
    assert_eq!(env.current_kind(), ScopeKind::Global);
    assert_eq!(env.lookup(x), Ok(num(1.0)));
}

#[test]
fn test_capture_is_live() {
    let interner = StringInterner::new();
    let counter = interner.intern("counter");

    let mut env = Environment::new();
    env.push_scope(ScopeKind::Block);
    env.declare(counter, DeclKind::Let, Some(num(0.0))).unwrap();
    let captured = env.capture();
    env.pop_scope();
    assert!(!env.is_declared(counter));

    // A function body entered through the captured scope writes through it.
    env.push_function_scope(captured.clone());
    env.assign(counter, num(5.0)).unwrap();
    env.pop_scope();

    env.push_function_scope(captured.clone());
    assert_eq!(env.lookup(counter), Ok(num(5.0)));
    assert!(!env.has_own(counter));
    env.pop_scope();

    assert!(captured.borrow().has_own(counter));
}

#[test]
fn test_dropping_a_long_scope_chain() {
    let interner = StringInterner::new();
    let link = interner.intern("link");

    let mut env = Environment::new();
    let mut chain = env.capture();
    for i in 0..200_000 {
        env.push_function_scope(chain);
        env.declare(link, DeclKind::Let, Some(num(f64::from(i)))).unwrap();
        chain = env.capture();
        env.pop_scope();
    }
    assert!(chain.is_unique());
    drop(chain);
    assert_eq!(env.depth(), 1);
}

// === Property tests ===

#[allow(
    clippy::disallowed_types,
    reason = "proptest macros internally use Arc"
)]
mod proptest_environment {
    use super::*;
    use proptest::prelude::*;

    fn decl_kind() -> impl Strategy<Value = DeclKind> {
        prop_oneof![Just(DeclKind::Let), Just(DeclKind::Const)]
    }

    proptest! {
        #[test]
        fn lexical_bindings_never_leak_out_of_blocks(
            depth in 1usize..6,
            kinds in proptest::collection::vec(decl_kind(), 1..6),
        ) {
            let interner = StringInterner::new();
            let mut env = Environment::new();
            let names: Vec<Name> = (0..kinds.len())
                .map(|i| interner.intern(&format!("v{i}")))
                .collect();

            for _ in 0..depth {
                env.push_scope(ScopeKind::Block);
            }
            for (i, (&name, &kind)) in names.iter().zip(&kinds).enumerate() {
                #[expect(clippy::cast_precision_loss, reason = "small test indices")]
                let value = Value::Number(i as f64);
                prop_assert!(env.declare(name, kind, Some(value)).is_ok());
            }
            for _ in 0..depth {
                env.pop_scope();
            }

            prop_assert_eq!(env.depth(), 1);
            for &name in &names {
                prop_assert!(!env.is_declared(name));
            }
        }

        #[test]
        fn vars_always_reach_global(depth in 0usize..6, value in -1000.0f64..1000.0) {
            let interner = StringInterner::new();
            let name = interner.intern("hoisted");
            let mut env = Environment::new();

            for _ in 0..depth {
                env.push_scope(ScopeKind::Block);
            }
            prop_assert!(env.declare(name, DeclKind::Var, Some(Value::Number(value))).is_ok());
            for _ in 0..depth {
                env.pop_scope();
            }

            prop_assert_eq!(env.lookup(name), Ok(Value::Number(value)));
        }
    }
}
