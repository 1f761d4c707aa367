use materia_dynamics::{err::MachineError, event::*, syntax::*};
use materia_tests::build::*;
use pretty_assertions::assert_eq;

fn tags(rt: &Runtime) -> Vec<ClauseTag> {
    rt.trace.iter().filter_map(|event| event.tag()).collect()
}

fn sync_events(rt: &Runtime) -> Vec<&SyncEvent> {
    rt.trace
        .iter()
        .filter_map(|event| match event {
            | Event::Sync(sync) => Some(sync),
            | Event::Clause(_) => None,
        })
        .collect()
}

#[test]
fn small_literal_materializes_on_the_stack_only() {
    let mut rt = Runtime::new();
    rt.run_to_end(program(vec![assign(var("x"), small("alpha"))])).unwrap();

    assert_eq!(rt.store.idents.len(), 1);
    let share = rt.store.resolve(&var("x")).unwrap().unwrap();
    assert!(share.is_owned());
    let ident = rt.store.ident(share.addr()).unwrap();
    let stack_addr = ident.stack.expect("small literal lands a stack cell");
    assert_eq!(ident.heap, None);
    assert_eq!(
        rt.store.memory.stack.get(&stack_addr),
        Some(&StackValue::Small(Sentinel::from("alpha")))
    );
    assert!(rt.store.memory.heap.is_empty());
    assert_eq!(
        tags(&rt),
        vec![
            ClauseTag::Declaration,
            ClauseTag::Allocation,
            ClauseTag::SmallLiteralAssignment,
        ]
    );
}

#[test]
fn copying_a_large_value_duplicates_both_cells() {
    let mut rt = Runtime::new();
    rt.run_to_end(program(vec![
        assign(var("x"), large("beta")),
        assign(var("y"), copied(var("x"))),
    ]))
    .unwrap();

    assert_eq!(rt.store.idents.len(), 2);
    let x = rt.store.resolve_present(&var("x")).unwrap().addr();
    let y = rt.store.resolve_present(&var("y")).unwrap().addr();
    let x_ident = rt.store.ident(x).unwrap();
    let y_ident = rt.store.ident(y).unwrap();
    assert_ne!(x_ident.stack, y_ident.stack);
    assert_ne!(x_ident.heap, y_ident.heap);
    assert_eq!(rt.store.memory.stack.len(), 2);
    assert_eq!(rt.store.memory.heap.len(), 2);

    let expected = ShallowValue::Prim(PrimValue::Large(Sentinel::from("beta")));
    assert_eq!(rt.store.inspect(x).unwrap(), expected);
    assert_eq!(rt.store.inspect(y).unwrap(), expected);
}

#[test]
fn copying_leaves_the_source_independent() {
    let mut rt = Runtime::new();
    rt.run_to_end(program(vec![
        assign(var("x"), large("beta")),
        assign(var("y"), copied(var("x"))),
        assign(var("x"), large("beta-prime")),
    ]))
    .unwrap();

    let x = rt.store.resolve_present(&var("x")).unwrap().addr();
    let y = rt.store.resolve_present(&var("y")).unwrap().addr();
    assert_eq!(
        rt.store.inspect(x).unwrap(),
        ShallowValue::Prim(PrimValue::Large(Sentinel::from("beta-prime")))
    );
    assert_eq!(
        rt.store.inspect(y).unwrap(),
        ShallowValue::Prim(PrimValue::Large(Sentinel::from("beta")))
    );
}

#[test]
fn moving_transfers_heap_ownership() {
    let mut rt = Runtime::new();
    rt.run_to_end(program(vec![assign(var("x"), large("gamma"))])).unwrap();
    let x = rt.store.resolve_present(&var("x")).unwrap().addr();
    let heap_addr = rt.store.ident(x).unwrap().heap.unwrap();
    let heap_cell = rt.store.heap_cell(heap_addr).unwrap().clone();

    rt.run_to_end(program(vec![assign(var("y"), moved(var("x")))])).unwrap();
    let y = rt.store.resolve_present(&var("y")).unwrap().addr();
    let y_ident = rt.store.ident(y).unwrap();
    assert_eq!(y_ident.heap, Some(heap_addr));
    assert_eq!(rt.store.heap_cell(heap_addr).unwrap(), &heap_cell);
    assert_eq!(
        rt.store.inspect(y).unwrap(),
        ShallowValue::Prim(PrimValue::Large(Sentinel::from("gamma")))
    );

    let x_ident = rt.store.ident(x).unwrap();
    assert_eq!(x_ident.heap, None);
    // the moved-out source no longer assembles into a large value
    assert!(matches!(
        rt.store.inspect(x),
        Err(MachineError::StackResolution(_)) | Err(MachineError::Recomposition(..))
    ));
}

#[test]
fn reference_assignment_borrows_the_source_identity() {
    let mut rt = Runtime::new();
    rt.run_to_end(program(vec![
        assign(var("x"), small("delta")),
        assign(var("y"), refr(var("x"))),
    ]))
    .unwrap();

    let x = rt.store.resolve_present(&var("x")).unwrap().addr();
    let y_share = rt.store.resolve_present(&var("y")).unwrap();
    assert_eq!(y_share, Share::Borrowed(x));
    let expected = ShallowValue::Prim(PrimValue::Small(Sentinel::from("delta")));
    assert_eq!(rt.store.inspect(x).unwrap(), expected);
    assert_eq!(
        rt.store.inspect(rt.store.resolve_present(&var("y")).unwrap().addr()).unwrap(),
        expected
    );
    assert_eq!(tags(&rt).last(), Some(&ClauseTag::ReferenceAssignment));
}

#[test]
fn rematerializing_a_borrowed_identity_is_visible_through_both_names() {
    let mut rt = Runtime::new();
    rt.run_to_end(program(vec![
        assign(var("x"), small("delta")),
        assign(var("y"), refr(var("x"))),
        assign(var("x"), small("delta-prime")),
    ]))
    .unwrap();

    let via_y = rt.store.resolve_present(&var("y")).unwrap().addr();
    assert_eq!(
        rt.store.inspect(via_y).unwrap(),
        ShallowValue::Prim(PrimValue::Small(Sentinel::from("delta-prime")))
    );
}

#[test]
fn repointing_an_allocated_place_is_refused() {
    let mut rt = Runtime::new();
    let err = rt
        .run_to_end(program(vec![
            assign(var("x"), small("v")),
            assign(var("y"), small("w")),
            assign(var("y"), refr(var("x"))),
        ]))
        .unwrap_err();
    assert!(matches!(err, MachineError::Generic(_)));
}

#[test]
fn application_pushes_and_pops_one_frame() {
    let mut rt = Runtime::new();
    let body = vec![assign(var("r"), moved(var("n")))];
    let abs = lambda("n", body, moved(var("r")));
    rt.run_to_end(program(vec![
        assign(var("f"), capture(vec![], abs)),
        assign(var("x"), small("epsilon")),
        assign(var("y"), apply(var("f"), var("x"), Mater::Copy)),
    ]))
    .unwrap();

    assert_eq!(rt.store.env.depth(), 0);
    let y = rt.store.resolve_present(&var("y")).unwrap().addr();
    assert_eq!(
        rt.store.inspect(y).unwrap(),
        ShallowValue::Prim(PrimValue::Small(Sentinel::from("epsilon")))
    );
    let tags = tags(&rt);
    assert_eq!(
        tags.iter().filter(|tag| **tag == ClauseTag::Application).count(),
        1
    );
    assert_eq!(tags.iter().filter(|tag| **tag == ClauseTag::Return).count(), 1);
}

#[test]
fn callee_locals_are_discharged_on_return() {
    let mut rt = Runtime::new();
    let body = vec![assign(var("r"), moved(var("n")))];
    let abs = lambda("n", body, moved(var("r")));
    rt.run_to_end(program(vec![
        assign(var("f"), capture(vec![], abs)),
        assign(var("x"), small("epsilon")),
        assign(var("y"), apply(var("f"), var("x"), Mater::Copy)),
    ]))
    .unwrap();

    // only the identities still reachable from globals survive the run
    let mut live = Vec::new();
    for name in ["f", "x", "y"] {
        live.push(rt.store.resolve_present(&var(name)).unwrap().addr());
    }
    live.sort();
    let mut table: Vec<_> = rt.store.idents.keys().copied().collect();
    table.sort();
    assert_eq!(table, live);
}

#[test]
fn synchronization_emits_exactly_one_event() {
    let mut rt = Runtime::new();
    rt.run_to_end(program(vec![
        assign(var("x"), small("zeta")),
        sync(var("x")),
    ]))
    .unwrap();

    let syncs = sync_events(&rt);
    assert_eq!(syncs.len(), 1);
    assert_eq!(syncs[0].lexpr, var("x"));
    assert_eq!(
        syncs[0].value,
        ShallowValue::Prim(PrimValue::Small(Sentinel::from("zeta")))
    );
}

#[test]
fn captures_materialize_as_dependents_and_feed_the_closure() {
    let mut rt = Runtime::new();
    let body = vec![assign(var("r"), copied(var("c")))];
    let abs = lambda("n", body, moved(var("r")));
    rt.run_to_end(program(vec![
        assign(var("x"), small("a")),
        assign(var("f"), capture(vec![("c", bid(var("x"), Mater::Copy))], abs)),
        assign(var("y"), apply(var("f"), var("x"), Mater::Copy)),
    ]))
    .unwrap();

    let f = rt.store.resolve_present(&var("f")).unwrap().addr();
    let captured = rt.store.resolve_present(&var("f").proj("c")).unwrap();
    assert!(captured.is_owned());
    assert_eq!(
        rt.store.inspect(captured.addr()).unwrap(),
        ShallowValue::Prim(PrimValue::Small(Sentinel::from("a")))
    );
    // the body read the capture through the closure view
    let y = rt.store.resolve_present(&var("y")).unwrap().addr();
    assert_eq!(
        rt.store.inspect(y).unwrap(),
        ShallowValue::Prim(PrimValue::Small(Sentinel::from("a")))
    );
    // deep inspection reports the dependent alongside the abstraction
    let deep = rt.store.inspect_deep(f).unwrap();
    assert_eq!(deep.dependents.len(), 1);
    assert!(deep.dependents.contains_key(&VarName::from("c")));
}

#[test]
fn copying_an_identity_recurses_through_its_dependents() {
    let mut rt = Runtime::new();
    let abs = lambda("n", vec![], moved(var("n")));
    rt.run_to_end(program(vec![
        assign(var("x"), small("a")),
        assign(var("f"), capture(vec![("c", bid(var("x"), Mater::Copy))], abs)),
        assign(var("g"), copied(var("f"))),
    ]))
    .unwrap();

    let f_c = rt.store.resolve_present(&var("f").proj("c")).unwrap().addr();
    let g_c = rt.store.resolve_present(&var("g").proj("c")).unwrap().addr();
    assert_ne!(f_c, g_c);
    let expected = ShallowValue::Prim(PrimValue::Small(Sentinel::from("a")));
    assert_eq!(rt.store.inspect(f_c).unwrap(), expected);
    assert_eq!(rt.store.inspect(g_c).unwrap(), expected);
    // the dependent was observed at the moment it was copied
    let syncs = sync_events(&rt);
    assert_eq!(syncs.len(), 1);
    assert_eq!(syncs[0].lexpr, var("f").proj("c"));
    assert_eq!(syncs[0].value, expected);
}

#[test]
fn every_address_in_a_run_is_unique_across_roles() {
    fn all_indices(store: &Store) -> Vec<usize> {
        use materia_utils::arena::IndexLike;
        let mut indices = Vec::new();
        for (addr, ident) in store.idents.iter() {
            indices.push(addr.index());
            if let Some(stack) = ident.stack {
                indices.push(stack.index());
            }
            if let Some(heap) = ident.heap {
                indices.push(heap.index());
            }
        }
        indices
    }

    let mut rt = Runtime::new();
    let body = vec![assign(var("r"), moved(var("n")))];
    let abs = lambda("n", body, moved(var("r")));
    rt.run_to_end(program(vec![
        assign(var("x"), large("big")),
        assign(var("f"), capture(vec![("c", bid(var("x"), Mater::Copy))], abs)),
        assign(var("y"), apply(var("f"), var("x"), Mater::Copy)),
    ]))
    .unwrap();

    let mut indices = all_indices(&rt.store);
    let total = indices.len();
    indices.sort();
    indices.dedup();
    assert_eq!(indices.len(), total);
}
