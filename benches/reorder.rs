use std::hint::black_box;
use std::io;

use criterion::{Criterion, criterion_group, criterion_main};
use shortcut_shell::{
    EventFlow, Item, ItemKey, ItemRegistry, MORE_ENTRY_KEY, OrderingStore, Result, ShellEvent,
    ShellRuntime, classify, move_candidate,
};

fn items(count: usize) -> Vec<Item> {
    (0..count)
        .map(|i| Item::new(format!("item-{i}"), format!("Item {i}")))
        .collect()
}

fn classify_large_order(c: &mut Criterion) {
    let order = items(256);
    c.bench_function("classify_256", |b| {
        b.iter(|| classify(black_box(order.clone()), 4));
    });
}

fn commit_large_order(c: &mut Criterion) {
    let order = items(256);
    c.bench_function("commit_256", |b| {
        b.iter(|| {
            let mut store = OrderingStore::new(order.clone(), 4).expect("store");
            let mut next = order.clone();
            next.rotate_left(1);
            let shortcuts = next.split_off(next.len() - 4);
            store.commit(black_box(shortcuts), black_box(next)).expect("commit");
        });
    });
}

fn reorder_session_script(c: &mut Criterion) {
    let registry = ItemRegistry::builtin().expect("builtin catalog");
    let script = session_events(&registry).expect("script");
    c.bench_function("reorder_session_script", |b| {
        b.iter(|| {
            let mut runtime = ShellRuntime::new(registry.clone()).expect("runtime");
            let mut sink = io::sink();
            runtime
                .run_scripted(&mut sink, black_box(script.clone()))
                .expect("scripted run");
        });
    });
}

fn drag_dispatch(c: &mut Criterion) {
    let registry = ItemRegistry::builtin().expect("builtin catalog");
    c.bench_function("drag_dispatch", |b| {
        let mut runtime = ShellRuntime::new(registry.clone()).expect("runtime");
        runtime
            .dispatch(ShellEvent::SelectNav(MORE_ENTRY_KEY.to_string()))
            .expect("select more");
        runtime.dispatch(ShellEvent::ToggleReorder).expect("enter");
        let mut from = 0usize;
        b.iter(|| {
            let len = runtime.session().working_order().len();
            let candidate = move_candidate(runtime.session().working_order(), from, len - 1)
                .expect("candidate");
            from = (from + 1) % len;
            let flow = runtime
                .dispatch(ShellEvent::DragRelease(black_box(candidate)))
                .expect("drag");
            black_box(flow == EventFlow::Applied);
        });
    });
}

fn session_events(registry: &ItemRegistry) -> Result<Vec<ShellEvent>> {
    let runtime = ShellRuntime::new(registry.clone())?;
    let mut keys: Vec<ItemKey> = runtime.master_order().iter().map(|i| i.key.clone()).collect();
    let mut events = vec![
        ShellEvent::SelectNav(MORE_ENTRY_KEY.to_string()),
        ShellEvent::ToggleReorder,
    ];
    for _ in 0..8 {
        keys.rotate_right(1);
        events.push(ShellEvent::DragRelease(keys.clone()));
    }
    events.push(ShellEvent::ToggleReorder);
    events.push(ShellEvent::SelectNav(MORE_ENTRY_KEY.to_string()));
    Ok(events)
}

criterion_group!(
    benches,
    classify_large_order,
    commit_large_order,
    reorder_session_script,
    drag_dispatch
);
criterion_main!(benches);
