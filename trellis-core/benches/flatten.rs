use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trellis_core::dom::Node;
use trellis_core::render::{resolve_arrays_and_statics, Child};

fn nodes(len: usize) -> Arc<[Child]> {
    (0..len).map(|_| Child::Node(Node::element("li"))).collect()
}

fn primitives(len: usize) -> Arc<[Child]> {
    (0..len).map(|i| Child::from(format!("item {i}"))).collect()
}

fn nested(len: usize) -> Arc<[Child]> {
    (0..len)
        .map(|i| Child::from(vec![Child::from(i), Child::Node(Node::element("br"))]))
        .collect()
}

fn bench_flatten(c: &mut Criterion) {
    let concrete = nodes(100);
    c.bench_function("flatten_nodes_100", |b| {
        b.iter(|| resolve_arrays_and_statics(black_box(&concrete)))
    });

    let text = primitives(100);
    c.bench_function("flatten_primitives_100", |b| {
        b.iter(|| resolve_arrays_and_statics(black_box(&text)))
    });

    let deep = nested(100);
    c.bench_function("flatten_nested_100", |b| {
        b.iter(|| resolve_arrays_and_statics(black_box(&deep)))
    });
}

criterion_group!(benches, bench_flatten);
criterion_main!(benches);
