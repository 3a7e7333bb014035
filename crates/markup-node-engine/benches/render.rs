use criterion::{Criterion, criterion_group, criterion_main};
use markup_node_engine::{MarkupNode, OptionsOverride};
use serde_json::{Value, json};
use std::hint::black_box;

fn generate_catalog(records: usize, depth: usize) -> Value {
    let items: Vec<Value> = (0..records)
        .map(|i| {
            json!({
                "_id": i,
                "title": format!("Record {i} <draft> & notes"),
                "tags": ["a", "b", "c"],
                "detail": generate_nested(depth),
            })
        })
        .collect();
    json!({"catalog": {"_version": "1", "item": items}})
}

fn generate_nested(depth: usize) -> Value {
    if depth == 0 {
        return json!({"_value": "leaf"});
    }
    json!({"_level": depth, "next": generate_nested(depth - 1)})
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(20);

    let input = generate_catalog(500, 6);
    group.bench_function("from_root", |b| {
        b.iter(|| {
            let node = MarkupNode::from_root(black_box(input.clone())).unwrap();
            black_box(node);
        });
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.sample_size(20);

    let node = MarkupNode::from_root(generate_catalog(500, 6)).unwrap();
    let compact = OptionsOverride::new().indent("").new_line("");

    group.bench_function("pretty", |b| {
        b.iter(|| black_box(node.render()));
    });
    group.bench_function("compact", |b| {
        b.iter(|| black_box(node.render_with(&compact)));
    });

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    group.sample_size(20);

    let node = MarkupNode::from_root(generate_catalog(500, 6)).unwrap();
    group.bench_function("extract", |b| {
        b.iter(|| black_box(node.extract()));
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_render, bench_extract);
criterion_main!(benches);
