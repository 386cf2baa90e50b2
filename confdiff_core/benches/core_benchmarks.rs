use confdiff_common::CanonicalValue;
use confdiff_core::{compare, DecoderRegistry, FormatLoader};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// Helper to build a nested JSON document with `width` keys per level
fn create_json_document(depth: usize, width: usize, leaf_offset: usize) -> String {
    if depth == 0 {
        return (leaf_offset % 7).to_string();
    }

    let entries: Vec<String> = (0..width)
        .map(|i| {
            format!(
                "\"key_{}\": {}",
                i,
                create_json_document(depth - 1, width, leaf_offset + i)
            )
        })
        .collect();
    format!("{{{}}}", entries.join(", "))
}

// Helper to build a flat key/value document
fn create_keyvalue_document(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("setting_{}=value_{}\n", i, i))
        .collect()
}

fn load(registry: &DecoderRegistry, text: &str, format: &str) -> CanonicalValue {
    FormatLoader::new(registry).load_text(text, Some(format)).unwrap()
}

fn bench_load_json(c: &mut Criterion) {
    let registry = DecoderRegistry::builtin();
    let text = create_json_document(4, 6, 0);

    c.bench_function("load_json_depth4_width6", |b| {
        b.iter(|| black_box(load(&registry, black_box(&text), "json")));
    });
}

fn bench_load_keyvalue(c: &mut Criterion) {
    let registry = DecoderRegistry::builtin();
    let text = create_keyvalue_document(2_000);

    c.bench_function("load_keyvalue_2000_lines", |b| {
        b.iter(|| black_box(load(&registry, black_box(&text), "keyvalue")));
    });
}

fn bench_compare(c: &mut Criterion) {
    let registry = DecoderRegistry::builtin();
    let mut group = c.benchmark_group("compare_trees");

    for depth in [2usize, 3, 4] {
        let left = load(&registry, &create_json_document(depth, 6, 0), "json");
        let right = load(&registry, &create_json_document(depth, 6, 1), "json");

        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| black_box(compare(black_box(&left), black_box(&right))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_load_json, bench_load_keyvalue, bench_compare);
criterion_main!(benches);
