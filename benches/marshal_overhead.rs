/// Argument-vector marshaling overhead benchmarks.
///
/// The marshaler runs on every compile call, so building the native
/// vector has to stay cheap relative to the engine's own compile time.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use trazar::marshal::CStringArray;

fn bench_arg_vector_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("arg_vector");

    for size in [0usize, 1, 8, 64] {
        let items: Vec<String> = (0..size).map(|i| format!("macro-arg-{i}")).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| {
                let array = CStringArray::new(black_box(items.as_slice())).unwrap();
                black_box(array.argc());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_arg_vector_build);
criterion_main!(benches);
