use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use strided_reduce::prelude::*;

const SHAPES: [(&[usize], &[usize]); 4] = [
    (&[64, 320, 80], &[0, 1]),
    (&[64, 320, 80], &[2]),
    (&[1024, 1024], &[1]),
    (&[32, 64, 16, 16], &[0, 2, 3]),
];

pub fn reduce_benchmark(c: &mut Criterion) {
    let dev: Cpu = Default::default();
    let mut group = c.benchmark_group("Host Reduce");

    for (lengths, axes) in SHAPES {
        let layout = resolve(lengths, axes).unwrap();
        let mut inp = std::vec![0.0f32; layout.input().num_elements()];
        dev.try_fill_uniform(&mut inp, -1.0, 1.0).unwrap();
        let mut out = std::vec![0.0f32; layout.output().num_elements()];
        let mut idx = std::vec![0u32; layout.output().num_elements()];
        let id = format!("{lengths:?} over {axes:?}");

        for op in [ReduceOp::Add, ReduceOp::Norm2] {
            let spec = ReduceSpec::new(op);
            group.bench_with_input(BenchmarkId::new(op.name(), &id), &spec, |b, spec| {
                b.iter(|| reduce(&inp, &layout, spec, 1.0, 0.0, &mut out, None).unwrap())
            });
        }

        let spec = ReduceSpec::new(ReduceOp::Max).with_indices(true);
        group.bench_with_input(BenchmarkId::new("max_indices", &id), &spec, |b, spec| {
            b.iter(|| reduce(&inp, &layout, spec, 1.0, 0.0, &mut out, Some(&mut idx)).unwrap())
        });
    }
}

criterion_group!(benches, reduce_benchmark);
criterion_main!(benches);
