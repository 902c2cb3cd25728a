use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use simchart_core::line_positions;

fn bench_line_positions(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_positions");
    for &count in &[10usize, 100, 1_000, 10_000] {
        let spacing = 1.0 / 60.0;
        let max = count as f64 * spacing;
        group.bench_with_input(BenchmarkId::from_parameter(format!("n{count}")), &max, |b, &max| {
            // Offset min the way an accumulated clock would.
            let min = (0..7).fold(0.0, |acc, _| acc + 0.1);
            b.iter(|| black_box(line_positions(min, min + max, spacing, 0.0, 10)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_line_positions);
criterion_main!(benches);
