use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use simchart_core::{DataPoint, DataSeries, LinePlot, ScrollingChart, ScrollingChartConfig, SeriesStyle};

fn gen_series(n: usize) -> DataSeries {
    let dt = 10.0 / n as f64;
    DataSeries::with_points(
        (0..n).map(|i| {
            let t = i as f64 * dt;
            DataPoint::new(t, (t * 3.0).sin() * (-t * 0.1).exp())
        }),
        SeriesStyle::default(),
    )
}

fn bench_scrolling_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("scrolling_render");
    for &n in &[1_000usize, 10_000usize] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("n{n}")), &n, |b, &n| {
            b.iter_batched(
                || {
                    let mut chart = ScrollingChart::new(ScrollingChartConfig::default()).expect("chart");
                    chart.add_series(gen_series(n).shared(), LinePlot::new());
                    chart
                },
                |mut chart| {
                    for _ in 0..60 {
                        let _ = chart.advance(1.0 / 60.0);
                        black_box(chart.render());
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scrolling_render);
criterion_main!(benches);
