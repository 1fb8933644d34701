use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pawtrail::config::TrackerConfig;
use pawtrail::models::{GeoSample, PathPoint};
use pawtrail::tracking::{cumulative_distance, filter, SpeedEstimator};

/// A 2-hour walk sampled every second, with some stationary wobble.
fn synthetic_walk() -> Vec<GeoSample> {
    (0..7200)
        .map(|i| {
            let t = i as f64;
            let wobble = if i % 7 == 0 { 0.000004 } else { 0.0 };
            GeoSample::new(
                37.5 + t * 0.0000125 + wobble,
                127.0 + (t / 300.0).sin() * 0.001,
                5.0 + (i % 40) as f64,
                1_714_738_200_000 + i as i64 * 1000,
            )
        })
        .collect()
}

fn benchmark_tracking_pipeline(c: &mut Criterion) {
    let samples = synthetic_walk();
    let points: Vec<PathPoint> = samples.iter().copied().map(PathPoint::from).collect();
    let config = TrackerConfig::default();

    let mut group = c.benchmark_group("tracking_pipeline");

    group.bench_function("cumulative_distance_7200", |b| {
        b.iter(|| cumulative_distance(black_box(&points)))
    });

    group.bench_function("filter_and_speed_7200", |b| {
        b.iter(|| {
            let mut path: Vec<PathPoint> = Vec::with_capacity(samples.len());
            let mut speed = SpeedEstimator::from_config(&config);
            for sample in black_box(&samples) {
                if filter::accept(sample, path.last(), &config).is_accepted() {
                    let point = PathPoint::from(*sample);
                    if let Some(prev) = path.last() {
                        speed.update(prev, &point);
                    }
                    path.push(point);
                }
            }
            (path.len(), speed.rolling_average_kmh())
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_tracking_pipeline);
criterion_main!(benches);
