use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use splitweld::prelude::*;
use splitweld::stages::OutcomeReceiver;
use tokio::sync::mpsc;

fn batch(size: usize) -> Vec<String> {
    (0..size)
        .map(|i| {
            if i % 10 == 0 {
                format!("bad{}", i)
            } else {
                i.to_string()
            }
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let runtime = tokio::runtime::Runtime::new().unwrap();

    for size in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*size as u64));

        for buffer_size in [1, 64].iter() {
            group.bench_with_input(
                BenchmarkId::new(format!("buffer_{}", buffer_size), size),
                size,
                |b, &size| {
                    b.iter(|| {
                        runtime.block_on(async {
                            let items = batch(size);
                            let sink = CollectSink::new();

                            Pipeline::from_batch(items, SquareTransformer::new())
                                .buffer_size(*buffer_size)
                                .collect(sink)
                                .await
                                .unwrap();
                        })
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_square(c: &mut Criterion) {
    let mut group = c.benchmark_group("square");

    group.bench_function("valid", |b| {
        b.iter(|| SquareTransformer::square(black_box("-9223372036854775808")))
    });
    group.bench_function("invalid", |b| {
        b.iter(|| SquareTransformer::square(black_box("3.5")))
    });

    group.finish();
}

fn bench_fan_in(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_in");
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let size = 10000usize;
    group.throughput(Throughput::Elements(size as u64));

    group.bench_function("recv", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let (out_tx, out_rx) = mpsc::channel(size);
                let (err_tx, err_rx) = mpsc::channel(size);
                for i in 0..size {
                    if i % 2 == 0 {
                        out_tx.send(i).await.unwrap();
                    } else {
                        err_tx.send(i).await.unwrap();
                    }
                }
                drop(out_tx);
                drop(err_tx);

                let mut receiver = OutcomeReceiver::new(out_rx, err_rx);
                let mut count = 0;
                while let Some(outcome) = receiver.recv().await {
                    black_box(outcome);
                    count += 1;
                }
                assert_eq!(count, size);
            })
        });
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_square, bench_fan_in);
criterion_main!(benches);
