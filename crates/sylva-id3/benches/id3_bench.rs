//! Criterion benchmarks for sylva-id3: split search, training and prediction.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sylva_id3::{Category, Dataset, Id3Config, find_best_split};

fn make_classification(
    n_samples: usize,
    n_features: usize,
    n_classes: usize,
    seed: u64,
) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut columns: Vec<String> = (0..n_features).map(|f| format!("f{f}")).collect();
    columns.push("label".to_string());

    let rows: Vec<Vec<Category>> = (0..n_samples)
        .map(|i| {
            let class = i % n_classes;
            let mut row: Vec<Category> = (0..n_features)
                .map(|f| {
                    let value = if f < 3 && rng.gen_bool(0.8) {
                        class
                    } else {
                        rng.gen_range(0..n_classes)
                    };
                    Category::new(format!("v{value}"))
                })
                .collect();
            row.push(Category::new(format!("class_{class}")));
            row
        })
        .collect();

    Dataset::new(columns, rows).unwrap()
}

fn bench_id3_train(c: &mut Criterion) {
    let data = make_classification(500, 20, 5, 42);
    let cfg = Id3Config::new("label");

    c.bench_function("id3_train_500x20_5class", |b| {
        b.iter(|| cfg.fit(&data).unwrap());
    });
}

fn bench_id3_predict_batch(c: &mut Criterion) {
    let data = make_classification(500, 20, 5, 42);
    let tree = Id3Config::new("label").fit(&data).unwrap();

    c.bench_function("id3_predict_batch_500x20", |b| {
        b.iter(|| tree.predict(&data).unwrap());
    });
}

fn bench_find_best_split(c: &mut Criterion) {
    let data = make_classification(500, 20, 5, 42);

    c.bench_function("id3_find_best_split_500x20_5class", |b| {
        b.iter(|| find_best_split(&data, "label").unwrap());
    });
}

criterion_group!(benches, bench_id3_train, bench_id3_predict_batch, bench_find_best_split);
criterion_main!(benches);
