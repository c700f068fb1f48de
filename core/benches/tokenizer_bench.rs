use criterion::{criterion_group, criterion_main, Criterion};
use mixdex_core::corpus::records_from_value;
use mixdex_core::tokenizer::tokenize;
use mixdex_core::{IndexGeneration, SearchConfig};
use serde_json::json;

const NAMES: &[&str] = &[
    "Summer Road Trip 2019!!", "chill_vibes @home", "Late Night Jazz (Vol. 2)",
    "Workout Hits", "#throwback thursday", "Rainy Day Acoustic",
];

fn bench_tokenize(c: &mut Criterion) {
    let text = NAMES.join(" ");
    c.bench_function("tokenize_names", |b| b.iter(|| tokenize(&text)));
}

fn bench_search(c: &mut Criterion) {
    let docs: Vec<_> = (0..5000)
        .map(|i| json!({"id": i, "name": format!("{} {}", NAMES[i % NAMES.len()], NAMES[(i * 7) % NAMES.len()])}))
        .collect();
    let g = IndexGeneration::build(records_from_value(json!(docs)), SearchConfig { max_df_ratio: 0.5, ..SearchConfig::default() });
    c.bench_function("search_5k", |b| b.iter(|| g.search("late night road trip")));
}

criterion_group!(benches, bench_tokenize, bench_search);
criterion_main!(benches);
