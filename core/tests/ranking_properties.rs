use mixdex_core::corpus::{records_from_value, RecordResult};
use mixdex_core::{IdfVariant, IndexGeneration, SearchConfig};
use serde_json::json;

fn records(names: &[&str]) -> Vec<RecordResult> {
    let arr: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, n)| json!({"id": i.to_string(), "name": n}))
        .collect();
    records_from_value(json!(arr))
}

fn loose(variant: IdfVariant) -> SearchConfig {
    SearchConfig { min_df: 1, max_df_ratio: 1.0, idf_variant: variant, ..SearchConfig::default() }
}

fn corpus() -> Vec<&'static str> {
    vec![
        "summer road trip", "road trip classics", "summer hits", "rainy day jazz",
        "jazz for studying", "late night jazz", "workout hits", "gym workout",
        "country anthems", "summer chill", "chill beats", "deep focus",
    ]
}

#[test]
fn three_document_running_scenario() {
    let names = ["running shoes", "running gear", "hiking boots"];
    let g = IndexGeneration::build(records(&names), loose(IdfVariant::Smoothed));
    let hits = g.search("running");
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.doc_id != 2 && h.score > 0.0));

    // Under the standard formula "running" (df 2 of 3) weighs log2(3/3) = 0,
    // so it stays in the table but scores nothing.
    let g = IndexGeneration::build(records(&names), loose(IdfVariant::Standard));
    assert_eq!(g.idf().get("run"), Some(0.0));
    assert!(g.search("running").is_empty());
    assert!(!g.search("hiking").is_empty());
}

#[test]
fn repeated_queries_are_identical() {
    let g = IndexGeneration::build(records(&corpus()), loose(IdfVariant::Standard));
    let first = g.search("summer jazz road");
    assert!(!first.is_empty());
    for _ in 0..10 {
        assert_eq!(g.search("summer jazz road"), first);
    }
}

#[test]
fn rebuild_is_idempotent() {
    let a = IndexGeneration::build(records(&corpus()), SearchConfig::default());
    let b = IndexGeneration::build(records(&corpus()), SearchConfig::default());
    assert_eq!(a.idf().len(), b.idf().len());
    for (term, w) in a.idf().iter() {
        assert!((b.idf().get(term).unwrap() - w).abs() < 1e-12);
    }
    for (x, y) in a.norms().as_slice().iter().zip(b.norms().as_slice()) {
        assert!((x - y).abs() < 1e-9);
    }
}

#[test]
fn self_similarity_is_maximal() {
    let g = IndexGeneration::build(records(&corpus()), loose(IdfVariant::Standard));
    let target = 0; // "summer road trip"
    let own = g.search("summer road trip");
    let own_score = own.iter().find(|h| h.doc_id == target).unwrap().score;
    assert!(own_score <= 1.0 + 1e-9);
    assert!((own_score - 1.0).abs() < 1e-9);
    assert_eq!(own[0].doc_id, target);
    for q in ["trip road summer", "summer", "road trip", "summer trip"] {
        let s = g.search(q).iter().find(|h| h.doc_id == target).map_or(0.0, |h| h.score);
        assert!(s <= own_score + 1e-12, "{q} scored {s}");
    }
}

#[test]
fn empty_and_out_of_vocabulary_queries() {
    let g = IndexGeneration::build(records(&corpus()), SearchConfig::default());
    assert!(g.search("").is_empty());
    assert!(g.search("   ").is_empty());
    assert!(g.search("xylophone zeppelin").is_empty());
    assert!(g.top_tracks("").is_empty());
}

#[test]
fn empty_corpus_degrades_gracefully() {
    let g = IndexGeneration::build(Vec::new(), SearchConfig::default());
    assert_eq!(g.num_docs(), 0);
    assert!(g.idf().is_empty());
    assert!(g.norms().is_empty());
    assert!(g.search("anything").is_empty());
}

#[test]
fn default_filter_prunes_common_terms() {
    // 12 documents: "summer" in 3 (0.25) is too common, "jazz" in 3 too,
    // "road" in 2 (~0.17) survives.
    let g = IndexGeneration::build(records(&corpus()), SearchConfig::default());
    assert!(!g.idf().contains("summer"));
    assert!(g.idf().contains("road"));
    assert!(g.search("summer").is_empty());
    let hits = g.search("road");
    let ids: Vec<u32> = hits.iter().map(|h| h.doc_id).collect();
    assert_eq!(ids, vec![0, 1]);
}
