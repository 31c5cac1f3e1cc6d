use criterion::{criterion_group, criterion_main, Criterion};
use kwg_core::loader::StopWords;
use kwg_core::tokenizer::tokenize;

const TEXT: &str = "Het Koninklijke Bibliotheek bewaart kranten, boeken en tijdschriften. \
    The national library keeps newspapers, books and periodicals; café owners in 1920 \
    read the same papers as the ministers did. Élan, naïveté and façade survive normalization.";

fn bench_tokenize(c: &mut Criterion) {
    let text = TEXT.repeat(200);
    let stop: StopWords = ["the", "and", "en", "as", "in"].iter().map(|s| s.to_string()).collect();
    c.bench_function("tokenize_corpus_text", |b| b.iter(|| tokenize(&text, &stop).count()));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
