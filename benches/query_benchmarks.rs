use criterion::{black_box, criterion_group, criterion_main, Criterion};
use simsieve::cache::{HashCache, LoadPolicy};
use simsieve::matcher::{BlockScorer, Matcher};

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const CHUNK_SIZES: [u64; 5] = [96, 192, 384, 768, 1536];

// Helper to generate a deterministic synthetic corpus (xorshift, no rand dep)
fn synthetic_entries(count: usize) -> Vec<(String, String)> {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    let mut block = |len: usize| -> String {
        (0..len)
            .map(|_| ALPHABET[(next() % ALPHABET.len() as u64) as usize] as char)
            .collect()
    };

    (0..count)
        .map(|i| {
            let chunk = CHUNK_SIZES[i % CHUNK_SIZES.len()];
            let hash = format!("{}:{}:{}", chunk, block(32), block(16));
            (format!("sample-{i}"), hash)
        })
        .collect()
}

// 1. Bulk Load Benchmarks
fn bench_bulk_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_load");

    for count in [1_000, 10_000] {
        let entries = synthetic_entries(count);
        group.bench_with_input(format!("{count}_records"), &entries, |b, entries| {
            b.iter(|| {
                let mut cache = HashCache::new();
                cache
                    .bulk_load(entries.iter().cloned(), LoadPolicy::FailFast)
                    .unwrap();
                black_box(cache.len());
            });
        });
    }
    group.finish();
}

// 2. Query Benchmarks
fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    for count in [1_000, 10_000] {
        let entries = synthetic_entries(count);
        // A query hash sharing one cached record's features exactly
        let query_hash = entries[count / 2].1.clone();
        let mut cache = HashCache::new();
        cache
            .bulk_load(entries, LoadPolicy::FailFast)
            .unwrap();
        let matcher = Matcher::new(BlockScorer);

        group.bench_with_input(format!("{count}_records"), &cache, |b, cache| {
            b.iter(|| {
                let matches = matcher.query(cache, "query", &query_hash).unwrap();
                black_box(matches);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_bulk_load, bench_query);
criterion_main!(benches);
