// Criterion benchmarks for Choice Love

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use choice_love::core::{calculate_compatibility, thought_similarity, Matcher};
use choice_love::models::{Category, Profile, ScoringWeights};

const TAG_POOL: [&str; 8] = [
    "family", "faith", "jazz", "hiking", "cooking", "poetry", "beach", "honesty",
];

fn create_candidate(id: usize) -> Profile {
    let mut profile = Profile {
        id: format!("user_{}", id),
        name: Some(format!("User {}", id)),
        age: Some(20 + (id % 25) as i64),
        thoughts: if id % 2 == 0 {
            "Love means patience, honesty and laughing together".to_string()
        } else {
            "Adventure first, then quiet evenings with family".to_string()
        },
        ..Default::default()
    };

    for (offset, category) in Category::ALL.iter().enumerate() {
        let tags = profile.tags_mut(*category);
        for k in 0..(1 + (id + offset) % 3) {
            tags.push(TAG_POOL[(id + offset + k) % TAG_POOL.len()].to_string());
        }
    }

    profile
}

fn bench_compatibility(c: &mut Criterion) {
    let a = create_candidate(1);
    let b = create_candidate(2);
    let weights = ScoringWeights::default();

    c.bench_function("calculate_compatibility", |bench| {
        bench.iter(|| calculate_compatibility(black_box(&a), black_box(&b), black_box(&weights)));
    });
}

fn bench_thought_similarity(c: &mut Criterion) {
    let a = create_candidate(1).thoughts;
    let b = create_candidate(2).thoughts;

    c.bench_function("thought_similarity", |bench| {
        bench.iter(|| thought_similarity(black_box(&a), black_box(&b)));
    });
}

fn bench_matching(c: &mut Criterion) {
    let matcher = Matcher::with_default_weights();
    let subject = create_candidate(0);

    let mut group = c.benchmark_group("matching");

    for candidate_count in [10, 100, 1000].iter() {
        let pool: Vec<Profile> = (1..=*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("rank_matches", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| matcher.rank_matches(black_box(&subject), black_box(&pool)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("interested_in", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| matcher.interested_in(black_box(&subject), black_box(&pool)).len());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_compatibility, bench_thought_similarity, bench_matching);

criterion_main!(benches);
