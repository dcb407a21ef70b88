use std::collections::HashSet;

use crate::core::text::tokenize_thoughts;
use crate::models::{Category, Profile, ScoringWeights};

/// Calculate the compatibility (0-100) between two profiles
///
/// Scoring formula:
/// score = round(
///     sum(category_overlap * category_weight)   # categories both sides filled in
///   + thought_similarity * weights.thoughts      # both sides wrote thoughts
///   + age_proximity * weights.age                # both sides gave an age
///   / sum(weights that contributed)
/// )
///
/// Every component is already on a 0-100 scale, so the weighted mean is too.
/// Categories, thoughts or ages missing on either side contribute nothing to
/// either sum. With nothing to compare the score is 0.
pub fn calculate_compatibility(a: &Profile, b: &Profile, weights: &ScoringWeights) -> u32 {
    let mut total_score = 0.0;
    let mut weight_sum = 0.0;

    // Stage 1: weighted category overlap, in fixed category order
    for category in Category::ALL {
        let va = a.tags(category);
        let vb = b.tags(category);

        if !va.is_empty() && !vb.is_empty() {
            let weight = weights.category(category);
            total_score += category_overlap_score(va, vb) * weight;
            weight_sum += weight;
        }
    }

    // Stage 2: thought similarity bonus
    if !a.thoughts.is_empty() && !b.thoughts.is_empty() {
        total_score += thought_similarity(&a.thoughts, &b.thoughts) * weights.thoughts;
        weight_sum += weights.thoughts;
    }

    // Stage 3: age proximity bonus
    if let (Some(age_a), Some(age_b)) = (a.age, b.age) {
        total_score += age_proximity_score(age_a, age_b) * weights.age;
        weight_sum += weights.age;
    }

    if weight_sum > 0.0 {
        // Repeated thought tokens can push one component past 100
        (total_score / weight_sum).round().min(100.0).max(0.0) as u32
    } else {
        0
    }
}

/// Jaccard overlap of two tag lists as a percentage
///
/// Both sides are treated as sets: a tag repeated in one list counts once.
pub fn category_overlap_score(va: &[String], vb: &[String]) -> f64 {
    let set_a: HashSet<&str> = va.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = vb.iter().map(String::as_str).collect();

    let overlap = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    if union > 0 {
        (overlap as f64 / union as f64) * 100.0
    } else {
        0.0
    }
}

/// Keyword similarity between two free-text answers as a percentage
///
/// Each token of `a` (repeats included) that appears anywhere in `b` counts
/// towards the overlap; the denominator is the number of distinct tokens
/// across both texts.
pub fn thought_similarity(a: &str, b: &str) -> f64 {
    let words_a = tokenize_thoughts(a);
    let words_b = tokenize_thoughts(b);

    let set_b: HashSet<&str> = words_b.iter().map(String::as_str).collect();
    let overlap = words_a.iter().filter(|w| set_b.contains(w.as_str())).count();

    let union = words_a
        .iter()
        .chain(words_b.iter())
        .map(String::as_str)
        .collect::<HashSet<&str>>()
        .len();

    if union > 0 {
        (overlap as f64 / union as f64) * 100.0
    } else {
        0.0
    }
}

/// Age proximity score, stepped by absolute age difference
#[inline]
pub fn age_proximity_score(age_a: i64, age_b: i64) -> f64 {
    match age_a.abs_diff(age_b) {
        0..=2 => 100.0,
        3..=5 => 80.0,
        6..=10 => 60.0,
        11..=15 => 40.0,
        _ => 20.0,
    }
}
