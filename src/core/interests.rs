use std::collections::HashSet;

use crate::models::{Category, Profile};

/// Tags two profiles have in common, in category scan order
///
/// For each category, tags of `a` that also appear in `b` are taken in `a`'s
/// order. A tag already collected from an earlier category is skipped.
/// Collection stops at `limit` tags.
pub fn shared_interests(a: &Profile, b: &Profile, limit: usize) -> Vec<String> {
    let mut shared = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for category in Category::ALL {
        let vb = b.tags(category);
        if vb.is_empty() {
            continue;
        }

        for tag in a.tags(category) {
            if shared.len() >= limit {
                return shared;
            }
            if vb.contains(tag) && seen.insert(tag.as_str()) {
                shared.push(tag.clone());
            }
        }
    }

    shared.truncate(limit);
    shared
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_category_order_wins_over_field_order() {
        let a = Profile {
            travel: tags(&["beach"]),
            cultural_values: tags(&["honesty"]),
            music: tags(&["jazz"]),
            ..Default::default()
        };
        let b = a.clone();

        assert_eq!(shared_interests(&a, &b, 5), vec!["honesty", "jazz", "beach"]);
    }

    #[test]
    fn test_left_order_and_dedupe() {
        let a = Profile {
            family: tags(&["kids", "kids", "elders"]),
            lifestyle: tags(&["elders", "active"]),
            ..Default::default()
        };
        let b = Profile {
            family: tags(&["elders", "kids"]),
            lifestyle: tags(&["active", "elders"]),
            ..Default::default()
        };

        assert_eq!(shared_interests(&a, &b, 5), vec!["kids", "elders", "active"]);
    }

    #[test]
    fn test_limit() {
        let many = tags(&["a", "b", "c", "d", "e", "f", "g"]);
        let a = Profile {
            art: many.clone(),
            ..Default::default()
        };
        let b = a.clone();

        assert_eq!(shared_interests(&a, &b, 5), vec!["a", "b", "c", "d", "e"]);
        assert!(shared_interests(&a, &b, 0).is_empty());
    }

    #[test]
    fn test_no_overlap() {
        let a = Profile {
            art: tags(&["painting"]),
            ..Default::default()
        };
        let b = Profile {
            music: tags(&["painting"]),
            ..Default::default()
        };

        assert!(shared_interests(&a, &b, 5).is_empty());
    }
}
