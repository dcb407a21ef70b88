use crate::core::{interests::shared_interests, scoring::calculate_compatibility};
use crate::models::{MatchRecord, MatchingRules, Profile, ScoringWeights};

/// Ranks a pool of profiles against a subject
///
/// Holds the weight table and thresholds built once at startup. All methods
/// are pure over their inputs, so one `Matcher` can be shared by every
/// request handler.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    rules: MatchingRules,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, rules: MatchingRules) -> Self {
        Self { weights, rules }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
            rules: MatchingRules::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn rules(&self) -> &MatchingRules {
        &self.rules
    }

    /// Compatibility between two profiles under this matcher's weights
    pub fn score(&self, a: &Profile, b: &Profile) -> u32 {
        calculate_compatibility(a, b, &self.weights)
    }

    /// Shared interests between two profiles, capped by the configured limit
    pub fn shared_interests(&self, a: &Profile, b: &Profile) -> Vec<String> {
        shared_interests(a, b, self.rules.max_shared_interests)
    }

    /// Rank `pool` against `subject`
    ///
    /// # Pipeline Stages
    /// 1. Drop the subject itself (by id)
    /// 2. Score every remaining profile, keep those at or above the threshold
    /// 3. Sort by compatibility, descending; ties keep pool order
    /// 4. Truncate to the configured maximum
    pub fn rank_matches(&self, subject: &Profile, pool: &[Profile]) -> Vec<MatchRecord> {
        let mut matches: Vec<MatchRecord> = pool
            .iter()
            .filter(|candidate| candidate.id != subject.id)
            .filter_map(|candidate| self.evaluate(subject, candidate))
            .collect();

        // sort_by is stable, which gives the documented tie-break
        matches.sort_by(|a, b| b.compatibility.cmp(&a.compatibility));
        matches.truncate(self.rules.max_results);

        tracing::debug!(
            "Ranked {} matches for {} from a pool of {}",
            matches.len(),
            subject.id,
            pool.len()
        );

        matches
    }

    /// Existing profiles that should hear about a newcomer
    ///
    /// Scores each existing profile against the newcomer (existing profile on
    /// the left) and returns those at or above the threshold, paired with a
    /// record describing the newcomer from their point of view. Pool order is
    /// kept.
    pub fn interested_in<'a>(
        &self,
        newcomer: &Profile,
        pool: &'a [Profile],
    ) -> Vec<(&'a Profile, MatchRecord)> {
        pool.iter()
            .filter(|existing| existing.id != newcomer.id)
            .filter_map(|existing| {
                self.evaluate(existing, newcomer)
                    .map(|record| (existing, record))
            })
            .collect()
    }

    fn evaluate(&self, subject: &Profile, candidate: &Profile) -> Option<MatchRecord> {
        let compatibility = self.score(subject, candidate);
        if compatibility < self.rules.min_compatibility {
            return None;
        }

        Some(MatchRecord {
            user_id: candidate.id.clone(),
            compatibility,
            shared_interests: self.shared_interests(subject, candidate),
            thoughts: candidate.thoughts.clone(),
        })
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, music: &[&str], age: Option<i64>) -> Profile {
        Profile {
            id: id.to_string(),
            music: music.iter().map(|m| m.to_string()).collect(),
            age,
            ..Default::default()
        }
    }

    #[test]
    fn test_rank_excludes_self_and_low_scores() {
        let matcher = Matcher::with_default_weights();
        let subject = candidate("me", &["jazz", "soul"], None);

        let pool = vec![
            subject.clone(),
            Profile {
                thoughts: "thoughts of 1".to_string(),
                ..candidate("1", &["jazz", "soul"], None) // 100
            },
            candidate("2", &["jazz", "rock"], None), // 33
            candidate("3", &["jazz"], None),          // 50
        ];

        let result = matcher.rank_matches(&subject, &pool);
        let ids: Vec<&str> = result.iter().map(|m| m.user_id.as_str()).collect();

        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(result[0].compatibility, 100);
        assert_eq!(result[0].shared_interests, vec!["jazz", "soul"]);
        assert_eq!(result[0].thoughts, "thoughts of 1");
        assert_eq!(result[1].compatibility, 50);
    }

    #[test]
    fn test_ties_keep_pool_order() {
        let matcher = Matcher::with_default_weights();
        let subject = candidate("me", &["jazz"], None);

        let pool = vec![
            candidate("b", &["jazz"], None),
            candidate("a", &["jazz", "rock"], None), // 50
            candidate("c", &["jazz"], None),
            candidate("d", &["jazz", "pop"], None), // 50
        ];

        let result = matcher.rank_matches(&subject, &pool);
        let ids: Vec<&str> = result.iter().map(|m| m.user_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_respects_max_results() {
        let matcher = Matcher::with_default_weights();
        let subject = candidate("me", &["jazz"], Some(30));

        let pool: Vec<Profile> = (0..25)
            .map(|i| candidate(&i.to_string(), &["jazz"], Some(30 + (i % 20) as i64)))
            .collect();

        let result = matcher.rank_matches(&subject, &pool);
        assert_eq!(result.len(), 10);
        for pair in result.windows(2) {
            assert!(pair[0].compatibility >= pair[1].compatibility);
        }
    }

    #[test]
    fn test_custom_rules() {
        let rules = MatchingRules {
            min_compatibility: 60,
            max_results: 1,
            max_shared_interests: 1,
        };
        let matcher = Matcher::new(ScoringWeights::default(), rules);
        let subject = candidate("me", &["jazz", "soul"], None);

        let pool = vec![
            candidate("1", &["jazz", "soul"], None),
            candidate("2", &["jazz", "soul", "funk"], None), // 67
            candidate("3", &["jazz"], None),                  // 50
        ];

        let result = matcher.rank_matches(&subject, &pool);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].user_id, "1");
        assert_eq!(result[0].shared_interests, vec!["jazz"]);
    }

    #[test]
    fn test_interested_in_newcomer() {
        let matcher = Matcher::with_default_weights();
        let newcomer = Profile {
            thoughts: "new here".to_string(),
            ..candidate("new", &["jazz"], None)
        };

        let pool = vec![
            candidate("1", &["jazz"], None),
            candidate("2", &["rock"], None),
            newcomer.clone(),
        ];

        let interested = matcher.interested_in(&newcomer, &pool);
        assert_eq!(interested.len(), 1);
        assert_eq!(interested[0].0.id, "1");
        assert_eq!(interested[0].1.user_id, "new");
        assert_eq!(interested[0].1.thoughts, "new here");
    }
}
