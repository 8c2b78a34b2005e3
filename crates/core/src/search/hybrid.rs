//! Reciprocal Rank Fusion.
//!
//! Combines any number of candidate rankings into one ranked score map.
//! RRF only looks at ranks, so BM25 scores and vector distances never have to
//! be brought onto a common scale.

use crate::search::types::CandidateRanking;
use std::collections::HashMap;

/// A fused document score.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedEntry {
    pub id: String,
    pub score: f64,
}

/// Documents ordered by descending fused score.
///
/// Exact ties keep the order in which ids first appeared across the input
/// rankings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FusedScores {
    entries: Vec<FusedEntry>,
}

impl FusedScores {
    pub fn iter(&self) -> std::slice::Iter<'_, FusedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fused score of `id`, if any input ranking contained it.
    pub fn score_of(&self, id: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.score)
    }
}

/// Reciprocal Rank Fusion: combines ranked lists.
/// score(d) = sum(1 / (k + rank_i(d)))
pub fn rrf_merge(rankings: &[CandidateRanking], k: usize) -> FusedScores {
    let capacity = rankings.iter().map(CandidateRanking::len).sum();
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(capacity);
    let mut entries: Vec<FusedEntry> = Vec::with_capacity(capacity);

    for ranking in rankings {
        for candidate in ranking {
            let contribution = 1.0 / ((k + candidate.rank) as f64);
            match positions.get(candidate.id.as_str()) {
                Some(&pos) => entries[pos].score += contribution,
                None => {
                    positions.insert(candidate.id.as_str(), entries.len());
                    entries.push(FusedEntry {
                        id: candidate.id.clone(),
                        score: contribution,
                    });
                }
            }
        }
    }

    // Stable sort: equal scores stay in first-appearance order
    entries.sort_by(|a, b| b.score.total_cmp(&a.score));
    FusedScores { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RRF_K;

    fn ranking(ids: &[&str]) -> CandidateRanking {
        CandidateRanking::from_ordered_ids(ids.iter().copied())
    }

    #[test]
    fn test_rrf_disjoint_lists() {
        let fused = rrf_merge(&[ranking(&["a", "b", "c"]), ranking(&["d", "e"])], RRF_K);
        assert_eq!(fused.len(), 5);
        for id in ["a", "b", "c", "d", "e"] {
            assert!(fused.score_of(id).is_some(), "missing id {id} in fused results");
        }
        // same rank in both lists → same score, first list's id first
        let ids: Vec<&str> = fused.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d", "b", "e", "c"]);
    }

    #[test]
    fn test_rrf_overlapping_boosts_score() {
        let fused = rrf_merge(&[ranking(&["a", "b", "c"]), ranking(&["b", "d", "a"])], RRF_K);
        let top: Vec<&str> = fused.iter().take(2).map(|e| e.id.as_str()).collect();
        assert_eq!(top, vec!["b", "a"]);
    }

    #[test]
    fn test_rrf_identical_lists_double_score() {
        let single = rrf_merge(&[ranking(&["a", "b", "c"])], RRF_K);
        let double = rrf_merge(&[ranking(&["a", "b", "c"]), ranking(&["a", "b", "c"])], RRF_K);
        for entry in single.iter() {
            assert_eq!(double.score_of(&entry.id), Some(entry.score * 2.0));
        }
    }

    #[test]
    fn test_rrf_swapped_ranks_tie_in_first_appearance_order() {
        let fused = rrf_merge(&[ranking(&["a", "b"]), ranking(&["b", "a"])], 60);
        let expected = 1.0 / 61.0 + 1.0 / 62.0;
        let entries: Vec<&FusedEntry> = fused.iter().collect();
        assert_eq!(entries[0].id, "a");
        assert_eq!(entries[1].id, "b");
        assert!((entries[0].score - expected).abs() < 1e-15);
        assert_eq!(entries[0].score, entries[1].score);
    }

    #[test]
    fn test_rrf_single_score_value() {
        let fused = rrf_merge(&[ranking(&["a"])], 60);
        assert_eq!(fused.score_of("a"), Some(1.0 / 61.0));
    }

    #[test]
    fn test_rrf_empty_inputs() {
        assert!(rrf_merge(&[], RRF_K).is_empty());
        assert!(rrf_merge(&[ranking(&[]), ranking(&[])], RRF_K).is_empty());
    }

    #[test]
    fn test_rrf_one_empty() {
        let fused = rrf_merge(&[ranking(&["a", "b"]), ranking(&[])], RRF_K);
        assert_eq!(fused.len(), 2);
    }

    #[test]
    fn test_rrf_three_lists() {
        let fused = rrf_merge(
            &[ranking(&["a"]), ranking(&["b"]), ranking(&["b", "a"])],
            RRF_K,
        );
        assert_eq!(fused.iter().next().map(|e| e.id.as_str()), Some("b"));
        assert_eq!(fused.len(), 2);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn prefixed(prefix: &str, len: usize) -> CandidateRanking {
            CandidateRanking::from_ordered_ids((0..len).map(|i| format!("{prefix}{i}")))
        }

        proptest! {
            #[test]
            fn disjoint_rankings_keep_every_id(a in 0usize..40, b in 0usize..40) {
                let fused = rrf_merge(&[prefixed("lex", a), prefixed("vec", b)], RRF_K);
                prop_assert_eq!(fused.len(), a + b);
            }

            #[test]
            fn identical_rankings_double_scores(len in 1usize..40) {
                let single = rrf_merge(&[prefixed("doc", len)], RRF_K);
                let double = rrf_merge(&[prefixed("doc", len), prefixed("doc", len)], RRF_K);
                for entry in single.iter() {
                    prop_assert_eq!(double.score_of(&entry.id), Some(entry.score * 2.0));
                }
            }

            #[test]
            fn fused_scores_descend(a in 0usize..30, b in 0usize..30, offset in 0usize..30) {
                let shifted = CandidateRanking::from_ordered_ids(
                    (offset..offset + b).map(|i| format!("doc{i}")),
                );
                let fused = rrf_merge(&[prefixed("doc", a), shifted], RRF_K);
                let scores: Vec<f64> = fused.iter().map(|e| e.score).collect();
                prop_assert!(scores.windows(2).all(|w| w[0] >= w[1]));
                prop_assert!(scores.iter().all(|&s| s > 0.0));
            }
        }
    }
}
