//! Candidate rankings and retrieval modes.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which retrieval strategies a query runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMode {
    /// Lexical and semantic, fused with RRF.
    #[default]
    Hybrid,
    /// Semantic only.
    Vector,
    /// Lexical only.
    Bm25,
}

impl RetrievalMode {
    /// Wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalMode::Hybrid => "hybrid",
            RetrievalMode::Vector => "vector",
            RetrievalMode::Bm25 => "bm25",
        }
    }
}

impl std::str::FromStr for RetrievalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hybrid" => Ok(RetrievalMode::Hybrid),
            "vector" => Ok(RetrievalMode::Vector),
            "bm25" => Ok(RetrievalMode::Bm25),
            other => Err(format!(
                "unknown mode '{}', expected one of: hybrid, vector, bm25",
                other
            )),
        }
    }
}

/// One entry of a [`CandidateRanking`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedCandidate {
    pub id: String,
    /// 1-based position in the ranking.
    pub rank: usize,
}

/// Ordered list of document ids produced by one retrieval strategy.
///
/// Ranks are contiguous from 1 and every id appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateRanking {
    candidates: Vec<RankedCandidate>,
}

impl CandidateRanking {
    /// Assigns ranks 1..n over `ids` in the given order.
    ///
    /// A repeated id keeps its first position and later repeats are skipped,
    /// so ranks stay contiguous.
    pub fn from_ordered_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates = Vec::new();
        for id in ids {
            let id = id.into();
            if seen.insert(id.clone()) {
                candidates.push(RankedCandidate {
                    id,
                    rank: candidates.len() + 1,
                });
            }
        }
        Self { candidates }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedCandidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Ids in rank order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.candidates.iter().map(|c| c.id.as_str())
    }
}

impl<'a> IntoIterator for &'a CandidateRanking {
    type Item = &'a RankedCandidate;
    type IntoIter = std::slice::Iter<'a, RankedCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_are_one_based_and_contiguous() {
        let ranking = CandidateRanking::from_ordered_ids(["a", "b", "c"]);
        let ranks: Vec<usize> = ranking.iter().map(|c| c.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(ranking.ids().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let ranking = CandidateRanking::from_ordered_ids(["a", "b", "a", "c"]);
        assert_eq!(ranking.len(), 3);
        let pairs: Vec<(&str, usize)> = ranking.iter().map(|c| (c.id.as_str(), c.rank)).collect();
        assert_eq!(pairs, vec![("a", 1), ("b", 2), ("c", 3)]);
    }

    #[test]
    fn test_empty_ranking() {
        let ranking = CandidateRanking::from_ordered_ids(Vec::<String>::new());
        assert!(ranking.is_empty());
    }

    #[test]
    fn test_mode_wire_names() {
        assert_eq!(RetrievalMode::default(), RetrievalMode::Hybrid);
        assert_eq!(RetrievalMode::Bm25.as_str(), "bm25");
        assert_eq!(RetrievalMode::Vector.as_str(), "vector");
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("bm25".parse::<RetrievalMode>(), Ok(RetrievalMode::Bm25));
        assert_eq!("hybrid".parse::<RetrievalMode>(), Ok(RetrievalMode::Hybrid));
        assert!("BM25".parse::<RetrievalMode>().is_err());
        assert!("keyword".parse::<RetrievalMode>().is_err());
    }
}
