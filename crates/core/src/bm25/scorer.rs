//! BM25 Okapi scoring engine.
//!
//! Scores every document in the corpus against a query using the BM25 formula
//! with `k1` and `b` from [`crate::config`]. Ranking is a stable sort over the
//! full score vector, so zero-scored documents are still ranked, in corpus order,
//! behind every document that matched.

use crate::bm25::inverted_index::InvertedIndex;
use crate::bm25::tokenizer::{tokenize, Tokens};
use crate::config;

/// BM25 score of every document for `query_tokens`, indexed by doc id.
///
/// Each occurrence of a term in the query contributes once, so repeated query
/// terms weigh more. Terms absent from the corpus contribute zero.
pub fn bm25_scores(index: &InvertedIndex, query_tokens: &Tokens) -> Vec<f64> {
    let mut scores = vec![0.0f64; index.doc_count as usize];
    if query_tokens.is_empty() || index.doc_count == 0 {
        return scores;
    }

    let avgdl = index.average_doc_length();
    let k1 = config::BM25_K1;
    let b = config::BM25_B;

    for token in query_tokens.iter() {
        let Some(postings) = index.index.get(token) else {
            continue;
        };
        let idf = index.idf(token);

        for posting in postings {
            let dl = index.doc_lengths[posting.doc_id as usize] as f64;
            let tf = posting.term_frequency as f64;

            // BM25 score for this term-document pair
            let tf_norm = (tf * (k1 + 1.0)) / (tf + k1 * (1.0 - b + b * dl / avgdl));
            scores[posting.doc_id as usize] += idf * tf_norm;
        }
    }
    scores
}

/// Ranks doc ids by descending score; ties keep corpus insertion order.
/// Returns at most `n` `(doc_id, score)` pairs.
pub fn rank_scores(scores: &[f64], n: usize) -> Vec<(u32, f64)> {
    let mut order: Vec<u32> = (0..scores.len() as u32).collect();
    // sort_by is stable: equal scores stay in doc id order
    order.sort_by(|&a, &b| scores[b as usize].total_cmp(&scores[a as usize]));
    order
        .into_iter()
        .take(n)
        .map(|id| (id, scores[id as usize]))
        .collect()
}

/// BM25 Okapi scoring for a query against the inverted index.
/// Returns the top `n` (doc_id, score) pairs sorted by descending score.
pub fn bm25_search(index: &InvertedIndex, query: &str, n: usize) -> Vec<(u32, f64)> {
    let query_tokens = tokenize(query);
    let scores = bm25_scores(index, &query_tokens);
    rank_scores(&scores, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bm25::inverted_index::InvertedIndex;

    fn build_corpus() -> InvertedIndex {
        InvertedIndex::build([
            "rising seas threaten coastal cities",
            "carbon tax policy debate continues",
            "wildfire season starts early this year",
            "coastal flooding and rising seas",
            "drought hits farmers",
        ])
    }

    #[test]
    fn test_bm25_empty_query_returns_corpus_order() {
        let idx = build_corpus();
        let results = bm25_search(&idx, "", 10);
        let ids: Vec<u32> = results.iter().map(|&(id, _)| id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert!(results.iter().all(|&(_, s)| s == 0.0));
    }

    #[test]
    fn test_bm25_empty_index() {
        let idx = InvertedIndex::build(std::iter::empty::<&str>());
        let results = bm25_search(&idx, "coastal", 10);
        assert!(results.is_empty());
    }

    #[test]
    fn test_bm25_finds_matching_docs_first() {
        let idx = build_corpus();
        let results = bm25_search(&idx, "wildfire", 10);
        assert_eq!(results[0].0, 2);
        assert!(results[0].1 > 0.0);
        assert!(results[1..].iter().all(|&(_, s)| s == 0.0));
    }

    #[test]
    fn test_bm25_ranking_order() {
        let idx = InvertedIndex::build([
            "storm storm storm",
            "storm warning",
            "calm weather",
            "dry",
            "heat",
            "cold",
        ]);
        let results = bm25_search(&idx, "storm", 10);
        assert_eq!(results[0].0, 0, "doc with higher TF should rank first");
        assert_eq!(results[1].0, 1);
    }

    #[test]
    fn test_bm25_unknown_term_scores_zero() {
        let idx = build_corpus();
        let scores = bm25_scores(&idx, &tokenize("nonexistent"));
        assert!(scores.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_bm25_n_truncation() {
        let idx = build_corpus();
        assert_eq!(bm25_search(&idx, "seas", 2).len(), 2);
        assert_eq!(bm25_search(&idx, "seas", 0).len(), 0);
        assert_eq!(bm25_search(&idx, "seas", 100).len(), 5);
    }

    #[test]
    fn test_bm25_ties_keep_insertion_order() {
        let idx = build_corpus();
        // docs 0 and 3 both contain "rising" and "seas" once and have the same
        // length, so they score equally and doc 0 stays first
        let results = bm25_search(&idx, "rising seas", 4);
        assert_eq!(results[0].0, 0);
        assert_eq!(results[1].0, 3);
        assert_eq!(results[0].1, results[1].1);
    }

    #[test]
    fn test_bm25_repeated_query_term_counts_twice() {
        let idx = build_corpus();
        let once = bm25_scores(&idx, &tokenize("wildfire"));
        let twice = bm25_scores(&idx, &tokenize("wildfire wildfire"));
        assert!((twice[2] - 2.0 * once[2]).abs() < 1e-12);
    }

    #[test]
    fn test_bm25_matches_okapi_formula() {
        let idx = build_corpus();
        let scores = bm25_scores(&idx, &tokenize("carbon"));
        let idf = idx.idf("carbon");
        let (k1, b) = (config::BM25_K1, config::BM25_B);
        let dl = 5.0;
        let avgdl = idx.average_doc_length();
        let expected = idf * (1.0 * (k1 + 1.0)) / (1.0 + k1 * (1.0 - b + b * dl / avgdl));
        assert!((scores[1] - expected).abs() < 1e-12);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn search_returns_prefix_of_stable_ranking(
                docs in proptest::collection::vec("[a-e ]{0,24}", 1..16),
                query in "[a-e ]{0,8}",
                n in 0usize..24,
            ) {
                let idx = InvertedIndex::build(docs.iter().map(String::as_str));
                let results = bm25_search(&idx, &query, n);
                prop_assert_eq!(results.len(), n.min(docs.len()));

                let mut seen = std::collections::HashSet::new();
                for &(id, _) in &results {
                    prop_assert!((id as usize) < docs.len());
                    prop_assert!(seen.insert(id));
                }
                for pair in results.windows(2) {
                    let ((a, sa), (b, sb)) = (pair[0], pair[1]);
                    prop_assert!(sa >= sb);
                    if sa == sb {
                        prop_assert!(a < b);
                    }
                }
            }
        }
    }
}
