//! Process-wide BM25 index over the whole corpus.

use crate::bm25::scorer::{bm25_scores, rank_scores};
use crate::bm25::{tokenize, InvertedIndex, Tokens};
use crate::search::types::CandidateRanking;
use crate::storage::CorpusSource;

/// Read-only lexical index, built once at startup and shared across queries.
#[derive(Debug, Default)]
pub struct LexicalIndex {
    index: InvertedIndex,
    /// Document ids by BM25 doc id (corpus insertion order).
    doc_ids: Vec<String>,
}

impl LexicalIndex {
    /// Tokenizes and indexes every document of `corpus`.
    pub fn build(corpus: &dyn CorpusSource) -> Self {
        let documents = corpus.documents();
        let mut index = InvertedIndex::new();
        let mut doc_ids = Vec::with_capacity(documents.len());
        for doc in &documents {
            index.add_document(&doc.text);
            doc_ids.push(doc.id.clone());
        }
        index.finalize();

        tracing::info!(
            documents = doc_ids.len(),
            terms = index.term_count(),
            avgdl = index.average_doc_length(),
            "Lexical index built"
        );
        Self { index, doc_ids }
    }

    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }

    /// BM25 score of every document, in corpus order.
    pub fn score(&self, query_tokens: &Tokens) -> Vec<f64> {
        bm25_scores(&self.index, query_tokens)
    }

    /// Top `n` document ids by descending BM25 score, ranked from 1.
    ///
    /// Every document is ranked, so zero-score documents fill the tail in
    /// corpus order when fewer than `n` documents match.
    pub fn search(&self, query: &str, n: usize) -> CandidateRanking {
        let scores = self.score(&tokenize(query));
        CandidateRanking::from_ordered_ids(
            rank_scores(&scores, n)
                .into_iter()
                .map(|(doc_id, _)| self.doc_ids[doc_id as usize].as_str()),
        )
    }
}
