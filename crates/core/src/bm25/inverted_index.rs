//! Inverted index for BM25 full-text search.
//!
//! Maps terms to postings lists (document position + term frequency). Documents
//! are identified by their u32 position in corpus insertion order. The index is
//! built once over the whole corpus and is read-only afterwards, so IDF values
//! are computed up front by [`InvertedIndex::build`].

use crate::bm25::tokenizer::tokenize;
use crate::config;
use std::collections::HashMap;

/// A single entry in a term's postings list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// Document position in corpus insertion order.
    pub doc_id: u32,
    /// Number of times the term appears in this document.
    pub term_frequency: u32,
}

/// Inverted index mapping terms to postings lists.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    /// term → list of postings, in ascending `doc_id` order
    pub index: HashMap<String, Vec<Posting>>,
    /// doc_id → document length (number of tokens)
    pub doc_lengths: Vec<u32>,
    /// Total number of documents indexed
    pub doc_count: u32,
    /// Sum of all document lengths (for average calculation)
    pub total_doc_length: u64,
    /// term → inverse document frequency, filled by `finalize`
    pub idf: HashMap<String, f64>,
}

impl InvertedIndex {
    /// Creates a new empty inverted index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index over `texts`, assigning doc ids in iteration order.
    pub fn build<'a, I>(texts: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut idx = Self::new();
        for text in texts {
            idx.add_document(text);
        }
        idx.finalize();
        idx
    }

    /// Index a document's text at the next doc id. Returns that id.
    ///
    /// Call [`finalize`](Self::finalize) after the last document.
    pub fn add_document(&mut self, text: &str) -> u32 {
        let internal_id = self.doc_count;
        let tokens = tokenize(text);
        let doc_len = tokens.len() as u32;

        self.doc_lengths.push(doc_len);
        self.doc_count += 1;
        self.total_doc_length += doc_len as u64;

        // Count term frequencies for this doc
        let mut tf_map: HashMap<&str, u32> = HashMap::new();
        for token in tokens.iter() {
            *tf_map.entry(token).or_insert(0) += 1;
        }

        for (term, tf) in tf_map {
            self.index
                .entry(term.to_string())
                .or_default()
                .push(Posting {
                    doc_id: internal_id,
                    term_frequency: tf,
                });
        }
        internal_id
    }

    /// Compute IDF for every term.
    ///
    /// `idf = ln((N - df + 0.5) / (df + 0.5))`. Terms present in more than half
    /// of the corpus would get a negative weight; they are floored to
    /// `BM25_EPSILON * average_idf` instead.
    pub fn finalize(&mut self) {
        self.idf.clear();
        if self.index.is_empty() {
            return;
        }
        let n = self.doc_count as f64;
        let mut idf_sum = 0.0;
        let mut negative: Vec<String> = Vec::new();

        for (term, postings) in &self.index {
            let df = postings.len() as f64;
            let idf = (n - df + 0.5).ln() - (df + 0.5).ln();
            idf_sum += idf;
            if idf < 0.0 {
                negative.push(term.clone());
            }
            self.idf.insert(term.clone(), idf);
        }

        let eps = config::BM25_EPSILON * idf_sum / self.index.len() as f64;
        for term in negative {
            self.idf.insert(term, eps);
        }
    }

    /// IDF of `term`; zero for terms absent from the corpus.
    pub fn idf(&self, term: &str) -> f64 {
        self.idf.get(term).copied().unwrap_or(0.0)
    }

    /// Number of distinct terms.
    pub fn term_count(&self) -> usize {
        self.index.len()
    }

    /// Returns the average document length across all indexed documents.
    pub fn average_doc_length(&self) -> f64 {
        if self.doc_count == 0 {
            return 0.0;
        }
        self.total_doc_length as f64 / self.doc_count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_document_updates_index() {
        let idx = InvertedIndex::build(["the quick brown fox"]);
        assert_eq!(idx.doc_count, 1);
        assert!(idx.index.contains_key("quick"));
        assert!(idx.index.contains_key("brown"));
        assert!(idx.index.contains_key("fox"));
        // no stop word removal
        assert!(idx.index.contains_key("the"));
    }

    #[test]
    fn test_term_frequency() {
        let idx = InvertedIndex::build(["hello hello hello world"]);
        let postings = idx.index.get("hello").unwrap();
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].term_frequency, 3);
    }

    #[test]
    fn test_multiple_documents() {
        let idx =
            InvertedIndex::build(["rust programming language", "python programming language"]);
        assert_eq!(idx.doc_count, 2);
        let postings = idx.index.get("programming").unwrap();
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].doc_id, 0);
        assert_eq!(postings[1].doc_id, 1);
    }

    #[test]
    fn test_doc_ids_follow_insertion_order() {
        let mut idx = InvertedIndex::new();
        assert_eq!(idx.add_document("first"), 0);
        assert_eq!(idx.add_document(""), 1);
        assert_eq!(idx.add_document("third"), 2);
        assert_eq!(idx.doc_lengths, vec![1, 0, 1]);
    }

    #[test]
    fn test_average_doc_length() {
        let mut idx = InvertedIndex::new();
        assert_eq!(idx.average_doc_length(), 0.0);
        idx.add_document("one two three");
        idx.add_document("four five six seven eight");
        assert_eq!(idx.average_doc_length(), 4.0);
    }

    #[test]
    fn test_idf_rare_term_positive() {
        let idx = InvertedIndex::build(["flood warning", "drought report", "heat record"]);
        // N=3, df=1: ln(2.5 / 1.5)
        let expected = (2.5f64 / 1.5).ln();
        assert!((idx.idf("flood") - expected).abs() < 1e-12);
    }

    #[test]
    fn test_idf_common_term_floored() {
        let idx = InvertedIndex::build(["climate flood", "climate drought", "climate heat"]);
        // "climate" has df=3 of N=3 → raw idf negative, floored to eps * average
        let raw_common = (0.5f64).ln() - (3.5f64).ln();
        let raw_rare = (2.5f64 / 1.5).ln();
        let average = (raw_common + 3.0 * raw_rare) / 4.0;
        let expected = config::BM25_EPSILON * average;
        assert!((idx.idf("climate") - expected).abs() < 1e-12);
    }

    #[test]
    fn test_idf_unknown_term_zero() {
        let idx = InvertedIndex::build(["flood warning"]);
        assert_eq!(idx.idf("tsunami"), 0.0);
    }

    #[test]
    fn test_empty_corpus() {
        let idx = InvertedIndex::build(std::iter::empty::<&str>());
        assert_eq!(idx.doc_count, 0);
        assert_eq!(idx.term_count(), 0);
        assert!(idx.idf.is_empty());
    }
}
