//! Query orchestration: dispatch, retrieve, fuse, hydrate, filter and limit.
//!
//! A query moves through `Dispatch → Retrieve → Fuse → Hydrate → Filter/Limit`.
//! Retrieval produces a [`RetrievalOutcome`] whose variant depends on the mode.
//! Everything downstream consumes it through the single match in `ranked_hits`.
//!
//! The candidate pool is larger than `limit` because sentiment filtering runs
//! after retrieval. Results are collected lazily in ranked order and collection
//! stops at `limit`, so a heavily filtered query can return fewer than `limit`
//! results even when matching documents exist beyond the pool.

use crate::config::{self, PoolSizing};
use crate::document::Document;
use crate::embedding::Embedder;
use crate::error::RetrievalError;
use crate::search::hybrid::{rrf_merge, FusedScores};
use crate::search::lexical::LexicalIndex;
use crate::search::semantic::SemanticRetriever;
use crate::search::sentiment::{sentiment_label, SentimentFilter, SentimentLabel};
use crate::search::types::{CandidateRanking, RetrievalMode};
use crate::storage::{CorpusSource, VectorStore};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// One search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub q: String,
    pub limit: usize,
    pub mode: RetrievalMode,
    pub sentiment_filter: SentimentFilter,
}

impl SearchQuery {
    /// Query with the default limit, hybrid mode and no sentiment filter.
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            limit: config::DEFAULT_LIMIT,
            mode: RetrievalMode::default(),
            sentiment_filter: SentimentFilter::default(),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_mode(mut self, mode: RetrievalMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_sentiment_filter(mut self, filter: SentimentFilter) -> Self {
        self.sentiment_filter = filter;
        self
    }
}

/// What the retrieval stage produced, by mode.
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalOutcome {
    Lexical(CandidateRanking),
    Semantic(CandidateRanking),
    Hybrid {
        fused: FusedScores,
        bm25: CandidateRanking,
        vector: CandidateRanking,
    },
}

impl RetrievalOutcome {
    /// True when no strategy returned a candidate.
    pub fn is_empty(&self) -> bool {
        match self {
            RetrievalOutcome::Lexical(ranking) | RetrievalOutcome::Semantic(ranking) => {
                ranking.is_empty()
            }
            RetrievalOutcome::Hybrid { fused, .. } => fused.is_empty(),
        }
    }
}

/// Per-result provenance. Serializes as a flat object whose keys depend on
/// the mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScoreDetail {
    Hybrid {
        rrf_score: f64,
        bm25_rank: Option<usize>,
        vector_rank: Option<usize>,
    },
    Lexical {
        bm25_rank: usize,
    },
    Semantic {
        vector_rank: usize,
    },
}

/// Headline score of a result: the rounded RRF score in hybrid mode, the
/// single strategy's rank otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DisplayScore {
    Fused(f64),
    Rank(usize),
}

/// A hydrated, labelled result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultItem {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub content: String,
    pub score: DisplayScore,
    pub score_detail: ScoreDetail,
    pub sentiment: f64,
    pub sentiment_label: SentimentLabel,
}

/// Response payload of one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    pub mode: RetrievalMode,
    pub total_results: usize,
    pub results: Vec<ResultItem>,
}

impl SearchOutcome {
    fn empty(query: &SearchQuery) -> Self {
        Self {
            query: query.q.clone(),
            mode: query.mode,
            total_results: 0,
            results: Vec::new(),
        }
    }
}

/// A ranked id with its score detail, before hydration.
#[derive(Debug, Clone, PartialEq)]
struct RankedHit<'a> {
    id: &'a str,
    score: DisplayScore,
    detail: ScoreDetail,
}

/// Rounds a fused score for display.
pub fn round_score(score: f64) -> f64 {
    let scale = 10f64.powi(config::SCORE_DECIMALS);
    (score * scale).round() / scale
}

fn rank_lookup(ranking: &CandidateRanking) -> HashMap<&str, usize> {
    ranking.iter().map(|c| (c.id.as_str(), c.rank)).collect()
}

/// Flattens a retrieval outcome into working order with per-id detail.
fn ranked_hits(outcome: &RetrievalOutcome) -> Vec<RankedHit<'_>> {
    match outcome {
        RetrievalOutcome::Lexical(ranking) => ranking
            .iter()
            .map(|c| RankedHit {
                id: &c.id,
                score: DisplayScore::Rank(c.rank),
                detail: ScoreDetail::Lexical { bm25_rank: c.rank },
            })
            .collect(),
        RetrievalOutcome::Semantic(ranking) => ranking
            .iter()
            .map(|c| RankedHit {
                id: &c.id,
                score: DisplayScore::Rank(c.rank),
                detail: ScoreDetail::Semantic { vector_rank: c.rank },
            })
            .collect(),
        RetrievalOutcome::Hybrid {
            fused,
            bm25,
            vector,
        } => {
            let bm25_ranks = rank_lookup(bm25);
            let vector_ranks = rank_lookup(vector);
            fused
                .iter()
                .map(|entry| {
                    let rrf_score = round_score(entry.score);
                    RankedHit {
                        id: &entry.id,
                        score: DisplayScore::Fused(rrf_score),
                        detail: ScoreDetail::Hybrid {
                            rrf_score,
                            bm25_rank: bm25_ranks.get(entry.id.as_str()).copied(),
                            vector_rank: vector_ranks.get(entry.id.as_str()).copied(),
                        },
                    }
                })
                .collect()
        }
    }
}

fn result_item(hit: RankedHit<'_>, doc: &Document) -> ResultItem {
    let sentiment = doc.sentiment();
    ResultItem {
        id: hit.id.to_string(),
        title: doc.title().to_string(),
        url: doc.url().map(str::to_string),
        content: doc.text.clone(),
        score: hit.score,
        score_detail: hit.detail,
        sentiment,
        sentiment_label: sentiment_label(sentiment),
    }
}

/// Hybrid retrieval engine.
///
/// Holds the read-only lexical index and handles to the external collaborators.
/// Cloning is cheap and every query runs on request-local state only, so one
/// engine can serve any number of concurrent queries.
#[derive(Clone)]
pub struct SearchEngine {
    lexical: Arc<LexicalIndex>,
    semantic: SemanticRetriever,
    store: Arc<dyn VectorStore>,
    pool: PoolSizing,
}

impl SearchEngine {
    pub fn new(
        lexical: Arc<LexicalIndex>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            lexical,
            semantic: SemanticRetriever::new(embedder, Arc::clone(&store)),
            store,
            pool: PoolSizing::default(),
        }
    }

    /// Builds the lexical index from `store`'s own corpus and binds the store
    /// for semantic retrieval and hydration.
    pub fn from_store<S>(store: Arc<S>, embedder: Arc<dyn Embedder>) -> Self
    where
        S: VectorStore + CorpusSource + 'static,
    {
        let lexical = Arc::new(LexicalIndex::build(store.as_ref()));
        Self::new(lexical, embedder, store)
    }

    pub fn with_pool_sizing(mut self, pool: PoolSizing) -> Self {
        self.pool = pool;
        self
    }

    pub fn pool_sizing(&self) -> PoolSizing {
        self.pool
    }

    /// Number of documents in the lexical index.
    pub fn document_count(&self) -> usize {
        self.lexical.len()
    }

    /// Runs the retrieval strategies `mode` selects with a pool of `pool` ids each.
    pub fn retrieve(
        &self,
        q: &str,
        mode: RetrievalMode,
        pool: usize,
    ) -> Result<RetrievalOutcome, RetrievalError> {
        Ok(match mode {
            RetrievalMode::Bm25 => RetrievalOutcome::Lexical(self.lexical.search(q, pool)),
            RetrievalMode::Vector => RetrievalOutcome::Semantic(self.semantic.search(q, pool)?),
            RetrievalMode::Hybrid => {
                let rankings = [self.lexical.search(q, pool), self.semantic.search(q, pool)?];
                let fused = rrf_merge(&rankings, config::RRF_K);
                let [bm25, vector] = rankings;
                RetrievalOutcome::Hybrid {
                    fused,
                    bm25,
                    vector,
                }
            }
        })
    }

    pub fn search(&self, query: &SearchQuery) -> Result<SearchOutcome, RetrievalError> {
        let pool = self.pool.pool_size(query.limit);
        let outcome = self.retrieve(&query.q, query.mode, pool)?;
        if outcome.is_empty() || query.limit == 0 {
            tracing::debug!(mode = query.mode.as_str(), pool, "No candidates retrieved");
            return Ok(SearchOutcome::empty(query));
        }

        let hits = ranked_hits(&outcome);
        let candidates = hits.len();

        // One batch fetch for the whole pool
        let ids: Vec<&str> = hits.iter().map(|h| h.id).collect();
        let fetched = self.store.get(&ids)?;
        let by_id: HashMap<&str, &Document> =
            fetched.iter().map(|doc| (doc.id.as_str(), doc.as_ref())).collect();
        if by_id.len() < candidates {
            tracing::debug!(
                stale = candidates - by_id.len(),
                "Dropping ranked ids missing from the store"
            );
        }

        let filter = query.sentiment_filter;
        let results: Vec<ResultItem> = hits
            .into_iter()
            .filter_map(|hit| by_id.get(hit.id).map(|doc| result_item(hit, doc)))
            .filter(|item| filter.matches(item.sentiment_label))
            .take(query.limit)
            .collect();

        tracing::info!(
            mode = query.mode.as_str(),
            sentiment_filter = filter.as_str(),
            limit = query.limit,
            pool,
            candidates,
            results = results.len(),
            "Search completed"
        );

        Ok(SearchOutcome {
            query: query.q.clone(),
            mode: query.mode,
            total_results: results.len(),
            results,
        })
    }
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("documents", &self.lexical.len())
            .field("pool", &self.pool)
            .finish()
    }
}
