//! In-memory BM25 index over chunk records.
//!
//! The index is built once per retrieval call and scored once per
//! query variant. Every document is scored, including documents with
//! no query term, so callers always see the full ranked list up to
//! `top_k`.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::core::search::tokenizer::{tokenize, StopWords};
use crate::core::types::ChunkRecord;

/// Term frequency saturation
pub const K1: f64 = 1.2;

/// Length normalization strength
pub const B: f64 = 0.75;

const EPSILON: f64 = 1e-6;

/// A chunk together with its tokens
#[derive(Debug, Clone)]
pub struct IndexedDoc {
    pub chunk: ChunkRecord,
    pub tokens: Vec<String>,
    term_freqs: HashMap<String, usize>,
}

impl IndexedDoc {
    fn new(chunk: ChunkRecord, stop_words: &StopWords) -> Self {
        let tokens = tokenize(&chunk.text, stop_words);
        let mut term_freqs = HashMap::new();
        for token in &tokens {
            *term_freqs.entry(token.clone()).or_insert(0) += 1;
        }
        Self {
            chunk,
            tokens,
            term_freqs,
        }
    }

    /// Occurrences of `term` in this document
    pub fn term_freq(&self, term: &str) -> usize {
        self.term_freqs.get(term).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// One scored document, borrowed from the index
#[derive(Debug, Clone, Copy)]
pub struct ScoredDoc<'a> {
    pub doc: &'a IndexedDoc,
    pub score: f64,
}

/// Lexical index: documents, document frequencies and average length
#[derive(Debug, Clone, Default)]
pub struct LexicalIndex {
    docs: Vec<IndexedDoc>,
    doc_freqs: HashMap<String, usize>,
    average_doc_length: f64,
}

impl LexicalIndex {
    /// Tokenize every chunk and collect corpus statistics.
    ///
    /// A term counts at most once per document towards its document
    /// frequency.
    pub fn build(chunks: Vec<ChunkRecord>, stop_words: &StopWords) -> Self {
        let docs: Vec<IndexedDoc> = chunks
            .into_iter()
            .map(|c| IndexedDoc::new(c, stop_words))
            .collect();

        let mut doc_freqs: HashMap<String, usize> = HashMap::new();
        let mut total_len = 0usize;

        for doc in &docs {
            total_len += doc.len();
            let unique: HashSet<&String> = doc.tokens.iter().collect();
            for term in unique {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let average_doc_length = if docs.is_empty() {
            0.0
        } else {
            total_len as f64 / docs.len() as f64
        };

        tracing::debug!(
            "Built lexical index: {} docs, {} terms, avg length {:.2}",
            docs.len(),
            doc_freqs.len(),
            average_doc_length
        );

        Self {
            docs,
            doc_freqs,
            average_doc_length,
        }
    }

    pub fn docs(&self) -> &[IndexedDoc] {
        &self.docs
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Number of documents containing `term`
    pub fn doc_freq(&self, term: &str) -> usize {
        self.doc_freqs.get(term).copied().unwrap_or(0)
    }

    /// Mean token count per document (0 for an empty index)
    pub fn average_doc_length(&self) -> f64 {
        self.average_doc_length
    }

    /// Inverse document frequency of `term`
    pub fn idf(&self, term: &str) -> f64 {
        let n = self.docs.len() as f64;
        let df = self.doc_freq(term) as f64;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// Score every document against `query` and return the best `top_k`.
    ///
    /// Repeated query terms contribute once per occurrence. The sort is
    /// stable, so equal scores keep document order.
    pub fn search(&self, query: &str, stop_words: &StopWords, top_k: usize) -> Vec<ScoredDoc<'_>> {
        let query_terms = tokenize(query, stop_words);

        let mut scored: Vec<ScoredDoc<'_>> = self
            .docs
            .iter()
            .map(|doc| ScoredDoc {
                doc,
                score: self.score_doc(doc, &query_terms),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);
        scored
    }

    fn score_doc(&self, doc: &IndexedDoc, query_terms: &[String]) -> f64 {
        // Guard against an index whose documents have no tokens at all
        let avg_len = if self.average_doc_length > 0.0 {
            self.average_doc_length
        } else {
            1.0
        };
        let length_ratio = doc.len() as f64 / avg_len;

        query_terms
            .iter()
            .map(|term| {
                let tf = doc.term_freq(term) as f64;
                if tf == 0.0 {
                    return 0.0;
                }
                let denom = tf + K1 * (1.0 - B + B * length_ratio);
                self.idf(term) * (tf * (K1 + 1.0)) / (denom + EPSILON)
            })
            .sum()
    }
}
