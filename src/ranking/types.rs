use super::error::{RankingError, RankingResult};

#[derive(Debug, Clone, PartialEq, Eq)]
/// One rankable item: an opaque caller identifier plus the text to compare.
pub struct CandidateItem {
    pub identifier: i64,
    pub text: String,
}

impl CandidateItem {
    pub fn new(identifier: i64, text: impl Into<String>) -> Self {
        Self {
            identifier,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
/// Validated ranking input: a query and at least one candidate.
///
/// Only constructible through [`RankRequest::new`], so holders can rely on the
/// candidate list being non-empty.
pub struct RankRequest {
    query: String,
    candidates: Vec<CandidateItem>,
}

impl RankRequest {
    /// Fails with [`RankingError::EmptyCandidates`] when `candidates` is empty.
    pub fn new(query: impl Into<String>, candidates: Vec<CandidateItem>) -> RankingResult<Self> {
        if candidates.is_empty() {
            return Err(RankingError::EmptyCandidates);
        }

        Ok(Self {
            query: query.into(),
            candidates,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn candidates(&self) -> &[CandidateItem] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The batch handed to the embedder: query first, then candidate texts in order.
    pub fn texts(&self) -> Vec<&str> {
        std::iter::once(self.query.as_str())
            .chain(self.candidates.iter().map(|c| c.text.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// A candidate's similarity to the query.
pub struct RankedCandidate {
    pub identifier: i64,
    /// Position in the request's candidate list.
    pub index: usize,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq)]
/// Top-K result of one ranking call, best first.
pub struct Ranking {
    top: Vec<RankedCandidate>,
    candidate_count: usize,
}

impl Ranking {
    pub(crate) fn new(top: Vec<RankedCandidate>, candidate_count: usize) -> Self {
        Self {
            top,
            candidate_count,
        }
    }

    pub fn top(&self) -> &[RankedCandidate] {
        &self.top
    }

    /// Identifiers in descending score order.
    pub fn identifiers(&self) -> Vec<i64> {
        self.top.iter().map(|c| c.identifier).collect()
    }

    /// Number of candidates that were scored.
    pub fn candidate_count(&self) -> usize {
        self.candidate_count
    }

    pub fn best(&self) -> Option<&RankedCandidate> {
        self.top.first()
    }
}
