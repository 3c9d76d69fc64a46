//! Wire formats for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::ranking::{CandidateItem, RankRequest, Ranking, RankingError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One book offered for ranking.
pub struct FeatureItem {
    /// JSON integer only; a quoted number is a schema error.
    pub book_isbn: i64,
    pub book_summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Body of `POST /recommend`.
pub struct RecommendRequest {
    /// Sentence the recommendations should resemble.
    pub target: String,
    /// Candidate books.
    pub feature: Vec<FeatureItem>,
}

impl RecommendRequest {
    /// Validates the payload into a ranking request (fails on an empty feature list).
    pub fn into_rank_request(self) -> Result<RankRequest, RankingError> {
        let candidates = self
            .feature
            .into_iter()
            .map(|item| CandidateItem::new(item.book_isbn, item.book_summary))
            .collect();

        RankRequest::new(self.target, candidates)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Body returned by `POST /recommend`.
pub struct RecommendResponse {
    pub recommended_book_isbns: Vec<i64>,
}

impl From<&Ranking> for RecommendResponse {
    fn from(ranking: &Ranking) -> Self {
        Self {
            recommended_book_isbns: ranking.identifiers(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
