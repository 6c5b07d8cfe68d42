//! Course catalog search endpoint.

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::models::CourseSummary;
use crate::AppState;

const DEFAULT_SEARCH_LIMIT: usize = 20;
const MAX_SEARCH_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub courses: Vec<CourseSummary>,
    pub total: usize,
}

/// GET /api/courses/search - Full-text search over the public catalog.
///
/// An empty query returns an empty result set rather than an error.
pub async fn search_courses(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<SearchResponse> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .min(MAX_SEARCH_LIMIT);
    let offset = query.offset.unwrap_or(0);

    let hits = state.search.search(&query.q, limit, offset)?;

    // Hits reference courses by id; hydrate summaries from the database and
    // drop any hit whose course was deleted since the last index commit.
    let mut courses = Vec::with_capacity(hits.len());
    for hit in &hits {
        if let Some(summary) = state.repo.get_course_summary(&hit.course_id).await? {
            courses.push(summary);
        }
    }

    let total = courses.len();
    success(SearchResponse { courses, total })
}
