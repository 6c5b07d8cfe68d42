//! Progress API endpoints: slide position updates, completion, study time,
//! and quiz submission.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use super::{evaluate_and_store, success, ApiResult};
use crate::auth::AuthUser;
use crate::content::total_slides;
use crate::errors::AppError;
use crate::models::{
    Achievement, Course, Progress, QuizResult, StudyTimeRequest, SubmitQuizRequest,
    UpdateProgressRequest,
};
use crate::progress::{clamp_progress, progress_percentage};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub progress: Progress,
    pub progress_percentage: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyTimeResponse {
    pub progress: Progress,
    pub new_achievements: Vec<Achievement>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultResponse {
    pub result: QuizResult,
}

async fn require_course(state: &AppState, id: &str) -> Result<Course, AppError> {
    state
        .repo
        .get_course(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Course {} not found", id)))
}

/// PUT /api/courses/{id}/progress - Update slide position.
///
/// Client-supplied values are clamped against the course's slide count before
/// persisting; stored values never leave the valid range.
pub async fn update_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateProgressRequest>,
) -> ApiResult<ProgressResponse> {
    let course = require_course(&state, &id).await?;
    let total = total_slides(&course.content_tree);

    let clamped = clamp_progress(request.current_slide, request.completed_slides, total);
    let progress = state
        .repo
        .update_progress_slides(&user.id, &id, clamped)
        .await?;

    let pct = progress_percentage(progress.completed_slides, total);
    success(ProgressResponse {
        progress,
        progress_percentage: pct,
    })
}

/// PUT /api/courses/{id}/complete - Mark the course complete.
///
/// Idempotent with respect to the slide counts; `completedAt` is overwritten
/// on re-completion.
pub async fn mark_complete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<ProgressResponse> {
    let course = require_course(&state, &id).await?;
    let total = total_slides(&course.content_tree);

    let progress = state.repo.mark_complete(&user.id, &id, total).await?;

    let pct = progress_percentage(progress.completed_slides, total);
    success(ProgressResponse {
        progress,
        progress_percentage: pct,
    })
}

/// PUT /api/courses/{id}/study-time - Add study minutes.
///
/// Triggers synchronous achievement re-evaluation; newly unlocked
/// achievements ride back on the response.
pub async fn record_study_time(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<StudyTimeRequest>,
) -> ApiResult<StudyTimeResponse> {
    if request.minutes <= 0 {
        return Err(AppError::Validation(
            "minutes must be a positive number".to_string(),
        ));
    }

    require_course(&state, &id).await?;
    let progress = state
        .repo
        .add_study_time(&user.id, &id, request.minutes)
        .await?;

    let (_, new_achievements) = evaluate_and_store(&state, &user.id).await?;

    success(StudyTimeResponse {
        progress,
        new_achievements,
    })
}

/// POST /api/courses/{id}/quiz-result - Append a quiz result.
///
/// Does not advance the slide position; the client advances separately.
pub async fn submit_quiz_result(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<SubmitQuizRequest>,
) -> ApiResult<QuizResultResponse> {
    if request.quiz_id.trim().is_empty() {
        return Err(AppError::Validation("quizId is required".to_string()));
    }
    if !(0.0..=100.0).contains(&request.percentage) {
        return Err(AppError::Validation(
            "percentage must be between 0 and 100".to_string(),
        ));
    }

    require_course(&state, &id).await?;
    let progress = state
        .repo
        .get_progress(&user.id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Progress record not found".to_string()))?;

    let result = state.repo.append_quiz_result(&progress.id, &request).await?;
    success(QuizResultResponse { result })
}
