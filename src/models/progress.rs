//! Per-student-per-course progress models.

use serde::{Deserialize, Serialize};

/// Progress record: one per (student, course) pair, created on enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    /// 0-indexed into the flattened topic list.
    pub current_slide: i64,
    pub completed_slides: i64,
    /// Accumulated study time in minutes.
    pub total_study_time: i64,
    pub is_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    pub enrolled_at: String,
    pub updated_at: String,
}

/// One submitted quiz attempt; the list is append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: String,
    pub quiz_id: String,
    pub score: f64,
    pub percentage: f64,
    pub answers: serde_json::Value,
    pub submitted_at: String,
}

/// Request body for `PUT /api/courses/{id}/progress`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    pub current_slide: i64,
    pub completed_slides: i64,
}

/// Request body for `PUT /api/courses/{id}/study-time`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyTimeRequest {
    pub minutes: i64,
}

/// Request body for `POST /api/courses/{id}/quiz-result`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    pub quiz_id: String,
    pub score: f64,
    pub percentage: f64,
    #[serde(default)]
    pub answers: serde_json::Value,
}
