//! Course model and request/response DTOs.

use serde::{Deserialize, Serialize};

use super::ContentNode;

/// Default estimated completion time in minutes when a course omits one.
pub const DEFAULT_ESTIMATED_TIME: i64 = 60;

/// Languages a course may be authored in.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "english", "hindi", "tamil", "telugu", "bengali", "marathi", "kannada",
];

/// A course owned by a teacher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub language: String,
    /// Estimated completion time in minutes.
    pub estimated_time: i64,
    pub instructor_id: String,
    pub is_private: bool,
    /// Present iff the course is private.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    /// Present iff the course is private. Never serialized to clients.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    pub is_published: bool,
    pub content_tree: Vec<ContentNode>,
    pub created_at: String,
    pub updated_at: String,
}

/// Course listing entry without the content tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub language: String,
    pub estimated_time: i64,
    pub instructor_id: String,
    pub is_private: bool,
    pub is_published: bool,
    pub total_slides: usize,
    pub enrolled_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for creating a course with a manually supplied content tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub language: String,
    #[serde(default)]
    pub estimated_time: Option<i64>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub content_tree: Vec<ContentNode>,
}

/// Metadata fields accompanying a PDF upload. The content tree comes from the
/// AI generator (or the local fallback), never from the client.
#[derive(Debug, Clone, Default)]
pub struct UploadCourseMeta {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub language: String,
    pub estimated_time: Option<i64>,
    pub is_private: bool,
    pub course_code: Option<String>,
    pub password: Option<String>,
}

/// Request body for updating an existing course.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub estimated_time: Option<i64>,
    #[serde(default)]
    pub content_tree: Option<Vec<ContentNode>>,
}

/// Request body for enrolling in a public course.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub course_id: String,
}

/// Request body for joining a private course by code and password.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPrivateRequest {
    pub course_code: String,
    pub password: String,
}
