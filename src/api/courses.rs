//! Course API endpoints: creation (manual and PDF upload), listing,
//! enrollment, content access, and lifecycle operations.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::{success, ApiResult};
use crate::auth::{constant_time_compare, AuthUser};
use crate::content::flatten_slides;
use crate::errors::AppError;
use crate::models::{
    ContentNode, Course, CourseSummary, CreateCourseRequest, EnrollRequest, JoinPrivateRequest,
    Progress, Slide, UpdateCourseRequest, UploadCourseMeta, DEFAULT_ESTIMATED_TIME,
    SUPPORTED_LANGUAGES,
};
use crate::progress::progress_percentage;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub course: Course,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListResponse {
    pub courses: Vec<CourseSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
    #[serde(flatten)]
    pub course: CourseSummary,
    pub progress: Progress,
    pub progress_percentage: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledListResponse {
    pub courses: Vec<EnrolledCourse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollResponse {
    pub progress: Progress,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseContentResponse {
    pub course: Course,
    pub slides: Vec<Slide>,
    pub total_slides: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percentage: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub deleted: bool,
}

fn validate_language(language: &str) -> Result<(), AppError> {
    if !SUPPORTED_LANGUAGES.contains(&language) {
        return Err(AppError::Validation(format!(
            "Unsupported language: {}",
            language
        )));
    }
    Ok(())
}

fn validate_private_fields(
    is_private: bool,
    course_code: &Option<String>,
    password: &Option<String>,
) -> Result<(), AppError> {
    if is_private {
        if course_code.as_deref().map(str::trim).unwrap_or("").is_empty() {
            return Err(AppError::Validation(
                "Private courses require a course code".to_string(),
            ));
        }
        if password.as_deref().unwrap_or("").is_empty() {
            return Err(AppError::Validation(
                "Private courses require a password".to_string(),
            ));
        }
    }
    Ok(())
}

fn build_course(
    instructor_id: &str,
    meta: UploadCourseMeta,
    content_tree: Vec<ContentNode>,
) -> Course {
    let now = Utc::now().to_rfc3339();
    Course {
        id: Uuid::new_v4().to_string(),
        title: meta.title,
        description: meta.description,
        category: meta.category,
        language: meta.language,
        estimated_time: meta.estimated_time.unwrap_or(DEFAULT_ESTIMATED_TIME),
        instructor_id: instructor_id.to_string(),
        is_private: meta.is_private,
        course_code: if meta.is_private { meta.course_code } else { None },
        password: if meta.is_private { meta.password } else { None },
        is_published: false,
        content_tree,
        created_at: now.clone(),
        updated_at: now,
    }
}

async fn persist_and_index(state: &AppState, course: &Course) -> Result<(), AppError> {
    state.repo.create_course(course).await?;
    if let Err(e) = state.search.index_course(course).await {
        tracing::warn!("Failed to index course: {}", e);
    }
    Ok(())
}

fn require_owner(course: &Course, user: &AuthUser) -> Result<(), AppError> {
    user.require_teacher()?;
    if course.instructor_id != user.id {
        return Err(AppError::Forbidden(
            "Only the owning instructor can modify this course".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/courses - Create a course with a manually supplied content tree.
pub async fn create_course(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateCourseRequest>,
) -> ApiResult<CourseResponse> {
    user.require_teacher()?;

    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if request.category.trim().is_empty() {
        return Err(AppError::Validation("Category is required".to_string()));
    }
    validate_language(&request.language)?;
    validate_private_fields(request.is_private, &request.course_code, &request.password)?;

    let meta = UploadCourseMeta {
        title: request.title,
        description: request.description,
        category: request.category,
        language: request.language,
        estimated_time: request.estimated_time,
        is_private: request.is_private,
        course_code: request.course_code,
        password: request.password,
    };
    let course = build_course(&user.id, meta, request.content_tree);

    persist_and_index(&state, &course).await?;
    success(CourseResponse { course })
}

/// POST /api/courses/create - Create a course from an uploaded PDF.
///
/// The extracted text goes through the external AI generator; generation
/// failure degrades to the deterministic local paginator and never fails the
/// request. An unreadable or empty PDF is a validation error.
pub async fn upload_course(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<CourseResponse> {
    user.require_teacher()?;

    let mut meta = UploadCourseMeta::default();
    let mut pdf_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "pdf" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read PDF: {}", e)))?;
                pdf_bytes = Some(bytes.to_vec());
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed field {}: {}", name, e)))?;
                match name.as_str() {
                    "title" => meta.title = value,
                    "description" => meta.description = Some(value),
                    "category" => meta.category = value,
                    "language" => meta.language = value,
                    "estimatedTime" => {
                        let minutes = value.parse::<i64>().map_err(|_| {
                            AppError::Validation("estimatedTime must be a number".to_string())
                        })?;
                        meta.estimated_time = Some(minutes);
                    }
                    "isPrivate" => meta.is_private = value == "true",
                    "courseCode" => meta.course_code = Some(value),
                    "password" => meta.password = Some(value),
                    _ => {}
                }
            }
        }
    }

    if meta.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if meta.category.trim().is_empty() {
        return Err(AppError::Validation("Category is required".to_string()));
    }
    validate_language(&meta.language)?;
    validate_private_fields(meta.is_private, &meta.course_code, &meta.password)?;

    let pdf_bytes =
        pdf_bytes.ok_or_else(|| AppError::Validation("PDF file is required".to_string()))?;
    let text = crate::ai::extract_pdf_text(&pdf_bytes)?;

    let estimated = meta.estimated_time.unwrap_or(DEFAULT_ESTIMATED_TIME);
    let tree = state
        .ai
        .generate_or_fallback(&meta.title, &meta.category, &meta.language, estimated, &text)
        .await;

    let course = build_course(&user.id, meta, tree);
    persist_and_index(&state, &course).await?;
    success(CourseResponse { course })
}

/// GET /api/courses/public - List published public courses.
pub async fn list_public_courses(State(state): State<AppState>) -> ApiResult<CourseListResponse> {
    let courses = state.repo.list_public_courses().await?;
    success(CourseListResponse { courses })
}

/// GET /api/courses/mine - List the requesting teacher's courses.
pub async fn list_my_courses(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<CourseListResponse> {
    user.require_teacher()?;
    let courses = state.repo.list_courses_by_instructor(&user.id).await?;
    success(CourseListResponse { courses })
}

/// GET /api/courses/enrolled - List the requesting student's enrollments.
pub async fn list_enrolled_courses(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<EnrolledListResponse> {
    let summaries = state.repo.list_enrolled_courses(&user.id).await?;

    let mut courses = Vec::with_capacity(summaries.len());
    for summary in summaries {
        if let Some(progress) = state.repo.get_progress(&user.id, &summary.id).await? {
            let pct = progress_percentage(progress.completed_slides, summary.total_slides);
            courses.push(EnrolledCourse {
                course: summary,
                progress,
                progress_percentage: pct,
            });
        }
    }

    success(EnrolledListResponse { courses })
}

/// POST /api/courses/enroll - Enroll in a public published course.
pub async fn enroll(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<EnrollRequest>,
) -> ApiResult<EnrollResponse> {
    let course = state
        .repo
        .get_course(&request.course_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Course {} not found", request.course_id)))?;

    if course.is_private {
        return Err(AppError::Validation(
            "This course is private; join with its course code and password".to_string(),
        ));
    }
    if !course.is_published {
        return Err(AppError::Forbidden("Course is not published".to_string()));
    }
    if state.repo.get_progress(&user.id, &course.id).await?.is_some() {
        return Err(AppError::Validation(
            "Already enrolled in this course".to_string(),
        ));
    }

    let progress = state.repo.create_progress(&user.id, &course.id).await?;
    success(EnrollResponse { progress })
}

/// POST /api/courses/join-private - Join a private course by code and password.
pub async fn join_private(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<JoinPrivateRequest>,
) -> ApiResult<EnrollResponse> {
    let course = state
        .repo
        .get_course_by_code(&request.course_code)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No course with code {}", request.course_code))
        })?;

    // Wrong password is rejected before any enrollment side effect
    let expected = course.password.as_deref().unwrap_or("");
    if !constant_time_compare(&request.password, expected) {
        return Err(AppError::Unauthorized("Invalid course password".to_string()));
    }

    if state.repo.get_progress(&user.id, &course.id).await?.is_some() {
        return Err(AppError::Validation(
            "Already enrolled in this course".to_string(),
        ));
    }

    let progress = state.repo.create_progress(&user.id, &course.id).await?;
    success(EnrollResponse { progress })
}

/// GET /api/courses/{id}/content - Fetch course content with flattened slides.
///
/// Role-gated: the owning teacher always sees the course (published or not);
/// a student must hold a progress record for it.
pub async fn get_content(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<CourseContentResponse> {
    let course = state
        .repo
        .get_course(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Course {} not found", id)))?;

    let is_owner = course.instructor_id == user.id;
    let progress = state.repo.get_progress(&user.id, &id).await?;

    if !is_owner && progress.is_none() {
        return Err(AppError::Forbidden(
            "Enroll in this course to view its content".to_string(),
        ));
    }

    let slides = flatten_slides(&course.content_tree);
    let total = slides.len();
    let pct = progress
        .as_ref()
        .map(|p| progress_percentage(p.completed_slides, total));

    success(CourseContentResponse {
        course,
        slides,
        total_slides: total,
        progress,
        progress_percentage: pct,
    })
}

/// PUT /api/courses/{id} - Update a course (owning teacher only).
pub async fn update_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateCourseRequest>,
) -> ApiResult<CourseResponse> {
    let course = state
        .repo
        .get_course(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Course {} not found", id)))?;
    require_owner(&course, &user)?;

    if let Some(language) = &request.language {
        validate_language(language)?;
    }

    let updated = state.repo.update_course(&id, &request).await?;

    if let Err(e) = state.search.index_course(&updated).await {
        tracing::warn!("Failed to re-index course: {}", e);
    }

    success(CourseResponse { course: updated })
}

/// PUT /api/courses/{id}/publish - Toggle the published flag.
pub async fn toggle_publish(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<CourseResponse> {
    let course = state
        .repo
        .get_course(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Course {} not found", id)))?;
    require_owner(&course, &user)?;

    let updated = state.repo.set_published(&id, !course.is_published).await?;

    if let Err(e) = state.search.index_course(&updated).await {
        tracing::warn!("Failed to re-index course: {}", e);
    }

    success(CourseResponse { course: updated })
}

/// DELETE /api/courses/{id} - Delete a course (owning teacher only).
pub async fn delete_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<DeleteResponse> {
    let course = state
        .repo
        .get_course(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Course {} not found", id)))?;
    require_owner(&course, &user)?;

    state.repo.delete_course(&id).await?;

    if let Err(e) = state.search.remove_course(&id).await {
        tracing::warn!("Failed to remove course from index: {}", e);
    }

    success(DeleteResponse { deleted: true })
}
