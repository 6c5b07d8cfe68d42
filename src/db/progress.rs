//! Progress and quiz-result operations.

use chrono::Utc;
use sqlx::Row;

use crate::errors::AppError;
use crate::models::{Progress, QuizResult, SubmitQuizRequest};
use crate::progress::ClampedProgress;

use super::Repository;

const PROGRESS_COLUMNS: &str = "id, student_id, course_id, current_slide, completed_slides, \
     total_study_time, is_completed, completed_at, enrolled_at, updated_at";

/// One (progress, course) join row used for achievement stats.
#[derive(Debug, Clone)]
pub struct StudentCourseRow {
    pub progress_id: String,
    pub is_completed: bool,
    pub total_study_time: i64,
    pub estimated_time: i64,
    pub category: String,
}

impl Repository {
    /// Create the progress record that represents an enrollment.
    pub async fn create_progress(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> Result<Progress, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO progress (
                id, student_id, course_id, current_slide, completed_slides,
                total_study_time, is_completed, completed_at, enrolled_at, updated_at
            ) VALUES (?, ?, ?, 0, 0, 0, 0, NULL, ?, ?)"#,
        )
        .bind(&id)
        .bind(student_id)
        .bind(course_id)
        .bind(&now)
        .bind(&now)
        .execute(self.pool())
        .await?;

        Ok(Progress {
            id,
            student_id: student_id.to_string(),
            course_id: course_id.to_string(),
            current_slide: 0,
            completed_slides: 0,
            total_study_time: 0,
            is_completed: false,
            completed_at: None,
            enrolled_at: now.clone(),
            updated_at: now,
        })
    }

    /// Get the progress record for a (student, course) pair.
    pub async fn get_progress(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> Result<Option<Progress>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM progress WHERE student_id = ? AND course_id = ?",
            PROGRESS_COLUMNS
        ))
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.as_ref().map(progress_from_row))
    }

    /// Persist already-clamped slide positions. Last write wins.
    pub async fn update_progress_slides(
        &self,
        student_id: &str,
        course_id: &str,
        clamped: ClampedProgress,
    ) -> Result<Progress, AppError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "UPDATE progress SET current_slide = ?, completed_slides = ?, updated_at = ? \
             WHERE student_id = ? AND course_id = ?",
        )
        .bind(clamped.current_slide)
        .bind(clamped.completed_slides)
        .bind(&now)
        .bind(student_id)
        .bind(course_id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Progress record not found".to_string()));
        }

        self.require_progress(student_id, course_id).await
    }

    /// Mark a course complete: all slides done, completion timestamp set.
    ///
    /// Re-completion overwrites `completed_at` unconditionally; the slide
    /// counts are idempotent.
    pub async fn mark_complete(
        &self,
        student_id: &str,
        course_id: &str,
        total_slides: usize,
    ) -> Result<Progress, AppError> {
        let now = Utc::now().to_rfc3339();
        let total = total_slides.max(1) as i64;

        let result = sqlx::query(
            "UPDATE progress SET current_slide = ?, completed_slides = ?, is_completed = 1, \
             completed_at = ?, updated_at = ? WHERE student_id = ? AND course_id = ?",
        )
        .bind(total - 1)
        .bind(total)
        .bind(&now)
        .bind(&now)
        .bind(student_id)
        .bind(course_id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Progress record not found".to_string()));
        }

        self.require_progress(student_id, course_id).await
    }

    /// Atomically add study minutes to a progress record.
    pub async fn add_study_time(
        &self,
        student_id: &str,
        course_id: &str,
        minutes: i64,
    ) -> Result<Progress, AppError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "UPDATE progress SET total_study_time = total_study_time + ?, updated_at = ? \
             WHERE student_id = ? AND course_id = ?",
        )
        .bind(minutes)
        .bind(&now)
        .bind(student_id)
        .bind(course_id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Progress record not found".to_string()));
        }

        self.require_progress(student_id, course_id).await
    }

    /// Append one quiz result. The list is append-only.
    pub async fn append_quiz_result(
        &self,
        progress_id: &str,
        request: &SubmitQuizRequest,
    ) -> Result<QuizResult, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let answers_json = serde_json::to_string(&request.answers)?;

        sqlx::query(
            r#"INSERT INTO quiz_results (
                id, progress_id, quiz_id, score, percentage, answers, submitted_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(progress_id)
        .bind(&request.quiz_id)
        .bind(request.score)
        .bind(request.percentage)
        .bind(&answers_json)
        .bind(&now)
        .execute(self.pool())
        .await?;

        Ok(QuizResult {
            id,
            quiz_id: request.quiz_id.clone(),
            score: request.score,
            percentage: request.percentage,
            answers: request.answers.clone(),
            submitted_at: now,
        })
    }

    /// Load every (progress, course) row for a student plus each course's
    /// quiz percentages, for achievement stats aggregation.
    pub async fn student_course_rows(
        &self,
        student_id: &str,
    ) -> Result<Vec<(StudentCourseRow, Vec<f64>)>, AppError> {
        let rows = sqlx::query(
            r#"SELECT p.id AS progress_id, p.is_completed, p.total_study_time,
                      c.estimated_time, c.category
               FROM progress p JOIN courses c ON c.id = p.course_id
               WHERE p.student_id = ?"#,
        )
        .bind(student_id)
        .fetch_all(self.pool())
        .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let is_completed: i32 = row.get("is_completed");
            let record = StudentCourseRow {
                progress_id: row.get("progress_id"),
                is_completed: is_completed != 0,
                total_study_time: row.get("total_study_time"),
                estimated_time: row.get("estimated_time"),
                category: row.get("category"),
            };

            let percentage_rows =
                sqlx::query("SELECT percentage FROM quiz_results WHERE progress_id = ?")
                    .bind(&record.progress_id)
                    .fetch_all(self.pool())
                    .await?;
            let percentages = percentage_rows
                .iter()
                .map(|r| r.get::<f64, _>("percentage"))
                .collect();

            result.push((record, percentages));
        }

        Ok(result)
    }

    async fn require_progress(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> Result<Progress, AppError> {
        self.get_progress(student_id, course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Progress record not found".to_string()))
    }
}

// Helper functions for row conversion

fn progress_from_row(row: &sqlx::sqlite::SqliteRow) -> Progress {
    let is_completed: i32 = row.get("is_completed");
    Progress {
        id: row.get("id"),
        student_id: row.get("student_id"),
        course_id: row.get("course_id"),
        current_slide: row.get("current_slide"),
        completed_slides: row.get("completed_slides"),
        total_study_time: row.get("total_study_time"),
        is_completed: is_completed != 0,
        completed_at: row.get("completed_at"),
        enrolled_at: row.get("enrolled_at"),
        updated_at: row.get("updated_at"),
    }
}
