//! Course CRUD operations.

use chrono::Utc;
use sqlx::Row;

use crate::content::total_slides;
use crate::errors::AppError;
use crate::models::{ContentNode, Course, CourseSummary, UpdateCourseRequest};

use super::Repository;

const COURSE_COLUMNS: &str = "id, title, description, category, language, estimated_time, \
     instructor_id, is_private, course_code, password, is_published, content_tree, \
     created_at, updated_at";

impl Repository {
    /// Persist a fully built course.
    pub async fn create_course(&self, course: &Course) -> Result<(), AppError> {
        let tree_json = serde_json::to_string(&course.content_tree)?;

        sqlx::query(
            r#"INSERT INTO courses (
                id, title, description, category, language, estimated_time,
                instructor_id, is_private, course_code, password, is_published,
                content_tree, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&course.id)
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.category)
        .bind(&course.language)
        .bind(course.estimated_time)
        .bind(&course.instructor_id)
        .bind(course.is_private as i32)
        .bind(&course.course_code)
        .bind(&course.password)
        .bind(course.is_published as i32)
        .bind(&tree_json)
        .bind(&course.created_at)
        .bind(&course.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Get a course by ID.
    pub async fn get_course(&self, id: &str) -> Result<Option<Course>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM courses WHERE id = ?",
            COURSE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.as_ref().map(course_from_row))
    }

    /// Get a private course by its join code.
    pub async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM courses WHERE course_code = ? AND is_private = 1",
            COURSE_COLUMNS
        ))
        .bind(code)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.as_ref().map(course_from_row))
    }

    /// List published, non-private courses as summaries.
    pub async fn list_public_courses(&self) -> Result<Vec<CourseSummary>, AppError> {
        let rows = sqlx::query(&format!(
            r#"SELECT {}, (SELECT COUNT(*) FROM progress WHERE course_id = courses.id)
                   AS enrolled_count
               FROM courses
               WHERE is_private = 0 AND is_published = 1
               ORDER BY title"#,
            COURSE_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        Ok(rows.iter().map(summary_from_row).collect())
    }

    /// List a teacher's own courses as summaries, published or not.
    pub async fn list_courses_by_instructor(
        &self,
        instructor_id: &str,
    ) -> Result<Vec<CourseSummary>, AppError> {
        let rows = sqlx::query(&format!(
            r#"SELECT {}, (SELECT COUNT(*) FROM progress WHERE course_id = courses.id)
                   AS enrolled_count
               FROM courses
               WHERE instructor_id = ?
               ORDER BY title"#,
            COURSE_COLUMNS
        ))
        .bind(instructor_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.iter().map(summary_from_row).collect())
    }

    /// List the courses a student is enrolled in.
    pub async fn list_enrolled_courses(
        &self,
        student_id: &str,
    ) -> Result<Vec<CourseSummary>, AppError> {
        let rows = sqlx::query(&format!(
            r#"SELECT {}, (SELECT COUNT(*) FROM progress WHERE course_id = courses.id)
                   AS enrolled_count
               FROM courses
               WHERE id IN (SELECT course_id FROM progress WHERE student_id = ?)
               ORDER BY title"#,
            COURSE_COLUMNS
        ))
        .bind(student_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.iter().map(summary_from_row).collect())
    }

    /// Get a single course as a listing summary.
    pub async fn get_course_summary(&self, id: &str) -> Result<Option<CourseSummary>, AppError> {
        let row = sqlx::query(&format!(
            r#"SELECT {}, (SELECT COUNT(*) FROM progress WHERE course_id = courses.id)
                   AS enrolled_count
               FROM courses WHERE id = ?"#,
            COURSE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.as_ref().map(summary_from_row))
    }

    /// List every course; used to rebuild the search index at startup.
    pub async fn list_all_courses(&self) -> Result<Vec<Course>, AppError> {
        let rows = sqlx::query(&format!("SELECT {} FROM courses", COURSE_COLUMNS))
            .fetch_all(self.pool())
            .await?;

        Ok(rows.iter().map(course_from_row).collect())
    }

    /// Update a course. Last write wins; there is deliberately no version
    /// token on course rows.
    pub async fn update_course(
        &self,
        id: &str,
        request: &UpdateCourseRequest,
    ) -> Result<Course, AppError> {
        let existing = self
            .get_course(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course {} not found", id)))?;

        let now = Utc::now().to_rfc3339();

        let title = request.title.as_ref().unwrap_or(&existing.title);
        let description = request.description.clone().or(existing.description.clone());
        let category = request.category.as_ref().unwrap_or(&existing.category);
        let language = request.language.as_ref().unwrap_or(&existing.language);
        let estimated_time = request.estimated_time.unwrap_or(existing.estimated_time);
        let content_tree = request
            .content_tree
            .clone()
            .unwrap_or(existing.content_tree.clone());
        let tree_json = serde_json::to_string(&content_tree)?;

        sqlx::query(
            r#"UPDATE courses SET
                title = ?, description = ?, category = ?, language = ?,
                estimated_time = ?, content_tree = ?, updated_at = ?
            WHERE id = ?"#,
        )
        .bind(title)
        .bind(&description)
        .bind(category)
        .bind(language)
        .bind(estimated_time)
        .bind(&tree_json)
        .bind(&now)
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(Course {
            id: id.to_string(),
            title: title.clone(),
            description,
            category: category.clone(),
            language: language.clone(),
            estimated_time,
            instructor_id: existing.instructor_id,
            is_private: existing.is_private,
            course_code: existing.course_code,
            password: existing.password,
            is_published: existing.is_published,
            content_tree,
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    /// Toggle a course's published flag independently of content edits.
    pub async fn set_published(&self, id: &str, published: bool) -> Result<Course, AppError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query("UPDATE courses SET is_published = ?, updated_at = ? WHERE id = ?")
            .bind(published as i32)
            .bind(&now)
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Course {} not found", id)));
        }

        self.get_course(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course {} not found", id)))
    }

    /// Delete a course along with its progress and quiz-result rows.
    pub async fn delete_course(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            "DELETE FROM quiz_results WHERE progress_id IN \
             (SELECT id FROM progress WHERE course_id = ?)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM progress WHERE course_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Course {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }
}

// Helper functions for row conversion

pub(crate) fn course_from_row(row: &sqlx::sqlite::SqliteRow) -> Course {
    let is_private: i32 = row.get("is_private");
    let is_published: i32 = row.get("is_published");
    let tree_str: String = row.get("content_tree");

    Course {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        category: row.get("category"),
        language: row.get("language"),
        estimated_time: row.get("estimated_time"),
        instructor_id: row.get("instructor_id"),
        is_private: is_private != 0,
        course_code: row.get("course_code"),
        password: row.get("password"),
        is_published: is_published != 0,
        content_tree: parse_tree(&tree_str),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn summary_from_row(row: &sqlx::sqlite::SqliteRow) -> CourseSummary {
    let course = course_from_row(row);
    let enrolled_count: i64 = row.get("enrolled_count");

    CourseSummary {
        id: course.id,
        title: course.title,
        description: course.description,
        category: course.category,
        language: course.language,
        estimated_time: course.estimated_time,
        instructor_id: course.instructor_id,
        is_private: course.is_private,
        is_published: course.is_published,
        total_slides: total_slides(&course.content_tree),
        enrolled_count,
        created_at: course.created_at,
        updated_at: course.updated_at,
    }
}

fn parse_tree(s: &str) -> Vec<ContentNode> {
    serde_json::from_str(s).unwrap_or_default()
}
