//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for all application data.

mod achievements;
mod courses;
mod progress;

pub use progress::StudentCourseRow;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Database repository for all data operations.
///
/// Operation impls are split by aggregate: courses, progress, achievements.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            category TEXT NOT NULL,
            language TEXT NOT NULL,
            estimated_time INTEGER NOT NULL DEFAULT 60,
            instructor_id TEXT NOT NULL,
            is_private INTEGER NOT NULL DEFAULT 0,
            course_code TEXT,
            password TEXT,
            is_published INTEGER NOT NULL DEFAULT 0,
            content_tree TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS progress (
            id TEXT PRIMARY KEY,
            student_id TEXT NOT NULL,
            course_id TEXT NOT NULL,
            current_slide INTEGER NOT NULL DEFAULT 0,
            completed_slides INTEGER NOT NULL DEFAULT 0,
            total_study_time INTEGER NOT NULL DEFAULT 0,
            is_completed INTEGER NOT NULL DEFAULT 0,
            completed_at TEXT,
            enrolled_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(student_id, course_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS quiz_results (
            id TEXT PRIMARY KEY,
            progress_id TEXT NOT NULL,
            quiz_id TEXT NOT NULL,
            score REAL NOT NULL,
            percentage REAL NOT NULL,
            answers TEXT NOT NULL,
            submitted_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_achievements (
            student_id TEXT NOT NULL,
            achievement_id TEXT NOT NULL,
            progress REAL NOT NULL,
            unlocked_at TEXT NOT NULL,
            PRIMARY KEY (student_id, achievement_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_courses_instructor ON courses(instructor_id);
        CREATE INDEX IF NOT EXISTS idx_courses_public ON courses(is_private, is_published);
        CREATE INDEX IF NOT EXISTS idx_courses_code ON courses(course_code);
        CREATE INDEX IF NOT EXISTS idx_progress_student ON progress(student_id);
        CREATE INDEX IF NOT EXISTS idx_progress_course ON progress(course_id);
        CREATE INDEX IF NOT EXISTS idx_quiz_results_progress ON quiz_results(progress_id);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
