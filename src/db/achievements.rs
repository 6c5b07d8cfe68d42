//! Unlock-record operations.
//!
//! The achievement catalog itself is in-process (`achievements::AchievementCatalog`);
//! only unlock rows are persisted.

use std::collections::HashSet;

use chrono::Utc;
use sqlx::Row;

use crate::errors::AppError;
use crate::models::UserAchievement;

use super::Repository;

impl Repository {
    /// Ids of achievements this student has already unlocked.
    pub async fn unlocked_achievement_ids(
        &self,
        student_id: &str,
    ) -> Result<HashSet<String>, AppError> {
        let rows = sqlx::query("SELECT achievement_id FROM user_achievements WHERE student_id = ?")
            .bind(student_id)
            .fetch_all(self.pool())
            .await?;

        Ok(rows
            .iter()
            .map(|r| r.get::<String, _>("achievement_id"))
            .collect())
    }

    /// List a student's unlock records, newest first.
    pub async fn list_user_achievements(
        &self,
        student_id: &str,
    ) -> Result<Vec<UserAchievement>, AppError> {
        let rows = sqlx::query(
            "SELECT student_id, achievement_id, progress, unlocked_at \
             FROM user_achievements WHERE student_id = ? ORDER BY unlocked_at DESC",
        )
        .bind(student_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .iter()
            .map(|row| UserAchievement {
                student_id: row.get("student_id"),
                achievement_id: row.get("achievement_id"),
                progress: row.get("progress"),
                unlocked_at: row.get("unlocked_at"),
            })
            .collect())
    }

    /// Record an unlock. `INSERT OR IGNORE` on the (student, achievement)
    /// primary key keeps unlocking monotonic and duplicate-free even under
    /// concurrent evaluation.
    pub async fn insert_user_achievement(
        &self,
        student_id: &str,
        achievement_id: &str,
        progress: f64,
    ) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT OR IGNORE INTO user_achievements \
             (student_id, achievement_id, progress, unlocked_at) VALUES (?, ?, ?, ?)",
        )
        .bind(student_id)
        .bind(achievement_id)
        .bind(progress)
        .bind(&now)
        .execute(self.pool())
        .await?;

        Ok(())
    }
}
