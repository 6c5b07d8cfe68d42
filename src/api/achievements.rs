//! Achievement API endpoints: catalog with per-student standing, unlock
//! records, and aggregated stats.

use axum::extract::State;
use serde::Serialize;

use super::{success, ApiResult};
use crate::achievements::{compute_stats, evaluate, CourseRecord};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{Achievement, AchievementStatus, UserAchievement, UserStats};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementListResponse {
    pub achievements: Vec<AchievementStatus>,
    pub total_points: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockedResponse {
    pub unlocked: Vec<UserAchievement>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub stats: UserStats,
    pub new_achievements: Vec<Achievement>,
}

/// Recompute a student's stats from their progress rows, persist any newly
/// crossed achievement targets, and return both.
///
/// Safe to call from any handler; `INSERT OR IGNORE` on the unlock table
/// keeps concurrent evaluations from double-unlocking.
pub async fn evaluate_and_store(
    state: &AppState,
    student_id: &str,
) -> Result<(UserStats, Vec<Achievement>), AppError> {
    let rows = state.repo.student_course_rows(student_id).await?;
    let records: Vec<CourseRecord> = rows
        .into_iter()
        .map(|(row, quiz_percentages)| CourseRecord {
            is_completed: row.is_completed,
            total_study_time: row.total_study_time,
            estimated_time: Some(row.estimated_time),
            category: row.category,
            quiz_percentages,
        })
        .collect();

    let stats = compute_stats(&records);
    let already = state.repo.unlocked_achievement_ids(student_id).await?;
    let unlocks = evaluate(&state.catalog, &already, &stats);

    let mut new_achievements = Vec::with_capacity(unlocks.len());
    for unlock in unlocks {
        state
            .repo
            .insert_user_achievement(student_id, &unlock.achievement.id, unlock.progress)
            .await?;
        tracing::info!(
            student_id,
            achievement_id = %unlock.achievement.id,
            "Achievement unlocked"
        );
        new_achievements.push(unlock.achievement.clone());
    }

    Ok((stats, new_achievements))
}

/// GET /api/achievements - Full catalog with the student's standing per entry.
pub async fn list_achievements(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<AchievementListResponse> {
    let (stats, _) = evaluate_and_store(&state, &user.id).await?;

    let unlocked = state.repo.list_user_achievements(&user.id).await?;
    let unlocked_at = |id: &str| {
        unlocked
            .iter()
            .find(|u| u.achievement_id == id)
            .map(|u| u.unlocked_at.clone())
    };

    let mut total_points = 0;
    let achievements: Vec<AchievementStatus> = state
        .catalog
        .entries()
        .iter()
        .map(|a| {
            let at = unlocked_at(&a.id);
            if at.is_some() {
                total_points += a.points;
            }
            AchievementStatus {
                progress: crate::achievements::condition_progress(
                    &stats,
                    a.condition.condition_type,
                ),
                unlocked: at.is_some(),
                unlocked_at: at,
                achievement: a.clone(),
            }
        })
        .collect();

    success(AchievementListResponse {
        achievements,
        total_points,
    })
}

/// GET /api/achievements/unlocked - Unlock records only, newest first.
pub async fn list_unlocked(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<UnlockedResponse> {
    evaluate_and_store(&state, &user.id).await?;
    let unlocked = state.repo.list_user_achievements(&user.id).await?;
    success(UnlockedResponse { unlocked })
}

/// GET /api/achievements/stats - Aggregated stats plus any achievements this
/// recomputation unlocked.
pub async fn get_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<StatsResponse> {
    let (stats, new_achievements) = evaluate_and_store(&state, &user.id).await?;
    success(StatsResponse {
        stats,
        new_achievements,
    })
}
