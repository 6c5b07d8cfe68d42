//! Pure achievement evaluation over aggregated student statistics.

use std::collections::HashSet;

use crate::models::{Achievement, ConditionType, UserStats};

use super::AchievementCatalog;

/// Default estimated time (minutes) for fast-completion checks when a course
/// has none recorded.
const DEFAULT_ESTIMATED_MINUTES: i64 = 60;

/// Fraction of the estimated time a completion must fit inside to count as
/// fast.
const FAST_COMPLETION_RATIO: f64 = 0.75;

/// One enrolled course's contribution to a student's statistics.
#[derive(Debug, Clone, Default)]
pub struct CourseRecord {
    pub is_completed: bool,
    /// Accumulated study time in minutes.
    pub total_study_time: i64,
    /// Course estimated time in minutes, when the course recorded one.
    pub estimated_time: Option<i64>,
    pub category: String,
    /// Percentages of every quiz result in this course, in submission order.
    pub quiz_percentages: Vec<f64>,
}

/// Aggregate a student's course records into `UserStats`.
pub fn compute_stats(records: &[CourseRecord]) -> UserStats {
    let courses_completed = records.iter().filter(|r| r.is_completed).count() as i64;
    let study_time_minutes: i64 = records.iter().map(|r| r.total_study_time).sum();

    let all_percentages: Vec<f64> = records
        .iter()
        .flat_map(|r| r.quiz_percentages.iter().copied())
        .collect();
    let average_score = if all_percentages.is_empty() {
        0.0
    } else {
        all_percentages.iter().sum::<f64>() / all_percentages.len() as f64
    };

    let categories = records
        .iter()
        .filter(|r| r.is_completed)
        .map(|r| r.category.as_str())
        .collect::<HashSet<_>>()
        .len() as i64;

    let perfect_quizzes = all_percentages.iter().filter(|p| **p == 100.0).count() as i64;

    let fast_completion = records
        .iter()
        .filter(|r| {
            let budget = r.estimated_time.unwrap_or(DEFAULT_ESTIMATED_MINUTES) as f64;
            r.is_completed && r.total_study_time as f64 <= FAST_COMPLETION_RATIO * budget
        })
        .count() as i64;

    UserStats {
        courses_completed,
        study_time_minutes,
        average_score,
        categories,
        perfect_quizzes,
        fast_completion,
    }
}

/// Progress value for one condition type.
///
/// `StreakDays` has no tracked metric and `Unknown` covers unrecognized
/// types; both report 0, so such achievements simply never unlock.
pub fn condition_progress(stats: &UserStats, condition_type: ConditionType) -> f64 {
    match condition_type {
        ConditionType::CoursesCompleted => stats.courses_completed as f64,
        ConditionType::StudyTime => stats.study_time_hours() as f64,
        ConditionType::AverageScore => stats.average_score,
        ConditionType::Categories => stats.categories as f64,
        ConditionType::PerfectQuizzes => stats.perfect_quizzes as f64,
        ConditionType::FastCompletion => stats.fast_completion as f64,
        ConditionType::StreakDays | ConditionType::Unknown => 0.0,
    }
}

/// A catalog entry that crossed its target in this evaluation.
#[derive(Debug, Clone)]
pub struct NewUnlock<'a> {
    pub achievement: &'a Achievement,
    /// Progress value recorded at unlock time.
    pub progress: f64,
}

/// Determine which achievements unlock for these stats.
///
/// Already-unlocked ids are skipped, never re-inserted, so repeated
/// evaluation is idempotent and unlocking stays monotonic. Evaluation order
/// across achievements is immaterial.
pub fn evaluate<'a>(
    catalog: &'a AchievementCatalog,
    already_unlocked: &HashSet<String>,
    stats: &UserStats,
) -> Vec<NewUnlock<'a>> {
    catalog
        .entries()
        .iter()
        .filter(|a| !already_unlocked.contains(&a.id))
        .filter_map(|a| {
            let progress = condition_progress(stats, a.condition.condition_type);
            if progress >= a.condition.target {
                Some(NewUnlock {
                    achievement: a,
                    progress,
                })
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AchievementCondition;

    fn record(
        completed: bool,
        minutes: i64,
        estimated: Option<i64>,
        category: &str,
        percentages: &[f64],
    ) -> CourseRecord {
        CourseRecord {
            is_completed: completed,
            total_study_time: minutes,
            estimated_time: estimated,
            category: category.to_string(),
            quiz_percentages: percentages.to_vec(),
        }
    }

    fn synthetic_catalog(condition_type: ConditionType, target: f64) -> AchievementCatalog {
        AchievementCatalog::new(vec![Achievement {
            id: "test".to_string(),
            title: "Test".to_string(),
            description: "Test achievement".to_string(),
            condition: AchievementCondition {
                condition_type,
                target,
            },
            points: 10,
            category: "test".to_string(),
        }])
    }

    #[test]
    fn test_average_and_perfect_quizzes() {
        // 100, 80, 100 across courses: flat mean, not per-course weighted
        let records = vec![
            record(false, 0, None, "math", &[100.0, 80.0]),
            record(false, 0, None, "science", &[100.0]),
        ];
        let stats = compute_stats(&records);
        assert!((stats.average_score - 93.33333333333333).abs() < 1e-9);
        assert_eq!(stats.perfect_quizzes, 2);
    }

    #[test]
    fn test_fast_completion_requires_completion_and_budget() {
        let records = vec![
            // Completed within 75% of the default 60-minute budget
            record(true, 45, None, "math", &[]),
            // Completed but over budget
            record(true, 46, None, "math", &[]),
            // Within budget but not completed
            record(false, 10, None, "math", &[]),
            // Explicit estimate: 75% of 100 is 75
            record(true, 75, Some(100), "science", &[]),
        ];
        let stats = compute_stats(&records);
        assert_eq!(stats.fast_completion, 2);
    }

    #[test]
    fn test_categories_counts_distinct_completed_only() {
        let records = vec![
            record(true, 0, None, "math", &[]),
            record(true, 0, None, "math", &[]),
            record(true, 0, None, "science", &[]),
            record(false, 0, None, "history", &[]),
        ];
        let stats = compute_stats(&records);
        assert_eq!(stats.categories, 2);
    }

    #[test]
    fn test_study_time_dispatch_floors_to_hours() {
        let records = vec![record(false, 599, None, "math", &[])];
        let stats = compute_stats(&records);
        assert_eq!(
            condition_progress(&stats, ConditionType::StudyTime),
            9.0
        );
    }

    #[test]
    fn test_unlock_at_exact_target() {
        let catalog = synthetic_catalog(ConditionType::CoursesCompleted, 2.0);
        let stats = UserStats {
            courses_completed: 2,
            ..Default::default()
        };
        let unlocked = evaluate(&catalog, &HashSet::new(), &stats);
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].progress, 2.0);
    }

    #[test]
    fn test_already_unlocked_skipped() {
        let catalog = synthetic_catalog(ConditionType::CoursesCompleted, 1.0);
        let stats = UserStats {
            courses_completed: 5,
            ..Default::default()
        };
        let mut unlocked_ids = HashSet::new();
        unlocked_ids.insert("test".to_string());
        assert!(evaluate(&catalog, &unlocked_ids, &stats).is_empty());
    }

    #[test]
    fn test_streak_days_never_unlocks() {
        let catalog = synthetic_catalog(ConditionType::StreakDays, 1.0);
        let stats = UserStats {
            courses_completed: 100,
            study_time_minutes: 100_000,
            average_score: 100.0,
            categories: 100,
            perfect_quizzes: 100,
            fast_completion: 100,
        };
        assert!(evaluate(&catalog, &HashSet::new(), &stats).is_empty());
    }

    #[test]
    fn test_unknown_condition_type_reports_zero() {
        let stats = UserStats {
            courses_completed: 7,
            ..Default::default()
        };
        assert_eq!(condition_progress(&stats, ConditionType::Unknown), 0.0);
    }

    #[test]
    fn test_evaluation_idempotent_across_runs() {
        let catalog = AchievementCatalog::default();
        let stats = UserStats {
            courses_completed: 1,
            study_time_minutes: 700,
            average_score: 95.0,
            categories: 1,
            perfect_quizzes: 3,
            fast_completion: 1,
        };

        let first = evaluate(&catalog, &HashSet::new(), &stats);
        assert!(!first.is_empty());

        let unlocked_ids: HashSet<String> = first
            .iter()
            .map(|u| u.achievement.id.clone())
            .collect();
        let second = evaluate(&catalog, &unlocked_ids, &stats);
        assert!(second.is_empty());
    }
}
