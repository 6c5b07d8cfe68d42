//! The achievement catalog shipped with the platform.

use crate::models::{Achievement, AchievementCondition, ConditionType};

/// Read-only achievement catalog, injected into handlers via app state.
#[derive(Debug, Clone)]
pub struct AchievementCatalog {
    entries: Vec<Achievement>,
}

impl AchievementCatalog {
    pub fn new(entries: Vec<Achievement>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Achievement] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.entries.iter().find(|a| a.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AchievementCatalog {
    fn default() -> Self {
        Self::new(default_entries())
    }
}

fn entry(
    id: &str,
    title: &str,
    description: &str,
    condition_type: ConditionType,
    target: f64,
    points: i64,
    category: &str,
) -> Achievement {
    Achievement {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        condition: AchievementCondition {
            condition_type,
            target,
        },
        points,
        category: category.to_string(),
    }
}

/// The built-in catalog.
fn default_entries() -> Vec<Achievement> {
    vec![
        entry(
            "first-course",
            "First Steps",
            "Complete your first course",
            ConditionType::CoursesCompleted,
            1.0,
            10,
            "learning",
        ),
        entry(
            "course-collector",
            "Course Collector",
            "Complete 5 courses",
            ConditionType::CoursesCompleted,
            5.0,
            50,
            "learning",
        ),
        entry(
            "scholar",
            "Scholar",
            "Complete 10 courses",
            ConditionType::CoursesCompleted,
            10.0,
            100,
            "learning",
        ),
        entry(
            "dedicated-learner",
            "Dedicated Learner",
            "Study for 10 hours in total",
            ConditionType::StudyTime,
            10.0,
            25,
            "dedication",
        ),
        entry(
            "marathon-student",
            "Marathon Student",
            "Study for 50 hours in total",
            ConditionType::StudyTime,
            50.0,
            100,
            "dedication",
        ),
        entry(
            "high-achiever",
            "High Achiever",
            "Maintain an average quiz score of 90%",
            ConditionType::AverageScore,
            90.0,
            75,
            "mastery",
        ),
        entry(
            "perfectionist",
            "Perfectionist",
            "Score 100% on 3 quizzes",
            ConditionType::PerfectQuizzes,
            3.0,
            50,
            "mastery",
        ),
        entry(
            "explorer",
            "Explorer",
            "Complete courses in 3 different categories",
            ConditionType::Categories,
            3.0,
            40,
            "exploration",
        ),
        entry(
            "speed-runner",
            "Speed Runner",
            "Finish 3 courses well under their estimated time",
            ConditionType::FastCompletion,
            3.0,
            60,
            "mastery",
        ),
        // Declared in the schema but unreachable: the evaluator has no
        // streak-tracking dispatch and always reports progress 0.
        entry(
            "streak-week",
            "Consistency",
            "Study 7 days in a row",
            ConditionType::StreakDays,
            7.0,
            30,
            "dedication",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_ids_unique() {
        let catalog = AchievementCatalog::default();
        let mut ids: Vec<&str> = catalog.entries().iter().map(|a| a.id.as_str()).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = AchievementCatalog::default();
        assert!(catalog.get("first-course").is_some());
        assert!(catalog.get("no-such-achievement").is_none());
    }
}
