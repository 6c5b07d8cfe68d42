//! Achievement catalog entries, unlock records, and aggregated student stats.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Metric a condition is measured against.
///
/// `StreakDays` exists in the catalog schema but has no evaluator dispatch
/// case; it always reports progress 0 (inconsistent domain data carried over
/// as-is). Unrecognized strings parse to `Unknown`, which likewise reports 0
/// instead of erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionType {
    CoursesCompleted,
    StudyTime,
    AverageScore,
    Categories,
    PerfectQuizzes,
    FastCompletion,
    StreakDays,
    Unknown,
}

impl ConditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionType::CoursesCompleted => "coursesCompleted",
            ConditionType::StudyTime => "studyTime",
            ConditionType::AverageScore => "averageScore",
            ConditionType::Categories => "categories",
            ConditionType::PerfectQuizzes => "perfectQuizzes",
            ConditionType::FastCompletion => "fastCompletion",
            ConditionType::StreakDays => "streakDays",
            ConditionType::Unknown => "unknown",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "coursesCompleted" => ConditionType::CoursesCompleted,
            "studyTime" => ConditionType::StudyTime,
            "averageScore" => ConditionType::AverageScore,
            "categories" => ConditionType::Categories,
            "perfectQuizzes" => ConditionType::PerfectQuizzes,
            "fastCompletion" => ConditionType::FastCompletion,
            "streakDays" => ConditionType::StreakDays,
            _ => ConditionType::Unknown,
        }
    }
}

impl Serialize for ConditionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConditionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ConditionType::from_str(&s))
    }
}

/// A (metric-type, numeric target) pair defining when an achievement unlocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementCondition {
    #[serde(rename = "type")]
    pub condition_type: ConditionType,
    pub target: f64,
}

/// Static catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub condition: AchievementCondition,
    pub points: i64,
    pub category: String,
}

/// Join record created once when a student first reaches a condition target.
/// Never deleted or recomputed downward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAchievement {
    pub student_id: String,
    pub achievement_id: String,
    /// Progress value at unlock time.
    pub progress: f64,
    pub unlocked_at: String,
}

/// Aggregated statistics computed by scanning all of a student's progress
/// records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub courses_completed: i64,
    /// Total study time in minutes across all courses.
    pub study_time_minutes: i64,
    /// Flat mean of quiz percentages across all courses.
    pub average_score: f64,
    /// Distinct categories among completed courses.
    pub categories: i64,
    /// Quiz results with percentage exactly 100.
    pub perfect_quizzes: i64,
    /// Completed courses finished within 75% of their estimated time.
    pub fast_completion: i64,
}

impl UserStats {
    /// Study time in whole hours, floored at use time.
    pub fn study_time_hours(&self) -> i64 {
        self.study_time_minutes / 60
    }
}

/// Catalog entry paired with the requesting student's standing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementStatus {
    #[serde(flatten)]
    pub achievement: Achievement,
    pub progress: f64,
    pub unlocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<String>,
}
