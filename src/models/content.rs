//! Content tree model: the recursive section/topic structure defining a
//! course's navigable material.

use serde::{Deserialize, Serialize};

/// A node in a course content tree.
///
/// Only `topic` nodes are navigable; `section` nodes group their children and
/// contribute no slide themselves. Unknown node types deserialize to `Other`
/// explicitly instead of being silently dropped, and also contribute no slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentNode {
    Section {
        id: String,
        title: String,
        #[serde(default)]
        children: Vec<ContentNode>,
    },
    Topic {
        id: String,
        title: String,
        #[serde(default)]
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        quiz: Option<Quiz>,
    },
    #[serde(other)]
    Other,
}

/// Quiz attached to a topic node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
}

fn default_difficulty() -> String {
    "medium".to_string()
}

/// A single multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// One navigable unit of course content, corresponding 1:1 with a topic node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Quiz>,
}
