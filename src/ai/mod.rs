//! External AI collaborators: course-structure generation, the chat tutor,
//! and diagram generation, plus PDF text extraction.
//!
//! Every outbound call is one-shot: no retries, no backoff. A failed call
//! degrades exactly once to a deterministic local substitute via the
//! `*_or_fallback` combinators, so external failures never surface as failed
//! requests.

use serde::{Deserialize, Serialize};

use crate::content::fallback_tree;
use crate::errors::AppError;
use crate::models::ContentNode;

/// Extract plain text from raw PDF bytes.
///
/// Fails when the bytes are not a readable PDF or the document carries no
/// extractable text.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, AppError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::Validation(format!("Could not read PDF: {}", e)))?;

    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "PDF contains no extractable text".to_string(),
        ));
    }

    Ok(text)
}

/// One message of a tutor conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Tutor response: a reply plus optional follow-up suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: String,
    pub suggestions: Vec<String>,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}

/// Client for the chat-completions style AI service.
#[derive(Clone)]
pub struct AiClient {
    http: reqwest::Client,
    base_url: Option<String>,
    api_key: Option<String>,
    model: String,
}

impl AiClient {
    pub fn new(base_url: Option<String>, api_key: Option<String>, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    /// Raw completion call. Errors when the service is unconfigured,
    /// unreachable, or returns an unexpected shape.
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, AppError> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| AppError::External("AI service not configured".to_string()))?;

        let mut request = self
            .http
            .post(format!("{}/chat/completions", base.trim_end_matches('/')))
            .json(&CompletionRequest {
                model: &self.model,
                messages,
                temperature: 0.3,
            });

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?.error_for_status()?;
        let body: CompletionResponse = response.json().await?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::External("AI service returned no choices".to_string()))
    }

    /// Generate a content tree from extracted PDF text and course metadata.
    pub async fn generate_course_tree(
        &self,
        title: &str,
        category: &str,
        language: &str,
        estimated_time: i64,
        text: &str,
    ) -> Result<Vec<ContentNode>, AppError> {
        let system = "You are a course designer. Respond with a JSON array of content nodes. \
                      Each node is either {\"type\":\"section\",\"id\":...,\"title\":...,\"children\":[...]} \
                      or {\"type\":\"topic\",\"id\":...,\"title\":...,\"content\":\"<html>\",\"quiz\":...}. \
                      Respond with JSON only.";
        let user = format!(
            "Build a slide-based course titled {:?} (category: {}, language: {}, \
             estimated {} minutes) from this material:\n\n{}",
            title, category, language, estimated_time, text
        );

        let content = self
            .complete(vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user,
                },
            ])
            .await?;

        let json = extract_fenced_block(&content).unwrap_or(content);
        let tree: Vec<ContentNode> = serde_json::from_str(json.trim())
            .map_err(|e| AppError::External(format!("AI returned an invalid tree: {}", e)))?;

        Ok(tree)
    }

    /// Generate a content tree, degrading to the deterministic local
    /// paginator when the external call fails for any reason.
    pub async fn generate_or_fallback(
        &self,
        title: &str,
        category: &str,
        language: &str,
        estimated_time: i64,
        text: &str,
    ) -> Vec<ContentNode> {
        match self
            .generate_course_tree(title, category, language, estimated_time, text)
            .await
        {
            Ok(tree) => tree,
            Err(e) => {
                tracing::warn!("AI course generation failed, using fallback: {}", e);
                fallback_tree(title, text)
            }
        }
    }

    /// Ask the tutor a question in the context of a course.
    pub async fn chat(
        &self,
        message: &str,
        course_title: Option<&str>,
        history: &[ChatMessage],
    ) -> Result<ChatReply, AppError> {
        let context = match course_title {
            Some(title) => format!(
                "You are a patient tutor helping a student through the course {:?}. \
                 Answer concisely.",
                title
            ),
            None => "You are a patient tutor. Answer concisely.".to_string(),
        };

        let mut messages = vec![ChatMessage {
            role: "system".to_string(),
            content: context,
        }];
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: message.to_string(),
        });

        let reply = self.complete(messages).await?;
        Ok(ChatReply {
            reply,
            suggestions: Vec::new(),
        })
    }

    /// Chat with the rule-based canned fallback on failure.
    pub async fn chat_or_fallback(
        &self,
        message: &str,
        course_title: Option<&str>,
        history: &[ChatMessage],
    ) -> ChatReply {
        match self.chat(message, course_title, history).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("AI chat failed, using canned reply: {}", e);
                canned_reply(message)
            }
        }
    }

    /// Generate diagram markup from a free-text description.
    pub async fn diagram(&self, description: &str) -> Result<String, AppError> {
        let content = self
            .complete(vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "Produce a mermaid diagram for the description. \
                              Reply with a single fenced code block."
                        .to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: description.to_string(),
                },
            ])
            .await?;

        // Raw model text stands in when no fenced block is found
        Ok(extract_fenced_block(&content).unwrap_or(content))
    }

    /// Diagram with a deterministic placeholder on failure.
    pub async fn diagram_or_fallback(&self, description: &str) -> String {
        match self.diagram(description).await {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!("AI diagram generation failed, using placeholder: {}", e);
                fallback_diagram(description)
            }
        }
    }
}

/// Rule-based tutor reply keyed on message keywords.
pub fn canned_reply(message: &str) -> ChatReply {
    let lower = message.to_lowercase();

    let reply = if lower.contains("quiz") || lower.contains("test") {
        "Quizzes appear at the end of topics that include one. Review the slide content first, \
         then attempt the quiz; your best results are saved automatically."
    } else if lower.contains("stuck") || lower.contains("help") || lower.contains("understand") {
        "Try re-reading the current slide and summarizing it in your own words. Breaking the \
         material into smaller pieces often makes it click."
    } else if lower.contains("progress") || lower.contains("complete") {
        "Your progress is tracked per slide. Finish every slide in a course to mark it complete \
         and work toward achievements."
    } else if lower.contains("hello") || lower.contains("hi") {
        "Hello! Ask me anything about the course material you are studying."
    } else {
        "I could not reach the tutoring service just now. Try rephrasing your question, or \
         revisit the relevant slide for a refresher."
    };

    ChatReply {
        reply: reply.to_string(),
        suggestions: vec![
            "Summarize this slide".to_string(),
            "Give me an example".to_string(),
            "Quiz me on this topic".to_string(),
        ],
    }
}

/// Deterministic diagram placeholder used when generation fails.
pub fn fallback_diagram(description: &str) -> String {
    let label: String = description.chars().take(40).collect();
    format!("graph TD\n    A[\"{}\"] --> B[\"(diagram unavailable)\"]", label.replace('"', "'"))
}

/// Pull the body out of the first fenced code block, if any.
pub fn extract_fenced_block(text: &str) -> Option<String> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    // Skip an optional language tag on the opening fence line
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_fenced_block_with_language_tag() {
        let text = "Here you go:\n```mermaid\ngraph TD\nA --> B\n```\nEnjoy!";
        assert_eq!(
            extract_fenced_block(text).unwrap(),
            "graph TD\nA --> B"
        );
    }

    #[test]
    fn test_extract_fenced_block_none_returns_none() {
        assert!(extract_fenced_block("no fence here").is_none());
    }

    #[test]
    fn test_canned_reply_keys_on_keywords() {
        assert!(canned_reply("how does the quiz work?")
            .reply
            .contains("Quizzes"));
        assert!(canned_reply("I'm stuck on this").reply.contains("re-reading"));
        assert!(!canned_reply("something else entirely")
            .suggestions
            .is_empty());
    }

    #[test]
    fn test_fallback_diagram_deterministic() {
        assert_eq!(
            fallback_diagram("login flow"),
            fallback_diagram("login flow")
        );
        assert!(fallback_diagram("login flow").starts_with("graph TD"));
    }

    #[tokio::test]
    async fn test_unconfigured_client_uses_fallbacks() {
        let client = AiClient::new(None, None, "test-model".to_string());

        let tree = client
            .generate_or_fallback("Demo", "math", "english", 60, "some source text here")
            .await;
        assert!(!tree.is_empty());

        let reply = client.chat_or_fallback("hello", None, &[]).await;
        assert!(!reply.reply.is_empty());

        let markup = client.diagram_or_fallback("a flow").await;
        assert!(markup.starts_with("graph TD"));
    }
}
