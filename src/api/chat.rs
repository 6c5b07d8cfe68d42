//! Tutor chat and diagram endpoints.
//!
//! Both endpoints always answer 200 with usable content; external AI failures
//! degrade to local substitutes inside the client.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::ai::{ChatMessage, ChatReply};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    #[serde(flatten)]
    pub reply: ChatReply,
}

#[derive(Debug, Deserialize)]
pub struct DiagramRequest {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct DiagramResponse {
    pub diagram: String,
}

/// POST /api/chat - Ask the tutor a question, optionally in course context.
pub async fn chat(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<ChatRequest>,
) -> ApiResult<ChatResponse> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message is required".to_string()));
    }

    // Course context is best-effort; an unknown id just drops the context.
    let course_title = match &request.course_id {
        Some(id) => state.repo.get_course(id).await?.map(|c| c.title),
        None => None,
    };

    let reply = state
        .ai
        .chat_or_fallback(&request.message, course_title.as_deref(), &request.history)
        .await;

    success(ChatResponse { reply })
}

/// POST /api/diagram - Generate diagram markup from a description.
pub async fn diagram(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<DiagramRequest>,
) -> ApiResult<DiagramResponse> {
    if request.description.trim().is_empty() {
        return Err(AppError::Validation("description is required".to_string()));
    }

    let diagram = state.ai.diagram_or_fallback(&request.description).await;
    success(DiagramResponse { diagram })
}
