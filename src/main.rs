//! E-Gurukul Backend
//!
//! REST backend for a slide-based e-learning platform: SQLite persistence,
//! Tantivy full-text course search, and AI-assisted course generation with
//! deterministic local fallbacks.

mod achievements;
mod ai;
mod api;
mod auth;
mod config;
mod content;
mod db;
mod errors;
mod models;
mod progress;
mod search;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use achievements::AchievementCatalog;
use ai::AiClient;
use config::Config;
use db::Repository;
use search::SearchIndex;

/// Upper bound on multipart bodies; PDF uploads are the only large payload.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub search: Arc<SearchIndex>,
    pub config: Arc<Config>,
    pub ai: Arc<AiClient>,
    pub catalog: Arc<AchievementCatalog>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting E-Gurukul Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Index path: {:?}", config.index_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (EGURUKUL_API_PSK). Authentication is disabled!");
    }

    if config.ai_base_url.is_none() {
        tracing::warn!("No AI service configured (EGURUKUL_AI_BASE_URL). Using local fallbacks.");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Initialize search index
    let search = Arc::new(SearchIndex::open(&config.index_path)?);

    // Build initial search index from database
    tracing::info!("Building search index...");
    let courses = repo.list_all_courses().await?;
    search.rebuild(&courses).await?;

    let ai = Arc::new(AiClient::new(
        config.ai_base_url.clone(),
        config.ai_api_key.clone(),
        config.ai_model.clone(),
    ));

    // Create application state
    let state = AppState {
        repo,
        search,
        config: Arc::new(config.clone()),
        ai,
        catalog: Arc::new(AchievementCatalog::default()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // API routes
    let api_routes = Router::new()
        // Courses
        .route("/courses", post(api::create_course))
        .route("/courses/create", post(api::upload_course))
        .route("/courses/public", get(api::list_public_courses))
        .route("/courses/mine", get(api::list_my_courses))
        .route("/courses/enrolled", get(api::list_enrolled_courses))
        .route("/courses/enroll", post(api::enroll))
        .route("/courses/join-private", post(api::join_private))
        .route("/courses/search", get(api::search_courses))
        .route("/courses/{id}", put(api::update_course))
        .route("/courses/{id}", delete(api::delete_course))
        .route("/courses/{id}/content", get(api::get_content))
        .route("/courses/{id}/publish", put(api::toggle_publish))
        // Progress
        .route("/courses/{id}/progress", put(api::update_progress))
        .route("/courses/{id}/complete", put(api::mark_complete))
        .route("/courses/{id}/study-time", put(api::record_study_time))
        .route("/courses/{id}/quiz-result", post(api::submit_quiz_result))
        // Achievements
        .route("/achievements", get(api::list_achievements))
        .route("/achievements/unlocked", get(api::list_unlocked))
        .route("/achievements/stats", get(api::get_stats))
        // AI collaborators
        .route("/chat", post(api::chat))
        .route("/diagram", post(api::diagram))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
