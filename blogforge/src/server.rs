use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{get, post, routes, Build, Rocket, State};
use serde::{Deserialize, Serialize};

use common::Config;

use crate::composer::{GeneratedPost, PostComposer};

/// Application state stored inside Rocket managed state. Read-only for the
/// process lifetime; nothing here is mutated by request handlers.
#[derive(Clone)]
pub struct AppState {
    pub started_at: DateTime<Utc>,
    pub config: Arc<Config>,
    pub composer: Arc<PostComposer>,
}

/// Request body for `/generate`.
#[derive(Deserialize)]
struct TopicRequest {
    topic: String,
}

/// Uniform error body: `{"detail": "..."}`.
#[derive(Serialize)]
struct ErrorDetail {
    detail: String,
}

#[derive(Serialize)]
struct PingResponse {
    status: &'static str,
}

/// Response structure for `/api/v1/status`.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    uptime_seconds: i64,
    news_enabled: bool,
    model: String,
}

/// Liveness check. No dependencies, always succeeds.
#[get("/ping")]
fn ping() -> Json<PingResponse> {
    Json(PingResponse { status: "ok" })
}

/// Status endpoint returning simple JSON with uptime and basic config info.
#[get("/api/v1/status")]
fn status(state: &State<AppState>) -> Json<StatusResponse> {
    let uptime = (Utc::now() - state.started_at).num_seconds();
    let model = state
        .config
        .llm
        .model
        .clone()
        .unwrap_or_else(|| "gpt-4o-mini".to_string());

    Json(StatusResponse {
        status: "ok",
        uptime_seconds: uptime,
        news_enabled: state.composer.news_enabled(),
        model,
    })
}

/// Generate a blog post for a topic.
///
/// Malformed JSON bodies are rejected by Rocket's `Json` guard before this
/// handler runs (422). A present-but-blank topic is rejected here (400).
/// Composer failures map to 500 with the error text in `detail`.
#[post("/generate", data = "<body>")]
async fn generate(
    state: &State<AppState>,
    body: Json<TopicRequest>,
) -> Result<Json<GeneratedPost>, Custom<Json<ErrorDetail>>> {
    let topic = body.topic.trim();
    if topic.is_empty() {
        return Err(Custom(
            Status::BadRequest,
            Json(ErrorDetail {
                detail: "topic must not be empty".to_string(),
            }),
        ));
    }

    match state.composer.generate_post(topic).await {
        Ok(post) => Ok(Json(post)),
        Err(e) => {
            tracing::error!("post generation failed: {:#}", e);
            Err(Custom(
                Status::InternalServerError,
                Json(ErrorDetail {
                    detail: format!("{:#}", e),
                }),
            ))
        }
    }
}

/// Build the Rocket instance with managed state and mounted routes,
/// applying `[server]` bind/port from the configuration. Kept separate from
/// [`launch`] so tests can drive the surface with a local client.
pub fn build_rocket(state: AppState) -> Rocket<Build> {
    let mut fig = rocket::Config::figment();
    if let Some(server) = &state.config.server {
        if let Some(bind) = &server.bind {
            fig = fig.merge(("address", bind.clone()));
        }
        if let Some(port) = server.port {
            fig = fig.merge(("port", port));
        }
    }

    rocket::custom(fig)
        .manage(state)
        .mount("/", routes![ping, status, generate])
}

/// Launch the Rocket server. Blocks until Rocket shuts down
/// (SIGINT/SIGTERM etc.) and returns an error if it fails to start.
pub async fn launch(state: AppState) -> Result<()> {
    tracing::info!("Starting Rocket HTTP server");
    build_rocket(state)
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    tracing::info!("Rocket HTTP server has shut down");
    Ok(())
}
