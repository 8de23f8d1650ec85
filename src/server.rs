use std::net::SocketAddr;

use anyhow::Result;
use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json};
use axum::routing::{get, post};
use axum::{extract::State, Router};
use tower_http::trace::TraceLayer;

use crate::chat::ChatService;
use crate::config::AppConfig;
use crate::models::{AskRequest, AskResponse, SessionRequest, SessionResponse};
use crate::sessions::SessionStore;

#[derive(Clone)]
struct AppState {
    chat: ChatService,
    sessions: SessionStore,
}

pub async fn run_server(
    config: AppConfig,
    chat: ChatService,
    sessions: SessionStore,
) -> Result<()> {
    let state = AppState { chat, sessions };

    let app = Router::new()
        .route("/", get(index_page))
        .route("/api/ask", post(ask_handler))
        .route("/api/session", post(create_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index_page(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let session_id = state.sessions.create().map_err(ApiError::from)?;

    let template = IndexTemplate { session_id };
    let body = template.render().map_err(ApiError::from)?;

    Ok(Html(body))
}

async fn ask_handler(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let answer = state.chat.answer(request).await?;
    Ok(Json(answer))
}

async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<SessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    if request.reset.unwrap_or(false) {
        if let Some(session_id) = request.session_id {
            state.sessions.reset(&session_id)?;
            return Ok(Json(SessionResponse { session_id }));
        }
    }

    let session_id = state.sessions.create()?;
    Ok(Json(SessionResponse { session_id }))
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    session_id: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: value.to_string(),
        }
    }
}

impl From<askama::Error> for ApiError {
    fn from(value: askama::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: value.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}
