//! HTTP request layer
//! Maps document routes onto the DocumentService

use anyhow::Result;
use app_core::{AppConfig, AppError, DocumentService, Session};
use app_fs::{Document, DocumentMetadata, SearchMode, SearchRequest, SearchResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;

/// Shared state injected into all handlers
#[derive(Clone)]
struct ServerState {
    service: DocumentService,
}

/// Error wrapper rendering an [`AppError`] as a JSON response
#[derive(Debug)]
struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);

        if self.0.is_client_error() {
            tracing::debug!("Request rejected ({}): {}", status, self.0);
        } else {
            tracing::error!("Request failed: {}", self.0);
        }

        let body = json!({ "error": self.0.to_string(), "kind": self.0.kind() });
        (status, Json(body)).into_response()
    }
}

fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound(_) | AppError::FolderNotFound(_) => StatusCode::NOT_FOUND,
        AppError::AlreadyExists(_) => StatusCode::CONFLICT,
        AppError::PathOutsideRoot(_) => StatusCode::FORBIDDEN,
        AppError::InvalidPath(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::Io(_) | AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Run filesystem work off the async executor
async fn blocking<T, F>(state: &ServerState, f: F) -> ApiResult<T>
where
    F: FnOnce(&DocumentService) -> std::result::Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let service = state.service.clone();
    tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|e| AppError::Io(std::io::Error::other(e)))?
        .map_err(ApiError)
}

#[derive(Debug, Deserialize)]
struct ListParams {
    parent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdatePayload {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenamePayload {
    old_path: String,
    new_path: String,
}

async fn list_documents(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<DocumentMetadata>>> {
    let parent = params.parent.filter(|p| !p.is_empty());
    let docs = blocking(&state, move |s| s.list_documents(parent.as_deref())).await?;
    Ok(Json(docs))
}

async fn create_document(
    State(state): State<ServerState>,
    Json(doc): Json<Document>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    if doc.file_path.is_empty() {
        return Err(AppError::Validation("filePath is required".to_string()).into());
    }

    let created = blocking(&state, move |s| s.create_document(doc)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_document(
    State(state): State<ServerState>,
    Path(path): Path<String>,
) -> ApiResult<Json<Document>> {
    let doc = blocking(&state, move |s| s.get_document(&path)).await?;
    Ok(Json(doc))
}

async fn update_document(
    State(state): State<ServerState>,
    Path(path): Path<String>,
    Json(payload): Json<UpdatePayload>,
) -> ApiResult<Json<Document>> {
    let doc = blocking(&state, move |s| s.update_document(&path, payload.content)).await?;
    Ok(Json(doc))
}

async fn delete_document(
    State(state): State<ServerState>,
    Path(path): Path<String>,
) -> ApiResult<StatusCode> {
    blocking(&state, move |s| s.delete_document(&path)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn rename_document(
    State(state): State<ServerState>,
    Json(payload): Json<RenamePayload>,
) -> ApiResult<StatusCode> {
    if payload.old_path.is_empty() || payload.new_path.is_empty() {
        return Err(AppError::Validation("oldPath and newPath are required".to_string()).into());
    }

    blocking(&state, move |s| s.rename_document(&payload.old_path, &payload.new_path)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn search_documents(
    State(state): State<ServerState>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<Json<Vec<SearchResult>>> {
    validate_search(&request)?;

    let results = blocking(&state, move |s| s.search_documents(&request)).await?;
    Ok(Json(results))
}

fn validate_search(request: &SearchRequest) -> std::result::Result<(), AppError> {
    if request.search_mode == SearchMode::Unrecognized {
        return Err(AppError::Validation(
            "searchMode must be 'plain' or 'regex'".to_string(),
        ));
    }

    if request.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    Ok(())
}

async fn get_session(State(state): State<ServerState>) -> ApiResult<Json<Session>> {
    let session = blocking(&state, |s| s.load_session()).await?;
    Ok(Json(session))
}

async fn save_session(
    State(state): State<ServerState>,
    Json(session): Json<Session>,
) -> ApiResult<Json<Session>> {
    let session = blocking(&state, move |s| s.save_session(&session).map(|_| session)).await?;
    Ok(Json(session))
}

/// Build the router for all document, search and session routes
fn router(service: DocumentService, permissive_cors: bool) -> Router {
    let app = Router::new()
        .route("/documents", get(list_documents).post(create_document))
        .route(
            "/documents/{*path}",
            get(get_document).put(update_document).delete(delete_document),
        )
        .route("/rename", post(rename_document))
        .route("/search", post(search_documents))
        .route("/session", get(get_session).post(save_session))
        .with_state(ServerState { service });

    if permissive_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Serve the HTTP API until the process is stopped
pub async fn run(config: AppConfig, service: DocumentService) -> Result<()> {
    let app = router(service, config.server.permissive_cors);

    let addr: SocketAddr = config.server.listen_addr().parse()?;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
