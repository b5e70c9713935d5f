//! axum server holding the last successful comparison

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dss_core::export::to_csv_string;
use dss_core::{ComparisonResult, ExportMode};
use dss_engine::{run_comparison, write_result, ComparisonInputs, EngineError};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{Any, CorsLayer};

use crate::cli::{GlobalArgs, SelectionArgs, ServeArgs};
use crate::commands::common::{apply_selection, read_result, ProjectContext};

/// Shared server state.
///
/// `result` only ever holds a complete, successful comparison. Refreshes are
/// serialized by `refresh_lock`; readers never wait on a running refresh.
pub(crate) struct AppState {
    inputs: ComparisonInputs,
    root: PathBuf,
    output_path: PathBuf,
    result: RwLock<Option<Arc<ComparisonResult>>>,
    refresh_lock: Mutex<()>,
}

impl AppState {
    pub(crate) fn new(inputs: ComparisonInputs, root: &Path, output_path: PathBuf) -> Self {
        Self {
            inputs,
            root: root.to_path_buf(),
            output_path,
            result: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    pub(crate) async fn current(&self) -> Option<Arc<ComparisonResult>> {
        self.result.read().await.clone()
    }

    async fn replace(&self, result: ComparisonResult) -> Arc<ComparisonResult> {
        let result = Arc::new(result);
        *self.result.write().await = Some(result.clone());
        result
    }

    /// Rerun the engine. On failure the held result is left untouched.
    pub(crate) async fn refresh(&self) -> Result<Arc<ComparisonResult>, EngineError> {
        let _guard = self.refresh_lock.lock().await;
        let run = run_comparison(&self.inputs).await?;
        if let Err(e) = write_result(&run.result, &self.output_path) {
            log::warn!("Refreshed comparison was not persisted: {}", e);
        }
        Ok(self.replace(run.result).await)
    }

    /// Compare two local files under the project root with the configured
    /// columns and mappings. Nothing is held or written.
    pub(crate) async fn compare_files(
        &self,
        prior: &str,
        latest: &str,
    ) -> Result<ComparisonResult, EngineError> {
        let inputs = self.inputs.with_local_snapshots(&self.root, prior, latest);
        Ok(run_comparison(&inputs).await?.result)
    }
}

/// Body of the ad hoc comparison endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct AdhocRequest {
    #[serde(default, alias = "priorDssFile")]
    prior: String,
    #[serde(default, alias = "latestDssFile")]
    latest: String,
}

/// Query string of the CSV export endpoint
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExportQuery {
    weeks: Option<String>,
    #[serde(default)]
    mode: ExportMode,
    search: Option<String>,
    #[serde(default)]
    significant: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let inputs = ComparisonInputs::from_config(&ctx.config, &ctx.root)
        .context("Failed to set up snapshot sources")?;
    let output_path = ctx.output_path(None);
    let state = Arc::new(AppState::new(inputs, &ctx.root, output_path.clone()));

    let initial = if args.no_initial_run {
        None
    } else {
        match state.refresh().await {
            Ok(result) => Some(result),
            Err(e) => {
                log::warn!("Initial comparison failed: {}", e);
                None
            }
        }
    };
    if initial.is_none() {
        match read_result(&output_path) {
            Ok(result) => {
                log::info!("Serving existing document {}", output_path.display());
                state.replace(result).await;
            }
            Err(e) => log::warn!("No comparison available yet: {:#}", e),
        }
    }

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("Invalid host:port")?;

    println!("Serving DSS comparison at http://{}/api/dss-comparison", addr);
    println!("Press Ctrl+C to stop.\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    Ok(())
}

pub(crate) fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/dss-comparison", get(get_comparison))
        .route("/api/dss-comparison/refresh", post(refresh_comparison))
        .route("/api/dss-comparison/adhoc", post(adhoc_comparison))
        .route("/api/dss-comparison/export.csv", get(export_csv))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl+C: {}", e);
    }
    log::info!("Shutting down");
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_comparison(State(state): State<Arc<AppState>>) -> Response {
    match state.current().await {
        Some(result) => Json(result.as_ref()).into_response(),
        None => no_result(),
    }
}

async fn refresh_comparison(State(state): State<Arc<AppState>>) -> Response {
    match state.refresh().await {
        Ok(result) => Json(json!({
            "success": true,
            "message": "Comparison refreshed",
            "entities": result.entities.len(),
            "periods": result.periods.len(),
        }))
        .into_response(),
        Err(e) => {
            log::error!("Refresh failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": "Failed to refresh comparison",
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

async fn adhoc_comparison(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AdhocRequest>,
) -> Response {
    if request.prior.trim().is_empty() || request.latest.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "message": "Both prior and latest file paths are required",
            })),
        )
            .into_response();
    }

    match state.compare_files(&request.prior, &request.latest).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            log::error!("Ad hoc comparison failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": "Failed to compare files",
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

async fn export_csv(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let Some(result) = state.current().await else {
        return no_result();
    };

    match render_export(&result, query) {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"dss-comparison.csv\"",
                ),
            ],
            body,
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "message": "Invalid export request",
                "error": e.to_string(),
            })),
        )
            .into_response(),
    }
}

fn render_export(result: &ComparisonResult, query: ExportQuery) -> Result<String> {
    let selection = apply_selection(
        result,
        &SelectionArgs {
            input: None,
            weeks: query.weeks,
            search: query.search,
            significant: query.significant,
        },
    )?;
    Ok(to_csv_string(
        result,
        &selection.entities,
        &selection.periods,
        query.mode,
    )?)
}

fn no_result() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "No comparison result available yet",
        })),
    )
        .into_response()
}

#[cfg(test)]
#[path = "server_test.rs"]
mod tests;
