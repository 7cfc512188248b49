//! HTTP boundary for both pipeline operations.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /healthz` | `200` |
//! | `GET /extract/{file}` | `{"Message": ..., "fileName": ...}` |
//! | `GET /rank/{file}/{topic}` | `{}`, one object, or an array |
//!
//! A missing link list or CSV answers `404`; other failures answer `500`.
//! Error bodies are `{"error": "..."}`.

use crate::config::Settings;
use crate::error::PipelineError;
use crate::extract::Extractor;
use crate::fetch::{Fetch, build_fetcher};
use crate::models::{ExtractSummary, RankResponse};
use crate::ranker::Ranker;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Shared, read-only state behind every request.
#[derive(Debug)]
pub struct AppState<F> {
    pub extractor: Extractor<F>,
    pub ranker: Ranker,
}

impl<F> AppState<F>
where
    F: Fetch + Sync,
{
    pub fn new(fetcher: F, settings: Settings) -> Self {
        let ranker = Ranker::from_settings(&settings);
        Self {
            extractor: Extractor::new(fetcher, settings),
            ranker,
        }
    }

    fn settings(&self) -> &Settings {
        self.extractor.settings()
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = match &self {
            PipelineError::MissingInput { .. } => StatusCode::NOT_FOUND,
            PipelineError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router<F>(state: Arc<AppState<F>>) -> Router
where
    F: Fetch + Send + Sync + 'static,
{
    Router::new()
        .route("/healthz", get(healthz))
        .route("/extract/{file}", get(extract_handler::<F>))
        .route("/rank/{file}/{topic}", get(rank_handler::<F>))
        .with_state(state)
}

/// Bind `settings.bind` and serve until the process is stopped.
#[instrument(level = "info", skip_all, fields(bind = %settings.bind))]
pub async fn serve(settings: Settings) -> Result<(), Box<dyn Error>> {
    let addr: SocketAddr = settings.bind.parse()?;
    let fetcher = build_fetcher(&settings)?;
    let state = Arc::new(AppState::new(fetcher, settings));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn extract_handler<F>(
    State(state): State<Arc<AppState<F>>>,
    Path(file): Path<String>,
) -> Result<Json<ExtractSummary>, PipelineError>
where
    F: Fetch + Send + Sync + 'static,
{
    let summary = state.extractor.run(&file).await?;
    Ok(Json(summary))
}

async fn rank_handler<F>(
    State(state): State<Arc<AppState<F>>>,
    Path((file, topic)): Path<(String, String)>,
) -> Result<Json<RankResponse>, PipelineError>
where
    F: Fetch + Send + Sync + 'static,
{
    let ranker = state.ranker.clone();
    let corpus_dir = state.settings().output_dir.clone();
    let always_array = state.settings().always_array;

    // Ranking is CPU-bound; keep it off the async workers.
    let response = tokio::task::spawn_blocking(move || {
        ranker.rank_file(&corpus_dir, &file, &topic, always_array)
    })
    .await
    .map_err(|e| PipelineError::Io(std::io::Error::other(e)))??;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::models::ArticleRecord;
    use crate::outputs::csv::write_records;

    struct OfflineFetcher;

    impl Fetch for OfflineFetcher {
        async fn fetch(&self, url: &str, _user_agent: Option<&str>) -> Result<String, FetchError> {
            Err(FetchError::Status {
                status: 503,
                url: url.to_string(),
            })
        }
    }

    fn state_in(root: &std::path::Path) -> Arc<AppState<OfflineFetcher>> {
        let settings = Settings {
            link_dir: root.join("LinkFiles"),
            output_dir: root.join("BlogsData"),
            ..Settings::default()
        };
        Arc::new(AppState::new(OfflineFetcher, settings))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_rank_missing_csv_is_404() {
        let root = tempfile::tempdir().unwrap();
        let result = rank_handler(
            State(state_in(root.path())),
            Path(("absent.csv".to_string(), "dubai".to_string())),
        )
        .await;
        let response = result.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("absent.csv"));
    }

    #[tokio::test]
    async fn test_rank_single_match_is_bare_object() {
        let root = tempfile::tempdir().unwrap();
        let state = state_in(root.path());
        std::fs::create_dir_all(&state.settings().output_dir).unwrap();
        let rows = vec![
            ArticleRecord {
                title: "Living in JVC".to_string(),
                meta_description: "Family community".to_string(),
                ..ArticleRecord::default()
            },
            ArticleRecord {
                title: "Dubai Marina".to_string(),
                meta_description: "Waterfront".to_string(),
                ..ArticleRecord::default()
            },
        ];
        write_records(&state.settings().output_dir.join("links-1.csv"), &rows).unwrap();

        let result = rank_handler(
            State(state),
            Path(("links-1.csv".to_string(), "living in JVC".to_string())),
        )
        .await;
        let response = result.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["Title"], "Living in JVC");
        assert_eq!(body["Topic"], "living in JVC");
    }

    #[tokio::test]
    async fn test_extract_writes_placeholder_rows_when_offline() {
        let root = tempfile::tempdir().unwrap();
        let state = state_in(root.path());
        std::fs::create_dir_all(&state.settings().link_dir).unwrap();
        std::fs::write(
            state.settings().link_dir.join("links.txt"),
            "https://www.propertyfinder.ae/blog/a/\nhttps://unknown.example/b\n",
        )
        .unwrap();

        let Json(summary) = extract_handler(State(Arc::clone(&state)), Path("links.txt".to_string()))
            .await
            .unwrap();
        assert_eq!(summary.message, "Data extraction and storage complete.");

        let corpus = crate::outputs::csv::load_corpus(
            &state.settings().output_dir.join(&summary.file_name),
        )
        .unwrap();
        assert_eq!(corpus.rows, vec![ArticleRecord::filled_with("N/A")]);
    }
}
