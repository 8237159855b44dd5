use super::{ApiError, AppState};
use crate::analysis::AnalysisOutcome;
use crate::reports::load_report;
use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "org-health" }))
}

pub async fn analyze(State(state): State<AppState>, Path(org): Path<String>) -> Result<Json<Value>, ApiError> {
    let cancel = CancellationToken::new();

    // Dropping this request future cancels any in-flight fetch
    let _guard = cancel.clone().drop_guard();

    let outcome = state.analyzer.analyze(&org, Utc::now(), &cancel).await?;

    let body = match outcome {
        AnalysisOutcome::Completed { report, results_file } => {
            let average_score = report.summary.average_score;
            let mut body = serde_json::to_value(&report).map_err(|e| ApiError::Internal(format!("serializing report: {e}")))?;
            if let Value::Object(map) = &mut body {
                let _ = map.insert("average_score".to_string(), json!(average_score));
                let _ = map.insert("results_file".to_string(), json!(results_file.display().to_string()));
            }
            body
        }

        AnalysisOutcome::Empty(reason) => json!({
            "organization": org,
            "status": "empty",
            "reason": reason.as_str(),
            "message": reason.to_string(),
        }),
    };

    Ok(Json(body))
}

pub async fn results(State(state): State<AppState>, Path(org): Path<String>) -> Result<Json<Value>, ApiError> {
    let report = load_report(state.analyzer.results_dir(), &org).map_err(|e| ApiError::Internal(format!("{e:#}")))?;

    let report = report.ok_or(ApiError::ResultsNotFound { org })?;
    let body = serde_json::to_value(&report).map_err(|e| ApiError::Internal(format!("serializing report: {e}")))?;
    Ok(Json(body))
}
