use axum::{extract::State, http::Method, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    error::AppError,
    models::{Row, SalesSummary},
    services::{file_processor, report},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/reports/analyze", post(analyze_file))
        .route("/reports/rows", post(analyze_inline))
        .layer(cors)
}

#[derive(Debug, Deserialize)]
pub struct FileInfo {
    #[serde(rename = "type")]
    file_type: String,
    signed_url: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    files: Vec<FileInfo>,
}

#[derive(Debug, Deserialize)]
pub struct RowsRequest {
    rows: Vec<Row>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    rows_received: usize,
    summary: SalesSummary,
}

#[axum::debug_handler]
async fn analyze_file(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    let start = std::time::Instant::now();

    let file_info = request
        .files
        .first()
        .ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    tracing::info!(
        "Processing file type: {}, URL length: {}",
        file_info.file_type,
        file_info.signed_url.len()
    );

    let file_type = file_info.file_type.to_lowercase();
    if !file_type.contains("csv") && !file_type.contains("xlsx") {
        tracing::error!("Unsupported file type: {}", file_info.file_type);
        return Err(AppError::InvalidInput(
            "Only XLSX and CSV files are supported".to_string(),
        ));
    }

    let download_start = std::time::Instant::now();
    let file_data = file_processor::load_file_from_url(&file_info.signed_url).await?;
    tracing::info!(
        "File downloaded, size: {}KB, took: {:?}",
        file_data.len() / 1024,
        download_start.elapsed()
    );

    if file_data.len() > state.config.max_file_size {
        return Err(AppError::InvalidInput(format!(
            "File exceeds maximum size of {} bytes",
            state.config.max_file_size
        )));
    }

    let rows = if file_type.contains("csv") {
        file_processor::rows_from_csv(file_data)?
    } else {
        file_processor::rows_from_xlsx(file_data)?
    };
    tracing::info!("Parsed {} rows from file", rows.len());

    let summary = report::analyze_rows(&rows)?;
    tracing::info!(
        "Report built in {:?} ({} rows skipped)",
        start.elapsed(),
        summary.skipped_rows
    );

    Ok(Json(ReportResponse {
        rows_received: rows.len(),
        summary,
    }))
}

#[axum::debug_handler]
async fn analyze_inline(
    Json(request): Json<RowsRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    let start = std::time::Instant::now();

    let summary = report::analyze_rows(&request.rows)?;
    tracing::info!(
        "Report built in {:?} from {} inline rows",
        start.elapsed(),
        request.rows.len()
    );

    Ok(Json(ReportResponse {
        rows_received: request.rows.len(),
        summary,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows_request(values: &[serde_json::Value]) -> RowsRequest {
        RowsRequest {
            rows: values
                .iter()
                .map(|v| v.as_object().expect("test row must be an object").clone())
                .collect(),
        }
    }

    #[test]
    fn inline_rows_produce_a_summary() {
        let request = rows_request(&[
            json!({ "Product": "Kemeja", "Qty": 10, "Harga": 50000 }),
            json!({ "Product": "Polo", "Qty": 2, "Harga": 30000 }),
        ]);

        let Json(response) = tokio_test::block_on(analyze_inline(Json(request))).unwrap();
        assert_eq!(response.rows_received, 2);
        assert_eq!(response.summary.total_units, 12.0);
        assert_eq!(response.summary.product_count, 2);
    }

    #[test]
    fn empty_inline_rows_are_rejected() {
        let request = rows_request(&[]);

        match tokio_test::block_on(analyze_inline(Json(request))) {
            Err(AppError::EmptyInput) => {}
            other => panic!("expected EmptyInput, got {:?}", other.map(|_| ())),
        }
    }
}
