//! Reports API Handlers

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use http::header;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::reports::build_report;
use crate::utils::time;
use crate::utils::{AppError, AppResult};
use shared::{AppResponse, OutletRef, ReportResponse, SourceCounts};

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub outlet_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl ReportQuery {
    /// Extract and validate the parameters. The outlet id is required;
    /// dates are optional but must be ISO `YYYY-MM-DD` when present.
    fn validate(&self) -> AppResult<(String, Option<NaiveDate>, Option<NaiveDate>)> {
        let outlet_id = self
            .outlet_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::validation("Outlet ID is required"))?;

        let date_from = self
            .date_from
            .as_deref()
            .map(time::parse_date)
            .transpose()?;
        let date_to = self.date_to.as_deref().map(time::parse_date).transpose()?;

        Ok((outlet_id.to_string(), date_from, date_to))
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Outlet discovery payload, flattened into the response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutletsPayload {
    pub outlets: Vec<OutletRef>,
    pub total_records: SourceCounts,
    /// True when served from the discovery cache without rescanning.
    pub cached: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/reports/outlets - discovered outlet list
pub async fn outlets(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<OutletsPayload>>> {
    let (info, cached) = state.outlets.discover(state.fetcher.as_ref()).await?;
    Ok(Json(AppResponse::success(OutletsPayload {
        outlets: info.outlets,
        total_records: info.total_records,
        cached,
    })))
}

/// GET /api/reports?outletId=..&dateFrom=..&dateTo=.. - reconciled report
pub async fn report(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<AppResponse<ReportResponse>>> {
    let (outlet_id, date_from, date_to) = query.validate()?;
    let report = build_report(
        state.fetcher.as_ref(),
        &outlet_id,
        date_from,
        date_to,
        state.config.report_sample_limit,
    )
    .await?;
    Ok(Json(AppResponse::success(report)))
}

/// GET /api/reports/export?outletId=..&dateFrom=..&dateTo=.. - CSV download
///
/// Same validation, fetch and reconciliation as the JSON report; only the
/// rendering differs.
pub async fn export(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    let (outlet_id, date_from, date_to) = query.validate()?;
    let report = build_report(
        state.fetcher.as_ref(),
        &outlet_id,
        date_from,
        date_to,
        state.config.report_sample_limit,
    )
    .await?;

    let csv = render_csv(&report)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"outlet-report.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

fn render_csv(report: &ReportResponse) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "Date",
            "Sales Qty",
            "NECC Rate",
            "Total Amount",
            "Digital Pay",
            "Cash Pay",
            "Total Recv",
            "Difference",
        ])
        .map_err(|e| AppError::internal(format!("CSV write failed: {e}")))?;

    for t in &report.transactions {
        writer
            .write_record([
                t.date.clone(),
                t.sales_qty.to_string(),
                t.necc_rate.to_string(),
                t.total_amount.to_string(),
                t.digital_pay.to_string(),
                t.cash_pay.to_string(),
                t.total_recv.to_string(),
                t.difference.to_string(),
            ])
            .map_err(|e| AppError::internal(format!("CSV write failed: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("CSV write failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::internal(format!("CSV encoding failed: {e}")))
}
