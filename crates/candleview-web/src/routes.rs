use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use candleview_core::{
    CandleRecord, CandleRequest, DiagnosticsRecord, Instrument, IntervalOption,
};
use tracing::{debug, warn};

use crate::dashboard;
use crate::error::ApiError;
use crate::AppState;

/// Raw `/api/candles` query string; empty values are resolved as absent.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CandleParams {
    pub figi: Option<String>,
    pub interval: Option<String>,
}

impl CandleParams {
    /// Pick parameters from decoded query pairs.
    ///
    /// A repeated key keeps its first value; unrelated keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "figi" => &mut params.figi,
                "interval" => &mut params.interval,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let instruments = match state.catalog.list_enabled_instruments().await {
        Ok(instruments) => instruments,
        Err(error) => {
            warn!(%error, "instrument listing failed; rendering dashboard without instruments");
            Vec::new()
        }
    };

    Html(dashboard::render(
        &instruments,
        state.catalog.list_supported_intervals(),
        &state.defaults,
    ))
}

pub async fn candles(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<CandleRecord>>, ApiError> {
    let params = CandleParams::from_pairs(pairs);
    let request = CandleRequest::resolve(params.figi, params.interval, &state.defaults);
    if !request.is_advertised_interval() {
        debug!(interval = %request.interval, "interval is not an advertised code");
    }
    let candles = state.engine.query(&request).await?;
    Ok(Json(candles.iter().map(CandleRecord::from).collect()))
}

pub async fn instruments(State(state): State<AppState>) -> Result<Json<Vec<Instrument>>, ApiError> {
    Ok(Json(state.catalog.list_enabled_instruments().await?))
}

pub async fn intervals(State(state): State<AppState>) -> Json<&'static [IntervalOption]> {
    Json(state.catalog.list_supported_intervals())
}

pub async fn debug(State(state): State<AppState>) -> Result<Json<DiagnosticsRecord>, ApiError> {
    let diagnostics = state.engine.diagnostics().await?;
    Ok(Json(DiagnosticsRecord::from(diagnostics)))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Page not found")
}
