use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use intent_common::{
    EntryRequest, EntryResponse, Error as CommonError, ErrorResponse, HealthResponse,
    HealthStatus, MetricsSnapshot, PredictorKind, RequestId, Result as CommonResult,
};
use intent_runtime::Prediction;
use scopeguard::ScopeGuard;
use tracing::{error, info, warn};

use crate::AppState;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a common error onto an HTTP status and JSON body
pub fn error_response(err: &CommonError, request_id: Option<&RequestId>) -> ApiError {
    let status = StatusCode::from_u16(err.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut body = ErrorResponse::from(err);
    if let Some(id) = request_id {
        body = body.with_request_id(id.as_str());
    }

    (status, Json(body))
}

/// Classify one message with the predictor selected by `kind`.
///
/// Both `/create-entry` and `/create-entry-oos` are routed here; the body is
/// taken raw so that every malformed payload maps to 400.
pub async fn create_entry(
    state: AppState,
    kind: PredictorKind,
    body: Bytes,
) -> Result<Json<EntryResponse>, ApiError> {
    let request_id = state.metrics.start_request(RequestId::new(), kind).await;
    info!(request_id = %request_id, predictor = %kind, "Entry received");

    // Fires only if this future is dropped before an answer is recorded
    let in_flight = scopeguard::guard(
        (state.metrics.clone(), request_id.clone()),
        |(metrics, request_id)| {
            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                runtime.spawn(async move { metrics.abandon_request(&request_id).await });
            }
        },
    );

    let outcome = classify(&state, kind, &body).await;

    let response = match outcome {
        Ok(prediction) => {
            info!(
                request_id = %request_id,
                predictor = %kind,
                label = %prediction.label,
                confidence = prediction.confidence,
                "Entry classified"
            );
            state.metrics.complete_request(&request_id, prediction.label).await;
            Ok(Json(EntryResponse::for_label(prediction.label)))
        }
        Err(e) => {
            if e.is_client_error() {
                warn!(request_id = %request_id, predictor = %kind, "Rejected entry: {}", e);
            } else {
                error!(request_id = %request_id, predictor = %kind, "Prediction failed: {}", e);
            }
            state.metrics.record_error(Some(&request_id), &e).await;
            Err(error_response(&e, Some(&request_id)))
        }
    };

    ScopeGuard::into_inner(in_flight);
    response
}

async fn classify(state: &AppState, kind: PredictorKind, body: &[u8]) -> CommonResult<Prediction> {
    let request = EntryRequest::from_slice(body)?;

    // The model call is synchronous CPU work
    let handle = state.predictors.get(kind).clone();
    let message = request.message;
    match tokio::task::spawn_blocking(move || handle.predict(&message)).await {
        Ok(result) => result,
        Err(e) => Err(CommonError::PredictionFailed(format!("predictor task failed: {}", e))),
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = state.start_time.elapsed()
        .unwrap_or_default()
        .as_secs();

    // Serving implies both models loaded before the listener bound
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        models_loaded: state.predictors.len(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
    })
}

pub async fn get_metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot().await)
}
