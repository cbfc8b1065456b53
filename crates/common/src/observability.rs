use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use serde::Serialize;
use uuid::Uuid;
use crate::labels::{ClassLabel, PredictorKind};

const MAX_SAMPLES: usize = 10000;
const MAX_RECENT_ERRORS: usize = 100;

/// Request correlation ID for tracing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(Arc<str>);

impl Serialize for RequestId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error categories for metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    BadRequest,      // 400 - Client error
    NotFound,        // 404 - Unknown route or asset
    Unavailable,     // 503 - Model not loaded
    Prediction,      // 500 - Predictor failed
    Internal,        // 500 - Anything else
}

impl ErrorCategory {
    pub fn from_error(error: &crate::Error) -> Self {
        match error {
            crate::Error::BadRequest(_) => ErrorCategory::BadRequest,
            crate::Error::NotFound(_) => ErrorCategory::NotFound,
            crate::Error::ModelLoadFailed(_) => ErrorCategory::Unavailable,
            crate::Error::PredictionFailed(_) => ErrorCategory::Prediction,
            _ => ErrorCategory::Internal,
        }
    }
}

/// In-flight classification request
#[derive(Debug, Clone)]
pub struct ActiveRequest {
    pub request_id: RequestId,
    pub started_at: Instant,
    pub kind: PredictorKind,
}

/// Request counters and latency samples for the classification endpoints
#[derive(Debug, Clone)]
pub struct ObservableMetrics {
    inner: Arc<RwLock<MetricsData>>,
    start_time: Instant,
}

#[derive(Debug, Default)]
struct MetricsData {
    total_requests: u64,
    completed_requests: u64,
    cancelled_requests: u64,
    requests_by_predictor: HashMap<PredictorKind, u64>,
    active_requests: HashMap<RequestId, ActiveRequest>,

    request_durations: VecDeque<u64>,

    predictions_by_label: HashMap<ClassLabel, u64>,

    errors_by_category: HashMap<ErrorCategory, u64>,
    error_messages: VecDeque<(Instant, ErrorCategory, String)>,
}

impl Default for ObservableMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservableMetrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MetricsData::default())),
            start_time: Instant::now(),
        }
    }

    /// Start tracking a request
    pub async fn start_request(&self, request_id: RequestId, kind: PredictorKind) -> RequestId {
        let mut data = self.inner.write().await;

        data.total_requests += 1;
        *data.requests_by_predictor.entry(kind).or_insert(0) += 1;

        data.active_requests.insert(request_id.clone(), ActiveRequest {
            request_id: request_id.clone(),
            started_at: Instant::now(),
            kind,
        });

        request_id
    }

    /// Complete a request with the label it was answered with
    pub async fn complete_request(&self, request_id: &RequestId, label: ClassLabel) {
        let mut data = self.inner.write().await;

        if let Some(request) = data.active_requests.remove(request_id) {
            let duration_ms = request.started_at.elapsed().as_millis() as u64;

            data.request_durations.push_back(duration_ms);
            if data.request_durations.len() > MAX_SAMPLES {
                data.request_durations.pop_front();
            }
            data.completed_requests += 1;
            *data.predictions_by_label.entry(label).or_insert(0) += 1;
        }
    }

    /// Forget a request whose caller went away before it was answered
    pub async fn abandon_request(&self, request_id: &RequestId) {
        let mut data = self.inner.write().await;

        if data.active_requests.remove(request_id).is_some() {
            data.cancelled_requests += 1;
        }
    }

    /// Record an error with category
    pub async fn record_error(&self, request_id: Option<&RequestId>, error: &crate::Error) {
        let mut data = self.inner.write().await;

        let category = ErrorCategory::from_error(error);
        *data.errors_by_category.entry(category).or_insert(0) += 1;

        data.error_messages.push_back((Instant::now(), category, error.to_string()));
        if data.error_messages.len() > MAX_RECENT_ERRORS {
            data.error_messages.pop_front();
        }

        if let Some(id) = request_id {
            data.active_requests.remove(id);
        }
    }

    /// Calculate percentile from samples
    fn calculate_percentile(samples: &[u64], percentile: f64) -> u64 {
        if samples.is_empty() {
            return 0;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_unstable();

        let index = ((percentile / 100.0) * (sorted.len() - 1) as f64) as usize;
        sorted[index]
    }

    /// Get detailed metrics snapshot
    pub async fn snapshot(&self) -> MetricsSnapshot {
        let data = self.inner.read().await;

        let duration_samples: Vec<u64> = data.request_durations.iter().copied().collect();

        MetricsSnapshot {
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            uptime_seconds: self.start_time.elapsed().as_secs(),

            total_requests: data.total_requests,
            completed_requests: data.completed_requests,
            cancelled_requests: data.cancelled_requests,
            active_requests: data.active_requests.len() as u64,
            requests_by_predictor: data.requests_by_predictor.clone(),

            request_duration_p50_ms: Self::calculate_percentile(&duration_samples, 50.0),
            request_duration_p95_ms: Self::calculate_percentile(&duration_samples, 95.0),
            request_duration_p99_ms: Self::calculate_percentile(&duration_samples, 99.0),

            predictions_by_label: data.predictions_by_label.clone(),
            errors_by_category: data.errors_by_category.clone(),
            recent_errors: data.recent_errors(),
        }
    }

    /// Get recent errors for debugging, oldest first
    pub async fn recent_errors(&self) -> Vec<RecentError> {
        let data = self.inner.read().await;
        data.recent_errors()
    }
}

impl MetricsData {
    fn recent_errors(&self) -> Vec<RecentError> {
        let now = Instant::now();

        self.error_messages
            .iter()
            .map(|(time, category, msg)| RecentError {
                age_seconds: now.duration_since(*time).as_secs(),
                category: *category,
                message: msg.clone(),
            })
            .collect()
    }
}

/// An error kept in the bounded recent-error window
#[derive(Debug, Clone, Serialize)]
pub struct RecentError {
    pub age_seconds: u64,
    pub category: ErrorCategory,
    pub message: String,
}

/// Metrics snapshot for the /metrics endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: u64,
    pub uptime_seconds: u64,

    // Request counts
    pub total_requests: u64,
    pub completed_requests: u64,
    pub cancelled_requests: u64,
    pub active_requests: u64,
    pub requests_by_predictor: HashMap<PredictorKind, u64>,

    // Latency percentiles (milliseconds)
    pub request_duration_p50_ms: u64,
    pub request_duration_p95_ms: u64,
    pub request_duration_p99_ms: u64,

    pub predictions_by_label: HashMap<ClassLabel, u64>,
    pub errors_by_category: HashMap<ErrorCategory, u64>,
    pub recent_errors: Vec<RecentError>,
}
