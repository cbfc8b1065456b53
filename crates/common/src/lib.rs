pub mod dto;
pub mod error;
pub mod labels;
pub mod observability;


pub use dto::*;
pub use error::{Error, Result, ErrorResponse};
pub use labels::{ClassLabel, PredictorKind, Vocabulary};
pub use observability::{ErrorCategory, MetricsSnapshot, ObservableMetrics, RecentError, RequestId};
