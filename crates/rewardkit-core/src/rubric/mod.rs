//! Rubric scoring through a hosted model
//!
//! Stages of one run: load the rubric config, select a dataset record, resolve
//! provider/model/credentials, build the request context, invoke the scorer and
//! bound its score to the rubric's range. Nothing is retried locally.

pub mod config;
pub mod context;
pub mod dataset;
pub mod model;
pub mod pipeline;

pub use config::{load_rubric_config, parse_rubric_config, DocumentFormat, RubricConfig};
pub use context::{build_request_context, normalize_result, RequestContext, ScoreOutcome};
pub use dataset::{load_records, parse_records, select_record, ChatMessage, DatasetRecord};
pub use model::{resolve_model_settings, ModelInfo, ModelSettings};
pub use pipeline::{run_rubric, score_record, RubricOutcome, RubricRun, Stage};

/// Trim `value`; blank strings read as absent
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
