//! End-to-end rubric scoring for one invocation

use std::fmt;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use super::config::{load_rubric_config, RubricConfig};
use super::context::{build_request_context, normalize_result};
use super::dataset::{load_records, select_record, DatasetRecord};
use super::model::resolve_model_settings;
use crate::error::Result;
use crate::scorer::RubricScorer;
use crate::settings::EnvSource;
use crate::trace_time;

/// Pipeline stages, in order. Any failure ends the run in [`Stage::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadingConfig,
    SelectingRecord,
    ResolvingCredentials,
    BuildingContext,
    InvokingScorer,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::LoadingConfig => "loading_config",
            Stage::SelectingRecord => "selecting_record",
            Stage::ResolvingCredentials => "resolving_credentials",
            Stage::BuildingContext => "building_context",
            Stage::InvokingScorer => "invoking_scorer",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

struct StageTracker {
    current: Stage,
    entered: Instant,
}

impl StageTracker {
    fn new() -> Self {
        tracing::debug!(stage = %Stage::LoadingConfig, "rubric stage");
        Self {
            current: Stage::LoadingConfig,
            entered: Instant::now(),
        }
    }

    fn enter(&mut self, next: Stage) {
        trace_time!(self.entered, "rubric_stage_elapsed", stage = self.current.to_string());
        tracing::debug!(from = %self.current, to = %next, "rubric stage");
        self.current = next;
        self.entered = Instant::now();
    }
}

/// Inputs for a file-driven rubric run
#[derive(Debug, Clone, Copy)]
pub struct RubricRun<'a> {
    pub config_path: &'a Path,
    pub data_path: &'a Path,
    pub rubric_id: Option<&'a str>,
    pub conversation_id: Option<&'a str>,
    pub capture_details: bool,
}

/// Result of a rubric run, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RubricOutcome {
    pub rubric_id: String,
    pub provider: String,
    pub model: String,
    pub score: f64,
    pub score_min: f64,
    pub score_max: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Load config and dataset from disk, then score the selected record.
pub fn run_rubric(
    run: &RubricRun<'_>,
    env: &dyn EnvSource,
    scorer: &dyn RubricScorer,
) -> Result<RubricOutcome> {
    let mut tracker = StageTracker::new();
    let result = run_stages(run, env, scorer, &mut tracker);
    finish(&mut tracker, result)
}

/// Score an already-selected record against an already-loaded rubric.
pub fn score_record(
    config: &RubricConfig,
    record: &DatasetRecord,
    capture_details: bool,
    env: &dyn EnvSource,
    scorer: &dyn RubricScorer,
) -> Result<RubricOutcome> {
    let mut tracker = StageTracker::new();
    tracker.enter(Stage::SelectingRecord);
    let result = score_stages(config, record, capture_details, env, scorer, &mut tracker);
    finish(&mut tracker, result)
}

fn finish(tracker: &mut StageTracker, result: Result<RubricOutcome>) -> Result<RubricOutcome> {
    match &result {
        Ok(outcome) => {
            tracker.enter(Stage::Done);
            tracing::info!(
                rubric_id = %outcome.rubric_id,
                provider = %outcome.provider,
                model = %outcome.model,
                score = outcome.score,
                "rubric scored"
            );
        }
        Err(err) => {
            tracing::debug!(stage = %tracker.current, error = %err, "rubric run failed");
            tracker.enter(Stage::Failed);
        }
    }
    result
}

fn run_stages(
    run: &RubricRun<'_>,
    env: &dyn EnvSource,
    scorer: &dyn RubricScorer,
    tracker: &mut StageTracker,
) -> Result<RubricOutcome> {
    let config = load_rubric_config(run.config_path, run.rubric_id)?;

    tracker.enter(Stage::SelectingRecord);
    let records = load_records(run.data_path)?;
    let record = select_record(&records, Some(config.rubric_id.as_str()), run.conversation_id)?;

    score_stages(&config, record, run.capture_details, env, scorer, tracker)
}

fn score_stages(
    config: &RubricConfig,
    record: &DatasetRecord,
    capture_details: bool,
    env: &dyn EnvSource,
    scorer: &dyn RubricScorer,
    tracker: &mut StageTracker,
) -> Result<RubricOutcome> {
    tracker.enter(Stage::ResolvingCredentials);
    let model = resolve_model_settings(&config.model_info, env)?;

    tracker.enter(Stage::BuildingContext);
    let context = build_request_context(config, record, model, capture_details)?;

    tracker.enter(Stage::InvokingScorer);
    let raw = scorer.evaluate(&context)?;
    let mut outcome = normalize_result(raw, capture_details)?;
    outcome.score = outcome.score.clamp(context.score_min, context.score_max);

    Ok(RubricOutcome {
        rubric_id: context.rubric_id,
        provider: context.model.provider,
        model: context.model.model,
        score: outcome.score,
        score_min: context.score_min,
        score_max: context.score_max,
        conversation_id: context.conversation_id,
        explanation: outcome.explanation,
        details: outcome.details,
    })
}
