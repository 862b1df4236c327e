//! Schedule submission with size-aware batching.
//!
//! Small runs go up in one request with a timeout scaled to the payload
//! size. Large runs (over the size and row thresholds) are split into
//! fixed-size batches submitted strictly sequentially; each batch must be
//! acknowledged before the next is sent, and the first failure aborts the
//! run. Earlier batches are not rolled back: the write policy is
//! at-least-once and non-atomic, and every request carries the generation
//! run id so a backend upsert keyed on it makes retries safe.

use super::client::ApiClient;
use super::error::ApiError;
use crate::model::Assignment;
use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Rows per batch in batch mode.
pub const BATCH_SIZE: usize = 2000;

/// Fixed per-batch request timeout.
pub const BATCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Body ceiling for a single-shot submission.
const SINGLE_SHOT_LIMIT_MB: u64 = 100;

/// Body ceiling for one batch request.
const BATCH_LIMIT_MB: u64 = 20;

/// Batch mode is selected up front only when the payload exceeds this size
/// AND [`BATCH_ROW_THRESHOLD`].
const BATCH_SIZE_THRESHOLD_MB: f64 = 10.0;
const BATCH_ROW_THRESHOLD: usize = 1000;

/// Minimum row count for falling back to batch mode after a
/// payload-too-large rejection of a single-shot attempt.
const FALLBACK_ROW_THRESHOLD: usize = 500;

/// Parameters common to every submission request of a run.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionParams {
    pub department_id: i64,
    pub semester_start: NaiveDate,
    pub total_weeks: u32,
    /// Deterministic run id; doubles as the backend's idempotency key.
    pub generation_run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// How a submission will be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStrategy {
    SingleShot { timeout: Duration },
    Batched,
}

/// Picks the delivery strategy for a payload.
///
/// Both thresholds must be exceeded for up-front batch mode; a payload
/// that is big in bytes but short in rows still goes single-shot (and may
/// fall back after a 413).
pub fn select_strategy(payload_mb: f64, rows: usize) -> SubmitStrategy {
    if payload_mb > BATCH_SIZE_THRESHOLD_MB && rows > BATCH_ROW_THRESHOLD {
        SubmitStrategy::Batched
    } else {
        SubmitStrategy::SingleShot {
            timeout: single_shot_timeout(payload_mb),
        }
    }
}

/// Single-shot timeout: 10 s per MB, clamped to 30 s..=180 s.
pub fn single_shot_timeout(payload_mb: f64) -> Duration {
    let ms = (payload_mb * 10_000.0).clamp(30_000.0, 180_000.0);
    Duration::from_millis(ms as u64)
}

fn payload_mb(serialized_len: usize) -> f64 {
    serialized_len as f64 / (1024.0 * 1024.0)
}

/// Submits a generated assignment list to `POST /schedule/generate`.
///
/// Returns the backend's response body; in batch mode this is the last
/// batch's body augmented with a `batchProcessing` summary.
pub async fn submit_schedule(
    client: &ApiClient,
    params: &SubmissionParams,
    details: &[Assignment],
) -> Result<Value, ApiError> {
    let correlation_id = generate_correlation_id();
    let payload = build_payload(params, details);
    let serialized_len = serde_json::to_string(&payload)?.len();
    let size_mb = payload_mb(serialized_len);

    info!(
        correlation_id = %correlation_id,
        run_id = %params.generation_run_id,
        rows = details.len(),
        size_mb,
        "Submitting schedule"
    );

    match select_strategy(size_mb, details.len()) {
        SubmitStrategy::Batched => {
            submit_batched(client, params, details, &correlation_id).await
        }
        SubmitStrategy::SingleShot { timeout } => {
            if size_mb > SINGLE_SHOT_LIMIT_MB as f64 {
                return Err(ApiError::PayloadTooLarge {
                    size_mb,
                    limit_mb: SINGLE_SHOT_LIMIT_MB,
                });
            }

            match post_schedule(client, &payload, timeout).await {
                Ok(body) => Ok(body),
                Err(e) if e.is_payload_too_large() && details.len() > FALLBACK_ROW_THRESHOLD => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %e,
                        "Single-shot submission rejected for size, retrying in batches"
                    );
                    submit_batched(client, params, details, &correlation_id).await
                }
                Err(e) => Err(e),
            }
        }
    }
}

/// Submits the assignment list as sequential fixed-size batches.
async fn submit_batched(
    client: &ApiClient,
    params: &SubmissionParams,
    details: &[Assignment],
    correlation_id: &str,
) -> Result<Value, ApiError> {
    let chunks: Vec<&[Assignment]> = details.chunks(BATCH_SIZE).collect();
    let total_batches = chunks.len();
    let start = Instant::now();

    info!(
        correlation_id = %correlation_id,
        total_batches,
        rows = details.len(),
        "Starting batch submission"
    );

    let mut last_response = Value::Null;
    let mut total_processed = 0usize;

    for (index, chunk) in chunks.iter().enumerate() {
        let batch_id = index + 1;
        let payload = build_batch_payload(params, chunk, batch_id, total_batches);
        let serialized_len = serde_json::to_string(&payload)?.len();
        let size_mb = payload_mb(serialized_len);
        if size_mb > BATCH_LIMIT_MB as f64 {
            return Err(ApiError::PayloadTooLarge {
                size_mb,
                limit_mb: BATCH_LIMIT_MB,
            });
        }

        match post_schedule(client, &payload, BATCH_TIMEOUT).await {
            Ok(body) => {
                total_processed += chunk.len();
                info!(
                    correlation_id = %correlation_id,
                    batch = batch_id,
                    total_batches,
                    rows = chunk.len(),
                    "Batch acknowledged"
                );
                last_response = body;
            }
            Err(e) => {
                // No rollback of earlier batches; the error names the
                // failing batch so the caller knows how far the run got.
                error!(
                    correlation_id = %correlation_id,
                    batch = batch_id,
                    total_batches,
                    error = %e,
                    "Batch submission failed, aborting run"
                );
                return Err(ApiError::BatchFailed {
                    batch: batch_id,
                    total: total_batches,
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        correlation_id = %correlation_id,
        total_batches,
        total_processed,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Batch submission complete"
    );

    Ok(aggregate_batch_result(
        last_response,
        total_batches,
        total_processed,
    ))
}

/// Issues one `POST /schedule/generate` request and validates the ack.
async fn post_schedule(
    client: &ApiClient,
    payload: &Value,
    timeout: Duration,
) -> Result<Value, ApiError> {
    let url = client.endpoint("schedule/generate");
    let response = client
        .submit_client()
        .post(&url)
        .timeout(timeout)
        .json(payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::UnexpectedStatus {
            status: status.as_u16(),
            message: body,
        });
    }

    let body: Value = response.json().await.map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })?;

    // The backend acknowledges with { "success": true, ... }.
    match body.get("success").and_then(Value::as_bool) {
        Some(true) => Ok(body),
        _ => {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("backend did not report success")
                .to_string();
            Err(ApiError::Rejected { message })
        }
    }
}

fn build_payload(params: &SubmissionParams, details: &[Assignment]) -> Value {
    let mut body = serde_json::to_value(params).unwrap_or(Value::Null);
    body["schedule_details"] = serde_json::to_value(details).unwrap_or(Value::Null);
    body
}

fn build_batch_payload(
    params: &SubmissionParams,
    chunk: &[Assignment],
    batch_id: usize,
    total_batches: usize,
) -> Value {
    let mut body = build_payload(params, chunk);
    body["is_batch_process"] = json!(true);
    body["batch_id"] = json!(batch_id);
    body["total_batches"] = json!(total_batches);
    body
}

/// Augments the final batch response with the run-wide totals.
fn aggregate_batch_result(mut last: Value, total_batches: usize, total_processed: usize) -> Value {
    if !last.is_object() {
        last = json!({ "success": true });
    }
    last["batchProcessing"] = json!({
        "totalBatches": total_batches,
        "totalProcessed": total_processed,
    });
    last
}

/// Generates a unique correlation ID for request tracing.
fn generate_correlation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp & 0xFFFFFFFF, random)
}
