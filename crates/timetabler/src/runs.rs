//! Generation-run tracking.
//!
//! Every generation request gets a deterministic run id derived from its
//! serialized body. The id keys an in-memory registry of recent runs for
//! the status endpoint, and is forwarded to the backend with every
//! submission request so an idempotent upsert can make retries safe.

use crate::model::GenerationSummary;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

/// Identifier of one generation run.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize)]
pub struct RunId(String);

impl RunId {
    /// Wraps an id received over the wire (e.g. a status-endpoint path).
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Derives a run id from the serialized request body.
    ///
    /// The same request always yields the same id, so a retried run maps
    /// to the same backend records.
    pub fn from_request_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = hasher.finalize();
        Self(hex::encode(&digest[..16]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum RunStatus {
    Running,
    Completed {
        summary: GenerationSummary,
        submitted: bool,
    },
    Failed {
        error: String,
    },
}

/// A registry entry.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub run_id: RunId,
    pub department_id: i64,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub state: RunStatus,
}

/// A stored run with its eviction clock.
#[derive(Clone)]
struct StoredRun {
    record: RunRecord,
    /// Refreshed on every state change; the entry expires `ttl` after the
    /// last change, not after the start.
    touched_at: Instant,
}

/// Concurrent in-memory registry of recent generation runs.
///
/// Entries carry a TTL so the map does not grow without bound: expired
/// entries are dropped on lookup and swept on every insert.
pub struct RunRegistry {
    runs: DashMap<RunId, StoredRun>,
    ttl: Duration,
}

impl RunRegistry {
    /// Creates a registry whose entries expire `ttl` after their last
    /// state change.
    pub fn new(ttl: Duration) -> Self {
        Self {
            runs: DashMap::new(),
            ttl,
        }
    }

    /// Creates a registry with a 1-hour TTL.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::from_secs(60 * 60))
    }

    /// Records the start of a run, sweeping expired entries first.
    pub fn start(&self, run_id: RunId, department_id: i64) {
        self.evict_expired();
        self.runs.insert(
            run_id.clone(),
            StoredRun {
                record: RunRecord {
                    run_id,
                    department_id,
                    started_at: Utc::now(),
                    finished_at: None,
                    state: RunStatus::Running,
                },
                touched_at: Instant::now(),
            },
        );
    }

    /// Marks a run completed with its summary.
    pub fn complete(&self, run_id: &RunId, summary: GenerationSummary, submitted: bool) {
        if let Some(mut entry) = self.runs.get_mut(run_id) {
            entry.record.finished_at = Some(Utc::now());
            entry.record.state = RunStatus::Completed { summary, submitted };
            entry.touched_at = Instant::now();
        }
    }

    /// Marks a run failed.
    pub fn fail(&self, run_id: &RunId, error: String) {
        if let Some(mut entry) = self.runs.get_mut(run_id) {
            entry.record.finished_at = Some(Utc::now());
            entry.record.state = RunStatus::Failed { error };
            entry.touched_at = Instant::now();
        }
    }

    /// Gets a run if it exists and hasn't expired.
    pub fn get(&self, run_id: &RunId) -> Option<RunRecord> {
        self.runs.get(run_id).and_then(|entry| {
            if entry.touched_at.elapsed() < self.ttl {
                Some(entry.record.clone())
            } else {
                drop(entry);
                self.runs.remove(run_id);
                None
            }
        })
    }

    /// Removes expired entries.
    pub fn evict_expired(&self) {
        self.runs
            .retain(|_, entry| entry.touched_at.elapsed() < self.ttl);
    }

    /// Number of stored entries, including not-yet-swept expired ones.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

impl Default for RunRegistry {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}
