//! Per-area processing report

use serde::Serialize;

/// Pipeline stage names, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Acquire,
    Merge,
    Buffer,
    Centerline,
    Topology,
    Polygonize,
    Sample,
}

/// Outcome of one stage: how much it produced, how much it skipped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub produced: usize,
    pub skipped: usize,
}

/// Aggregated per-area outcome, returned to the caller instead of
/// living only in the logs.
#[derive(Debug, Clone, Serialize)]
pub struct AreaReport {
    pub area: String,
    pub stages: Vec<StageRecord>,
}

impl AreaReport {
    pub fn new(area: impl Into<String>) -> Self {
        Self {
            area: area.into(),
            stages: Vec::new(),
        }
    }

    pub fn record(&mut self, stage: Stage, produced: usize, skipped: usize) {
        self.stages.push(StageRecord {
            stage,
            produced,
            skipped,
        });
    }

    /// Total skipped sub-steps across all stages.
    pub fn total_skipped(&self) -> usize {
        self.stages.iter().map(|s| s.skipped).sum()
    }
}
