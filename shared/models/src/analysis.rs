//! Analysis batch models and lifecycle.
//!
//! An analysis owns a batch of imported supplier records plus the messages
//! generated from a run. Status moves through a small state machine; the
//! `fallback` flag marks runs completed with locally computed scores after
//! an AI failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle states for an analysis batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    /// Created; suppliers may still be imported
    Pending,
    /// A run is executing
    Processing,
    /// Run finished, scores and messages persisted
    Completed,
    /// AI run failed and the local fallback did not recover it
    Failed,
}

impl AnalysisStatus {
    /// Check if transition is valid
    pub fn can_transition_to(&self, target: AnalysisStatus) -> bool {
        use AnalysisStatus::*;

        match (self, target) {
            (Pending, Processing) => true,

            (Processing, Completed) => true,
            (Processing, Failed) => true,

            // Local fallback scoring recovers a failed AI run
            (Failed, Completed) => true,

            // Re-running simply overwrites previous evaluations
            (Completed, Processing) => true,
            (Failed, Processing) => true,

            _ => false,
        }
    }

    /// Check if no run is currently executing
    pub fn is_settled(&self) -> bool {
        !matches!(self, AnalysisStatus::Processing)
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "PROCESSING" => Some(Self::Processing),
            "COMPLETED" => Some(Self::Completed),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-owned analysis batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Analysis {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: AnalysisStatus,
    /// True when the run completed with locally computed scores
    pub fallback: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for a new analysis.
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        assert!(AnalysisStatus::Pending.can_transition_to(AnalysisStatus::Processing));
        assert!(AnalysisStatus::Processing.can_transition_to(AnalysisStatus::Completed));
        assert!(AnalysisStatus::Processing.can_transition_to(AnalysisStatus::Failed));
        assert!(AnalysisStatus::Failed.can_transition_to(AnalysisStatus::Completed));
        assert!(AnalysisStatus::Completed.can_transition_to(AnalysisStatus::Processing));
        assert!(!AnalysisStatus::Pending.can_transition_to(AnalysisStatus::Completed));
        assert!(!AnalysisStatus::Completed.can_transition_to(AnalysisStatus::Failed));
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            AnalysisStatus::Pending,
            AnalysisStatus::Processing,
            AnalysisStatus::Completed,
            AnalysisStatus::Failed,
        ] {
            assert_eq!(AnalysisStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(AnalysisStatus::from_str("ARCHIVED"), None);
    }
}
