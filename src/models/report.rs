//! Snapshot-level models: revision info and match reports.

use serde::{Deserialize, Serialize};

use super::SwapMatch;

/// Revision information for change detection.
///
/// Every effective write to the store bumps `revision_id`, so a client holding
/// an older id knows its match list may be stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}

/// Result of running the matcher over one store snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    /// Set when the report was filtered to a single employee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    pub matches: Vec<SwapMatch>,
    /// Number of well-formed requests that took part in matching.
    pub considered: usize,
    /// Number of stored records skipped as malformed.
    pub skipped: usize,
}
