use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Trait name to score e.g. `{"Logic": 2.5, "Empathy": 0.5}`
pub type Scores = BTreeMap<String, f64>;

/// One logged message in a session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranscriptRecord {
    pub id: i64,
    pub session_id: String,
    pub turn_index: i64,
    pub sender: String,
    pub message: String,
    pub timestamp: String,
}

/// The end-of-session assessment. There is at most one per session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SummaryRecord {
    pub id: i64,
    pub session_id: String,
    pub dominant_trait: String,
    pub scores: Scores,
    pub timestamp: String,
}
