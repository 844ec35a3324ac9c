//! Public types for the summary API
use serde::Deserialize;

use crate::transcript::Scores;

#[derive(Deserialize, Debug)]
pub struct SummaryRequest {
    pub session_id: String,
    pub dominant_trait: String,
    #[serde(default)]
    pub scores: Scores,
}
