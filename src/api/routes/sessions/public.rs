//! Public types for the sessions API
use serde::{Deserialize, Serialize};

use crate::transcript::{SummaryRecord, TranscriptRecord};

#[derive(Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub session_id: String,
    pub interactions: Vec<TranscriptRecord>,
    pub summary: Option<SummaryRecord>,
}
