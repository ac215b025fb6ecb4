use crate::domain::reqdoc::Band;
use crate::domain::solution::GrantTag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Pending,
    Accepted,
    Declined,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponderKind {
    Vendor,
    Consultant,
}

/// Early, non-binding offer attached to an accepted lead response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicativeSubmission {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub estimated_cost: Band<u64>,
    pub timeline: Band<u32>,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_tag: Option<GrantTag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_eligible: Option<bool>,
}

/// A vendor's or consultant's reply to a dispatched lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadResponse {
    pub id: String,
    pub kind: ResponderKind,
    pub responder_id: String,
    pub name: String,
    pub status: ResponseStatus,
    pub qualification_score: u8,
    /// Hours between dispatch and reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicative_submission: Option<IndicativeSubmission>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingStats {
    pub total_sent: u32,
    pub accepted: u32,
    pub declined: u32,
    pub pending: u32,
    pub expired: u32,
    /// Percentage of responses that were answered, rounded.
    pub response_rate: u32,
    /// Mean hours to respond across responses that carry a response time.
    pub avg_response_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseWindow {
    pub closes_at: DateTime<Utc>,
    pub hours_remaining: i64,
    pub is_urgent: bool,
}
