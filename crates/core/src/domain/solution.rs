use crate::domain::reqdoc::Band;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrantTag {
    Psg,
    Edg,
    NonGrant,
}

/// Projected outcome of a solution option. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessImpact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_lift_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_save_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ops_speedup_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_delta_per_month: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cac_change_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_first_lead_weeks: Option<f64>,
}

/// One proposed path (technology, roadmap, headcount, logistics or strategy)
/// shown to an SME.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionOption {
    pub id: String,
    pub name: String,
    pub grant_tag: GrantTag,
    pub why_fit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_tagline: Option<String>,
    pub est_cost_band: Band<u64>,
    pub est_duration_months: Band<u32>,
    #[serde(default)]
    pub business_impact: BusinessImpact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_why: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rationale_signals: Vec<String>,
}
