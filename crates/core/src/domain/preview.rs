use crate::domain::reqdoc::Band;
use crate::domain::solution::GrantTag;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub name: String,
    /// Match percentage against the requirement document.
    #[serde(rename = "match")]
    pub match_pct: u8,
    pub grant_tag: GrantTag,
    pub sector: String,
    pub product: String,
    pub cost_range: Band<u64>,
    pub duration: Band<u32>,
    pub reason: String,
    pub tags: Vec<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultant {
    pub id: String,
    pub name: String,
    #[serde(rename = "match")]
    pub match_pct: u8,
    pub specialty: String,
    pub experience: String,
    pub success_rate: u8,
    pub core_focus: Vec<String>,
    pub rating: f64,
    /// Days.
    pub avg_turnaround: u32,
    pub selected: bool,
}
