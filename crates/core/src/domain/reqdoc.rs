use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive (min, max) band, serialized as a two-element array.
pub type Band<T> = (T, T);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisibilityLevel {
    Private,
    Limited,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchingMode {
    SmeSelfManaged,
    ConsultantManaged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReqDocStatus {
    New,
    Shortlisted,
    Previewed,
    Accepted,
    Indicative,
    Qna,
    Decisioned,
    Awarded,
}

/// Party a requirement document was awarded to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "userId", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Awardee {
    Vendor(String),
    Consultant(String),
}

/// A captured SME goal: problem statement, budget, timeline and the solution
/// paths chosen for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReqDoc {
    pub id: String,
    pub company_id: String,
    pub problem: String,
    pub goal: String,
    pub domain: String,
    pub complexity: Complexity,
    pub budget_band: Band<u64>,
    pub timeline_months: Band<u32>,
    pub grant_relevant: bool,
    pub trhls_selected_ids: Vec<String>,
    pub visibility: VisibilityLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_mode: Option<MatchingMode>,
    pub qualification_score: u8,
    pub status: ReqDocStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awarded_to: Option<Awardee>,
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReqDoc {
    /// Lower bound of the timeline band, the value recommendation rules read.
    pub fn min_timeline_months(&self) -> u32 {
        self.timeline_months.0
    }

    pub(crate) fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
        self.revision += 1;
    }
}

/// Everything a caller supplies when creating a requirement document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReqDoc {
    pub company_id: String,
    pub problem: String,
    pub goal: String,
    pub domain: String,
    pub complexity: Complexity,
    pub budget_band: Band<u64>,
    pub timeline_months: Band<u32>,
    pub grant_relevant: bool,
    #[serde(default)]
    pub trhls_selected_ids: Vec<String>,
    pub visibility: VisibilityLevel,
    #[serde(default)]
    pub matching_mode: Option<MatchingMode>,
    pub qualification_score: u8,
    #[serde(default = "default_status")]
    pub status: ReqDocStatus,
}

fn default_status() -> ReqDocStatus {
    ReqDocStatus::New
}

impl NewReqDoc {
    pub fn into_req_doc(self, id: String, at: DateTime<Utc>) -> ReqDoc {
        ReqDoc {
            id,
            company_id: self.company_id,
            problem: self.problem,
            goal: self.goal,
            domain: self.domain,
            complexity: self.complexity,
            budget_band: self.budget_band,
            timeline_months: self.timeline_months,
            grant_relevant: self.grant_relevant,
            trhls_selected_ids: self.trhls_selected_ids,
            visibility: self.visibility,
            matching_mode: self.matching_mode,
            qualification_score: self.qualification_score,
            status: self.status,
            awarded_to: None,
            revision: 0,
            created_at: at,
            updated_at: at,
        }
    }
}
