use crate::domain::reqdoc::{Complexity, MatchingMode, ReqDoc};
use serde::Serialize;

const CONSULTANT_BANNER: &str = "Recommended for your timeline and grant paperwork needs — structured guidance, higher approval confidence.";
const CONSULTANT_TOOLTIP: &str = "Grant submissions often need scoped plans, evidence and checklists. Consultants shorten that cycle.";
const SELF_MANAGED_BANNER: &str =
    "Recommended for your short timeline — get vendor quotes faster with full control.";
const SELF_MANAGED_TOOLTIP: &str =
    "When grants are optional or light, direct vendor shortlisting gets you quotes quicker.";

const DEFAULT_REASON: &str = "Default recommendation for guided experience.";

/// Which rule produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendationBranch {
    NoDocument,
    GrantWithLongTimelineOrHighComplexity,
    ShortTimelineOrNoGrant,
    /// Unreachable with integer timelines: every grant-relevant document
    /// either has a timeline >= 3 or <= 2. Kept so the gap stays visible.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeRecommendation {
    pub recommended: MatchingMode,
    pub reason: &'static str,
    pub banner_text: &'static str,
    pub tooltip_text: &'static str,
    pub branch: RecommendationBranch,
}

impl ModeRecommendation {
    fn consultant(reason: &'static str, branch: RecommendationBranch) -> Self {
        Self {
            recommended: MatchingMode::ConsultantManaged,
            reason,
            banner_text: CONSULTANT_BANNER,
            tooltip_text: CONSULTANT_TOOLTIP,
            branch,
        }
    }

    fn self_managed(reason: &'static str, branch: RecommendationBranch) -> Self {
        Self {
            recommended: MatchingMode::SmeSelfManaged,
            reason,
            banner_text: SELF_MANAGED_BANNER,
            tooltip_text: SELF_MANAGED_TOOLTIP,
            branch,
        }
    }
}

/// Recommends a workflow mode from grant relevance, the minimum timeline and
/// complexity of a requirement document.
pub fn recommend_mode(req_doc: Option<&ReqDoc>) -> ModeRecommendation {
    let Some(doc) = req_doc else {
        return ModeRecommendation::consultant(DEFAULT_REASON, RecommendationBranch::NoDocument);
    };

    let timeline = doc.min_timeline_months();
    let is_long_timeline = timeline >= 3;
    let is_high_complexity = doc.complexity == Complexity::High;
    let has_grant_requirements = doc.grant_relevant;

    if has_grant_requirements && (is_long_timeline || is_high_complexity) {
        return ModeRecommendation::consultant(
            "Grant requirements with longer timeline or high complexity benefit from consultant guidance.",
            RecommendationBranch::GrantWithLongTimelineOrHighComplexity,
        );
    }

    if !has_grant_requirements || timeline <= 2 {
        return ModeRecommendation::self_managed(
            "Short timeline or no grant requirements favor direct vendor approach.",
            RecommendationBranch::ShortTimelineOrNoGrant,
        );
    }

    ModeRecommendation::consultant(DEFAULT_REASON, RecommendationBranch::Fallback)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeHint {
    pub recommended: MatchingMode,
    pub reason: &'static str,
}

/// Lighter hint driven only by which solution paths were picked: any EDG path
/// leans towards consultant-led planning.
pub fn mode_hint(req_doc: Option<&ReqDoc>) -> ModeHint {
    let Some(doc) = req_doc else {
        return ModeHint {
            recommended: MatchingMode::ConsultantManaged,
            reason: DEFAULT_REASON,
        };
    };

    if doc.trhls_selected_ids.iter().any(|id| id.contains("edg")) {
        ModeHint {
            recommended: MatchingMode::ConsultantManaged,
            reason: "EDG items benefit from consultant-led planning.",
        }
    } else {
        ModeHint {
            recommended: MatchingMode::SmeSelfManaged,
            reason: "Vendor-first flow suits tool adoption (PSG / non-grant).",
        }
    }
}
