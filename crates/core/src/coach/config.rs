use crate::coach::CoachDomain;
use crate::domain::reqdoc::{Complexity, NewReqDoc, ReqDocStatus, VisibilityLevel};
use crate::domain::solution::GrantTag;
use serde::Serialize;

/// Keyword groups checked in order; the first group with a hit wins.
const KEYWORD_MAP: [(&[&str], CoachDomain); 4] = [
    (
        &["customer", "customers", "sales", "marketing", "leads"],
        CoachDomain::Growth,
    ),
    (
        &["inventory", "process", "system", "workflow"],
        CoachDomain::Operations,
    ),
    (
        &["staff", "training", "hiring", "skills"],
        CoachDomain::Capability,
    ),
    (
        &["supplier", "production", "machine", "manufacturing"],
        CoachDomain::Supply,
    ),
];

pub fn detect_domain(input: &str) -> Option<CoachDomain> {
    let lower = input.to_lowercase();
    KEYWORD_MAP
        .iter()
        .find(|(keys, _)| keys.iter().any(|k| lower.contains(k)))
        .map(|(_, domain)| *domain)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Clarifier {
    pub id: &'static str,
    pub label: &'static str,
}

/// Clarifying chips for a domain. Only growth has them today.
pub fn clarifiers(domain: CoachDomain) -> &'static [Clarifier] {
    const GROWTH: &[Clarifier] = &[
        Clarifier {
            id: "acquisition",
            label: "Find new customers",
        },
        Clarifier {
            id: "retention",
            label: "Improve retention",
        },
        Clarifier {
            id: "visibility",
            label: "Increase online visibility",
        },
    ];
    match domain {
        CoachDomain::Growth => GROWTH,
        _ => &[],
    }
}

pub fn clarifier_label(domain: CoachDomain, clarifier_id: &str) -> String {
    clarifiers(domain)
        .iter()
        .find(|c| c.id == clarifier_id)
        .map(|c| c.label.to_string())
        .unwrap_or_else(|| clarifier_id.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub coach_line: &'static str,
    pub text: &'static str,
    pub rationale: &'static str,
    pub categories: &'static [&'static str],
}

pub fn suggestion_for(domain: CoachDomain) -> Option<Suggestion> {
    match domain {
        CoachDomain::Growth => Some(Suggestion {
            coach_line: "Absolutely understood — let's zero in on boosting your brand's online presence and simplifying your campaign reporting.",
            text: "At its heart, your goal is to ensure your brand stands out online, attracting more customers while making campaign tracking far less of a headache. We understand you're striving for not just increased digital visibility, but also a way to see what's working in your campaigns — across every platform, all in one place. Our priority is to empower your team with clearer insights and simpler reporting, freeing up your time to focus on actual growth.",
            rationale: "This approach enables a holistic match to marketing partners who not only drive lead generation, but also take pride in transparent, data-driven campaign outcomes.",
            categories: &["Growth", "Marketing", "Digital Transformation"],
        }),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantPrediction {
    pub grant: GrantTag,
    pub confidence: f64,
    pub reason: &'static str,
}

pub fn grant_predictions() -> Vec<GrantPrediction> {
    vec![
        GrantPrediction {
            grant: GrantTag::Edg,
            confidence: 0.78,
            reason: "Market expansion and capability building",
        },
        GrantPrediction {
            grant: GrantTag::Psg,
            confidence: 0.65,
            reason: "Adoption of digital marketing tools",
        },
    ]
}

/// The requirement document the coach proposes once the preview is ready.
pub fn draft_req_doc(company_id: &str) -> NewReqDoc {
    NewReqDoc {
        company_id: company_id.to_string(),
        problem: "Standing out online is tough, and it can be a real challenge to see which campaigns are actually making a difference. It's frustrating to pour effort (and budget) into digital channels and not get a simple, unified view of what's working.".to_string(),
        goal: "Make your brand discoverable, boost your digital growth, and put streamlined, all-in-one campaign tracking in your hands — so you always know where your efforts are paying off.".to_string(),
        domain: "Growth".to_string(),
        complexity: Complexity::Low,
        budget_band: (25_000, 50_000),
        timeline_months: (3, 6),
        grant_relevant: true,
        trhls_selected_ids: vec![],
        visibility: VisibilityLevel::Public,
        matching_mode: None,
        qualification_score: 82,
        status: ReqDocStatus::New,
    }
}
