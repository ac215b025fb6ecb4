use crate::domain::reqdoc::MatchingMode;
use serde::Serialize;

/// Static copy describing what each workflow mode asks of the SME.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeProfile {
    pub mode: MatchingMode,
    pub title: &'static str,
    pub tagline: &'static str,
    pub value: &'static str,
    pub badges: &'static [&'static str],
    pub you_handle: &'static [&'static str],
    pub we_handle: &'static [&'static str],
    pub effort: &'static str,
    /// Fraction in 0..=1.
    pub grant_alignment: f64,
    pub time_to_first_quote: &'static str,
    pub footnote: &'static str,
}

static CONSULTANT_MANAGED: ModeProfile = ModeProfile {
    mode: MatchingMode::ConsultantManaged,
    title: "Consultant-Managed",
    tagline: "Guided & hands-off — we orchestrate for you.",
    value: "Expert-guided. You approve decisions; we orchestrate.",
    badges: &["Fastest to Start", "Higher Grant Fit", "Lower SME Effort"],
    you_handle: &["Approvals", "Final selection", "Payments"],
    we_handle: &["Vendor shortlist", "Grant paperwork outline", "Timeline planning"],
    effort: "Low",
    grant_alignment: 0.85,
    time_to_first_quote: "3–5 days",
    footnote: "Consultant fees are shown transparently before award.",
};

static SME_SELF_MANAGED: ModeProfile = ModeProfile {
    mode: MatchingMode::SmeSelfManaged,
    title: "SME Self-Managed",
    tagline: "Hands-on & flexible — you drive vendor picks.",
    value: "You drive shortlist; we keep it structured.",
    badges: &["Full Control", "Direct Vendor Contact"],
    you_handle: &["Vendor picks", "Brief consolidation", "Basic comparisons"],
    we_handle: &["Matching engine", "Invitation dispatch", "Status tracking"],
    effort: "Medium",
    grant_alignment: 0.65,
    time_to_first_quote: "2–4 days",
    footnote: "You can invite a consultant later if grants are involved.",
};

pub fn profile(mode: MatchingMode) -> &'static ModeProfile {
    match mode {
        MatchingMode::ConsultantManaged => &CONSULTANT_MANAGED,
        MatchingMode::SmeSelfManaged => &SME_SELF_MANAGED,
    }
}

pub fn all_profiles() -> [&'static ModeProfile; 2] {
    [&CONSULTANT_MANAGED, &SME_SELF_MANAGED]
}
