//! Marketplace application state and the reducer that moves it forward.
//!
//! `reduce` never mutates its input: it returns a new state or an error and
//! the caller decides whether to swap it in. All ids and timestamps come from
//! the [`Stamp`] so a given (state, action, stamp) always yields the same
//! result.

pub mod error;
pub mod preview;
pub mod shortlist;

pub use error::StoreError;

use crate::domain::marketplace::{
    Audience, Company, CreditWallet, Lead, MaskedPreview, Match, NewProposal, NewQuotation, Persona,
    Proposal, Quotation, Urgency, User,
};
use crate::domain::reqdoc::{
    Awardee, Complexity, MatchingMode, NewReqDoc, ReqDoc, ReqDocStatus, VisibilityLevel,
};
use crate::domain::solution::{GrantTag, SolutionOption};
use crate::seeds;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Time and entropy for one reducer call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    pub at: DateTime<Utc>,
    pub nonce: Uuid,
}

impl Stamp {
    pub fn now() -> Self {
        Self {
            at: Utc::now(),
            nonce: Uuid::new_v4(),
        }
    }

    fn id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.nonce.simple())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPolicy {
    pub price_credits: u32,
    pub expiry_days: i64,
}

impl Default for LeadPolicy {
    fn default() -> Self {
        Self {
            price_credits: 1,
            expiry_days: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub companies: Vec<Company>,
    pub users: Vec<User>,
    pub req_docs: Vec<ReqDoc>,
    pub solutions: Vec<SolutionOption>,
    pub leads: Vec<Lead>,
    pub proposals: Vec<Proposal>,
    pub quotations: Vec<Quotation>,
    pub matches: Vec<Match>,
    pub wallets: Vec<CreditWallet>,
    pub current_persona: Persona,
    pub current_req_doc_id: Option<String>,
    pub lead_policy: LeadPolicy,
}

impl AppState {
    pub fn seeded(lead_policy: LeadPolicy) -> Self {
        let mut solutions = seeds::catalog_solutions();
        solutions.extend(seeds::marketing_visibility_solutions());
        Self {
            companies: seeds::companies(),
            users: seeds::users(),
            req_docs: Vec::new(),
            solutions,
            leads: Vec::new(),
            proposals: Vec::new(),
            quotations: Vec::new(),
            matches: Vec::new(),
            wallets: seeds::wallets(),
            current_persona: Persona::Sme,
            current_req_doc_id: None,
            lead_policy,
        }
    }

    pub fn req_doc(&self, id: &str) -> Option<&ReqDoc> {
        self.req_docs.iter().find(|d| d.id == id)
    }

    pub fn current_req_doc(&self) -> Option<&ReqDoc> {
        self.req_doc(self.current_req_doc_id.as_deref()?)
    }

    pub fn solution(&self, id: &str) -> Option<&SolutionOption> {
        self.solutions.iter().find(|s| s.id == id)
    }

    pub fn leads_for(&self, req_doc_id: &str) -> Vec<&Lead> {
        self.leads.iter().filter(|l| l.req_doc_id == req_doc_id).collect()
    }

    pub fn wallet(&self, user_id: &str) -> Option<&CreditWallet> {
        self.wallets.iter().find(|w| w.user_id == user_id)
    }

    /// Leads addressed to the user's audience, split into still available
    /// and already accepted, plus the user's credit balance.
    pub fn lead_inbox(&self, user_id: &str) -> Result<LeadInbox, StoreError> {
        let user = self
            .users
            .iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;
        let audience = match user.persona {
            Persona::Vendor => Audience::Vendor,
            Persona::Consultant => Audience::Consultant,
            Persona::Sme => {
                return Err(StoreError::WrongPersona {
                    user_id: user_id.to_string(),
                    expected: Persona::Vendor,
                })
            }
        };

        let (accepted, available) = self
            .leads
            .iter()
            .filter(|l| l.audience == audience)
            .cloned()
            .partition(|l| l.accepted_by_user_id.is_some());

        Ok(LeadInbox {
            audience,
            balance: self.wallet(user_id).map(|w| w.balance).unwrap_or(0),
            available,
            accepted,
        })
    }

    fn req_doc_mut(&mut self, id: &str) -> Result<&mut ReqDoc, StoreError> {
        self.req_docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::ReqDocNotFound(id.to_string()))
    }

    fn user_with_persona(&self, user_id: &str, expected: Persona) -> Result<&User, StoreError> {
        let user = self
            .users
            .iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;
        if user.persona != expected {
            return Err(StoreError::WrongPersona {
                user_id: user_id.to_string(),
                expected,
            });
        }
        Ok(user)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadInbox {
    pub audience: Audience,
    pub balance: u32,
    pub available: Vec<Lead>,
    pub accepted: Vec<Lead>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum Action {
    SetCurrentPersona {
        persona: Persona,
    },
    CreateReqDoc {
        req_doc: NewReqDoc,
    },
    SelectSolutions {
        req_doc_id: String,
        solution_ids: Vec<String>,
    },
    SetVisibility {
        req_doc_id: String,
        visibility: VisibilityLevel,
    },
    SetMatchingMode {
        req_doc_id: String,
        mode: MatchingMode,
    },
    SeedMatching {
        req_doc_id: String,
    },
    AcceptLead {
        lead_id: String,
        user_id: String,
        #[serde(default)]
        expected_revision: Option<u64>,
    },
    SubmitProposal {
        proposal: NewProposal,
    },
    SubmitQuotation {
        quotation: NewQuotation,
    },
    FinalizeIndicatives {
        req_doc_id: String,
    },
    AwardVendor {
        req_doc_id: String,
        vendor_user_id: String,
        #[serde(default)]
        expected_revision: Option<u64>,
    },
    AwardConsultant {
        req_doc_id: String,
        consultant_user_id: String,
        #[serde(default)]
        expected_revision: Option<u64>,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetCurrentPersona { .. } => "set_current_persona",
            Action::CreateReqDoc { .. } => "create_req_doc",
            Action::SelectSolutions { .. } => "select_solutions",
            Action::SetVisibility { .. } => "set_visibility",
            Action::SetMatchingMode { .. } => "set_matching_mode",
            Action::SeedMatching { .. } => "seed_matching",
            Action::AcceptLead { .. } => "accept_lead",
            Action::SubmitProposal { .. } => "submit_proposal",
            Action::SubmitQuotation { .. } => "submit_quotation",
            Action::FinalizeIndicatives { .. } => "finalize_indicatives",
            Action::AwardVendor { .. } => "award_vendor",
            Action::AwardConsultant { .. } => "award_consultant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum ActionOutcome {
    Applied,
    Created { id: String },
    Seeded { match_id: String, lead_ids: Vec<String> },
}

pub fn reduce(
    state: &AppState,
    action: Action,
    stamp: &Stamp,
) -> Result<(AppState, ActionOutcome), StoreError> {
    let mut next = state.clone();
    let outcome = apply(&mut next, action, stamp)?;
    Ok((next, outcome))
}

fn apply(state: &mut AppState, action: Action, stamp: &Stamp) -> Result<ActionOutcome, StoreError> {
    match action {
        Action::SetCurrentPersona { persona } => {
            state.current_persona = persona;
            Ok(ActionOutcome::Applied)
        }
        Action::CreateReqDoc { req_doc } => {
            let id = stamp.id("reqdoc");
            if let Some(unknown) = req_doc
                .trhls_selected_ids
                .iter()
                .find(|sid| state.solution(sid).is_none())
            {
                return Err(StoreError::UnknownSolution(unknown.clone()));
            }
            state.req_docs.push(req_doc.into_req_doc(id.clone(), stamp.at));
            state.current_req_doc_id = Some(id.clone());
            Ok(ActionOutcome::Created { id })
        }
        Action::SelectSolutions {
            req_doc_id,
            solution_ids,
        } => {
            if let Some(unknown) = solution_ids.iter().find(|sid| state.solution(sid).is_none()) {
                return Err(StoreError::UnknownSolution(unknown.clone()));
            }
            let doc = state.req_doc_mut(&req_doc_id)?;
            doc.trhls_selected_ids = solution_ids;
            doc.touch(stamp.at);
            Ok(ActionOutcome::Applied)
        }
        Action::SetVisibility {
            req_doc_id,
            visibility,
        } => {
            let doc = state.req_doc_mut(&req_doc_id)?;
            doc.visibility = visibility;
            doc.touch(stamp.at);
            Ok(ActionOutcome::Applied)
        }
        Action::SetMatchingMode { req_doc_id, mode } => {
            let doc = state.req_doc_mut(&req_doc_id)?;
            doc.matching_mode = Some(mode);
            doc.touch(stamp.at);
            Ok(ActionOutcome::Applied)
        }
        Action::SeedMatching { req_doc_id } => seed_matching(state, &req_doc_id, stamp),
        Action::AcceptLead {
            lead_id,
            user_id,
            expected_revision,
        } => accept_lead(state, &lead_id, &user_id, expected_revision, stamp),
        Action::SubmitProposal { proposal } => {
            state.req_doc(&proposal.req_doc_id)
                .ok_or_else(|| StoreError::ReqDocNotFound(proposal.req_doc_id.clone()))?;
            state.user_with_persona(&proposal.consultant_user_id, Persona::Consultant)?;
            let id = stamp.id("proposal");
            state.proposals.push(Proposal {
                id: id.clone(),
                consultant_user_id: proposal.consultant_user_id,
                req_doc_id: proposal.req_doc_id,
                fee_band: proposal.fee_band,
                approach: proposal.approach,
                timeline: proposal.timeline,
                version: proposal.version,
                created_at: stamp.at,
            });
            Ok(ActionOutcome::Created { id })
        }
        Action::SubmitQuotation { quotation } => {
            state.req_doc(&quotation.req_doc_id)
                .ok_or_else(|| StoreError::ReqDocNotFound(quotation.req_doc_id.clone()))?;
            state.user_with_persona(&quotation.vendor_user_id, Persona::Vendor)?;
            let id = stamp.id("quotation");
            state.quotations.push(Quotation {
                id: id.clone(),
                vendor_user_id: quotation.vendor_user_id,
                req_doc_id: quotation.req_doc_id,
                price_band: quotation.price_band,
                summary: quotation.summary,
                version: quotation.version,
                created_at: stamp.at,
            });
            Ok(ActionOutcome::Created { id })
        }
        Action::FinalizeIndicatives { req_doc_id } => {
            let doc = state.req_doc_mut(&req_doc_id)?;
            doc.status = ReqDocStatus::Indicative;
            doc.touch(stamp.at);
            Ok(ActionOutcome::Applied)
        }
        Action::AwardVendor {
            req_doc_id,
            vendor_user_id,
            expected_revision,
        } => {
            state.user_with_persona(&vendor_user_id, Persona::Vendor)?;
            award(state, &req_doc_id, Awardee::Vendor(vendor_user_id), expected_revision, stamp)
        }
        Action::AwardConsultant {
            req_doc_id,
            consultant_user_id,
            expected_revision,
        } => {
            state.user_with_persona(&consultant_user_id, Persona::Consultant)?;
            award(
                state,
                &req_doc_id,
                Awardee::Consultant(consultant_user_id),
                expected_revision,
                stamp,
            )
        }
    }
}

fn seed_matching(state: &mut AppState, req_doc_id: &str, stamp: &Stamp) -> Result<ActionOutcome, StoreError> {
    let doc = state
        .req_doc(req_doc_id)
        .ok_or_else(|| StoreError::ReqDocNotFound(req_doc_id.to_string()))?
        .clone();
    if state.matches.iter().any(|m| m.req_doc_id == req_doc_id) {
        return Err(StoreError::AlreadySeeded(req_doc_id.to_string()));
    }

    let ids_for = |persona: Persona| -> Vec<String> {
        state
            .users
            .iter()
            .filter(|u| u.persona == persona)
            .map(|u| u.id.clone())
            .collect()
    };
    let vendor_user_ids = ids_for(Persona::Vendor);
    let consultant_user_ids = ids_for(Persona::Consultant);

    let match_id = stamp.id("match");
    state.matches.push(Match {
        id: match_id.clone(),
        req_doc_id: req_doc_id.to_string(),
        vendor_user_ids: vendor_user_ids.clone(),
        consultant_user_ids: consultant_user_ids.clone(),
        created_at: stamp.at,
    });

    let preview = masked_preview(&doc);
    let expiry_days = state.lead_policy.expiry_days;
    let expires_at = Duration::try_days(expiry_days)
        .filter(|_| expiry_days >= 0)
        .and_then(|ttl| stamp.at.checked_add_signed(ttl))
        .ok_or(StoreError::LeadExpiryOutOfRange(expiry_days))?;
    let mut lead_ids = Vec::with_capacity(vendor_user_ids.len() + consultant_user_ids.len());
    for (audience, tag, count) in [
        (Audience::Vendor, "vendor", vendor_user_ids.len()),
        (Audience::Consultant, "consultant", consultant_user_ids.len()),
    ] {
        for index in 0..count {
            let id = format!("lead-{tag}-{req_doc_id}-{index}");
            state.leads.push(Lead {
                id: id.clone(),
                req_doc_id: req_doc_id.to_string(),
                audience,
                masked_preview: preview.clone(),
                price_credits: state.lead_policy.price_credits,
                qualification_score: doc.qualification_score,
                expires_at,
                accepted_by_user_id: None,
                created_at: stamp.at,
            });
            lead_ids.push(id);
        }
    }

    let doc = state.req_doc_mut(req_doc_id)?;
    doc.status = ReqDocStatus::Shortlisted;
    doc.touch(stamp.at);

    Ok(ActionOutcome::Seeded { match_id, lead_ids })
}

fn masked_preview(doc: &ReqDoc) -> MaskedPreview {
    let seeking = if doc.trhls_selected_ids.is_empty() {
        "business solution"
    } else {
        "technology solution"
    };
    let grant_tag = doc.grant_relevant.then(|| {
        if doc.trhls_selected_ids.iter().any(|id| id == "trhls-1") {
            GrantTag::Psg
        } else {
            GrantTag::Edg
        }
    });
    MaskedPreview {
        summary: format!("F&B company seeking {seeking}"),
        budget_band: doc.budget_band,
        urgency: match doc.complexity {
            Complexity::High => Urgency::High,
            Complexity::Medium => Urgency::Medium,
            Complexity::Low => Urgency::Low,
        },
        grant_tag,
    }
}

fn accept_lead(
    state: &mut AppState,
    lead_id: &str,
    user_id: &str,
    expected_revision: Option<u64>,
    stamp: &Stamp,
) -> Result<ActionOutcome, StoreError> {
    let lead_idx = state
        .leads
        .iter()
        .position(|l| l.id == lead_id)
        .ok_or_else(|| StoreError::LeadNotFound(lead_id.to_string()))?;
    let wallet_idx = state
        .wallets
        .iter()
        .position(|w| w.user_id == user_id)
        .ok_or_else(|| StoreError::WalletNotFound(user_id.to_string()))?;

    let lead = &state.leads[lead_idx];
    let persona = match lead.audience {
        Audience::Vendor => Persona::Vendor,
        Audience::Consultant => Persona::Consultant,
    };
    state.user_with_persona(user_id, persona)?;
    if let Some(expected) = expected_revision {
        let actual = state
            .req_doc(&lead.req_doc_id)
            .ok_or_else(|| StoreError::ReqDocNotFound(lead.req_doc_id.clone()))?
            .revision;
        if actual != expected {
            return Err(StoreError::RevisionConflict {
                req_doc_id: lead.req_doc_id.clone(),
                expected,
                actual,
            });
        }
    }
    if let Some(accepted_by) = &lead.accepted_by_user_id {
        return Err(StoreError::LeadAlreadyAccepted {
            lead_id: lead_id.to_string(),
            accepted_by: accepted_by.clone(),
        });
    }
    if stamp.at > lead.expires_at {
        return Err(StoreError::LeadExpired(lead_id.to_string()));
    }
    let price = lead.price_credits;
    let balance = state.wallets[wallet_idx].balance;
    if balance < price {
        return Err(StoreError::InsufficientCredits {
            user_id: user_id.to_string(),
            balance,
            price,
        });
    }

    state.wallets[wallet_idx].balance = balance - price;
    state.leads[lead_idx].accepted_by_user_id = Some(user_id.to_string());

    let req_doc_id = state.leads[lead_idx].req_doc_id.clone();
    if let Ok(doc) = state.req_doc_mut(&req_doc_id) {
        if doc.status == ReqDocStatus::Shortlisted {
            doc.status = ReqDocStatus::Previewed;
        }
        doc.touch(stamp.at);
    }

    Ok(ActionOutcome::Applied)
}

fn award(
    state: &mut AppState,
    req_doc_id: &str,
    awardee: Awardee,
    expected_revision: Option<u64>,
    stamp: &Stamp,
) -> Result<ActionOutcome, StoreError> {
    let doc = state.req_doc_mut(req_doc_id)?;
    if let Some(expected) = expected_revision {
        if doc.revision != expected {
            return Err(StoreError::RevisionConflict {
                req_doc_id: req_doc_id.to_string(),
                expected,
                actual: doc.revision,
            });
        }
    }
    if doc.status == ReqDocStatus::Awarded {
        return Err(StoreError::AlreadyAwarded(req_doc_id.to_string()));
    }
    doc.status = ReqDocStatus::Awarded;
    doc.awarded_to = Some(awardee);
    doc.touch(stamp.at);
    Ok(ActionOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::draft_req_doc;
    use chrono::TimeZone;

    fn stamp(n: u128) -> Stamp {
        Stamp {
            at: Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap(),
            nonce: Uuid::from_u128(n),
        }
    }

    fn run(state: &AppState, action: Action, n: u128) -> (AppState, ActionOutcome) {
        reduce(state, action, &stamp(n)).unwrap()
    }

    fn with_doc() -> (AppState, String) {
        let state = AppState::seeded(LeadPolicy::default());
        let (state, outcome) = run(
            &state,
            Action::CreateReqDoc {
                req_doc: draft_req_doc("company-1"),
            },
            1,
        );
        let ActionOutcome::Created { id } = outcome else {
            panic!("expected created outcome");
        };
        (state, id)
    }

    #[test]
    fn create_sets_current_and_leaves_input_untouched() {
        let before = AppState::seeded(LeadPolicy::default());
        let (after, outcome) = run(
            &before,
            Action::CreateReqDoc {
                req_doc: draft_req_doc("company-1"),
            },
            7,
        );
        assert!(before.req_docs.is_empty());
        let ActionOutcome::Created { id } = outcome else {
            panic!("expected created outcome");
        };
        assert!(id.starts_with("reqdoc-"));
        assert_eq!(after.current_req_doc().map(|d| d.id.as_str()), Some(id.as_str()));
        assert_eq!(after.req_docs[0].revision, 0);
    }

    #[test]
    fn same_stamp_gives_same_state() {
        let state = AppState::seeded(LeadPolicy::default());
        let action = Action::CreateReqDoc {
            req_doc: draft_req_doc("company-1"),
        };
        assert_eq!(run(&state, action.clone(), 3), run(&state, action, 3));
    }

    #[test]
    fn updates_bump_revision() {
        let (state, id) = with_doc();
        let (state, _) = run(
            &state,
            Action::SetVisibility {
                req_doc_id: id.clone(),
                visibility: VisibilityLevel::Private,
            },
            2,
        );
        let (state, _) = run(
            &state,
            Action::SetMatchingMode {
                req_doc_id: id.clone(),
                mode: MatchingMode::SmeSelfManaged,
            },
            3,
        );
        let doc = state.req_doc(&id).unwrap();
        assert_eq!(doc.visibility, VisibilityLevel::Private);
        assert_eq!(doc.matching_mode, Some(MatchingMode::SmeSelfManaged));
        assert_eq!(doc.revision, 2);
    }

    #[test]
    fn unknown_doc_and_solution_are_rejected() {
        let (state, id) = with_doc();
        let err = reduce(
            &state,
            Action::SetVisibility {
                req_doc_id: "missing".into(),
                visibility: VisibilityLevel::Public,
            },
            &stamp(2),
        )
        .unwrap_err();
        assert_eq!(err, StoreError::ReqDocNotFound("missing".into()));

        let err = reduce(
            &state,
            Action::SelectSolutions {
                req_doc_id: id,
                solution_ids: vec!["trhls-1".into(), "nope".into()],
            },
            &stamp(3),
        )
        .unwrap_err();
        assert_eq!(err, StoreError::UnknownSolution("nope".into()));
    }

    #[test]
    fn seeding_creates_match_and_leads() {
        let (state, id) = with_doc();
        let (state, _) = run(
            &state,
            Action::SelectSolutions {
                req_doc_id: id.clone(),
                solution_ids: vec!["trhls-1".into()],
            },
            2,
        );
        let (state, outcome) = run(&state, Action::SeedMatching { req_doc_id: id.clone() }, 3);

        let ActionOutcome::Seeded { lead_ids, .. } = outcome else {
            panic!("expected seeded outcome");
        };
        assert_eq!(
            lead_ids,
            vec![
                format!("lead-vendor-{id}-0"),
                format!("lead-vendor-{id}-1"),
                format!("lead-consultant-{id}-0"),
                format!("lead-consultant-{id}-1"),
            ]
        );
        assert_eq!(state.matches.len(), 1);
        assert_eq!(state.matches[0].vendor_user_ids, vec!["user-vendor-1", "user-vendor-2"]);

        let lead = &state.leads_for(&id)[0];
        assert_eq!(lead.masked_preview.grant_tag, Some(GrantTag::Psg));
        assert_eq!(lead.masked_preview.urgency, Urgency::Low);
        assert_eq!(lead.masked_preview.summary, "F&B company seeking technology solution");
        assert_eq!(lead.expires_at, stamp(3).at + Duration::days(7));
        assert_eq!(state.req_doc(&id).unwrap().status, ReqDocStatus::Shortlisted);

        let err = reduce(&state, Action::SeedMatching { req_doc_id: id.clone() }, &stamp(4)).unwrap_err();
        assert_eq!(err, StoreError::AlreadySeeded(id));
    }

    #[test]
    fn accepting_debits_once_and_previews_doc() {
        let (state, id) = with_doc();
        let (state, _) = run(&state, Action::SeedMatching { req_doc_id: id.clone() }, 2);
        let lead_id = format!("lead-vendor-{id}-0");

        let (state, _) = run(
            &state,
            Action::AcceptLead {
                lead_id: lead_id.clone(),
                user_id: "user-vendor-1".into(),
                expected_revision: None,
            },
            3,
        );
        assert_eq!(state.wallet("user-vendor-1").unwrap().balance, 4);
        assert_eq!(state.req_doc(&id).unwrap().status, ReqDocStatus::Previewed);

        let err = reduce(
            &state,
            Action::AcceptLead {
                lead_id,
                user_id: "user-vendor-2".into(),
                expected_revision: None,
            },
            &stamp(4),
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::LeadAlreadyAccepted { .. }));
        assert_eq!(state.wallet("user-vendor-2").unwrap().balance, 8);
    }

    #[test]
    fn accepting_without_credits_fails() {
        let (mut state, id) = with_doc();
        state.lead_policy.price_credits = 50;
        let (state, _) = run(&state, Action::SeedMatching { req_doc_id: id.clone() }, 2);
        let err = reduce(
            &state,
            Action::AcceptLead {
                lead_id: format!("lead-consultant-{id}-0"),
                user_id: "user-consultant-1".into(),
                expected_revision: None,
            },
            &stamp(3),
        )
        .unwrap_err();
        assert_eq!(
            err,
            StoreError::InsufficientCredits {
                user_id: "user-consultant-1".into(),
                balance: 12,
                price: 50
            }
        );
    }

    #[test]
    fn expired_leads_cannot_be_accepted() {
        let (state, id) = with_doc();
        let (state, _) = run(&state, Action::SeedMatching { req_doc_id: id.clone() }, 2);
        let late = Stamp {
            at: stamp(0).at + Duration::days(8),
            nonce: Uuid::from_u128(9),
        };
        let err = reduce(
            &state,
            Action::AcceptLead {
                lead_id: format!("lead-vendor-{id}-1"),
                user_id: "user-vendor-2".into(),
                expected_revision: None,
            },
            &late,
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::LeadExpired(_)));
    }

    #[test]
    fn leads_only_go_to_their_audience() {
        let (state, id) = with_doc();
        let (state, _) = run(&state, Action::SeedMatching { req_doc_id: id.clone() }, 2);
        let err = reduce(
            &state,
            Action::AcceptLead {
                lead_id: format!("lead-vendor-{id}-0"),
                user_id: "user-consultant-1".into(),
                expected_revision: None,
            },
            &stamp(3),
        )
        .unwrap_err();
        assert_eq!(
            err,
            StoreError::WrongPersona {
                user_id: "user-consultant-1".into(),
                expected: Persona::Vendor,
            }
        );
        assert_eq!(state.wallet("user-consultant-1").unwrap().balance, 12);

        let err = reduce(
            &state,
            Action::AcceptLead {
                lead_id: format!("lead-consultant-{id}-0"),
                user_id: "user-sme-1".into(),
                expected_revision: None,
            },
            &stamp(3),
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::WrongPersona { .. }));
    }

    #[test]
    fn stale_revision_blocks_acceptance() {
        let (state, id) = with_doc();
        let (state, _) = run(&state, Action::SeedMatching { req_doc_id: id.clone() }, 2);
        let revision = state.req_doc(&id).unwrap().revision;
        let lead_id = format!("lead-vendor-{id}-0");

        let err = reduce(
            &state,
            Action::AcceptLead {
                lead_id: lead_id.clone(),
                user_id: "user-vendor-1".into(),
                expected_revision: Some(revision + 1),
            },
            &stamp(3),
        )
        .unwrap_err();
        assert_eq!(
            err,
            StoreError::RevisionConflict {
                req_doc_id: id.clone(),
                expected: revision + 1,
                actual: revision,
            }
        );
        assert_eq!(state.wallet("user-vendor-1").unwrap().balance, 5);
        assert!(state.leads_for(&id)[0].accepted_by_user_id.is_none());

        let (state, _) = run(
            &state,
            Action::AcceptLead {
                lead_id,
                user_id: "user-vendor-1".into(),
                expected_revision: Some(revision),
            },
            4,
        );
        assert_eq!(state.wallet("user-vendor-1").unwrap().balance, 4);
    }

    #[test]
    fn oversized_expiry_is_an_error() {
        let (mut state, id) = with_doc();
        state.lead_policy.expiry_days = 1_000_000_000;
        let err = reduce(&state, Action::SeedMatching { req_doc_id: id.clone() }, &stamp(2)).unwrap_err();
        assert_eq!(err, StoreError::LeadExpiryOutOfRange(1_000_000_000));
        assert!(state.leads_for(&id).is_empty());
    }

    #[test]
    fn inbox_splits_available_and_accepted() {
        let (state, id) = with_doc();
        let (state, _) = run(&state, Action::SeedMatching { req_doc_id: id.clone() }, 2);
        let (state, _) = run(
            &state,
            Action::AcceptLead {
                lead_id: format!("lead-vendor-{id}-1"),
                user_id: "user-vendor-2".into(),
                expected_revision: None,
            },
            3,
        );

        let inbox = state.lead_inbox("user-vendor-1").unwrap();
        assert_eq!(inbox.audience, Audience::Vendor);
        assert_eq!(inbox.balance, 5);
        assert_eq!(inbox.available.len(), 1);
        assert_eq!(inbox.available[0].id, format!("lead-vendor-{id}-0"));
        assert_eq!(inbox.accepted.len(), 1);
        assert_eq!(inbox.accepted[0].accepted_by_user_id.as_deref(), Some("user-vendor-2"));

        let inbox = state.lead_inbox("user-consultant-2").unwrap();
        assert_eq!(inbox.audience, Audience::Consultant);
        assert_eq!(inbox.available.len(), 2);
        assert!(inbox.accepted.is_empty());

        assert!(matches!(state.lead_inbox("user-sme-1"), Err(StoreError::WrongPersona { .. })));
        assert_eq!(state.lead_inbox("ghost"), Err(StoreError::UserNotFound("ghost".into())));
    }

    #[test]
    fn award_checks_persona_revision_and_double_award() {
        let (state, id) = with_doc();
        let (state, _) = run(&state, Action::FinalizeIndicatives { req_doc_id: id.clone() }, 2);
        assert_eq!(state.req_doc(&id).unwrap().status, ReqDocStatus::Indicative);

        let err = reduce(
            &state,
            Action::AwardVendor {
                req_doc_id: id.clone(),
                vendor_user_id: "user-consultant-1".into(),
                expected_revision: None,
            },
            &stamp(3),
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::WrongPersona { .. }));

        let err = reduce(
            &state,
            Action::AwardVendor {
                req_doc_id: id.clone(),
                vendor_user_id: "user-vendor-1".into(),
                expected_revision: Some(0),
            },
            &stamp(3),
        )
        .unwrap_err();
        assert_eq!(
            err,
            StoreError::RevisionConflict {
                req_doc_id: id.clone(),
                expected: 0,
                actual: 1
            }
        );

        let (state, _) = run(
            &state,
            Action::AwardVendor {
                req_doc_id: id.clone(),
                vendor_user_id: "user-vendor-1".into(),
                expected_revision: Some(1),
            },
            4,
        );
        let doc = state.req_doc(&id).unwrap();
        assert_eq!(doc.status, ReqDocStatus::Awarded);
        assert_eq!(doc.awarded_to, Some(Awardee::Vendor("user-vendor-1".into())));

        let err = reduce(
            &state,
            Action::AwardConsultant {
                req_doc_id: id.clone(),
                consultant_user_id: "user-consultant-1".into(),
                expected_revision: None,
            },
            &stamp(5),
        )
        .unwrap_err();
        assert_eq!(err, StoreError::AlreadyAwarded(id));
    }

    #[test]
    fn proposals_and_quotations_get_ids() {
        let (state, id) = with_doc();
        let (state, outcome) = run(
            &state,
            Action::SubmitQuotation {
                quotation: NewQuotation {
                    vendor_user_id: "user-vendor-2".into(),
                    req_doc_id: id.clone(),
                    price_band: (15_000, 20_000),
                    summary: "Ads platform rollout".into(),
                    version: 1,
                },
            },
            2,
        );
        assert!(matches!(outcome, ActionOutcome::Created { ref id } if id.starts_with("quotation-")));
        assert_eq!(state.quotations.len(), 1);

        let err = reduce(
            &state,
            Action::SubmitProposal {
                proposal: NewProposal {
                    consultant_user_id: "user-consultant-1".into(),
                    req_doc_id: "missing".into(),
                    fee_band: (8_000, 12_000),
                    approach: "Grant-first plan".into(),
                    timeline: (2, 3),
                    version: 1,
                },
            },
            &stamp(3),
        )
        .unwrap_err();
        assert_eq!(err, StoreError::ReqDocNotFound("missing".into()));
    }

    #[test]
    fn actions_deserialize_from_tagged_json() {
        let action: Action = serde_json::from_value(serde_json::json!({
            "type": "SET_VISIBILITY",
            "reqDocId": "reqdoc-1",
            "visibility": "LIMITED",
        }))
        .unwrap();
        assert_eq!(
            action,
            Action::SetVisibility {
                req_doc_id: "reqdoc-1".into(),
                visibility: VisibilityLevel::Limited
            }
        );
    }
}
