use anyhow::Context;
use serde::Serialize;
use smartgrant_core::backend::MarketplaceApi;
use smartgrant_core::coach::{self, CoachAction, CoachState};
use smartgrant_core::domain::marketplace::{Audience, NewProposal, NewQuotation};
use smartgrant_core::domain::reqdoc::{MatchingMode, ReqDocStatus, VisibilityLevel};
use smartgrant_core::domain::response::MatchingStats;
use smartgrant_core::impact::{self, display};
use smartgrant_core::matching::{self, board::ResponseBoard};
use smartgrant_core::store::preview::DispatchPreview;
use smartgrant_core::store::shortlist::{Shortlist, ToggleOutcome};

const VENDOR_USER: &str = "user-vendor-1";
const CONSULTANT_USER: &str = "user-consultant-1";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkthroughReport {
    pub req_doc_id: String,
    pub refined_goal: String,
    pub clarifier: String,
    pub selected_solution_ids: Vec<String>,
    pub best_overall_id: Option<String>,
    pub best_overall_description: Option<String>,
    pub dispatch_vendors: usize,
    pub dispatch_consultants: usize,
    pub matching_mode: MatchingMode,
    pub leads_seeded: usize,
    pub leads_accepted: usize,
    pub response_stats: MatchingStats,
    pub final_status: ReqDocStatus,
    pub final_revision: u64,
}

/// Drives one SME end to end: coach, solution pick, matching, lead
/// acceptance, indicatives and award.
pub async fn run(api: &dyn MarketplaceApi) -> anyhow::Result<WalkthroughReport> {
    let (coach_state, clarifier) = run_coach()?;

    let snapshot = api.snapshot().await;
    let catalog: Vec<_> = snapshot
        .solutions
        .iter()
        .filter(|s| s.id.starts_with("trhls-"))
        .cloned()
        .collect();
    let comparison = impact::compare(&catalog);
    let best_overall_description = comparison
        .best_overall_id
        .as_deref()
        .and_then(|id| catalog.iter().find(|s| s.id == id))
        .map(display::verbose_description);

    let mut shortlist = Shortlist::new(catalog);
    if let Some(best) = comparison.best_overall_id.as_deref() {
        if shortlist.toggle(best) != ToggleOutcome::Added {
            tracing::warn!(solution_id = best, "best option not shortlisted");
        }
    }

    let company_id = snapshot
        .companies
        .first()
        .map(|c| c.id.clone())
        .context("no company seeded")?;
    let req_doc_id = api
        .create_req_doc(coach::draft_req_doc(&company_id).validated()?)
        .await?;
    tracing::info!(%req_doc_id, "requirement document created");

    api.select_solutions(&req_doc_id, shortlist.selected_ids()).await?;

    let mut preview = DispatchPreview::default();
    preview.add_consultant("aegis-partners");
    preview.set_visibility(VisibilityLevel::Limited);
    api.set_visibility(&req_doc_id, preview.visibility).await?;
    tracing::info!(
        vendors = preview.vendor_count,
        consultants = preview.consultant_count,
        "dispatch preview ready"
    );

    let doc = api.req_doc(&req_doc_id).await?;
    let recommendation = matching::recommend_mode(Some(&doc));
    api.set_matching_mode(&req_doc_id, recommendation.recommended)
        .await?;
    tracing::info!(
        mode = ?recommendation.recommended,
        reason = recommendation.reason,
        "matching mode set"
    );

    let leads = api.seed_matching(&req_doc_id).await?;

    // One lead per audience; the rest stay open.
    let mut accepted = 0;
    for audience in [Audience::Vendor, Audience::Consultant] {
        let Some(lead) = leads.iter().find(|l| l.audience == audience) else {
            continue;
        };
        let user_id = match audience {
            Audience::Vendor => VENDOR_USER,
            Audience::Consultant => CONSULTANT_USER,
        };
        let revision = api.req_doc(&req_doc_id).await?.revision;
        match api.accept_lead(&lead.id, user_id, Some(revision)).await {
            Ok(()) => accepted += 1,
            Err(err) => tracing::warn!(lead_id = %lead.id, error = %err, "lead not accepted"),
        }
    }

    let doc = api.req_doc(&req_doc_id).await?;
    api.submit_quotation(
        NewQuotation {
            vendor_user_id: VENDOR_USER.into(),
            req_doc_id: req_doc_id.clone(),
            price_band: doc.budget_band,
            summary: "Ads, CRM and analytics rollout".into(),
            version: 1,
        }
        .validated()?,
    )
    .await?;
    api.submit_proposal(
        NewProposal {
            consultant_user_id: CONSULTANT_USER.into(),
            req_doc_id: req_doc_id.clone(),
            fee_band: (8_000, 12_000),
            approach: "Grant-first plan with vendor shortlist".into(),
            timeline: doc.timeline_months,
            version: 1,
        }
        .validated()?,
    )
    .await?;

    let users = api.snapshot().await.users;
    let board = ResponseBoard::from_leads(&api.leads_for(&req_doc_id).await, &users, chrono::Utc::now());

    api.finalize_indicatives(&req_doc_id).await?;
    let doc = api.req_doc(&req_doc_id).await?;
    api.award_vendor(&req_doc_id, VENDOR_USER, Some(doc.revision))
        .await?;
    let doc = api.req_doc(&req_doc_id).await?;
    tracing::info!(%req_doc_id, status = ?doc.status, revision = doc.revision, "walkthrough done");

    Ok(WalkthroughReport {
        req_doc_id,
        refined_goal: coach_state.input,
        clarifier,
        selected_solution_ids: doc.trhls_selected_ids,
        best_overall_id: comparison.best_overall_id,
        best_overall_description,
        dispatch_vendors: preview.vendor_count,
        dispatch_consultants: preview.consultant_count,
        matching_mode: recommendation.recommended,
        leads_seeded: leads.len(),
        leads_accepted: accepted,
        response_stats: board.stats,
        final_status: doc.status,
        final_revision: doc.revision,
    })
}

/// Walks the coach to its preview and returns the final state together with
/// the label of the clarifier that was picked.
fn run_coach() -> anyhow::Result<(CoachState, String)> {
    let mut state = CoachState::default();
    let domain = coach::detect_domain(&state.input).context("default goal has no domain")?;
    let clarifier = coach::clarifiers(domain)
        .first()
        .context("no clarifiers for detected domain")?;
    let suggestion = coach::suggestion_for(domain).context("no suggestion for detected domain")?;

    for action in [
        CoachAction::Diagnose(domain),
        CoachAction::ChooseClarifier(clarifier.id.to_string()),
        CoachAction::ShowSuggestion(suggestion.text.to_string()),
        CoachAction::ApplySuggestion,
        CoachAction::ShowPreview,
    ] {
        state = coach::step(&state, action)?;
    }
    tracing::info!(stage = state.stage.name(), "coach finished");
    Ok((state, coach::clarifier_label(domain, clarifier.id)))
}
