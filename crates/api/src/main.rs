use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smartgrant_core::backend::{MarketplaceApi, MockBackend};
use smartgrant_core::coach::{self, config::GrantPrediction, CoachAction, CoachDomain, CoachStage, CoachState};
use smartgrant_core::domain::contract::SolutionSelection;
use smartgrant_core::domain::marketplace::{Lead, NewProposal, NewQuotation, Proposal, Quotation};
use smartgrant_core::domain::reqdoc::{MatchingMode, NewReqDoc, ReqDoc, VisibilityLevel};
use smartgrant_core::domain::solution::SolutionOption;
use smartgrant_core::impact::{self, Comparison};
use smartgrant_core::matching::{self, modes::ModeProfile, ModeHint, ModeRecommendation};
use smartgrant_core::store::{LeadInbox, StoreError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = smartgrant_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let backend = MockBackend::seeded(settings.lead_policy(), settings.latency_scale);
    let state = AppState {
        backend: Arc::new(backend),
    };

    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));

    tracing::info!(%addr, latency_scale = settings.latency_scale, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/solutions", get(list_solutions))
        .route("/solutions/compare", post(compare_solutions))
        .route("/reqdocs", post(create_req_doc))
        .route("/reqdocs/:id", get(get_req_doc))
        .route("/reqdocs/:id/recommendation", get(get_recommendation))
        .route("/reqdocs/:id/hint", get(get_hint))
        .route("/reqdocs/:id/solutions", put(put_solutions))
        .route("/reqdocs/:id/visibility", put(put_visibility))
        .route("/reqdocs/:id/matching-mode", put(put_matching_mode))
        .route("/reqdocs/:id/matching", post(seed_matching))
        .route("/reqdocs/:id/leads", get(list_leads))
        .route("/reqdocs/:id/finalize", post(finalize_indicatives))
        .route("/reqdocs/:id/award/vendor", post(award_vendor))
        .route("/reqdocs/:id/award/consultant", post(award_consultant))
        .route("/leads/:id/accept", post(accept_lead))
        .route("/users/:id/leads", get(lead_inbox))
        .route("/proposals", post(submit_proposal))
        .route("/quotations", post(submit_quotation))
        .route("/coach/diagnose", post(coach_diagnose))
        .route("/coach/step", post(coach_step))
        .route("/modes", get(list_modes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    backend: Arc<dyn MarketplaceApi>,
}

fn store_status(err: StoreError) -> StatusCode {
    let status = match &err {
        StoreError::ReqDocNotFound(_)
        | StoreError::LeadNotFound(_)
        | StoreError::UserNotFound(_)
        | StoreError::WalletNotFound(_) => StatusCode::NOT_FOUND,
        StoreError::UnknownSolution(_) | StoreError::WrongPersona { .. } => StatusCode::BAD_REQUEST,
        StoreError::InsufficientCredits { .. } => StatusCode::PAYMENT_REQUIRED,
        StoreError::LeadExpired(_) => StatusCode::GONE,
        StoreError::LeadAlreadyAccepted { .. }
        | StoreError::AlreadySeeded(_)
        | StoreError::AlreadyAwarded(_)
        | StoreError::RevisionConflict { .. } => StatusCode::CONFLICT,
        StoreError::LeadExpiryOutOfRange(_) | StoreError::UnexpectedOutcome { .. } => {
            sentry::capture_error(&err);
            tracing::error!(error = %err, "backend failed");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };
    tracing::info!(error = %err, %status, "store rejected request");
    status
}

/// A write went through but its result cannot be read back.
fn missing_after_write(kind: &str, id: &str) -> StatusCode {
    let err = anyhow::anyhow!("{kind} {id} missing after write");
    sentry_anyhow::capture_anyhow(&err);
    tracing::error!(error = %err, "inconsistent backend state");
    StatusCode::INTERNAL_SERVER_ERROR
}

fn invalid(err: anyhow::Error) -> StatusCode {
    tracing::info!(error = %format!("{err:#}"), "invalid request body");
    StatusCode::BAD_REQUEST
}

async fn list_solutions(State(state): State<AppState>) -> Json<Vec<SolutionOption>> {
    Json(state.backend.snapshot().await.solutions)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompareRequest {
    /// Ids from the catalog. Takes precedence over `options`.
    #[serde(default)]
    ids: Vec<String>,
    #[serde(default)]
    options: Vec<SolutionOption>,
}

async fn compare_solutions(
    State(state): State<AppState>,
    Json(req): Json<CompareRequest>,
) -> Result<Json<Comparison>, StatusCode> {
    let options = if req.ids.is_empty() {
        req.options
    } else {
        let snapshot = state.backend.snapshot().await;
        req.ids
            .iter()
            .map(|id| snapshot.solution(id).cloned().ok_or(StatusCode::NOT_FOUND))
            .collect::<Result<Vec<_>, _>>()?
    };
    Ok(Json(impact::compare(&options)))
}

async fn create_req_doc(
    State(state): State<AppState>,
    Json(req): Json<NewReqDoc>,
) -> Result<(StatusCode, Json<ReqDoc>), StatusCode> {
    let req = req.validated().map_err(invalid)?;
    let id = state.backend.create_req_doc(req).await.map_err(store_status)?;
    let doc = state.backend.req_doc(&id).await.map_err(store_status)?;
    Ok((StatusCode::CREATED, Json(doc)))
}

async fn get_req_doc(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReqDoc>, StatusCode> {
    state.backend.req_doc(&id).await.map(Json).map_err(store_status)
}

async fn get_recommendation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ModeRecommendation>, StatusCode> {
    let doc = state.backend.req_doc(&id).await.map_err(store_status)?;
    Ok(Json(matching::recommend_mode(Some(&doc))))
}

async fn get_hint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ModeHint>, StatusCode> {
    let doc = state.backend.req_doc(&id).await.map_err(store_status)?;
    Ok(Json(matching::mode_hint(Some(&doc))))
}

async fn put_solutions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(selection): Json<SolutionSelection>,
) -> Result<Json<ReqDoc>, StatusCode> {
    let selection = selection.validated().map_err(invalid)?;
    state
        .backend
        .select_solutions(&id, selection.ids)
        .await
        .map_err(store_status)?;
    get_req_doc(State(state), Path(id)).await
}

#[derive(Debug, Deserialize)]
struct VisibilityRequest {
    visibility: VisibilityLevel,
}

async fn put_visibility(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<VisibilityRequest>,
) -> Result<Json<ReqDoc>, StatusCode> {
    state
        .backend
        .set_visibility(&id, req.visibility)
        .await
        .map_err(store_status)?;
    get_req_doc(State(state), Path(id)).await
}

#[derive(Debug, Deserialize)]
struct MatchingModeRequest {
    mode: MatchingMode,
}

async fn put_matching_mode(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MatchingModeRequest>,
) -> Result<Json<ReqDoc>, StatusCode> {
    state
        .backend
        .set_matching_mode(&id, req.mode)
        .await
        .map_err(store_status)?;
    get_req_doc(State(state), Path(id)).await
}

async fn seed_matching(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Vec<Lead>>), StatusCode> {
    let leads = state.backend.seed_matching(&id).await.map_err(store_status)?;
    tracing::info!(req_doc_id = %id, leads = leads.len(), "matching seeded");
    Ok((StatusCode::CREATED, Json(leads)))
}

async fn list_leads(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Lead>>, StatusCode> {
    state.backend.req_doc(&id).await.map_err(store_status)?;
    Ok(Json(state.backend.leads_for(&id).await))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AcceptLeadRequest {
    user_id: String,
    #[serde(default)]
    expected_revision: Option<u64>,
}

async fn accept_lead(
    State(state): State<AppState>,
    Path(lead_id): Path<String>,
    Json(req): Json<AcceptLeadRequest>,
) -> Result<Json<Lead>, StatusCode> {
    state
        .backend
        .accept_lead(&lead_id, &req.user_id, req.expected_revision)
        .await
        .map_err(store_status)?;
    state
        .backend
        .snapshot()
        .await
        .leads
        .into_iter()
        .find(|l| l.id == lead_id)
        .map(Json)
        .ok_or_else(|| missing_after_write("lead", &lead_id))
}

async fn lead_inbox(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<LeadInbox>, StatusCode> {
    state.backend.lead_inbox(&user_id).await.map(Json).map_err(store_status)
}

async fn submit_proposal(
    State(state): State<AppState>,
    Json(req): Json<NewProposal>,
) -> Result<(StatusCode, Json<Proposal>), StatusCode> {
    let req = req.validated().map_err(invalid)?;
    let id = state.backend.submit_proposal(req).await.map_err(store_status)?;
    let proposal = state
        .backend
        .snapshot()
        .await
        .proposals
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| missing_after_write("proposal", &id))?;
    Ok((StatusCode::CREATED, Json(proposal)))
}

async fn submit_quotation(
    State(state): State<AppState>,
    Json(req): Json<NewQuotation>,
) -> Result<(StatusCode, Json<Quotation>), StatusCode> {
    let req = req.validated().map_err(invalid)?;
    let id = state.backend.submit_quotation(req).await.map_err(store_status)?;
    let quotation = state
        .backend
        .snapshot()
        .await
        .quotations
        .into_iter()
        .find(|q| q.id == id)
        .ok_or_else(|| missing_after_write("quotation", &id))?;
    Ok((StatusCode::CREATED, Json(quotation)))
}

async fn finalize_indicatives(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReqDoc>, StatusCode> {
    state
        .backend
        .finalize_indicatives(&id)
        .await
        .map_err(store_status)?;
    get_req_doc(State(state), Path(id)).await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AwardRequest {
    user_id: String,
    #[serde(default)]
    expected_revision: Option<u64>,
}

async fn award_vendor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AwardRequest>,
) -> Result<Json<ReqDoc>, StatusCode> {
    state
        .backend
        .award_vendor(&id, &req.user_id, req.expected_revision)
        .await
        .map_err(store_status)?;
    get_req_doc(State(state), Path(id)).await
}

async fn award_consultant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AwardRequest>,
) -> Result<Json<ReqDoc>, StatusCode> {
    state
        .backend
        .award_consultant(&id, &req.user_id, req.expected_revision)
        .await
        .map_err(store_status)?;
    get_req_doc(State(state), Path(id)).await
}

#[derive(Debug, Deserialize)]
struct DiagnoseRequest {
    input: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DiagnoseResponse {
    domain: Option<CoachDomain>,
    clarifiers: &'static [coach::Clarifier],
    state: CoachState,
}

/// Detects the goal's domain and, when one is found, advances a fresh coach
/// to the diagnosed stage.
async fn coach_diagnose(Json(req): Json<DiagnoseRequest>) -> Result<Json<DiagnoseResponse>, StatusCode> {
    let input = req.input.trim();
    if input.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let fresh = CoachState {
        input: input.to_string(),
        stage: CoachStage::Input,
    };
    let domain = coach::detect_domain(input);
    let state = match domain {
        Some(domain) => coach::step(&fresh, CoachAction::Diagnose(domain)).map_err(|_| StatusCode::CONFLICT)?,
        None => fresh,
    };
    Ok(Json(DiagnoseResponse {
        domain,
        clarifiers: domain.map(coach::clarifiers).unwrap_or_default(),
        state,
    }))
}

#[derive(Debug, Deserialize)]
struct CoachStepRequest {
    state: CoachState,
    action: CoachAction,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CoachStepResponse {
    state: CoachState,
    #[serde(skip_serializing_if = "Option::is_none")]
    clarifier_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<coach::Suggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    draft: Option<NewReqDoc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    grant_predictions: Vec<GrantPrediction>,
}

async fn coach_step(Json(req): Json<CoachStepRequest>) -> Result<Json<CoachStepResponse>, StatusCode> {
    let state = coach::step(&req.state, req.action).map_err(|e| {
        tracing::info!(error = %e, "illegal coach transition");
        StatusCode::CONFLICT
    })?;

    let clarifier_label = match &state.stage {
        CoachStage::Elaborated { domain, clarifier_id }
        | CoachStage::Structured { domain, clarifier_id, .. }
        | CoachStage::Applied { domain, clarifier_id }
        | CoachStage::PreviewReady { domain, clarifier_id } => Some(coach::clarifier_label(*domain, clarifier_id)),
        CoachStage::Input | CoachStage::Diagnosed { .. } => None,
    };
    let suggestion = match &state.stage {
        CoachStage::Elaborated { domain, .. } => coach::suggestion_for(*domain),
        _ => None,
    };
    let (draft, grant_predictions) = match &state.stage {
        CoachStage::PreviewReady { .. } => (
            Some(coach::draft_req_doc("company-1")),
            coach::config::grant_predictions(),
        ),
        _ => (None, Vec::new()),
    };

    Ok(Json(CoachStepResponse {
        state,
        clarifier_label,
        suggestion,
        draft,
        grant_predictions,
    }))
}

async fn list_modes() -> Json<[&'static ModeProfile; 2]> {
    Json(matching::modes::all_profiles())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &smartgrant_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartgrant_core::domain::reqdoc::ReqDocStatus;
    use smartgrant_core::store::LeadPolicy;

    fn state() -> AppState {
        AppState {
            backend: Arc::new(MockBackend::seeded(LeadPolicy::default(), 0.0)),
        }
    }

    async fn created_doc(state: &AppState) -> ReqDoc {
        let (status, Json(doc)) = create_req_doc(State(state.clone()), Json(coach::draft_req_doc("company-1")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        doc
    }

    #[tokio::test]
    async fn create_then_recommend() {
        let state = state();
        let doc = created_doc(&state).await;

        let Json(rec) = get_recommendation(State(state.clone()), Path(doc.id.clone()))
            .await
            .unwrap();
        assert_eq!(rec.recommended, MatchingMode::ConsultantManaged);

        let Json(hint) = get_hint(State(state), Path(doc.id)).await.unwrap();
        assert_eq!(hint.recommended, MatchingMode::SmeSelfManaged);
    }

    #[tokio::test]
    async fn invalid_bodies_are_bad_requests() {
        let state = state();
        let mut req = coach::draft_req_doc("company-1");
        req.problem = "   ".into();
        let err = create_req_doc(State(state.clone()), Json(req)).await.unwrap_err();
        assert_eq!(err, StatusCode::BAD_REQUEST);

        let doc = created_doc(&state).await;
        let selection = SolutionSelection {
            ids: vec!["trhls-1".into(), "trhls-2".into(), "trhls-3".into(), "psg-digital-ads-suite".into()],
        };
        let err = put_solutions(State(state), Path(doc.id), Json(selection))
            .await
            .unwrap_err();
        assert_eq!(err, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_doc_is_not_found() {
        let err = get_req_doc(State(state()), Path("missing".into())).await.unwrap_err();
        assert_eq!(err, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn lead_acceptance_maps_conflicts() {
        let state = state();
        let doc = created_doc(&state).await;
        let (_, Json(leads)) = seed_matching(State(state.clone()), Path(doc.id.clone()))
            .await
            .unwrap();
        let lead_id = leads[0].id.clone();

        let accept = |user: &str, expected_revision: Option<u64>| {
            accept_lead(
                State(state.clone()),
                Path(lead_id.clone()),
                Json(AcceptLeadRequest {
                    user_id: user.into(),
                    expected_revision,
                }),
            )
        };
        let doc = state.backend.req_doc(&doc.id).await.unwrap();
        assert_eq!(
            accept("user-vendor-2", Some(doc.revision + 1)).await.unwrap_err(),
            StatusCode::CONFLICT
        );
        assert_eq!(accept("user-consultant-1", None).await.unwrap_err(), StatusCode::BAD_REQUEST);
        let Json(lead) = accept("user-vendor-2", Some(doc.revision)).await.unwrap();
        assert_eq!(lead.accepted_by_user_id.as_deref(), Some("user-vendor-2"));
        assert_eq!(accept("user-vendor-1", None).await.unwrap_err(), StatusCode::CONFLICT);

        let err = seed_matching(State(state), Path(doc.id)).await.unwrap_err();
        assert_eq!(err, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn inbox_lists_leads_for_the_users_audience() {
        let state = state();
        let doc = created_doc(&state).await;
        let (_, Json(leads)) = seed_matching(State(state.clone()), Path(doc.id)).await.unwrap();
        let consultant_lead = leads.iter().find(|l| l.id.starts_with("lead-consultant-")).unwrap();
        accept_lead(
            State(state.clone()),
            Path(consultant_lead.id.clone()),
            Json(AcceptLeadRequest {
                user_id: "user-consultant-2".into(),
                expected_revision: None,
            }),
        )
        .await
        .unwrap();

        let Json(inbox) = lead_inbox(State(state.clone()), Path("user-consultant-2".into()))
            .await
            .unwrap();
        assert_eq!(inbox.balance, 9);
        assert_eq!(inbox.accepted.len(), 1);
        assert_eq!(inbox.available.len(), 1);
        assert!(inbox.available.iter().all(|l| l.id.starts_with("lead-consultant-")));

        let err = lead_inbox(State(state.clone()), Path("user-sme-1".into())).await.unwrap_err();
        assert_eq!(err, StatusCode::BAD_REQUEST);
        let err = lead_inbox(State(state), Path("ghost".into())).await.unwrap_err();
        assert_eq!(err, StatusCode::NOT_FOUND);
    }

    #[test]
    fn backend_faults_are_server_errors() {
        assert_eq!(
            store_status(StoreError::LeadExpiryOutOfRange(1_000_000_000)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            store_status(StoreError::UnexpectedOutcome { action: "create_req_doc" }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn award_honours_expected_revision() {
        let state = state();
        let doc = created_doc(&state).await;
        let Json(doc) = finalize_indicatives(State(state.clone()), Path(doc.id)).await.unwrap();

        let stale = AwardRequest {
            user_id: "user-vendor-1".into(),
            expected_revision: Some(doc.revision - 1),
        };
        let err = award_vendor(State(state.clone()), Path(doc.id.clone()), Json(stale))
            .await
            .unwrap_err();
        assert_eq!(err, StatusCode::CONFLICT);

        let fresh = AwardRequest {
            user_id: "user-vendor-1".into(),
            expected_revision: Some(doc.revision),
        };
        let Json(awarded) = award_vendor(State(state), Path(doc.id), Json(fresh)).await.unwrap();
        assert_eq!(awarded.status, ReqDocStatus::Awarded);
    }

    #[tokio::test]
    async fn compare_by_catalog_ids() {
        let req = CompareRequest {
            ids: vec!["psg-digital-ads-suite".into(), "edg-market-expansion-sea".into()],
            ..Default::default()
        };
        let Json(cmp) = compare_solutions(State(state()), Json(req)).await.unwrap();
        assert_eq!(cmp.best_overall_id.as_deref(), Some("edg-market-expansion-sea"));

        let req = CompareRequest {
            ids: vec!["nope".into()],
            ..Default::default()
        };
        let err = compare_solutions(State(state()), Json(req)).await.unwrap_err();
        assert_eq!(err, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn coach_flow_over_http_handlers() {
        let Json(diag) = coach_diagnose(Json(DiagnoseRequest {
            input: "We need more customers".into(),
        }))
        .await
        .unwrap();
        assert_eq!(diag.domain, Some(CoachDomain::Growth));
        assert_eq!(diag.clarifiers.len(), 3);

        let Json(res) = coach_step(Json(CoachStepRequest {
            state: diag.state,
            action: CoachAction::ChooseClarifier("visibility".into()),
        }))
        .await
        .unwrap();
        assert!(res.suggestion.is_some());
        assert_eq!(res.clarifier_label.as_deref(), Some("Increase online visibility"));

        let err = coach_step(Json(CoachStepRequest {
            state: res.state,
            action: CoachAction::ShowPreview,
        }))
        .await
        .unwrap_err();
        assert_eq!(err, StatusCode::CONFLICT);
    }
}
