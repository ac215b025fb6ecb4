//! In-process mock of the marketplace API: each call waits a fixed latency
//! and then applies exactly one reducer step to the shared state.

use crate::domain::marketplace::{Lead, NewProposal, NewQuotation};
use crate::domain::reqdoc::{MatchingMode, NewReqDoc, ReqDoc, VisibilityLevel};
use crate::store::{reduce, Action, ActionOutcome, AppState, LeadInbox, LeadPolicy, Stamp, StoreError};
use std::time::Duration;
use tokio::sync::Mutex;

/// Base latency of an action before scaling, in milliseconds.
pub fn base_latency_ms(action: &Action) -> u64 {
    match action {
        Action::SetCurrentPersona { .. } => 0,
        Action::CreateReqDoc { .. } => 500,
        Action::SelectSolutions { .. } => 300,
        Action::SetVisibility { .. } | Action::SetMatchingMode { .. } => 200,
        Action::SeedMatching { .. } => 1000,
        Action::AcceptLead { .. } => 800,
        Action::SubmitProposal { .. } | Action::SubmitQuotation { .. } => 600,
        Action::FinalizeIndicatives { .. } => 400,
        Action::AwardVendor { .. } | Action::AwardConsultant { .. } => 500,
    }
}

#[async_trait::async_trait]
pub trait MarketplaceApi: Send + Sync {
    async fn snapshot(&self) -> AppState;

    async fn dispatch(&self, action: Action) -> Result<ActionOutcome, StoreError>;

    async fn req_doc(&self, id: &str) -> Result<ReqDoc, StoreError> {
        self.snapshot()
            .await
            .req_doc(id)
            .cloned()
            .ok_or_else(|| StoreError::ReqDocNotFound(id.to_string()))
    }

    async fn create_req_doc(&self, req_doc: NewReqDoc) -> Result<String, StoreError> {
        match self.dispatch(Action::CreateReqDoc { req_doc }).await? {
            ActionOutcome::Created { id } => Ok(id),
            other => Err(unexpected("create_req_doc", &other)),
        }
    }

    async fn select_solutions(&self, req_doc_id: &str, solution_ids: Vec<String>) -> Result<(), StoreError> {
        self.dispatch(Action::SelectSolutions {
            req_doc_id: req_doc_id.to_string(),
            solution_ids,
        })
        .await
        .map(drop)
    }

    async fn set_visibility(&self, req_doc_id: &str, visibility: VisibilityLevel) -> Result<(), StoreError> {
        self.dispatch(Action::SetVisibility {
            req_doc_id: req_doc_id.to_string(),
            visibility,
        })
        .await
        .map(drop)
    }

    async fn set_matching_mode(&self, req_doc_id: &str, mode: MatchingMode) -> Result<(), StoreError> {
        self.dispatch(Action::SetMatchingMode {
            req_doc_id: req_doc_id.to_string(),
            mode,
        })
        .await
        .map(drop)
    }

    async fn seed_matching(&self, req_doc_id: &str) -> Result<Vec<Lead>, StoreError> {
        self.dispatch(Action::SeedMatching {
            req_doc_id: req_doc_id.to_string(),
        })
        .await?;
        Ok(self.leads_for(req_doc_id).await)
    }

    async fn leads_for(&self, req_doc_id: &str) -> Vec<Lead> {
        self.snapshot()
            .await
            .leads_for(req_doc_id)
            .into_iter()
            .cloned()
            .collect()
    }

    async fn lead_inbox(&self, user_id: &str) -> Result<LeadInbox, StoreError> {
        self.snapshot().await.lead_inbox(user_id)
    }

    async fn accept_lead(
        &self,
        lead_id: &str,
        user_id: &str,
        expected_revision: Option<u64>,
    ) -> Result<(), StoreError> {
        self.dispatch(Action::AcceptLead {
            lead_id: lead_id.to_string(),
            user_id: user_id.to_string(),
            expected_revision,
        })
        .await
        .map(drop)
    }

    async fn submit_proposal(&self, proposal: NewProposal) -> Result<String, StoreError> {
        match self.dispatch(Action::SubmitProposal { proposal }).await? {
            ActionOutcome::Created { id } => Ok(id),
            other => Err(unexpected("submit_proposal", &other)),
        }
    }

    async fn submit_quotation(&self, quotation: NewQuotation) -> Result<String, StoreError> {
        match self.dispatch(Action::SubmitQuotation { quotation }).await? {
            ActionOutcome::Created { id } => Ok(id),
            other => Err(unexpected("submit_quotation", &other)),
        }
    }

    async fn finalize_indicatives(&self, req_doc_id: &str) -> Result<(), StoreError> {
        self.dispatch(Action::FinalizeIndicatives {
            req_doc_id: req_doc_id.to_string(),
        })
        .await
        .map(drop)
    }

    async fn award_vendor(
        &self,
        req_doc_id: &str,
        vendor_user_id: &str,
        expected_revision: Option<u64>,
    ) -> Result<(), StoreError> {
        self.dispatch(Action::AwardVendor {
            req_doc_id: req_doc_id.to_string(),
            vendor_user_id: vendor_user_id.to_string(),
            expected_revision,
        })
        .await
        .map(drop)
    }

    async fn award_consultant(
        &self,
        req_doc_id: &str,
        consultant_user_id: &str,
        expected_revision: Option<u64>,
    ) -> Result<(), StoreError> {
        self.dispatch(Action::AwardConsultant {
            req_doc_id: req_doc_id.to_string(),
            consultant_user_id: consultant_user_id.to_string(),
            expected_revision,
        })
        .await
        .map(drop)
    }
}

fn unexpected(action: &'static str, outcome: &ActionOutcome) -> StoreError {
    tracing::error!(action, ?outcome, "backend returned an unexpected outcome");
    StoreError::UnexpectedOutcome { action }
}

#[derive(Debug)]
pub struct MockBackend {
    state: Mutex<AppState>,
    latency_scale: f64,
}

impl MockBackend {
    pub fn new(state: AppState, latency_scale: f64) -> Self {
        Self {
            state: Mutex::new(state),
            latency_scale: if latency_scale.is_finite() {
                latency_scale.max(0.0)
            } else {
                0.0
            },
        }
    }

    pub fn seeded(lead_policy: LeadPolicy, latency_scale: f64) -> Self {
        Self::new(AppState::seeded(lead_policy), latency_scale)
    }

    fn latency(&self, action: &Action) -> Duration {
        let secs = base_latency_ms(action) as f64 * self.latency_scale / 1000.0;
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
    }
}

#[async_trait::async_trait]
impl MarketplaceApi for MockBackend {
    async fn snapshot(&self) -> AppState {
        self.state.lock().await.clone()
    }

    async fn dispatch(&self, action: Action) -> Result<ActionOutcome, StoreError> {
        let name = action.name();
        let delay = self.latency(&action);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().await;
        match reduce(&state, action, &Stamp::now()) {
            Ok((next, outcome)) => {
                *state = next;
                tracing::debug!(action = name, ?outcome, "action applied");
                Ok(outcome)
            }
            Err(err) => {
                tracing::warn!(action = name, error = %err, "action rejected");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::draft_req_doc;
    use crate::domain::reqdoc::ReqDocStatus;

    fn backend() -> MockBackend {
        MockBackend::seeded(LeadPolicy::default(), 0.0)
    }

    #[test]
    fn latency_scales_base_delay() {
        let b = MockBackend::seeded(LeadPolicy::default(), 0.5);
        let seed = Action::SeedMatching {
            req_doc_id: "x".into(),
        };
        assert_eq!(b.latency(&seed), Duration::from_millis(500));
        assert!(backend().latency(&seed).is_zero());
    }

    #[test]
    fn unusable_latency_scale_means_no_delay() {
        let seed = Action::SeedMatching {
            req_doc_id: "x".into(),
        };
        for scale in [f64::INFINITY, f64::NAN, -2.0, f64::MAX] {
            let b = MockBackend::seeded(LeadPolicy::default(), scale);
            assert!(b.latency(&seed).is_zero(), "scale {scale}");
        }
    }

    struct AlwaysApplied;

    #[async_trait::async_trait]
    impl MarketplaceApi for AlwaysApplied {
        async fn snapshot(&self) -> AppState {
            AppState::seeded(LeadPolicy::default())
        }

        async fn dispatch(&self, _action: Action) -> Result<ActionOutcome, StoreError> {
            Ok(ActionOutcome::Applied)
        }
    }

    #[tokio::test]
    async fn wrong_outcome_is_an_error_not_a_panic() {
        let api = AlwaysApplied;
        let err = api.create_req_doc(draft_req_doc("company-1")).await.unwrap_err();
        assert_eq!(err, StoreError::UnexpectedOutcome { action: "create_req_doc" });

        let err = api
            .submit_quotation(NewQuotation {
                vendor_user_id: "user-vendor-1".into(),
                req_doc_id: "doc".into(),
                price_band: (1, 2),
                summary: "Ads".into(),
                version: 1,
            })
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::UnexpectedOutcome { action: "submit_quotation" });
    }

    #[tokio::test]
    async fn full_flow_through_mock_api() {
        let api = backend();
        let id = api.create_req_doc(draft_req_doc("company-1")).await.unwrap();
        api.select_solutions(&id, vec!["trhls-2".into()]).await.unwrap();
        api.set_matching_mode(&id, MatchingMode::ConsultantManaged).await.unwrap();

        let leads = api.seed_matching(&id).await.unwrap();
        assert_eq!(leads.len(), 4);

        api.accept_lead(&leads[0].id, "user-vendor-1", None).await.unwrap();
        let inbox = api.lead_inbox("user-vendor-1").await.unwrap();
        assert_eq!(inbox.balance, 4);
        assert_eq!(inbox.accepted.len(), 1);
        assert_eq!(inbox.available.len(), 1);
        api.finalize_indicatives(&id).await.unwrap();
        api.award_consultant(&id, "user-consultant-2", None).await.unwrap();

        let doc = api.req_doc(&id).await.unwrap();
        assert_eq!(doc.status, ReqDocStatus::Awarded);
        assert_eq!(doc.matching_mode, Some(MatchingMode::ConsultantManaged));
        assert_eq!(api.snapshot().await.wallet("user-vendor-1").unwrap().balance, 4);
    }

    #[tokio::test]
    async fn rejected_action_leaves_state_untouched() {
        let api = backend();
        let before = api.snapshot().await;
        let err = api.accept_lead("lead-missing", "user-vendor-1", None).await.unwrap_err();
        assert_eq!(err, StoreError::LeadNotFound("lead-missing".into()));
        assert_eq!(api.snapshot().await, before);
    }
}
