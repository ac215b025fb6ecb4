use crate::domain::marketplace::{Audience, Lead, User};
use crate::domain::response::{LeadResponse, MatchingStats, ResponderKind, ResponseStatus, ResponseWindow};
use crate::seeds;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Hours remaining at or below which a response window counts as urgent.
const URGENT_WITHIN_HOURS: i64 = 6;

/// Live view of vendor and consultant replies to a dispatched opportunity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBoard {
    pub responses: Vec<LeadResponse>,
    pub stats: MatchingStats,
    pub response_window: ResponseWindow,
    pub selected_response_id: Option<String>,
}

impl ResponseBoard {
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let responses = seeds::lead_responses(now);
        let stats = compute_stats(&responses);
        Self {
            responses,
            stats,
            response_window: response_window(now + Duration::hours(20), now),
            selected_response_id: None,
        }
    }

    /// Board over leads actually dispatched for a document. Accepted leads
    /// count as accepted, lapsed ones as expired and the rest as pending. The
    /// window closes with the earliest still-open lead.
    pub fn from_leads(leads: &[Lead], users: &[User], now: DateTime<Utc>) -> Self {
        let responses: Vec<LeadResponse> = leads
            .iter()
            .map(|lead| {
                let accepted_by = lead.accepted_by_user_id.as_deref();
                let status = match accepted_by {
                    Some(_) => ResponseStatus::Accepted,
                    None if now > lead.expires_at => ResponseStatus::Expired,
                    None => ResponseStatus::Pending,
                };
                let name = accepted_by
                    .map(|id| {
                        users
                            .iter()
                            .find(|u| u.id == id)
                            .map_or_else(|| id.to_string(), |u| u.name.clone())
                    })
                    .unwrap_or_else(|| "Unassigned".to_string());
                LeadResponse {
                    id: lead.id.clone(),
                    kind: match lead.audience {
                        Audience::Vendor => ResponderKind::Vendor,
                        Audience::Consultant => ResponderKind::Consultant,
                    },
                    responder_id: accepted_by.unwrap_or_default().to_string(),
                    name,
                    status,
                    qualification_score: lead.qualification_score,
                    response_time_hours: None,
                    submitted_at: None,
                    expires_at: lead.expires_at,
                    indicative_submission: None,
                }
            })
            .collect();

        let closes_at = responses
            .iter()
            .filter(|r| r.status == ResponseStatus::Pending)
            .map(|r| r.expires_at)
            .min()
            .unwrap_or(now);
        Self {
            stats: compute_stats(&responses),
            responses,
            response_window: response_window(closes_at, now),
            selected_response_id: None,
        }
    }

    /// Selects a response by id. Unknown ids clear the selection.
    pub fn select(&mut self, response_id: Option<&str>) {
        self.selected_response_id = response_id
            .filter(|id| self.responses.iter().any(|r| r.id == *id))
            .map(str::to_string);
    }

    pub fn selected(&self) -> Option<&LeadResponse> {
        let id = self.selected_response_id.as_deref()?;
        self.responses.iter().find(|r| r.id == id)
    }

    /// Updates one response's status and recomputes the aggregate stats.
    /// Returns false when no response has that id.
    pub fn update_status(&mut self, response_id: &str, status: ResponseStatus) -> bool {
        let Some(response) = self.responses.iter_mut().find(|r| r.id == response_id) else {
            return false;
        };
        response.status = status;
        self.stats = compute_stats(&self.responses);
        tracing::debug!(response_id, ?status, response_rate = self.stats.response_rate, "response status updated");
        true
    }

    pub fn refresh(&mut self, now: DateTime<Utc>) {
        *self = Self::seeded(now);
    }
}

pub fn compute_stats(responses: &[LeadResponse]) -> MatchingStats {
    let count = |status: ResponseStatus| responses.iter().filter(|r| r.status == status).count() as u32;

    let accepted = count(ResponseStatus::Accepted);
    let declined = count(ResponseStatus::Declined);
    let total_sent = responses.len() as u32;

    let response_rate = if total_sent > 0 {
        ((accepted + declined) as f64 / total_sent as f64 * 100.0).round() as u32
    } else {
        0
    };

    let times: Vec<f64> = responses
        .iter()
        .filter_map(|r| r.response_time_hours)
        .filter(|t| !t.is_nan())
        .collect();
    let avg_response_time = if times.is_empty() {
        0.0
    } else {
        let mean = times.iter().sum::<f64>() / times.len() as f64;
        (mean * 10.0).round() / 10.0
    };

    MatchingStats {
        total_sent,
        accepted,
        declined,
        pending: count(ResponseStatus::Pending),
        expired: count(ResponseStatus::Expired),
        response_rate,
        avg_response_time,
    }
}

pub fn response_window(closes_at: DateTime<Utc>, now: DateTime<Utc>) -> ResponseWindow {
    let hours_remaining = (closes_at - now).num_hours().max(0);
    ResponseWindow {
        closes_at,
        hours_remaining,
        is_urgent: hours_remaining <= URGENT_WITHIN_HOURS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::draft_req_doc;
    use crate::store::{reduce, Action, ActionOutcome, AppState, LeadPolicy, Stamp};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    #[test]
    fn seeded_stats_match_seed_counts() {
        let board = ResponseBoard::seeded(now());
        assert_eq!(board.stats.total_sent, 6);
        assert_eq!(board.stats.accepted, 2);
        assert_eq!(board.stats.declined, 1);
        assert_eq!(board.stats.pending, 2);
        assert_eq!(board.stats.expired, 1);
        assert_eq!(board.stats.response_rate, 50);
        assert_eq!(board.response_window.hours_remaining, 20);
        assert!(!board.response_window.is_urgent);
    }

    #[test]
    fn status_update_recomputes_rate() {
        let mut board = ResponseBoard::seeded(now());
        assert!(board.update_status("response-2", ResponseStatus::Accepted));
        assert_eq!(board.stats.accepted, 3);
        assert_eq!(board.stats.pending, 1);
        // (3 + 1) / 6 = 66.7%
        assert_eq!(board.stats.response_rate, 67);
    }

    #[test]
    fn unknown_response_is_ignored() {
        let mut board = ResponseBoard::seeded(now());
        let before = board.stats.clone();
        assert!(!board.update_status("response-404", ResponseStatus::Declined));
        assert_eq!(board.stats, before);
    }

    #[test]
    fn empty_board_has_zero_rate() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.response_rate, 0);
        assert_eq!(stats.avg_response_time, 0.0);
    }

    #[test]
    fn selection_and_refresh() {
        let mut board = ResponseBoard::seeded(now());
        board.select(Some("response-3"));
        assert_eq!(board.selected().map(|r| r.name.as_str()), Some("Carter Advisory Group"));
        board.select(Some("nope"));
        assert!(board.selected().is_none());

        board.update_status("response-2", ResponseStatus::Declined);
        board.refresh(now());
        assert_eq!(board, ResponseBoard::seeded(now()));
    }

    #[test]
    fn board_from_leads_tracks_acceptance_and_expiry() {
        let stamp = |n: u128| Stamp {
            at: now(),
            nonce: Uuid::from_u128(n),
        };
        let state = AppState::seeded(LeadPolicy::default());
        let (state, outcome) = reduce(
            &state,
            Action::CreateReqDoc {
                req_doc: draft_req_doc("company-1"),
            },
            &stamp(1),
        )
        .unwrap();
        let ActionOutcome::Created { id } = outcome else {
            panic!("expected created outcome");
        };
        let (state, _) = reduce(&state, Action::SeedMatching { req_doc_id: id.clone() }, &stamp(2)).unwrap();
        let (state, _) = reduce(
            &state,
            Action::AcceptLead {
                lead_id: format!("lead-vendor-{id}-0"),
                user_id: "user-vendor-1".into(),
                expected_revision: None,
            },
            &stamp(3),
        )
        .unwrap();
        let leads: Vec<Lead> = state.leads_for(&id).into_iter().cloned().collect();

        let board = ResponseBoard::from_leads(&leads, &state.users, now());
        assert_eq!(board.stats.total_sent, 4);
        assert_eq!(board.stats.accepted, 1);
        assert_eq!(board.stats.pending, 3);
        assert_eq!(board.stats.response_rate, 25);
        assert_eq!(board.responses[0].name, "Acme ERP");
        assert_eq!(board.responses[0].responder_id, "user-vendor-1");
        assert_eq!(board.responses[1].name, "Unassigned");
        assert_eq!(board.responses[2].kind, ResponderKind::Consultant);
        assert_eq!(board.response_window.hours_remaining, 7 * 24);

        let late = ResponseBoard::from_leads(&leads, &state.users, now() + Duration::days(8));
        assert_eq!(late.stats.accepted, 1);
        assert_eq!(late.stats.expired, 3);
        assert_eq!(late.response_window.hours_remaining, 0);
        assert!(late.response_window.is_urgent);

        let empty = ResponseBoard::from_leads(&[], &[], now());
        assert_eq!(empty.stats, MatchingStats::default());
        assert!(empty.responses.is_empty());
    }

    #[test]
    fn window_turns_urgent_near_close() {
        let w = response_window(now() + Duration::hours(5), now());
        assert!(w.is_urgent);
        let closed = response_window(now() - Duration::hours(1), now());
        assert_eq!(closed.hours_remaining, 0);
    }
}
