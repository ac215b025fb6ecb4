//! Business-impact comparison across candidate solution options.
//!
//! Two questions are answered here: which option(s) lead on each individual
//! metric, and which single option has the best weighted overall score.

pub mod display;

use crate::domain::solution::{BusinessImpact, SolutionOption};
use serde::Serialize;
use std::collections::BTreeMap;

/// Values closer than this are considered equal.
pub const TOLERANCE: f64 = 0.0001;

/// Baseline weeks from which time-to-first-lead is subtracted when scoring.
const DEFAULT_TIME_WEIGHT: f64 = 20.0;

const REVENUE_WEIGHT: f64 = 1.5;
const LEADS_WEIGHT: f64 = 1.2;
const CAC_WEIGHT: f64 = 1.1;
const TIME_WEIGHT: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Metric {
    #[serde(rename = "Revenue Lift")]
    RevenueLift,
    #[serde(rename = "New Leads / mo")]
    LeadDelta,
    #[serde(rename = "CAC Change")]
    CacChange,
    #[serde(rename = "Time to First Lead")]
    TimeToFirstLead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Better {
    Higher,
    Lower,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::RevenueLift,
        Metric::LeadDelta,
        Metric::CacChange,
        Metric::TimeToFirstLead,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::RevenueLift => "Revenue Lift",
            Metric::LeadDelta => "New Leads / mo",
            Metric::CacChange => "CAC Change",
            Metric::TimeToFirstLead => "Time to First Lead",
        }
    }

    pub fn better(self) -> Better {
        match self {
            Metric::RevenueLift | Metric::LeadDelta => Better::Higher,
            Metric::CacChange | Metric::TimeToFirstLead => Better::Lower,
        }
    }
}

impl BusinessImpact {
    /// Value of a comparable metric. NaN reads as missing.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        let raw = match metric {
            Metric::RevenueLift => self.revenue_lift_pct,
            Metric::LeadDelta => self.lead_delta_per_month,
            Metric::CacChange => self.cac_change_pct,
            Metric::TimeToFirstLead => self.time_to_first_lead_weeks,
        };
        raw.filter(|v| !v.is_nan())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricWinner {
    pub label: &'static str,
    pub best_value: f64,
    /// Winning option ids, in input order.
    pub winner_ids: Vec<String>,
}

pub type MetricWinnerMap = BTreeMap<Metric, MetricWinner>;

/// Finds the leading option(s) per metric.
///
/// Options missing a metric sit out that metric. Values within
/// [`TOLERANCE`] of the best are co-winners. With fewer than two options
/// there is nothing to compare and the map is empty.
pub fn compute_impact_winners(options: &[SolutionOption]) -> MetricWinnerMap {
    let mut winners = MetricWinnerMap::new();
    if options.len() <= 1 {
        return winners;
    }

    for metric in Metric::ALL {
        let scored: Vec<(&str, f64)> = options
            .iter()
            .filter_map(|o| o.business_impact.metric(metric).map(|v| (o.id.as_str(), v)))
            .collect();

        let best = scored.iter().map(|(_, v)| *v).reduce(|best, v| match metric.better() {
            Better::Higher => best.max(v),
            Better::Lower => best.min(v),
        });
        let Some(best_value) = best else {
            continue;
        };

        let winner_ids: Vec<String> = scored
            .iter()
            .filter(|(_, v)| (v - best_value).abs() <= TOLERANCE)
            .map(|(id, _)| id.to_string())
            .collect();
        if winner_ids.is_empty() {
            continue;
        }

        winners.insert(
            metric,
            MetricWinner {
                label: metric.label(),
                best_value,
                winner_ids,
            },
        );
    }

    winners
}

/// Weighted linear score; missing fields contribute zero.
pub fn compute_impact_score(option: &SolutionOption) -> f64 {
    let impact = &option.business_impact;
    let revenue = impact.metric(Metric::RevenueLift).unwrap_or(0.0);
    let leads = impact.metric(Metric::LeadDelta).unwrap_or(0.0);
    // Lower CAC is better.
    let cac = impact.metric(Metric::CacChange).map(|v| -v).unwrap_or(0.0);
    let time = impact
        .metric(Metric::TimeToFirstLead)
        .map(|weeks| DEFAULT_TIME_WEIGHT - weeks)
        .unwrap_or(0.0);

    revenue * REVENUE_WEIGHT + leads * LEADS_WEIGHT + cac * CAC_WEIGHT + time * TIME_WEIGHT
}

/// Id of the option with the highest score. A later option only wins when it
/// beats the current best by more than [`TOLERANCE`], so ties keep the
/// earliest-listed option.
pub fn find_best_overall_solution_id(options: &[SolutionOption]) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;
    for option in options {
        let score = compute_impact_score(option);
        match best {
            Some((_, best_score)) if score <= best_score + TOLERANCE => {}
            _ => best = Some((option.id.as_str(), score)),
        }
    }
    best.map(|(id, _)| id)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredOption {
    pub id: String,
    pub score: f64,
}

/// Everything a comparison view needs in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub winners: MetricWinnerMap,
    pub scores: Vec<ScoredOption>,
    pub best_overall_id: Option<String>,
}

pub fn compare(options: &[SolutionOption]) -> Comparison {
    let comparison = Comparison {
        winners: compute_impact_winners(options),
        scores: options
            .iter()
            .map(|o| ScoredOption {
                id: o.id.clone(),
                score: compute_impact_score(o),
            })
            .collect(),
        best_overall_id: find_best_overall_solution_id(options).map(str::to_string),
    };
    tracing::debug!(
        options = options.len(),
        best = comparison.best_overall_id.as_deref().unwrap_or("-"),
        "compared solution options"
    );
    comparison
}
