use crate::domain::solution::{GrantTag, SolutionOption};
use crate::impact::Metric;
use serde::Serialize;
use std::collections::BTreeSet;

const MISSING: &str = "—";
const PERSONA_MAX_CHARS: usize = 80;
const MAX_SIGNALS: usize = 4;
const MAX_SUMMARY_BULLETS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactRow {
    pub label: &'static str,
    pub value: String,
}

/// Display rows for the four comparable metrics, "—" where missing.
pub fn format_impact(option: &SolutionOption) -> Vec<ImpactRow> {
    Metric::ALL
        .iter()
        .map(|&metric| {
            let value = match option.business_impact.metric(metric) {
                None => MISSING.to_string(),
                Some(v) => match metric {
                    Metric::RevenueLift | Metric::CacChange => format!("{v}%"),
                    Metric::LeadDelta => format!("{v}"),
                    Metric::TimeToFirstLead => format!("{v} wks"),
                },
            };
            ImpactRow {
                label: metric.label(),
                value,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactTone {
    Positive,
    Moderate,
    Neutral,
    Negative,
}

pub fn impact_tone(metric: Metric, value: f64) -> ImpactTone {
    match metric {
        Metric::CacChange if value < 0.0 => ImpactTone::Positive,
        Metric::CacChange => ImpactTone::Negative,
        Metric::TimeToFirstLead if value <= 3.0 => ImpactTone::Positive,
        Metric::TimeToFirstLead if value <= 6.0 => ImpactTone::Moderate,
        Metric::TimeToFirstLead => ImpactTone::Neutral,
        _ if value >= 10.0 => ImpactTone::Positive,
        _ if value >= 5.0 => ImpactTone::Moderate,
        _ => ImpactTone::Neutral,
    }
}

/// A short "Best for ..." line from the tagline or the first sentence of the
/// fit explanation.
pub fn persona_line(option: &SolutionOption) -> Option<String> {
    if let Some(tagline) = option.persona_tagline.as_deref().map(str::trim) {
        if !tagline.is_empty() {
            return Some(tagline.to_string());
        }
    }

    let why_fit = option.why_fit.trim();
    let first_sentence = why_fit
        .split(['.', '?', '!'])
        .next()
        .unwrap_or_default()
        .trim();
    if first_sentence.is_empty() {
        return None;
    }

    if let Some(idx) = first_sentence.to_ascii_lowercase().find("sme") {
        if let Some(line) = finalize(&format!("Best for {}", upper_first(&first_sentence[idx..]))) {
            return Some(line);
        }
    }

    const LEADS: [(&str, &str); 3] = [
        ("supports ", "Best for SMEs pursuing"),
        ("improves ", "Best for teams improving"),
        ("revamps ", "Best for brands looking to revamp"),
    ];
    let lead = LEADS
        .iter()
        .find_map(|(verb, prefix)| Some((*prefix, strip_prefix_ci(first_sentence, verb)?)))
        .or_else(|| {
            strip_quick_start(first_sentence).map(|rest| ("Best for teams needing a quick start on", rest))
        });
    if let Some((prefix, rest)) = lead {
        if let Some(line) = finalize(&format!("{prefix} {}", lower_first(rest.trim()))) {
            return Some(line);
        }
    }

    for article in ["the ", "this ", "an ", "a "] {
        if let Some(rest) = strip_prefix_ci(first_sentence, article) {
            let rest = rest.trim();
            if !rest.is_empty() {
                if let Some(line) = finalize(&format!("Best for {}", lower_first(rest))) {
                    return Some(line);
                }
            }
        }
    }

    let words: Vec<&str> = first_sentence.split_whitespace().collect();
    if words.len() > 12 {
        finalize(&format!("{}...", words[..12].join(" ")))
    } else {
        finalize(first_sentence)
    }
}

/// Up to three "choose this if" bullets for a solution card.
pub fn solution_summary(
    option: &SolutionOption,
    winning_metrics: &BTreeSet<Metric>,
    is_overall_fit: bool,
) -> Vec<String> {
    let mut bullets: Vec<&'static str> = Vec::new();
    let mut push = |b: &'static str| {
        if !bullets.contains(&b) {
            bullets.push(b);
        }
    };

    push(match option.grant_tag {
        GrantTag::Psg => "You want to tap PSG funding for digital tools",
        GrantTag::Edg => "You want EDG support for transformation",
        GrantTag::NonGrant => "You prefer to move fast without grant dependencies",
    });

    if winning_metrics.contains(&Metric::RevenueLift) || winning_metrics.contains(&Metric::LeadDelta) {
        push("You're focused on driving topline and pipeline growth");
    }
    if winning_metrics.contains(&Metric::CacChange) {
        push("You need to improve acquisition efficiency and lower CAC");
    }
    if winning_metrics.contains(&Metric::TimeToFirstLead) {
        push("You want to see results faster from activation to first lead");
    }

    let (min_cost, max_cost) = option.est_cost_band;
    let avg_cost = (min_cost as f64 + max_cost as f64) / 2.0;
    if avg_cost >= 80_000.0 {
        push("You have runway for a larger-scale investment");
    } else if avg_cost > 0.0 && avg_cost <= 20_000.0 {
        push("You want to keep investment lean while scaling impact");
    }

    if is_overall_fit {
        push("You want the most balanced impact across growth and efficiency");
    }

    bullets
        .into_iter()
        .take(MAX_SUMMARY_BULLETS)
        .map(str::to_string)
        .collect()
}

pub fn clamp_signals(signals: &[String]) -> Vec<String> {
    signals
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(MAX_SIGNALS)
        .map(str::to_string)
        .collect()
}

/// Fit explanation followed by a one-line projected impact.
pub fn verbose_description(option: &SolutionOption) -> String {
    let impact = &option.business_impact;
    let snippets: Vec<String> = [
        impact.metric(Metric::RevenueLift).map(|v| format!("{v}% revenue lift")),
        impact.metric(Metric::LeadDelta).map(|v| format!("{v} new leads/mo")),
        impact.metric(Metric::TimeToFirstLead).map(|v| format!("{v} wks to first lead")),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut parts = Vec::with_capacity(2);
    let base = option.why_fit.trim();
    if !base.is_empty() {
        parts.push(base.to_string());
    }
    if !snippets.is_empty() {
        parts.push(format!("Projected impact: {}.", snippets.join(", ")));
    }
    parts.join(" ")
}

fn finalize(text: &str) -> Option<String> {
    let clean = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if clean.is_empty() {
        return None;
    }
    if clean.chars().count() > PERSONA_MAX_CHARS {
        let cut: String = clean.chars().take(PERSONA_MAX_CHARS - 3).collect();
        return Some(format!("{}...", cut.trim()));
    }
    Some(clean)
}

fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &text[prefix.len()..])
}

/// "quick start", "quick-start" or "quickstart", optionally plural, followed
/// by whitespace. Returns the text after the whitespace.
fn strip_quick_start(text: &str) -> Option<&str> {
    let rest = strip_prefix_ci(text, "quick")?;
    let rest = rest
        .strip_prefix(|c: char| c == '-' || c.is_whitespace())
        .unwrap_or(rest);
    let rest = strip_prefix_ci(rest, "start")?;
    let rest = strip_prefix_ci(rest, "s").unwrap_or(rest);
    let body = rest.trim_start();
    (body.len() < rest.len()).then_some(body)
}

fn lower_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn upper_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
