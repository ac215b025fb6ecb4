//! Demo marketplace data used to boot a fresh state.

use crate::domain::marketplace::{Company, CreditWallet, Persona, User};
use crate::domain::preview::{Consultant, Vendor};
use crate::domain::response::{IndicativeSubmission, LeadResponse, ResponderKind, ResponseStatus};
use crate::domain::solution::{BusinessImpact, GrantTag, SolutionOption};
use chrono::{DateTime, Duration, Utc};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn companies() -> Vec<Company> {
    vec![Company {
        id: "company-1".to_string(),
        name: "Innovate Pte. Ltd.".to_string(),
        jurisdiction: "SG".to_string(),
        industry: "Food & Beverage".to_string(),
        revenue_band: "S$1M - S$5M".to_string(),
        headcount_band: "10-50 employees".to_string(),
    }]
}

pub fn users() -> Vec<User> {
    let user = |id: &str, name: &str, persona: Persona, credits: u32| User {
        id: id.to_string(),
        name: name.to_string(),
        persona,
        company_id: "company-1".to_string(),
        credits,
    };
    vec![
        user("user-sme-1", "Innovate Pte. Ltd.", Persona::Sme, 12),
        user("user-vendor-1", "Acme ERP", Persona::Vendor, 5),
        user("user-vendor-2", "Nova Cloud", Persona::Vendor, 8),
        user("user-consultant-1", "Carter Advisory", Persona::Consultant, 12),
        user("user-consultant-2", "Aegis Partners", Persona::Consultant, 10),
    ]
}

/// One wallet per seeded user, opening balance equal to their credits.
pub fn wallets() -> Vec<CreditWallet> {
    users()
        .into_iter()
        .map(|u| CreditWallet {
            user_id: u.id,
            balance: u.credits,
        })
        .collect()
}

/// General catalog of solution paths.
pub fn catalog_solutions() -> Vec<SolutionOption> {
    vec![
        SolutionOption {
            id: "trhls-1".to_string(),
            name: "Cloud ERP Implementation".to_string(),
            grant_tag: GrantTag::Psg,
            why_fit: "Matches your F&B industry & budget for pre-approved systems.".to_string(),
            persona_tagline: None,
            est_cost_band: (20_000, 25_000),
            est_duration_months: (3, 4),
            business_impact: BusinessImpact {
                revenue_lift_pct: Some(15.0),
                cost_save_pct: Some(25.0),
                ops_speedup_pct: Some(40.0),
                ..Default::default()
            },
            grant_why: Some("Pre-approved under PSG for productivity solutions in F&B sector.".to_string()),
            rationale_signals: vec![],
        },
        SolutionOption {
            id: "trhls-2".to_string(),
            name: "Targeted Digital Marketing Campaign".to_string(),
            grant_tag: GrantTag::Edg,
            why_fit: "Ideal for your goal to expand into Malaysia (Market Access).".to_string(),
            persona_tagline: None,
            est_cost_band: (40_000, 50_000),
            est_duration_months: (6, 8),
            business_impact: BusinessImpact {
                revenue_lift_pct: Some(35.0),
                cost_save_pct: Some(10.0),
                ops_speedup_pct: Some(20.0),
                ..Default::default()
            },
            grant_why: Some("Eligible for EDG support for overseas market expansion initiatives.".to_string()),
            rationale_signals: vec![],
        },
        SolutionOption {
            id: "trhls-3".to_string(),
            name: "Custom Website Development".to_string(),
            grant_tag: GrantTag::NonGrant,
            why_fit: "Full custom control, but not aligned with grant support.".to_string(),
            persona_tagline: None,
            est_cost_band: (15_000, 20_000),
            est_duration_months: (2, 3),
            business_impact: BusinessImpact {
                revenue_lift_pct: Some(20.0),
                cost_save_pct: Some(5.0),
                ops_speedup_pct: Some(15.0),
                ..Default::default()
            },
            grant_why: Some(
                "Custom development without pre-approved templates typically does not qualify for PSG."
                    .to_string(),
            ),
            rationale_signals: vec![],
        },
    ]
}

/// Solution paths for the "marketing visibility" goal the coach drafts.
pub fn marketing_visibility_solutions() -> Vec<SolutionOption> {
    let impact = |revenue: f64, leads: f64, cac: f64, weeks: f64| BusinessImpact {
        revenue_lift_pct: Some(revenue),
        lead_delta_per_month: Some(leads),
        cac_change_pct: Some(cac),
        time_to_first_lead_weeks: Some(weeks),
        ..Default::default()
    };

    vec![
        SolutionOption {
            id: "psg-digital-ads-suite".to_string(),
            name: "Digital Ads & CRM Launchpad".to_string(),
            grant_tag: GrantTag::Psg,
            why_fit: "The perfect launchpad for SMEs wanting not just more leads, but a hands-off, unified approach across digital channels. We'll bring advanced yet easy-to-use tools for ads, CRM, and analytics, so you focus on growth while we handle the campaign science.".to_string(),
            persona_tagline: None,
            est_cost_band: (20_000, 25_000),
            est_duration_months: (3, 4),
            business_impact: impact(10.0, 80.0, -12.0, 3.0),
            grant_why: Some("PSG supports adoption of pre-approved digital marketing and CRM systems for productivity and lead generation.".to_string()),
            rationale_signals: strings(&["Industry fit (F&B/Retail)", "Budget within PSG range", "Proven vendors available"]),
        },
        SolutionOption {
            id: "edg-market-expansion-sea".to_string(),
            name: "SEA Market Expansion Blueprint".to_string(),
            grant_tag: GrantTag::Edg,
            why_fit: "Supports overseas marketing strategy for regional customer growth.".to_string(),
            persona_tagline: None,
            est_cost_band: (40_000, 60_000),
            est_duration_months: (6, 8),
            business_impact: impact(15.0, 100.0, -8.0, 6.0),
            grant_why: Some("EDG funds market access projects that build new customer pipelines across SEA.".to_string()),
            rationale_signals: strings(&["Export ambition detected", "Medium complexity project", "Consultant-led implementation"]),
        },
        SolutionOption {
            id: "edg-brand-refresh".to_string(),
            name: "Brand Revamp & Content Campaign".to_string(),
            grant_tag: GrantTag::Edg,
            why_fit: "Improves brand positioning, storytelling and content funnel conversion.".to_string(),
            persona_tagline: None,
            est_cost_band: (30_000, 45_000),
            est_duration_months: (4, 6),
            business_impact: impact(9.0, 50.0, -10.0, 5.0),
            grant_why: Some("EDG supports branding and content capability building projects tied to growth outcomes.".to_string()),
            rationale_signals: strings(&["Creative capability gap", "Good fit for content-driven industries", "Consultant-guided project"]),
        },
        SolutionOption {
            id: "ads-sprint-nongrant".to_string(),
            name: "High Velocity Ads Sprint".to_string(),
            grant_tag: GrantTag::NonGrant,
            why_fit: "Quick-start campaign to validate lead generation before committing to a full-scale rollout.".to_string(),
            persona_tagline: None,
            est_cost_band: (12_000, 18_000),
            est_duration_months: (1, 2),
            business_impact: impact(5.0, 70.0, -5.0, 2.0),
            grant_why: None,
            rationale_signals: strings(&["Fast deployment", "Low commitment", "Useful for ROI benchmarking"]),
        },
        SolutionOption {
            id: "cro-web-refresh-nongrant".to_string(),
            name: "CRO + Website UX Refresh".to_string(),
            grant_tag: GrantTag::NonGrant,
            why_fit: "Revamps your website UX and analytics to improve conversion rate.".to_string(),
            persona_tagline: None,
            est_cost_band: (15_000, 20_000),
            est_duration_months: (2, 3),
            business_impact: impact(6.0, 30.0, -10.0, 4.0),
            grant_why: None,
            rationale_signals: strings(&["Improves conversion path", "Fast measurable impact", "Pairs with grant-funded MarTech"]),
        },
    ]
}

/// Replies to the demo dispatch, timed relative to `now`.
pub fn lead_responses(now: DateTime<Utc>) -> Vec<LeadResponse> {
    let minutes = |m: i64| Duration::minutes(m);

    vec![
        LeadResponse {
            id: "response-1".to_string(),
            kind: ResponderKind::Vendor,
            responder_id: "acme-erp".to_string(),
            name: "Acme ERP Solutions".to_string(),
            status: ResponseStatus::Accepted,
            qualification_score: 92,
            response_time_hours: Some(2.5),
            submitted_at: Some(now - minutes(150)),
            expires_at: now + minutes(22 * 60),
            indicative_submission: Some(IndicativeSubmission {
                id: "sub-1".to_string(),
                title: "Cloud ERP Implementation Proposal".to_string(),
                summary: "Comprehensive ERP solution tailored for F&B sector with PSG grant optimization".to_string(),
                estimated_cost: (18_000, 22_000),
                timeline: (3, 4),
                key_features: strings(&[
                    "Inventory Management System",
                    "Financial Reporting Suite",
                    "PSG Grant Application Support",
                    "24/7 Technical Support",
                ]),
                next_steps: strings(&[
                    "Detailed requirements analysis",
                    "Custom configuration setup",
                    "User training program",
                    "Go-live support",
                ]),
                grant_tag: Some(GrantTag::Psg),
                tags: strings(&["Budget Fit", "Fast Deployment"]),
                grant_eligible: Some(true),
            }),
        },
        LeadResponse {
            id: "response-2".to_string(),
            kind: ResponderKind::Vendor,
            responder_id: "nova-cloud".to_string(),
            name: "Nova Cloud Technologies".to_string(),
            status: ResponseStatus::Pending,
            qualification_score: 88,
            response_time_hours: None,
            submitted_at: None,
            expires_at: now + minutes(18 * 60),
            indicative_submission: None,
        },
        LeadResponse {
            id: "response-3".to_string(),
            kind: ResponderKind::Consultant,
            responder_id: "carter-advisory".to_string(),
            name: "Carter Advisory Group".to_string(),
            status: ResponseStatus::Accepted,
            qualification_score: 95,
            response_time_hours: Some(1.2),
            submitted_at: Some(now - minutes(72)),
            expires_at: now + minutes(1368),
            indicative_submission: Some(IndicativeSubmission {
                id: "sub-2".to_string(),
                title: "EDG Grant Strategy & Implementation Plan".to_string(),
                summary: "Expert guidance for EDG grant application with proven track record in F&B sector".to_string(),
                estimated_cost: (8_000, 12_000),
                timeline: (2, 3),
                key_features: strings(&[
                    "Grant Application Strategy",
                    "Documentation Preparation",
                    "Government Liaison",
                    "Project Management Support",
                ]),
                next_steps: strings(&[
                    "Initial consultation call",
                    "Grant application review",
                    "Documentation preparation",
                    "Submission support",
                ]),
                grant_tag: Some(GrantTag::Edg),
                tags: strings(&["High Success Rate", "Fast Turnaround"]),
                grant_eligible: None,
            }),
        },
        LeadResponse {
            id: "response-4".to_string(),
            kind: ResponderKind::Vendor,
            responder_id: "techflow-systems".to_string(),
            name: "TechFlow Systems".to_string(),
            status: ResponseStatus::Declined,
            qualification_score: 77,
            response_time_hours: Some(4.5),
            submitted_at: Some(now - minutes(270)),
            expires_at: now + minutes(1170),
            indicative_submission: None,
        },
        LeadResponse {
            id: "response-5".to_string(),
            kind: ResponderKind::Consultant,
            responder_id: "aegis-partners".to_string(),
            name: "Aegis Partners".to_string(),
            status: ResponseStatus::Pending,
            qualification_score: 82,
            response_time_hours: None,
            submitted_at: None,
            expires_at: now + minutes(16 * 60),
            indicative_submission: None,
        },
        LeadResponse {
            id: "response-6".to_string(),
            kind: ResponderKind::Vendor,
            responder_id: "datawise-analytics".to_string(),
            name: "DataWise Analytics".to_string(),
            status: ResponseStatus::Expired,
            qualification_score: 65,
            response_time_hours: None,
            submitted_at: None,
            expires_at: now - minutes(2 * 60),
            indicative_submission: None,
        },
    ]
}

pub fn vendors() -> Vec<Vendor> {
    #[allow(clippy::too_many_arguments)]
    fn vendor(
        id: &str,
        name: &str,
        match_pct: u8,
        grant_tag: GrantTag,
        sector: &str,
        product: &str,
        cost_range: (u64, u64),
        duration: (u32, u32),
        reason: &str,
        tags: &[&str],
        selected: bool,
    ) -> Vendor {
        Vendor {
            id: id.to_string(),
            name: name.to_string(),
            match_pct,
            grant_tag,
            sector: sector.to_string(),
            product: product.to_string(),
            cost_range,
            duration,
            reason: reason.to_string(),
            tags: strings(tags),
            selected,
        }
    }

    vec![
        vendor("acme-erp", "Acme ERP", 92, GrantTag::Psg, "F&B", "Cloud ERP Suite", (20_000, 25_000), (3, 4), "Your goal = Process Automation (F&B)", &["Fast Deployment", "Budget Fit", "Local Support"], true),
        vendor("nova-cloud", "Nova Cloud", 88, GrantTag::Psg, "Retail", "Digital Marketing Platform", (15_000, 20_000), (2, 3), "Matches your digital transformation goals", &["Quick Setup", "PSG Approved", "24/7 Support"], true),
        vendor("techflow-systems", "TechFlow Systems", 77, GrantTag::Edg, "Manufacturing", "IoT Integration Suite", (30_000, 40_000), (4, 6), "Advanced automation for manufacturing", &["Enterprise Grade", "EDG Eligible", "Custom Solutions"], false),
        vendor("datawise-analytics", "DataWise Analytics", 65, GrantTag::NonGrant, "Services", "Business Intelligence Platform", (10_000, 15_000), (2, 3), "Data analytics for business insights", &["Cost Effective", "Easy Integration", "Self-Service"], false),
        vendor("cloudscale-solutions", "CloudScale Solutions", 71, GrantTag::Psg, "F&B", "Inventory Management System", (12_000, 18_000), (2, 4), "F&B-specific inventory optimization", &["Industry Specific", "PSG Ready", "Quick ROI"], false),
    ]
}

pub fn consultants() -> Vec<Consultant> {
    #[allow(clippy::too_many_arguments)]
    fn consultant(
        id: &str,
        name: &str,
        match_pct: u8,
        specialty: &str,
        experience: &str,
        success_rate: u8,
        core_focus: &[&str],
        rating: f64,
        avg_turnaround: u32,
        selected: bool,
    ) -> Consultant {
        Consultant {
            id: id.to_string(),
            name: name.to_string(),
            match_pct,
            specialty: specialty.to_string(),
            experience: experience.to_string(),
            success_rate,
            core_focus: strings(core_focus),
            rating,
            avg_turnaround,
            selected,
        }
    }

    vec![
        consultant("carter-advisory", "Carter Advisory", 88, "EDG Specialist", "3 yrs F&B projects", 92, &["EDG Grant Planning", "Process Redesign"], 4.8, 14, true),
        consultant("aegis-partners", "Aegis Partners", 75, "PSG Expert", "5 yrs Retail sector", 87, &["Digital Transformation", "Vendor Selection"], 4.6, 10, false),
        consultant("strategic-insights", "Strategic Insights", 69, "General Business", "8 yrs cross-industry", 78, &["Business Strategy", "Technology Adoption"], 4.3, 21, false),
    ]
}
