use anyhow::Context;
use clap::{Parser, Subcommand};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smartgrant_core::backend::MockBackend;
use smartgrant_core::config::Settings;
use smartgrant_core::domain::reqdoc::NewReqDoc;
use smartgrant_core::domain::solution::SolutionOption;
use smartgrant_core::impact::{self, display, Metric};
use smartgrant_core::matching;

mod walkthrough;

#[derive(Debug, Parser)]
#[command(name = "smartgrant_worker")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Recommend a workflow mode for a requirement document (JSON file).
    Recommend {
        #[arg(long)]
        req_doc: PathBuf,
    },
    /// Compare solution options on business impact. Defaults to the seeded
    /// marketing-visibility options.
    Compare {
        #[arg(long)]
        options: Option<PathBuf>,
    },
    /// Run the whole SME flow against the in-process mock backend.
    Walkthrough {
        /// Overrides SMARTGRANT_LATENCY_SCALE.
        #[arg(long)]
        latency_scale: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let result = match args.command {
        Command::Recommend { req_doc } => recommend(&req_doc),
        Command::Compare { options } => compare(options.as_deref()),
        Command::Walkthrough { latency_scale } => run_walkthrough(&settings, latency_scale).await,
    };

    match result {
        Ok(out) => {
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %format!("{err:#}"), "command failed");
            Err(err)
        }
    }
}

fn recommend(path: &Path) -> anyhow::Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read req doc failed: {}", path.display()))?;
    let req: NewReqDoc = serde_json::from_str(&raw).context("parse req doc JSON failed")?;
    let doc = req.validated()?.into_req_doc("local".to_string(), chrono::Utc::now());

    let recommendation = matching::recommend_mode(Some(&doc));
    let hint = matching::mode_hint(Some(&doc));
    tracing::info!(branch = ?recommendation.branch, "mode recommended");

    Ok(serde_json::json!({
        "recommendation": recommendation,
        "hint": hint,
        "profile": matching::modes::profile(recommendation.recommended),
    }))
}

fn compare(path: Option<&Path>) -> anyhow::Result<serde_json::Value> {
    let options: Vec<SolutionOption> = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("read options failed: {}", path.display()))?;
            serde_json::from_str(&raw).context("parse options JSON failed")?
        }
        None => smartgrant_core::seeds::marketing_visibility_solutions(),
    };
    if options.is_empty() {
        tracing::warn!("no solution options to compare");
    }

    let comparison = impact::compare(&options);
    let cards: Vec<serde_json::Value> = options
        .iter()
        .map(|option| {
            let won: BTreeSet<Metric> = comparison
                .winners
                .iter()
                .filter(|(_, w)| w.winner_ids.contains(&option.id))
                .map(|(metric, _)| *metric)
                .collect();
            let is_best = comparison.best_overall_id.as_deref() == Some(option.id.as_str());
            let tones: BTreeMap<Metric, display::ImpactTone> = Metric::ALL
                .into_iter()
                .filter_map(|metric| {
                    let value = option.business_impact.metric(metric)?;
                    Some((metric, display::impact_tone(metric, value)))
                })
                .collect();
            serde_json::json!({
                "id": option.id,
                "name": option.name,
                "bestFor": display::persona_line(option),
                "impact": display::format_impact(option),
                "impactTones": tones,
                "description": display::verbose_description(option),
                "chooseIf": display::solution_summary(option, &won, is_best),
                "signals": display::clamp_signals(&option.rationale_signals),
            })
        })
        .collect();

    Ok(serde_json::json!({
        "comparison": comparison,
        "cards": cards,
    }))
}

async fn run_walkthrough(settings: &Settings, latency_scale: Option<f64>) -> anyhow::Result<serde_json::Value> {
    let settings = Settings {
        latency_scale: latency_scale.unwrap_or(settings.latency_scale),
        ..settings.clone()
    }
    .validated()?;
    let api = MockBackend::seeded(settings.lead_policy(), settings.latency_scale);
    let report = walkthrough::run(&api).await?;
    Ok(serde_json::to_value(report)?)
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
