//! Goal-capture coach: a fixed stage machine that turns a free-text goal into
//! a refined statement and a draft requirement document.

pub mod config;

use serde::{Deserialize, Serialize};

pub use config::{
    clarifier_label, clarifiers, detect_domain, draft_req_doc, suggestion_for, Clarifier, Suggestion,
};

pub const DEFAULT_INPUT: &str = "I want to increase customers for my business";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoachDomain {
    Growth,
    Operations,
    Capability,
    Supply,
}

/// Stage plus the data that stage has gathered so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum CoachStage {
    /// Free-text goal, nothing diagnosed yet.
    Input,
    /// Domain detected; clarifying chips are on offer.
    Diagnosed { domain: CoachDomain },
    /// A clarifier was picked.
    Elaborated {
        domain: CoachDomain,
        clarifier_id: String,
    },
    /// A refined statement is proposed.
    Structured {
        domain: CoachDomain,
        clarifier_id: String,
        refined_text: String,
    },
    /// The refined statement replaced the input.
    Applied {
        domain: CoachDomain,
        clarifier_id: String,
    },
    PreviewReady {
        domain: CoachDomain,
        clarifier_id: String,
    },
}

impl CoachStage {
    pub fn name(&self) -> &'static str {
        match self {
            CoachStage::Input => "INPUT",
            CoachStage::Diagnosed { .. } => "DIAGNOSED",
            CoachStage::Elaborated { .. } => "ELABORATED",
            CoachStage::Structured { .. } => "STRUCTURED",
            CoachStage::Applied { .. } => "APPLIED",
            CoachStage::PreviewReady { .. } => "PREVIEW_READY",
        }
    }

    pub fn domain(&self) -> Option<CoachDomain> {
        match self {
            CoachStage::Input => None,
            CoachStage::Diagnosed { domain }
            | CoachStage::Elaborated { domain, .. }
            | CoachStage::Structured { domain, .. }
            | CoachStage::Applied { domain, .. }
            | CoachStage::PreviewReady { domain, .. } => Some(*domain),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachState {
    pub input: String,
    #[serde(flatten)]
    pub stage: CoachStage,
}

impl Default for CoachState {
    fn default() -> Self {
        Self {
            input: DEFAULT_INPUT.to_string(),
            stage: CoachStage::Input,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoachAction {
    Diagnose(CoachDomain),
    ChooseClarifier(String),
    ShowSuggestion(String),
    ApplySuggestion,
    ShowPreview,
    BackToClarifiers,
}

impl CoachAction {
    pub fn name(&self) -> &'static str {
        match self {
            CoachAction::Diagnose(_) => "DIAGNOSE",
            CoachAction::ChooseClarifier(_) => "CHOOSE_CLARIFIER",
            CoachAction::ShowSuggestion(_) => "SHOW_SUGGESTION",
            CoachAction::ApplySuggestion => "APPLY_SUGGESTION",
            CoachAction::ShowPreview => "SHOW_PREVIEW",
            CoachAction::BackToClarifiers => "BACK_TO_CLARIFIERS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("coach cannot {action} from stage {stage}")]
pub struct IllegalCoachTransition {
    pub stage: &'static str,
    pub action: &'static str,
}

/// Applies one coach action. Only forward edges and the single
/// back-to-clarifiers edge are legal.
pub fn step(state: &CoachState, action: CoachAction) -> Result<CoachState, IllegalCoachTransition> {
    use CoachStage::*;

    let illegal = IllegalCoachTransition {
        stage: state.stage.name(),
        action: action.name(),
    };

    let mut input = state.input.clone();
    let stage = match (&state.stage, action) {
        (Input, CoachAction::Diagnose(domain)) => Diagnosed { domain },
        (Diagnosed { domain }, CoachAction::ChooseClarifier(clarifier_id)) => Elaborated {
            domain: *domain,
            clarifier_id,
        },
        (
            Elaborated {
                domain,
                clarifier_id,
            },
            CoachAction::ShowSuggestion(refined_text),
        ) => Structured {
            domain: *domain,
            clarifier_id: clarifier_id.clone(),
            refined_text,
        },
        (
            Structured {
                domain,
                clarifier_id,
                refined_text,
            },
            CoachAction::ApplySuggestion,
        ) => {
            input = refined_text.clone();
            Applied {
                domain: *domain,
                clarifier_id: clarifier_id.clone(),
            }
        }
        (
            Applied {
                domain,
                clarifier_id,
            },
            CoachAction::ShowPreview,
        ) => PreviewReady {
            domain: *domain,
            clarifier_id: clarifier_id.clone(),
        },
        (
            Elaborated { domain, .. } | Structured { domain, .. } | Applied { domain, .. },
            CoachAction::BackToClarifiers,
        ) => Diagnosed { domain: *domain },
        _ => return Err(illegal),
    };

    tracing::debug!(from = state.stage.name(), to = stage.name(), "coach transition");
    Ok(CoachState { input, stage })
}
