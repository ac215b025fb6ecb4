pub mod board;
pub mod modes;
pub mod recommendation;

pub use recommendation::{mode_hint, recommend_mode, ModeHint, ModeRecommendation, RecommendationBranch};
