use crate::domain::marketplace::Persona;

/// Why a state transition was refused. The state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("requirement document not found: {0}")]
    ReqDocNotFound(String),

    #[error("lead not found: {0}")]
    LeadNotFound(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("no credit wallet for user {0}")]
    WalletNotFound(String),

    #[error("unknown solution option: {0}")]
    UnknownSolution(String),

    #[error("user {user_id} is not a {expected:?}")]
    WrongPersona { user_id: String, expected: Persona },

    #[error("user {user_id} has {balance} credits, lead costs {price}")]
    InsufficientCredits {
        user_id: String,
        balance: u32,
        price: u32,
    },

    #[error("lead {lead_id} already accepted by {accepted_by}")]
    LeadAlreadyAccepted { lead_id: String, accepted_by: String },

    #[error("lead {0} has expired")]
    LeadExpired(String),

    #[error("matching already seeded for requirement document {0}")]
    AlreadySeeded(String),

    #[error("requirement document {0} is already awarded")]
    AlreadyAwarded(String),

    #[error("lead expiry of {0} days is out of range")]
    LeadExpiryOutOfRange(i64),

    #[error("{action} produced an unexpected outcome")]
    UnexpectedOutcome { action: &'static str },

    #[error("requirement document {req_doc_id} is at revision {actual}, expected {expected}")]
    RevisionConflict {
        req_doc_id: String,
        expected: u64,
        actual: u64,
    },
}
