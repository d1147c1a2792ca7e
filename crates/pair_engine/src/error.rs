//! Engine error surface

use crate::id::{AccountId, TokenId};
use pair_model::PairError;
use thiserror::Error;

/// Faults surfaced to callers. Every fault aborts the whole operation with
/// no partial state change; resubmission policy is the caller's business.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A pair invariant or bound was violated
    #[error("pair fault: {0}")]
    Pair(#[from] PairError),

    /// The token layer refused a transfer
    #[error("insufficient funds: account {account} holds {held} of token {token}, needs {needed}")]
    InsufficientFunds {
        account: AccountId,
        token: TokenId,
        held: u128,
        needed: u128,
    },

    /// A pair needs two distinct token types
    #[error("cannot pair a token with itself: {0}")]
    IdenticalTokens(TokenId),

    /// Exactly one pair may exist per unordered token set
    #[error("pair already exists for tokens {0} / {1}")]
    PairExists(TokenId, TokenId),

    /// No pair registered for the requested tokens
    #[error("no pair for tokens {0} / {1}")]
    PairNotFound(TokenId, TokenId),

    /// A persisted exchange snapshot failed validation
    #[error("corrupt snapshot: {0}")]
    Snapshot(String),
}
