//! Host-side pair engine
//!
//! Wraps the pure model in [`pair_model`] with the pieces the chain host
//! would otherwise provide: an in-memory token ledger, canonical pair
//! identities, event emission, and an exchange registry that resolves
//! exactly one pair per unordered token set.
//!
//! Every public operation is atomic: ledger effects are staged against a
//! copy and committed together with the new pair state, so a failed
//! operation leaves both untouched.

pub mod error;
pub mod events;
pub mod id;
pub mod ledger;
pub mod pair;
pub mod registry;
pub mod snapshot;

pub use error::EngineError;
pub use events::{BurnEvent, MintEvent, SwapEvent, SyncEvent};
pub use id::{sort_tokens, AccountId, TokenId, BURN_ADDRESS};
pub use ledger::TokenLedger;
pub use pair::Pair;
pub use registry::Exchange;
pub use snapshot::ExchangeSnapshot;
