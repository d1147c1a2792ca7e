//! Serializable exchange snapshots for the CLI state file
//!
//! The engine types stay serde-free; this module bridges them to plain
//! records. 256-bit accumulators travel as decimal strings.

use pair_model::{PairState, U256};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::id::{AccountId, TokenId};
use crate::ledger::TokenLedger;
use crate::pair::Pair;
use crate::registry::Exchange;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeSnapshot {
    pub balances: Vec<BalanceEntry>,
    pub pairs: Vec<PairSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub account: AccountId,
    pub token: TokenId,
    pub amount: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairSnapshot {
    pub token0: TokenId,
    pub token1: TokenId,
    pub fee_collector: Option<AccountId>,
    pub reserve0: u128,
    pub reserve1: u128,
    pub total_supply: u128,
    pub block_timestamp_last: u64,
    pub price0_cumulative_last: String,
    pub price1_cumulative_last: String,
    pub k_last: String,
}

impl ExchangeSnapshot {
    pub fn capture(exchange: &Exchange) -> Self {
        let balances = exchange
            .ledger()
            .entries()
            .map(|(account, token, amount)| BalanceEntry {
                account,
                token,
                amount,
            })
            .collect();
        let pairs = exchange
            .pairs()
            .map(|pair| {
                let state = pair.fetch_state();
                PairSnapshot {
                    token0: pair.token0(),
                    token1: pair.token1(),
                    fee_collector: pair.fee_collector(),
                    reserve0: state.reserve0,
                    reserve1: state.reserve1,
                    total_supply: state.total_supply,
                    block_timestamp_last: state.block_timestamp_last,
                    price0_cumulative_last: state.price0_cumulative_last.to_string(),
                    price1_cumulative_last: state.price1_cumulative_last.to_string(),
                    k_last: state.k_last.to_string(),
                }
            })
            .collect();
        Self { balances, pairs }
    }

    pub fn restore(self) -> Result<Exchange, EngineError> {
        let mut ledger = TokenLedger::new();
        for entry in &self.balances {
            ledger.credit(entry.account, entry.token, entry.amount);
        }
        let pairs = self
            .pairs
            .into_iter()
            .map(|snap| {
                if snap.token0 >= snap.token1 {
                    return Err(EngineError::Snapshot(format!(
                        "tokens out of canonical order: {} / {}",
                        snap.token0, snap.token1
                    )));
                }
                let state = PairState {
                    reserve0: snap.reserve0,
                    reserve1: snap.reserve1,
                    total_supply: snap.total_supply,
                    block_timestamp_last: snap.block_timestamp_last,
                    price0_cumulative_last: parse_u256(&snap.price0_cumulative_last)?,
                    price1_cumulative_last: parse_u256(&snap.price1_cumulative_last)?,
                    k_last: parse_u256(&snap.k_last)?,
                };
                if state.reserve0 > pair_model::MAX_RESERVE
                    || state.reserve1 > pair_model::MAX_RESERVE
                {
                    return Err(EngineError::Snapshot(format!(
                        "reserves out of range for pair {} / {}",
                        snap.token0, snap.token1
                    )));
                }
                Ok(Pair::restore(
                    snap.token0,
                    snap.token1,
                    snap.fee_collector,
                    state,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Exchange::from_parts(ledger, pairs)
    }
}

fn parse_u256(s: &str) -> Result<U256, EngineError> {
    U256::from_dec_str(s).map_err(|e| EngineError::Snapshot(format!("bad 256-bit value {s:?}: {e:?}")))
}
