//! Events emitted by pair operations, for off-chain indexing.
//! Returned to the caller and logged; never consumed internally.

use crate::id::AccountId;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MintEvent {
    pub sender: AccountId,
    pub amount0: u128,
    pub amount1: u128,
    pub liquidity: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BurnEvent {
    pub sender: AccountId,
    pub amount0: u128,
    pub amount1: u128,
    pub liquidity: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwapEvent {
    pub sender: AccountId,
    pub to: AccountId,
    pub amount0_in: u128,
    pub amount1_in: u128,
    pub amount0_out: u128,
    pub amount1_out: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncEvent {
    pub reserve0: u128,
    pub reserve1: u128,
}
