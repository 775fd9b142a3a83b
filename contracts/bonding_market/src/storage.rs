use soroban_sdk::{contracttype, Address, Env};

use crate::error::MarketError;

/// Storage keys for the contract.
/// Using enum with variants for type-safe storage access.
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Market parameters, fixed at deployment
    Config,
    /// Quote tokens held against the curve (excludes the virtual offset)
    QuoteReserve,
    /// Sale tokens still on the curve
    TokenReserve,
    /// Curve invariant: (initial quote reserve + virtual offset) * initial token reserve
    K,
    /// Whether trading is open
    Open,
    /// Set once by graduation, never cleared
    Bonded,
}

/// Deployment parameters of the bonding market.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketConfig {
    /// Token traded on the curve
    pub sale_token: Address,
    /// Asset paid in and out of the curve
    pub quote_token: Address,
    /// Seat sale receiving its share of every fee
    pub seat_sale: Address,
    /// Receives the protocol share of trading fees
    pub fee_receiver: Address,
    /// Receives the agent share of the graduation premium
    pub agent: Address,
    /// Receives the rest of the graduation premium
    pub originator: Address,
    /// Seeds the external venue with the reserves left at graduation
    pub amm_receiver: Address,
    pub graduation_fee_receiver: Address,
    pub initial_quote_reserve: i128,
    pub initial_token_reserve: i128,
    /// Added to the quote side of the invariant only
    pub virtual_quote_offset: i128,
    /// Quote reserve at which the market graduates
    pub funding_target: i128,
    /// Flat quote amount paid out at graduation
    pub graduation_fee: i128,
}

/// Snapshot of the curve state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketState {
    pub quote_reserve: i128,
    pub token_reserve: i128,
    /// quote_reserve + virtual_quote_offset
    pub total_stk: i128,
    pub k: i128,
    pub open: bool,
    pub bonded: bool,
}

/// Trading fee in basis points (1 bp = 0.01%).
/// 200 bp = 2% of every trade.
pub const TRADE_FEE_BPS: i128 = 200;

/// Share of each trading fee credited to the seat sale (40%, floored).
/// The fee receiver gets the remainder.
pub const SEAT_SALE_FEE_SHARE_BPS: i128 = 4_000;

/// Part of the final token reserve paid out as graduation premium (25%).
pub const GRADUATION_PREMIUM_BPS: i128 = 2_500;

/// Agent share of the graduation premium (60%, floored).
pub const AGENT_PREMIUM_SHARE_BPS: i128 = 6_000;

/// Smallest fee charged on a sell, in quote units.
pub const MIN_SELL_FEE: i128 = 3;

/// Basis points denominator (100% = 10000 bp).
pub const BPS_DENOMINATOR: i128 = 10_000;

const DAY_IN_LEDGERS: u32 = 17_280;
pub const INSTANCE_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Keep config and reserves alive for another ~30 days of ledgers.
pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn read_config(env: &Env) -> Result<MarketConfig, MarketError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(MarketError::NotInitialized)
}

pub fn read_i128(env: &Env, key: &DataKey) -> Result<i128, MarketError> {
    env.storage()
        .instance()
        .get(key)
        .ok_or(MarketError::StorageCorrupted)
}

pub fn read_flag(env: &Env, key: &DataKey) -> Result<bool, MarketError> {
    env.storage()
        .instance()
        .get(key)
        .ok_or(MarketError::StorageCorrupted)
}

/// Current reserves as seen by the curve.
pub fn read_reserves(env: &Env) -> Result<(i128, i128, i128), MarketError> {
    Ok((
        read_i128(env, &DataKey::QuoteReserve)?,
        read_i128(env, &DataKey::TokenReserve)?,
        read_i128(env, &DataKey::K)?,
    ))
}

pub fn write_reserves(env: &Env, quote_reserve: i128, token_reserve: i128) {
    env.storage()
        .instance()
        .set(&DataKey::QuoteReserve, &quote_reserve);
    env.storage()
        .instance()
        .set(&DataKey::TokenReserve, &token_reserve);
}
