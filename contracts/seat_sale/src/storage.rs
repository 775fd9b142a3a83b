use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::error::SaleError;

/// Storage keys for the contract.
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Sale parameters, fixed at deployment
    Config,
    /// Ordered list of (owner, seats) in purchase order
    SeatHolders,
    TotalSeatsTaken,
    TotalUsers,
    /// Block height at which the seat target was reached. Absent before.
    DistributionHeight,
    /// Full token allocation of one seat, fixed at distribution
    PerSeatAllocation,
    /// Seat proceeds held until distribution starts
    StxBalance,
    /// Sale tokens still escrowed for vesting
    FtBalance,
    AccumulatedFees,
    LastAirdropHeight,
    AcceleratedVesting,
    FinalAirdropMode,
    /// Seats owned by an account
    SeatsOwned(Address),
    /// Cumulative sale tokens claimed by an account
    Claimed(Address),
}

/// Deployment parameters of the seat sale.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleConfig {
    /// Asset seats are paid in and fees are airdropped in
    pub quote_token: Address,
    /// Token distributed through vesting
    pub sale_token: Address,
    /// Bonding market allowed to credit fees and toggle bonded mode
    pub market: Address,
    /// Receives the seat proceeds once the seat target is reached
    pub proceeds_receiver: Address,
    pub price_per_seat: i128,
    pub max_seats_per_user: u32,
    pub seat_target: u32,
    /// Minimum distinct seat holders at distribution (0 disables the gate)
    pub min_users: u32,
    /// Sale tokens escrowed at deployment for vesting
    pub token_allocation: i128,
    /// Blocks between two fee airdrops
    pub airdrop_cooldown: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SeatHolder {
    pub owner: Address,
    pub seats: u32,
}

/// Snapshot of the mutable sale state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleState {
    pub total_seats_taken: u32,
    pub total_users: u32,
    pub distribution_height: Option<u32>,
    pub stx_balance: i128,
    pub ft_balance: i128,
    pub accumulated_fees: i128,
    pub last_airdrop_height: Option<u32>,
    pub accelerated_vesting: bool,
    pub final_airdrop_mode: bool,
}

/// Instance entries are kept alive for roughly 30 days of 5s ledgers,
/// well past the last vesting step.
const DAY_IN_LEDGERS: u32 = 17_280;
pub const INSTANCE_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn read_config(env: &Env) -> Result<SaleConfig, SaleError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(SaleError::NotInitialized)
}

pub fn read_u32(env: &Env, key: &DataKey) -> Result<u32, SaleError> {
    env.storage()
        .instance()
        .get(key)
        .ok_or(SaleError::StorageCorrupted)
}

pub fn read_i128(env: &Env, key: &DataKey) -> Result<i128, SaleError> {
    env.storage()
        .instance()
        .get(key)
        .ok_or(SaleError::StorageCorrupted)
}

pub fn read_flag(env: &Env, key: &DataKey) -> Result<bool, SaleError> {
    env.storage()
        .instance()
        .get(key)
        .ok_or(SaleError::StorageCorrupted)
}

pub fn distribution_height(env: &Env) -> Option<u32> {
    env.storage().instance().get(&DataKey::DistributionHeight)
}

pub fn last_airdrop_height(env: &Env) -> Option<u32> {
    env.storage().instance().get(&DataKey::LastAirdropHeight)
}

pub fn seats_owned(env: &Env, owner: &Address) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::SeatsOwned(owner.clone()))
        .unwrap_or(0)
}

pub fn claimed(env: &Env, owner: &Address) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::Claimed(owner.clone()))
        .unwrap_or(0)
}

pub fn seat_holders(env: &Env) -> Result<Vec<SeatHolder>, SaleError> {
    env.storage()
        .instance()
        .get(&DataKey::SeatHolders)
        .ok_or(SaleError::StorageCorrupted)
}
