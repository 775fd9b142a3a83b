//! Receipts published for every state change of the seat sale.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Vec};

use crate::storage::SeatHolder;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuySeatsReceipt {
    pub buyer: Address,
    /// Account credited with the seats
    pub owner: Address,
    pub seats: u32,
    pub cost: i128,
    pub seats_owned: u32,
    pub total_seats_taken: u32,
    pub total_users: u32,
    pub seat_holders: Vec<SeatHolder>,
    /// Proceeds still held after this purchase
    pub stx_balance: i128,
    pub distribution_height: Option<u32>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistributionReceipt {
    pub token: Address,
    pub distribution_height: u32,
    pub ft_balance: i128,
    pub per_seat_allocation: i128,
    pub proceeds_receiver: Address,
    pub proceeds: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundReceipt {
    pub owner: Address,
    pub seats: u32,
    pub amount: i128,
    pub total_seats_taken: u32,
    pub total_users: u32,
    pub stx_balance: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimReceipt {
    /// Seat owner receiving the tokens
    pub user: Address,
    /// Account that triggered the claim
    pub caller: Address,
    pub amount_claimed: i128,
    pub total_claimed: i128,
    pub ft_balance: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeesReceipt {
    pub amount: i128,
    pub total_accumulated: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeShareReceipt {
    pub recipient: Address,
    pub seats: u32,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AirdropReceipt {
    pub total_distributed: i128,
    pub accumulated_fees: i128,
    pub height: u32,
    pub timestamp: u64,
}

pub fn seats_bought(env: &Env, receipt: BuySeatsReceipt) {
    env.events()
        .publish((symbol_short!("buy_seats"), receipt.owner.clone()), receipt);
}

pub fn distribution_initialized(env: &Env, receipt: DistributionReceipt) {
    env.events().publish((symbol_short!("dist_init"),), receipt);
}

pub fn refunded(env: &Env, receipt: RefundReceipt) {
    env.events()
        .publish((symbol_short!("refund"), receipt.owner.clone()), receipt);
}

pub fn claimed(env: &Env, receipt: ClaimReceipt) {
    env.events()
        .publish((symbol_short!("claim"), receipt.user.clone()), receipt);
}

pub fn fees_received(env: &Env, receipt: FeesReceipt) {
    env.events().publish((symbol_short!("fees_in"),), receipt);
}

pub fn fee_share_paid(env: &Env, receipt: FeeShareReceipt) {
    env.events()
        .publish((symbol_short!("fee_share"), receipt.recipient.clone()), receipt);
}

pub fn airdrop_completed(env: &Env, receipt: AirdropReceipt) {
    env.events().publish((symbol_short!("airdrop"),), receipt);
}

pub fn bonded(env: &Env, height: u32) {
    env.events().publish((symbol_short!("bonded"),), height);
}
