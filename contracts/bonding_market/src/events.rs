//! Receipts published by the bonding market.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OpenReceipt {
    pub distribution_height: u32,
    pub quote_reserve: i128,
    pub token_reserve: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuyReceipt {
    pub buyer: Address,
    pub quote_in: i128,
    pub fee: i128,
    /// Part of the fee paid to the fee receiver
    pub fee_to_receiver: i128,
    /// Part of the fee credited to the seat sale
    pub fee_to_seat_sale: i128,
    pub tokens_out: i128,
    pub quote_reserve: i128,
    pub token_reserve: i128,
    pub stx_to_grad: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SellReceipt {
    pub seller: Address,
    pub tokens_in: i128,
    pub stx_out: i128,
    pub fee: i128,
    pub fee_to_receiver: i128,
    pub fee_to_seat_sale: i128,
    /// Net quote amount paid to the seller
    pub quote_out: i128,
    pub quote_reserve: i128,
    pub token_reserve: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GraduationReceipt {
    pub height: u32,
    pub premium: i128,
    pub agent_tokens: i128,
    pub originator_tokens: i128,
    pub amm_tokens: i128,
    pub amm_quote: i128,
    pub graduation_fee: i128,
}

pub fn market_opened(env: &Env, receipt: OpenReceipt) {
    env.events().publish((symbol_short!("open"),), receipt);
}

pub fn bought(env: &Env, receipt: BuyReceipt) {
    env.events()
        .publish((symbol_short!("buy"), receipt.buyer.clone()), receipt);
}

pub fn sold(env: &Env, receipt: SellReceipt) {
    env.events()
        .publish((symbol_short!("sell"), receipt.seller.clone()), receipt);
}

pub fn graduated(env: &Env, receipt: GraduationReceipt) {
    env.events().publish((symbol_short!("graduate"),), receipt);
}
