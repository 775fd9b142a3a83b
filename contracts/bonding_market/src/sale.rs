//! Client side of the seat sale the market reports to.

use soroban_sdk::{contractclient, Address, Env};

/// Subset of the seat sale interface used by the market.
#[contractclient(name = "SaleClient")]
pub trait SaleInterface {
    fn get_distribution_height(env: Env) -> Option<u32>;
    fn credit_fees(env: Env, market: Address, amount: i128) -> i128;
    fn toggle_bonded(env: Env, market: Address);
}
