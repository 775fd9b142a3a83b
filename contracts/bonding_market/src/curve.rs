//! Constant-product pricing with a virtual quote offset.
//!
//! The invariant is `k = (quote_reserve + virtual_offset) * token_reserve`.
//! The offset only exists on the invariant side: the stored reserves always
//! match what the market actually holds.
//!
//! Formulas:
//! - Buy:  new_ft = floor(k / (total_stk + stx_in)), tokens_out = ft - new_ft
//! - Sell: new_stk = floor(k / (ft + t)), stx_out = total_stk - new_stk - 1
//!
//! Every division floors, so rounding always stays with the pool.

use soroban_sdk::contracttype;

use crate::error::MarketError;
use crate::storage::{
    AGENT_PREMIUM_SHARE_BPS, BPS_DENOMINATOR, GRADUATION_PREMIUM_BPS, MIN_SELL_FEE,
    SEAT_SALE_FEE_SHARE_BPS, TRADE_FEE_BPS,
};

/// Markup applied to the remaining distance to graduation (percent).
const GRADUATION_DISTANCE_MARKUP: i128 = 103;

/// Result of pricing a buy.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuyQuote {
    pub fee: i128,
    /// Quote amount entering the reserves (input minus fee)
    pub stx_in: i128,
    pub tokens_out: i128,
    pub new_ft: i128,
    pub new_stk: i128,
    pub new_stx: i128,
    pub k: i128,
    /// Gross quote still needed to graduate, before this trade
    pub stx_to_grad: i128,
}

/// Result of pricing a sell.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SellQuote {
    /// Quote amount leaving the reserves (fee included)
    pub stx_out: i128,
    pub fee: i128,
    pub stx_to_receiver: i128,
    pub new_ft: i128,
    pub new_stk: i128,
    pub new_stx: i128,
    pub k: i128,
}

/// How the token reserve is paid out at graduation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GraduationSplit {
    pub premium: i128,
    pub agent: i128,
    pub originator: i128,
    pub amm_tokens: i128,
}

/// Curve reserves at a point in time.
#[derive(Clone, Copy, Debug)]
pub struct Reserves {
    pub quote_reserve: i128,
    pub token_reserve: i128,
    pub virtual_offset: i128,
    pub k: i128,
}

impl Reserves {
    fn total_stk(&self) -> Result<i128, MarketError> {
        self.quote_reserve
            .checked_add(self.virtual_offset)
            .ok_or(MarketError::Overflow)
    }
}

/// floor(amount * bps / 10000)
pub fn apply_bps(amount: i128, bps: i128) -> Result<i128, MarketError> {
    amount
        .checked_mul(bps)
        .ok_or(MarketError::Overflow)?
        .checked_div(BPS_DENOMINATOR)
        .ok_or(MarketError::Overflow)
}

/// Price spending `amount` quote units on tokens.
pub fn quote_buy(
    reserves: &Reserves,
    funding_target: i128,
    amount: i128,
) -> Result<BuyQuote, MarketError> {
    if amount <= 0 {
        return Err(MarketError::InvalidAmount);
    }

    let fee = apply_bps(amount, TRADE_FEE_BPS)?;
    let stx_in = amount - fee;

    let new_stk = reserves
        .total_stk()?
        .checked_add(stx_in)
        .ok_or(MarketError::Overflow)?;
    let new_stx = reserves
        .quote_reserve
        .checked_add(stx_in)
        .ok_or(MarketError::Overflow)?;
    let new_ft = reserves
        .k
        .checked_div(new_stk)
        .ok_or(MarketError::Overflow)?;
    let tokens_out = (reserves.token_reserve - new_ft).max(0);

    let stx_to_grad = if funding_target > reserves.quote_reserve {
        (funding_target - reserves.quote_reserve)
            .checked_mul(GRADUATION_DISTANCE_MARKUP)
            .ok_or(MarketError::Overflow)?
            / 100
    } else {
        0
    };

    Ok(BuyQuote {
        fee,
        stx_in,
        tokens_out,
        new_ft,
        new_stk,
        new_stx,
        k: reserves.k,
        stx_to_grad,
    })
}

/// Price selling `amount` tokens back to the curve.
///
/// Fails with `InsufficientLiquidity` when the quote reserve cannot cover
/// the sell, so a quote never shows a negative reserve.
pub fn quote_sell(reserves: &Reserves, amount: i128) -> Result<SellQuote, MarketError> {
    if amount <= 0 {
        return Err(MarketError::InvalidAmount);
    }

    let total_stk = reserves.total_stk()?;
    let new_ft = reserves
        .token_reserve
        .checked_add(amount)
        .ok_or(MarketError::Overflow)?;
    let new_stk = reserves
        .k
        .checked_div(new_ft)
        .ok_or(MarketError::Overflow)?;

    let stx_out = (total_stk - new_stk - 1).max(0);
    if stx_out > reserves.quote_reserve {
        return Err(MarketError::InsufficientLiquidity);
    }
    let fee = apply_bps(stx_out, TRADE_FEE_BPS)?.max(MIN_SELL_FEE);
    let stx_to_receiver = (stx_out - fee).max(0);
    let new_stx = reserves
        .quote_reserve
        .checked_sub(stx_out)
        .ok_or(MarketError::Overflow)?;

    Ok(SellQuote {
        stx_out,
        fee,
        stx_to_receiver,
        new_ft,
        new_stk,
        new_stx,
        k: reserves.k,
    })
}

/// Split a trading fee into (fee receiver part, seat sale part).
pub fn split_fee(fee: i128) -> Result<(i128, i128), MarketError> {
    let seat_sale_part = apply_bps(fee, SEAT_SALE_FEE_SHARE_BPS)?;
    Ok((fee - seat_sale_part, seat_sale_part))
}

/// Split the token reserve left when the market graduates.
pub fn graduation_split(token_reserve: i128) -> Result<GraduationSplit, MarketError> {
    let premium = apply_bps(token_reserve, GRADUATION_PREMIUM_BPS)?;
    let agent = apply_bps(premium, AGENT_PREMIUM_SHARE_BPS)?;
    Ok(GraduationSplit {
        premium,
        agent,
        originator: premium - agent,
        amm_tokens: token_reserve - premium,
    })
}
