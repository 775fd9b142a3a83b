#![no_std]

mod curve;
mod error;
mod events;
mod sale;
mod storage;

pub use curve::{BuyQuote, SellQuote};
pub use error::MarketError;
pub use events::{BuyReceipt, GraduationReceipt, OpenReceipt, SellReceipt};
pub use storage::{MarketConfig, MarketState};

use curve::Reserves;
use sale::SaleClient;
use soroban_sdk::{contract, contractimpl, log, token, Address, Env};
use storage::DataKey;

/// Bonding Market Contract
///
/// Sells the launch token along a constant-product curve once the seat
/// sale has filled. Every trade pays a fee that is split between the fee
/// receiver and the seat sale. The buy that lifts the quote reserve to the
/// funding target graduates the market: the remaining reserves seed an
/// external venue and trading closes for good.
#[contract]
pub struct BondingMarket;

#[contractimpl]
impl BondingMarket {
    /// Constructor: delegates to initialize().
    pub fn __constructor(env: Env, config: MarketConfig, funder: Address) {
        Self::initialize(env, config, funder).expect("initialization failed");
    }

    /// Initialize the market and pull both initial reserves from `funder`.
    ///
    /// The market starts closed; see `open_market`.
    pub fn initialize(env: Env, config: MarketConfig, funder: Address) -> Result<(), MarketError> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(MarketError::AlreadyInitialized);
        }
        Self::validate_config(&config)?;

        let k = config
            .initial_quote_reserve
            .checked_add(config.virtual_quote_offset)
            .ok_or(MarketError::Overflow)?
            .checked_mul(config.initial_token_reserve)
            .ok_or(MarketError::Overflow)?;

        funder.require_auth();

        let market = env.current_contract_address();
        token::Client::new(&env, &config.quote_token).transfer(
            &funder,
            &market,
            &config.initial_quote_reserve,
        );
        token::Client::new(&env, &config.sale_token).transfer(
            &funder,
            &market,
            &config.initial_token_reserve,
        );

        let instance = env.storage().instance();
        instance.set(&DataKey::Config, &config);
        instance.set(&DataKey::K, &k);
        instance.set(&DataKey::Open, &false);
        instance.set(&DataKey::Bonded, &false);
        storage::write_reserves(
            &env,
            config.initial_quote_reserve,
            config.initial_token_reserve,
        );
        storage::bump_instance(&env);

        Ok(())
    }

    /// Open trading. Only possible once the seat sale has started
    /// distribution, and never again after graduation.
    pub fn open_market(env: Env) -> Result<(), MarketError> {
        let config = storage::read_config(&env)?;
        if storage::read_flag(&env, &DataKey::Open)? || storage::read_flag(&env, &DataKey::Bonded)? {
            return Err(MarketError::AlreadyOpen);
        }

        let distribution_height = SaleClient::new(&env, &config.seat_sale)
            .get_distribution_height()
            .ok_or(MarketError::DistributionNotStarted)?;

        env.storage().instance().set(&DataKey::Open, &true);
        storage::bump_instance(&env);

        let (quote_reserve, token_reserve, _) = storage::read_reserves(&env)?;
        events::market_opened(
            &env,
            OpenReceipt {
                distribution_height,
                quote_reserve,
                token_reserve,
            },
        );

        Ok(())
    }

    /// Buy sale tokens with `amount` quote units.
    ///
    /// # Arguments
    /// * `token` - Must be the configured sale token
    /// * `amount` - Gross quote amount, fee included
    /// * `buyer` - Pays and receives the tokens (must authorize)
    ///
    /// # Returns
    /// Sale tokens received
    pub fn buy(env: Env, token: Address, amount: i128, buyer: Address) -> Result<i128, MarketError> {
        let config = storage::read_config(&env)?;
        Self::require_trading(&env, &config, &token)?;

        buyer.require_auth();

        let quote = curve::quote_buy(&Self::reserves(&env, &config)?, config.funding_target, amount)?;
        if quote.tokens_out <= 0 {
            return Err(MarketError::BelowMinimum);
        }

        let market = env.current_contract_address();
        let quote_token = token::Client::new(&env, &config.quote_token);
        quote_token.transfer(&buyer, &market, &amount);

        let (fee_to_receiver, fee_to_seat_sale) = Self::pay_fee(&env, &config, quote.fee)?;

        token::Client::new(&env, &config.sale_token).transfer(&market, &buyer, &quote.tokens_out);
        storage::write_reserves(&env, quote.new_stx, quote.new_ft);
        storage::bump_instance(&env);

        events::bought(
            &env,
            BuyReceipt {
                buyer,
                quote_in: amount,
                fee: quote.fee,
                fee_to_receiver,
                fee_to_seat_sale,
                tokens_out: quote.tokens_out,
                quote_reserve: quote.new_stx,
                token_reserve: quote.new_ft,
                stx_to_grad: quote.stx_to_grad,
            },
        );

        if quote.new_stx >= config.funding_target {
            Self::graduate(&env, &config, quote.new_stx, quote.new_ft)?;
        }

        Ok(quote.tokens_out)
    }

    /// Sell `amount` sale tokens back to the curve.
    ///
    /// # Returns
    /// Net quote amount paid to the seller
    pub fn sell(env: Env, token: Address, amount: i128, seller: Address) -> Result<i128, MarketError> {
        let config = storage::read_config(&env)?;
        Self::require_trading(&env, &config, &token)?;

        seller.require_auth();

        let quote = curve::quote_sell(&Self::reserves(&env, &config)?, amount)?;
        if quote.stx_to_receiver <= 0 {
            return Err(MarketError::BelowMinimum);
        }

        let market = env.current_contract_address();
        token::Client::new(&env, &config.sale_token).transfer(&seller, &market, &amount);

        let (fee_to_receiver, fee_to_seat_sale) = Self::pay_fee(&env, &config, quote.fee)?;

        token::Client::new(&env, &config.quote_token).transfer(
            &market,
            &seller,
            &quote.stx_to_receiver,
        );
        storage::write_reserves(&env, quote.new_stx, quote.new_ft);
        storage::bump_instance(&env);

        events::sold(
            &env,
            SellReceipt {
                seller,
                tokens_in: amount,
                stx_out: quote.stx_out,
                fee: quote.fee,
                fee_to_receiver,
                fee_to_seat_sale,
                quote_out: quote.stx_to_receiver,
                quote_reserve: quote.new_stx,
                token_reserve: quote.new_ft,
            },
        );

        Ok(quote.stx_to_receiver)
    }

    /// Preview a buy of `amount` quote units. No state change.
    pub fn get_in(env: Env, amount: i128) -> Result<BuyQuote, MarketError> {
        let config = storage::read_config(&env)?;
        curve::quote_buy(&Self::reserves(&env, &config)?, config.funding_target, amount)
    }

    /// Preview a sell of `amount` sale tokens. No state change.
    pub fn get_out(env: Env, amount: i128) -> Result<SellQuote, MarketError> {
        let config = storage::read_config(&env)?;
        curve::quote_sell(&Self::reserves(&env, &config)?, amount)
    }

    pub fn get_config(env: Env) -> Result<MarketConfig, MarketError> {
        storage::read_config(&env)
    }

    /// Get reserves, invariant and lifecycle flags.
    pub fn get_state(env: Env) -> Result<MarketState, MarketError> {
        let config = storage::read_config(&env)?;
        let (quote_reserve, token_reserve, k) = storage::read_reserves(&env)?;
        Ok(MarketState {
            quote_reserve,
            token_reserve,
            total_stk: quote_reserve
                .checked_add(config.virtual_quote_offset)
                .ok_or(MarketError::Overflow)?,
            k,
            open: storage::read_flag(&env, &DataKey::Open)?,
            bonded: storage::read_flag(&env, &DataKey::Bonded)?,
        })
    }

    pub fn is_open(env: Env) -> Result<bool, MarketError> {
        storage::read_config(&env)?;
        storage::read_flag(&env, &DataKey::Open)
    }

    // --- Internal helpers ---

    fn validate_config(config: &MarketConfig) -> Result<(), MarketError> {
        let valid = config.initial_quote_reserve > 0
            && config.initial_token_reserve > 0
            && config.virtual_quote_offset >= 0
            && config.funding_target > config.initial_quote_reserve
            && config.graduation_fee >= 0
            && config.graduation_fee < config.funding_target;
        if !valid {
            return Err(MarketError::InvalidConfig);
        }
        Ok(())
    }

    fn require_trading(env: &Env, config: &MarketConfig, token: &Address) -> Result<(), MarketError> {
        if *token != config.sale_token {
            return Err(MarketError::WrongToken);
        }
        if !storage::read_flag(env, &DataKey::Open)? {
            return Err(MarketError::MarketClosed);
        }
        Ok(())
    }

    fn reserves(env: &Env, config: &MarketConfig) -> Result<Reserves, MarketError> {
        let (quote_reserve, token_reserve, k) = storage::read_reserves(env)?;
        Ok(Reserves {
            quote_reserve,
            token_reserve,
            virtual_offset: config.virtual_quote_offset,
            k,
        })
    }

    /// Pay a trading fee out of the market's quote balance.
    ///
    /// Returns (fee receiver part, seat sale part).
    fn pay_fee(env: &Env, config: &MarketConfig, fee: i128) -> Result<(i128, i128), MarketError> {
        let (to_receiver, to_seat_sale) = curve::split_fee(fee)?;
        let market = env.current_contract_address();
        let quote_token = token::Client::new(env, &config.quote_token);

        if to_receiver > 0 {
            quote_token.transfer(&market, &config.fee_receiver, &to_receiver);
        }
        if to_seat_sale > 0 {
            quote_token.transfer(&market, &config.seat_sale, &to_seat_sale);
            SaleClient::new(env, &config.seat_sale).credit_fees(&market, &to_seat_sale);
        }

        Ok((to_receiver, to_seat_sale))
    }

    /// Pay out both reserves and close the market for good.
    fn graduate(
        env: &Env,
        config: &MarketConfig,
        quote_reserve: i128,
        token_reserve: i128,
    ) -> Result<(), MarketError> {
        let split = curve::graduation_split(token_reserve)?;
        let amm_quote = quote_reserve
            .checked_sub(config.graduation_fee)
            .filter(|amount| *amount >= 0)
            .ok_or(MarketError::InsufficientLiquidity)?;

        let market = env.current_contract_address();
        let sale_token = token::Client::new(env, &config.sale_token);
        sale_token.transfer(&market, &config.agent, &split.agent);
        sale_token.transfer(&market, &config.originator, &split.originator);
        sale_token.transfer(&market, &config.amm_receiver, &split.amm_tokens);

        let quote_token = token::Client::new(env, &config.quote_token);
        quote_token.transfer(&market, &config.graduation_fee_receiver, &config.graduation_fee);
        quote_token.transfer(&market, &config.amm_receiver, &amm_quote);

        storage::write_reserves(env, 0, 0);
        env.storage().instance().set(&DataKey::Open, &false);
        env.storage().instance().set(&DataKey::Bonded, &true);
        storage::bump_instance(env);

        SaleClient::new(env, &config.seat_sale).toggle_bonded(&market);

        let height = env.ledger().sequence();
        log!(env, "market graduated at height", height);
        events::graduated(
            env,
            GraduationReceipt {
                height,
                premium: split.premium,
                agent_tokens: split.agent,
                originator_tokens: split.originator,
                amm_tokens: split.amm_tokens,
                amm_quote,
                graduation_fee: config.graduation_fee,
            },
        );

        Ok(())
    }
}
