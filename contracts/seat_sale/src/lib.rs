#![no_std]

mod error;
mod events;
mod fees;
mod storage;
mod vesting;

pub use error::SaleError;
pub use events::{
    AirdropReceipt, BuySeatsReceipt, ClaimReceipt, DistributionReceipt, FeeShareReceipt,
    FeesReceipt, RefundReceipt,
};
pub use storage::{SaleConfig, SaleState, SeatHolder};

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Vec};
use storage::DataKey;
use vesting::VestingSchedule;

/// Seat-based pre-sale.
///
/// Seats are bought for a fixed quote-asset price until the seat target is
/// reached. Reaching the target closes the sale for good, starts the vesting
/// clock and makes the escrowed sale tokens claimable per seat. Trading fees
/// credited by the bonding market are airdropped pro rata to seat holders.
#[contract]
pub struct SeatSale;

#[contractimpl]
impl SeatSale {
    /// Constructor: delegates to initialize().
    pub fn __constructor(env: Env, config: SaleConfig, funder: Address) {
        Self::initialize(env, config, funder).expect("initialization failed");
    }

    /// Initialize the sale and escrow the vesting allocation.
    ///
    /// # Arguments
    /// * `config` - Sale parameters, fixed for the lifetime of the contract
    /// * `funder` - Account providing `config.token_allocation` sale tokens
    pub fn initialize(env: Env, config: SaleConfig, funder: Address) -> Result<(), SaleError> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(SaleError::AlreadyInitialized);
        }
        Self::validate_config(&config)?;

        funder.require_auth();

        let sale_token = token::Client::new(&env, &config.sale_token);
        sale_token.transfer(
            &funder,
            &env.current_contract_address(),
            &config.token_allocation,
        );

        let instance = env.storage().instance();
        instance.set(&DataKey::Config, &config);
        instance.set(&DataKey::SeatHolders, &Vec::<SeatHolder>::new(&env));
        instance.set(&DataKey::TotalSeatsTaken, &0u32);
        instance.set(&DataKey::TotalUsers, &0u32);
        instance.set(&DataKey::StxBalance, &0i128);
        instance.set(&DataKey::FtBalance, &0i128);
        instance.set(&DataKey::AccumulatedFees, &0i128);
        instance.set(&DataKey::AcceleratedVesting, &false);
        instance.set(&DataKey::FinalAirdropMode, &false);
        storage::bump_instance(&env);

        Ok(())
    }

    /// Buy up to `requested_seats` seats.
    ///
    /// The grant is capped by the beneficiary's remaining per-user allowance
    /// and by the seats left, so over-asking succeeds with fewer seats.
    /// `buyer` pays; `on_behalf_of` (or `buyer`) owns the seats.
    ///
    /// # Returns
    /// Number of seats granted
    pub fn buy_up_to(
        env: Env,
        buyer: Address,
        requested_seats: u32,
        on_behalf_of: Option<Address>,
    ) -> Result<u32, SaleError> {
        let config = storage::read_config(&env)?;
        if storage::distribution_height(&env).is_some() {
            return Err(SaleError::SaleClosed);
        }

        buyer.require_auth();

        let owner = on_behalf_of.unwrap_or_else(|| buyer.clone());
        let owned = storage::seats_owned(&env, &owner);
        let total_seats = storage::read_u32(&env, &DataKey::TotalSeatsTaken)?;
        let total_users = storage::read_u32(&env, &DataKey::TotalUsers)?;

        let is_new_user = owned == 0;
        let users_after = if is_new_user { total_users + 1 } else { total_users };
        let seats_left = config.seat_target.saturating_sub(total_seats);
        // Keep one seat back for every holder still missing under min_users
        let reserved = config.min_users.saturating_sub(users_after);

        let grant = requested_seats
            .min(config.max_seats_per_user.saturating_sub(owned))
            .min(seats_left.saturating_sub(reserved));
        if grant == 0 {
            return Err(SaleError::InvalidSeatCount);
        }

        let cost = (grant as i128)
            .checked_mul(config.price_per_seat)
            .ok_or(SaleError::Overflow)?;
        let quote_token = token::Client::new(&env, &config.quote_token);
        quote_token.transfer(&buyer, &env.current_contract_address(), &cost);

        let seats_after = owned + grant;
        let total_seats_after = total_seats + grant;
        let stx_balance = storage::read_i128(&env, &DataKey::StxBalance)?
            .checked_add(cost)
            .ok_or(SaleError::Overflow)?;

        let mut holders = storage::seat_holders(&env)?;
        let entry = SeatHolder {
            owner: owner.clone(),
            seats: seats_after,
        };
        match holders.iter().position(|holder| holder.owner == owner) {
            Some(index) => holders.set(index as u32, entry),
            None => holders.push_back(entry),
        }

        let instance = env.storage().instance();
        instance.set(&DataKey::SeatsOwned(owner.clone()), &seats_after);
        instance.set(&DataKey::SeatHolders, &holders);
        instance.set(&DataKey::TotalSeatsTaken, &total_seats_after);
        instance.set(&DataKey::TotalUsers, &users_after);
        instance.set(&DataKey::StxBalance, &stx_balance);

        if total_seats_after == config.seat_target {
            Self::initialize_distribution(&env, &config)?;
        }
        storage::bump_instance(&env);

        events::seats_bought(
            &env,
            BuySeatsReceipt {
                buyer,
                owner,
                seats: grant,
                cost,
                seats_owned: seats_after,
                total_seats_taken: total_seats_after,
                total_users: users_after,
                seat_holders: holders,
                stx_balance: storage::read_i128(&env, &DataKey::StxBalance)?,
                distribution_height: storage::distribution_height(&env),
            },
        );

        Ok(grant)
    }

    /// Refund all seats of `caller` while the sale is still open.
    ///
    /// # Returns
    /// Quote amount refunded
    pub fn refund(env: Env, caller: Address) -> Result<i128, SaleError> {
        let config = storage::read_config(&env)?;
        if storage::distribution_height(&env).is_some() {
            return Err(SaleError::SaleClosed);
        }

        caller.require_auth();

        let seats = storage::seats_owned(&env, &caller);
        if seats == 0 {
            return Err(SaleError::NotSeatOwner);
        }

        let amount = (seats as i128)
            .checked_mul(config.price_per_seat)
            .ok_or(SaleError::Overflow)?;
        let total_seats = storage::read_u32(&env, &DataKey::TotalSeatsTaken)?
            .checked_sub(seats)
            .ok_or(SaleError::StorageCorrupted)?;
        let total_users = storage::read_u32(&env, &DataKey::TotalUsers)?
            .checked_sub(1)
            .ok_or(SaleError::StorageCorrupted)?;
        let stx_balance = storage::read_i128(&env, &DataKey::StxBalance)?
            .checked_sub(amount)
            .filter(|balance| *balance >= 0)
            .ok_or(SaleError::StorageCorrupted)?;

        let mut holders = storage::seat_holders(&env)?;
        if let Some(index) = holders.iter().position(|holder| holder.owner == caller) {
            holders.remove(index as u32);
        }

        let instance = env.storage().instance();
        instance.remove(&DataKey::SeatsOwned(caller.clone()));
        instance.set(&DataKey::SeatHolders, &holders);
        instance.set(&DataKey::TotalSeatsTaken, &total_seats);
        instance.set(&DataKey::TotalUsers, &total_users);
        instance.set(&DataKey::StxBalance, &stx_balance);
        storage::bump_instance(&env);

        let quote_token = token::Client::new(&env, &config.quote_token);
        quote_token.transfer(&env.current_contract_address(), &caller, &amount);

        events::refunded(
            &env,
            RefundReceipt {
                owner: caller,
                seats,
                amount,
                total_seats_taken: total_seats,
                total_users,
                stx_balance,
            },
        );

        Ok(amount)
    }

    /// Claim the vested sale tokens of `caller`.
    ///
    /// # Returns
    /// Amount of sale tokens transferred
    pub fn claim(env: Env, token: Address, caller: Address) -> Result<i128, SaleError> {
        caller.require_auth();
        Self::claim_for(&env, &token, &caller, &caller)
    }

    /// Claim vested tokens for `beneficiary`. Tokens always go to the
    /// beneficiary; `caller` only pays for the invocation.
    pub fn claim_on_behalf(
        env: Env,
        token: Address,
        beneficiary: Address,
        caller: Address,
    ) -> Result<i128, SaleError> {
        caller.require_auth();
        Self::claim_for(&env, &token, &beneficiary, &caller)
    }

    /// Credit the seat-sale share of a trading fee (bonding market only).
    ///
    /// The market transfers the quote tokens before calling this.
    ///
    /// # Returns
    /// Accumulated fees after the credit
    pub fn credit_fees(env: Env, market: Address, amount: i128) -> Result<i128, SaleError> {
        Self::require_market(&env, &market)?;
        if amount <= 0 {
            return Err(SaleError::InvalidAmount);
        }

        let accumulated = storage::read_i128(&env, &DataKey::AccumulatedFees)?
            .checked_add(amount)
            .ok_or(SaleError::Overflow)?;
        env.storage()
            .instance()
            .set(&DataKey::AccumulatedFees, &accumulated);
        storage::bump_instance(&env);

        events::fees_received(
            &env,
            FeesReceipt {
                amount,
                total_accumulated: accumulated,
            },
        );

        Ok(accumulated)
    }

    /// Switch to accelerated vesting and final airdrop mode (bonding market only).
    pub fn toggle_bonded(env: Env, market: Address) -> Result<(), SaleError> {
        Self::require_market(&env, &market)?;

        env.storage()
            .instance()
            .set(&DataKey::AcceleratedVesting, &true);
        env.storage()
            .instance()
            .set(&DataKey::FinalAirdropMode, &true);
        storage::bump_instance(&env);

        let height = env.ledger().sequence();
        log!(&env, "market bonded at height", height);
        events::bonded(&env, height);

        Ok(())
    }

    /// Airdrop accumulated fees to every seat holder, pro rata to seats.
    ///
    /// Shares are floored; the residual stays in the contract.
    ///
    /// # Returns
    /// Total quote amount distributed
    pub fn trigger_fee_airdrop(env: Env, caller: Address) -> Result<i128, SaleError> {
        let config = storage::read_config(&env)?;

        caller.require_auth();

        let accumulated = storage::read_i128(&env, &DataKey::AccumulatedFees)?;
        if accumulated <= 0 {
            return Err(SaleError::NoFees);
        }

        let current_height = env.ledger().sequence();
        let final_mode = storage::read_flag(&env, &DataKey::FinalAirdropMode)?;
        if !final_mode {
            if let Some(last) = storage::last_airdrop_height(&env) {
                if current_height.saturating_sub(last) < config.airdrop_cooldown {
                    return Err(SaleError::CooldownActive);
                }
            }
        }

        if storage::distribution_height(&env).is_none() {
            return Err(SaleError::DistributionNotStarted);
        }

        let total_seats = storage::read_u32(&env, &DataKey::TotalSeatsTaken)?;
        let holders = storage::seat_holders(&env)?;
        let quote_token = token::Client::new(&env, &config.quote_token);

        let mut distributed: i128 = 0;
        for holder in holders.iter() {
            let share = fees::pro_rata_share(accumulated, holder.seats, total_seats)?;
            if share == 0 {
                continue;
            }
            quote_token.transfer(&env.current_contract_address(), &holder.owner, &share);
            distributed = distributed.checked_add(share).ok_or(SaleError::Overflow)?;
            events::fee_share_paid(
                &env,
                FeeShareReceipt {
                    recipient: holder.owner,
                    seats: holder.seats,
                    amount: share,
                },
            );
        }

        env.storage()
            .instance()
            .set(&DataKey::AccumulatedFees, &0i128);
        env.storage()
            .instance()
            .set(&DataKey::LastAirdropHeight, &current_height);
        storage::bump_instance(&env);

        events::airdrop_completed(
            &env,
            AirdropReceipt {
                total_distributed: distributed,
                accumulated_fees: accumulated,
                height: current_height,
                timestamp: env.ledger().timestamp(),
            },
        );

        Ok(distributed)
    }

    /// Height at which distribution started, if it has.
    pub fn get_distribution_height(env: Env) -> Option<u32> {
        storage::distribution_height(&env)
    }

    /// Get the sale parameters.
    pub fn get_config(env: Env) -> Result<SaleConfig, SaleError> {
        storage::read_config(&env)
    }

    /// Get the mutable sale state.
    pub fn get_state(env: Env) -> Result<SaleState, SaleError> {
        storage::read_config(&env)?;
        Ok(SaleState {
            total_seats_taken: storage::read_u32(&env, &DataKey::TotalSeatsTaken)?,
            total_users: storage::read_u32(&env, &DataKey::TotalUsers)?,
            distribution_height: storage::distribution_height(&env),
            stx_balance: storage::read_i128(&env, &DataKey::StxBalance)?,
            ft_balance: storage::read_i128(&env, &DataKey::FtBalance)?,
            accumulated_fees: storage::read_i128(&env, &DataKey::AccumulatedFees)?,
            last_airdrop_height: storage::last_airdrop_height(&env),
            accelerated_vesting: storage::read_flag(&env, &DataKey::AcceleratedVesting)?,
            final_airdrop_mode: storage::read_flag(&env, &DataKey::FinalAirdropMode)?,
        })
    }

    pub fn get_seats_owned(env: Env, owner: Address) -> u32 {
        storage::seats_owned(&env, &owner)
    }

    pub fn get_seat_holders(env: Env) -> Result<Vec<SeatHolder>, SaleError> {
        storage::seat_holders(&env)
    }

    pub fn get_claimed(env: Env, owner: Address) -> i128 {
        storage::claimed(&env, &owner)
    }

    /// Amount `owner` could claim right now (0 before distribution).
    pub fn get_claimable_amount(env: Env, owner: Address) -> Result<i128, SaleError> {
        let Some(distribution_height) = storage::distribution_height(&env) else {
            return Ok(0);
        };
        let seats = storage::seats_owned(&env, &owner);
        if seats == 0 {
            return Ok(0);
        }
        Self::claimable_for(&env, &owner, distribution_height, seats)
    }

    // --- Internal helpers ---

    fn validate_config(config: &SaleConfig) -> Result<(), SaleError> {
        let valid = config.price_per_seat > 0
            && config.seat_target > 0
            && config.max_seats_per_user > 0
            && config.max_seats_per_user <= config.seat_target
            && config.min_users <= config.seat_target
            && config.token_allocation >= config.seat_target as i128;
        if !valid {
            return Err(SaleError::InvalidConfig);
        }
        Ok(())
    }

    fn require_market(env: &Env, caller: &Address) -> Result<(), SaleError> {
        let config = storage::read_config(env)?;
        if *caller != config.market {
            return Err(SaleError::Unauthorized);
        }
        caller.require_auth();
        Ok(())
    }

    /// One-shot transition into the vesting phase. Releases the seat
    /// proceeds to the configured receiver.
    fn initialize_distribution(env: &Env, config: &SaleConfig) -> Result<(), SaleError> {
        let height = env.ledger().sequence();
        let per_seat = vesting::per_seat_allocation(config.token_allocation, config.seat_target)?;
        let proceeds = storage::read_i128(env, &DataKey::StxBalance)?;

        let instance = env.storage().instance();
        instance.set(&DataKey::DistributionHeight, &height);
        instance.set(&DataKey::PerSeatAllocation, &per_seat);
        instance.set(&DataKey::FtBalance, &config.token_allocation);
        instance.set(&DataKey::StxBalance, &0i128);

        if proceeds > 0 {
            token::Client::new(env, &config.quote_token).transfer(
                &env.current_contract_address(),
                &config.proceeds_receiver,
                &proceeds,
            );
        }

        log!(env, "distribution initialized at height", height);
        events::distribution_initialized(
            env,
            DistributionReceipt {
                token: config.sale_token.clone(),
                distribution_height: height,
                ft_balance: config.token_allocation,
                per_seat_allocation: per_seat,
                proceeds_receiver: config.proceeds_receiver.clone(),
                proceeds,
            },
        );
        Ok(())
    }

    fn claimable_for(
        env: &Env,
        owner: &Address,
        distribution_height: u32,
        seats: u32,
    ) -> Result<i128, SaleError> {
        let per_seat = storage::read_i128(env, &DataKey::PerSeatAllocation)?;
        let accelerated = storage::read_flag(env, &DataKey::AcceleratedVesting)?;
        let elapsed = env.ledger().sequence().saturating_sub(distribution_height);

        let percent = VestingSchedule::from_flag(accelerated).unlocked_percent(elapsed);
        let vested = vesting::vested_amount(percent, seats, per_seat)?;
        Ok(vesting::claimable(vested, storage::claimed(env, owner)))
    }

    fn claim_for(
        env: &Env,
        token: &Address,
        owner: &Address,
        caller: &Address,
    ) -> Result<i128, SaleError> {
        let config = storage::read_config(env)?;
        if *token != config.sale_token {
            return Err(SaleError::WrongToken);
        }
        let distribution_height =
            storage::distribution_height(env).ok_or(SaleError::DistributionNotStarted)?;

        let seats = storage::seats_owned(env, owner);
        if seats == 0 {
            return Err(SaleError::NotSeatOwner);
        }

        let amount = Self::claimable_for(env, owner, distribution_height, seats)?;
        if amount <= 0 {
            return Err(SaleError::NothingToClaim);
        }

        let total_claimed = storage::claimed(env, owner)
            .checked_add(amount)
            .ok_or(SaleError::Overflow)?;
        let ft_balance = storage::read_i128(env, &DataKey::FtBalance)?
            .checked_sub(amount)
            .filter(|balance| *balance >= 0)
            .ok_or(SaleError::StorageCorrupted)?;

        let instance = env.storage().instance();
        instance.set(&DataKey::Claimed(owner.clone()), &total_claimed);
        instance.set(&DataKey::FtBalance, &ft_balance);
        storage::bump_instance(env);

        let sale_token = token::Client::new(env, &config.sale_token);
        sale_token.transfer(&env.current_contract_address(), owner, &amount);

        events::claimed(
            env,
            ClaimReceipt {
                user: owner.clone(),
                caller: caller.clone(),
                amount_claimed: amount,
                total_claimed,
                ft_balance,
            },
        );

        Ok(amount)
    }
}
