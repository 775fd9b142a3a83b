use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum SaleError {
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,
    /// Sale parameters are inconsistent
    InvalidConfig = 3,
    /// Seat sale already closed (distribution started)
    SaleClosed = 4,
    /// No seats can be granted (per-user cap reached or sold out)
    InvalidSeatCount = 5,
    /// Account owns no seats
    NotSeatOwner = 6,
    /// Token does not match the sale token
    WrongToken = 7,
    /// Nothing vested beyond what was already claimed
    NothingToClaim = 8,
    /// Distribution has not been initialized yet
    DistributionNotStarted = 9,
    /// No accumulated fees to airdrop
    NoFees = 10,
    /// Airdrop cooldown has not elapsed
    CooldownActive = 11,
    /// Only the bonding market can perform this action
    Unauthorized = 12,
    /// Amount must be positive
    InvalidAmount = 13,
    /// Arithmetic overflow
    Overflow = 14,
    /// Critical storage data missing (contract state corrupted)
    StorageCorrupted = 15,
}
