use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MarketError {
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,
    /// Deployment parameters rejected
    InvalidConfig = 3,
    /// Token is not the configured sale token
    WrongToken = 4,
    /// Market is not open for trading
    MarketClosed = 5,
    /// Market is open or has already graduated
    AlreadyOpen = 6,
    /// Trade too small to move any value
    BelowMinimum = 7,
    /// Amount must be positive
    InvalidAmount = 8,
    /// Quote reserve cannot cover the sell
    InsufficientLiquidity = 9,
    /// Seat sale has not reached its target yet
    DistributionNotStarted = 10,
    /// Arithmetic overflow
    Overflow = 11,
    /// Critical storage data missing (contract state corrupted)
    StorageCorrupted = 12,
}
