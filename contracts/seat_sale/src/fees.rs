//! Pro-rata fee shares for the airdrop.

use crate::error::SaleError;

/// Floor of `pool * seats / total_seats`.
///
/// The rounding residual stays in the contract.
pub fn pro_rata_share(pool: i128, seats: u32, total_seats: u32) -> Result<i128, SaleError> {
    if total_seats == 0 {
        return Err(SaleError::DistributionNotStarted);
    }
    pool.checked_mul(seats as i128)
        .and_then(|v| v.checked_div(total_seats as i128))
        .ok_or(SaleError::Overflow)
}
