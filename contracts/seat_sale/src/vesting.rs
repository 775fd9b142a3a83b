//! Step-function vesting of the seat allocation.
//!
//! A schedule is an ordered table of `(block_offset, cumulative_percent)`
//! pairs measured from the distribution height. The unlocked share is the
//! percent of the greatest offset not past the elapsed block count; nothing
//! is unlocked before the first offset and everything from the last one on.

use crate::error::SaleError;

/// Percent denominator for the schedule tables.
pub const PERCENT_DENOMINATOR: i128 = 100;

const STANDARD_STEPS: [(u32, u32); 21] = [
    (100, 10),
    (250, 13),
    (400, 16),
    (550, 19),
    (700, 22),
    (850, 26),
    (1000, 30),
    (1200, 34),
    (1400, 38),
    (1600, 42),
    (1750, 46),
    (1900, 50),
    (2000, 55),
    (2100, 60),
    (2500, 65),
    (2900, 70),
    (3300, 76),
    (3600, 82),
    (3900, 88),
    (4100, 94),
    (4200, 100),
];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VestingSchedule {
    Standard,
    /// Selected once the market has graduated.
    ///
    /// The compressed post-graduation table is unconfirmed, so this
    /// schedule currently unlocks on the standard table.
    Accelerated,
}

impl VestingSchedule {
    pub fn from_flag(accelerated: bool) -> Self {
        if accelerated {
            VestingSchedule::Accelerated
        } else {
            VestingSchedule::Standard
        }
    }

    fn steps(self) -> &'static [(u32, u32)] {
        match self {
            VestingSchedule::Standard => &STANDARD_STEPS,
            VestingSchedule::Accelerated => &STANDARD_STEPS,
        }
    }

    /// Cumulative percent unlocked after `elapsed` blocks.
    pub fn unlocked_percent(self, elapsed: u32) -> u32 {
        let steps = self.steps();
        if let Some(&(last_offset, _)) = steps.last() {
            if elapsed >= last_offset {
                return 100;
            }
        }
        steps
            .iter()
            .rev()
            .find(|(offset, _)| *offset <= elapsed)
            .map(|(_, percent)| *percent)
            .unwrap_or(0)
    }
}

/// Full allocation of a single seat.
pub fn per_seat_allocation(pool: i128, seat_target: u32) -> Result<i128, SaleError> {
    pool.checked_div(seat_target as i128)
        .ok_or(SaleError::Overflow)
}

/// Tokens vested for `seats` seats at `percent` unlocked.
///
/// Multiplies before dividing so the result is exact whenever the seat
/// allocation is a multiple of the denominator.
pub fn vested_amount(percent: u32, seats: u32, per_seat: i128) -> Result<i128, SaleError> {
    (seats as i128)
        .checked_mul(per_seat)
        .and_then(|v| v.checked_mul(percent as i128))
        .and_then(|v| v.checked_div(PERCENT_DENOMINATOR))
        .ok_or(SaleError::Overflow)
}

/// Amount still claimable given what was already paid out.
pub fn claimable(vested: i128, already_claimed: i128) -> i128 {
    vested.saturating_sub(already_claimed).max(0)
}

#[cfg(test)]
mod test {
    use super::*;

    const PER_SEAT: i128 = 200_000_000_000_000; // 4e15 pool over 20 seats

    #[test]
    fn test_nothing_unlocked_before_first_offset() {
        assert_eq!(VestingSchedule::Standard.unlocked_percent(0), 0);
        assert_eq!(VestingSchedule::Standard.unlocked_percent(99), 0);
        assert_eq!(VestingSchedule::Standard.unlocked_percent(100), 10);
    }

    #[test]
    fn test_step_lookup_uses_greatest_offset() {
        let schedule = VestingSchedule::Standard;
        assert_eq!(schedule.unlocked_percent(249), 10);
        assert_eq!(schedule.unlocked_percent(250), 13);
        assert_eq!(schedule.unlocked_percent(2099), 55);
        assert_eq!(schedule.unlocked_percent(2499), 60);
        assert_eq!(schedule.unlocked_percent(4199), 94);
    }

    #[test]
    fn test_full_unlock_at_and_after_last_offset() {
        assert_eq!(VestingSchedule::Standard.unlocked_percent(4200), 100);
        assert_eq!(VestingSchedule::Standard.unlocked_percent(u32::MAX), 100);
    }

    #[test]
    fn test_accelerated_flag_selects_schedule() {
        assert_eq!(VestingSchedule::from_flag(false), VestingSchedule::Standard);
        assert_eq!(VestingSchedule::from_flag(true), VestingSchedule::Accelerated);
        assert_eq!(VestingSchedule::Accelerated.unlocked_percent(4200), 100);
    }

    #[test]
    fn test_accelerated_matches_standard_table() {
        for elapsed in [0u32, 99, 100, 250, 1_000, 2_100, 4_199, 4_200] {
            assert_eq!(
                VestingSchedule::Accelerated.unlocked_percent(elapsed),
                VestingSchedule::Standard.unlocked_percent(elapsed)
            );
        }
    }

    #[test]
    fn test_schedule_is_monotonic() {
        let mut previous = 0;
        for elapsed in 0..5_000u32 {
            let percent = VestingSchedule::Standard.unlocked_percent(elapsed);
            assert!(percent >= previous, "decreased at {}", elapsed);
            previous = percent;
        }
        assert_eq!(previous, 100);
    }

    #[test]
    fn test_vested_amount_matches_reference_table() {
        // 7 seats of a 20-seat sale over a 4e15 pool
        let cases: [(u32, i128); 6] = [
            (100, 140_000_000_000_000),
            (250, 182_000_000_000_000),
            (850, 364_000_000_000_000),
            (2000, 770_000_000_000_000),
            (3300, 1_064_000_000_000_000),
            (4200, 1_400_000_000_000_000),
        ];
        for (elapsed, expected) in cases {
            let percent = VestingSchedule::Standard.unlocked_percent(elapsed);
            assert_eq!(vested_amount(percent, 7, PER_SEAT).unwrap(), expected);
        }
    }

    #[test]
    fn test_per_seat_allocation() {
        assert_eq!(per_seat_allocation(4_000_000_000_000_000, 20).unwrap(), PER_SEAT);
        assert_eq!(per_seat_allocation(10, 0), Err(SaleError::Overflow));
    }

    #[test]
    fn test_claimable_never_negative() {
        assert_eq!(claimable(100, 40), 60);
        assert_eq!(claimable(100, 100), 0);
        assert_eq!(claimable(100, 150), 0);
    }

    #[test]
    fn test_vested_amount_overflow() {
        assert_eq!(vested_amount(100, u32::MAX, i128::MAX), Err(SaleError::Overflow));
    }
}
