use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::DistributionError;

/// Per-campaign tunables of the deadline extension rule.
///
/// The average is a per-contribution EMA with no time decay: equal
/// contributions leave it unchanged and earn equal extensions.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct ClockParams {
    /// `k` in `ema = (ema * (k - 1) + amount) / k`.
    pub smoothing_divisor: u64,
    /// Extension granted to a contribution equal to the EMA.
    pub extension_unit_secs: i64,
    pub max_extension_secs: i64,
}

impl Default for ClockParams {
    fn default() -> Self {
        Self {
            smoothing_divisor: DEFAULT_SMOOTHING_DIVISOR,
            extension_unit_secs: DEFAULT_EXTENSION_UNIT_SECS,
            max_extension_secs: DEFAULT_MAX_EXTENSION_SECS,
        }
    }
}

impl ClockParams {
    pub fn validate(&self) -> Result<()> {
        require!(self.smoothing_divisor >= 1, DistributionError::InvalidParams);
        require!(self.extension_unit_secs >= 0, DistributionError::InvalidParams);
        require!(self.max_extension_secs >= 0, DistributionError::InvalidParams);
        Ok(())
    }
}

/// Closing time of a campaign plus the running EMA of fresh contributions.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct DeadlineClock {
    pub deadline: i64,
    /// Zero until the first fresh contribution.
    pub ema: u64,
    pub params: ClockParams,
}

impl DeadlineClock {
    pub fn start(now: i64, duration_secs: i64, params: ClockParams) -> Result<Self> {
        require!(duration_secs > 0, DistributionError::InvalidParams);
        params.validate()?;
        let deadline = now
            .checked_add(duration_secs)
            .ok_or(DistributionError::MathOverflow)?;
        Ok(Self {
            deadline,
            ema: 0,
            params,
        })
    }

    pub fn is_open(&self, now: i64) -> bool {
        now < self.deadline
    }

    pub fn next_ema(&self, amount: u64) -> Result<u64> {
        if self.ema == 0 {
            return Ok(amount);
        }
        let k = self.params.smoothing_divisor as u128;
        let weighted = (self.ema as u128)
            .checked_mul(k - 1)
            .and_then(|v| v.checked_add(amount as u128))
            .ok_or(DistributionError::MathOverflow)?;
        u64::try_from(weighted / k).map_err(|_| error!(DistributionError::MathOverflow))
    }

    /// `min(max_extension, unit * amount / ema)`, measured against the EMA
    /// that already includes `amount`.
    pub fn extension_for(&self, amount: u64, ema: u64) -> Result<i64> {
        if ema == 0 || amount == 0 {
            return Ok(0);
        }
        let unit = self.params.extension_unit_secs.max(0) as u128;
        let raw = unit
            .checked_mul(amount as u128)
            .ok_or(DistributionError::MathOverflow)?
            / ema as u128;
        let cap = self.params.max_extension_secs.max(0) as u128;
        // bounded by max_extension_secs, which is an i64
        Ok(raw.min(cap) as i64)
    }

    /// Records a fresh (non-recycled) contribution and pushes the deadline.
    /// Returns the extension applied.
    pub fn observe(&mut self, fresh_amount: u64) -> Result<i64> {
        if fresh_amount == 0 {
            return Ok(0);
        }
        let ema = self.next_ema(fresh_amount)?;
        let extension = self.extension_for(fresh_amount, ema)?;

        self.ema = ema;
        self.deadline = self
            .deadline
            .checked_add(extension)
            .ok_or(DistributionError::MathOverflow)?;
        Ok(extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000;

    fn clock() -> DeadlineClock {
        DeadlineClock::start(T0, 30 * SECONDS_PER_DAY, ClockParams::default()).unwrap()
    }

    #[test]
    fn start_sets_deadline_and_rejects_bad_params() {
        let c = clock();
        assert_eq!(c.deadline, T0 + 30 * SECONDS_PER_DAY);
        assert_eq!(c.ema, 0);
        assert!(c.is_open(c.deadline - 1));
        assert!(!c.is_open(c.deadline));

        assert!(DeadlineClock::start(T0, 0, ClockParams::default()).is_err());
        let bad = ClockParams {
            smoothing_divisor: 0,
            ..ClockParams::default()
        };
        assert!(DeadlineClock::start(T0, 10, bad).is_err());
        let negative = ClockParams {
            max_extension_secs: -1,
            ..ClockParams::default()
        };
        assert!(DeadlineClock::start(T0, 10, negative).is_err());
    }

    #[test]
    fn first_observation_seeds_ema_and_grants_one_unit() {
        let mut c = clock();
        let before = c.deadline;
        let ext = c.observe(1_000_000).unwrap();
        assert_eq!(c.ema, 1_000_000);
        assert_eq!(ext, SECONDS_PER_DAY);
        assert_eq!(c.deadline, before + SECONDS_PER_DAY);
    }

    #[test]
    fn equal_contributions_keep_ema_and_extension() {
        let mut c = clock();
        for _ in 0..3 {
            assert_eq!(c.observe(1_000_000).unwrap(), SECONDS_PER_DAY);
            assert_eq!(c.ema, 1_000_000);
        }
        assert_eq!(c.deadline, T0 + 33 * SECONDS_PER_DAY);
    }

    #[test]
    fn ema_moves_by_one_kth_of_the_gap() {
        let mut c = clock();
        c.observe(800).unwrap();
        c.observe(1_600).unwrap();
        // (800 * 7 + 1600) / 8
        assert_eq!(c.ema, 900);
        c.observe(100).unwrap();
        // (900 * 7 + 100) / 8
        assert_eq!(c.ema, 800);
    }

    #[test]
    fn small_contribution_gets_proportionally_small_extension() {
        let mut c = clock();
        c.observe(1_000_000).unwrap();
        let before = c.deadline;
        let ext = c.observe(10_000).unwrap();
        // ema = (7_000_000 + 10_000) / 8 = 876_250
        assert_eq!(c.ema, 876_250);
        assert_eq!(ext, SECONDS_PER_DAY * 10_000 / 876_250);
        assert_eq!(c.deadline, before + ext);
    }

    #[test]
    fn whale_extension_is_clamped() {
        let mut c = clock();
        c.observe(1_000_000).unwrap();
        let ext = c.observe(100_000_000).unwrap();
        assert_eq!(ext, DEFAULT_MAX_EXTENSION_SECS);
    }

    #[test]
    fn zero_unit_never_moves_the_deadline() {
        let params = ClockParams {
            extension_unit_secs: 0,
            ..ClockParams::default()
        };
        let mut c = DeadlineClock::start(T0, 100, params).unwrap();
        assert_eq!(c.observe(5).unwrap(), 0);
        assert_eq!(c.deadline, T0 + 100);
        assert_eq!(c.ema, 5);
    }

    #[test]
    fn divisor_one_tracks_last_amount() {
        let params = ClockParams {
            smoothing_divisor: 1,
            ..ClockParams::default()
        };
        let mut c = DeadlineClock::start(T0, 100, params).unwrap();
        c.observe(10).unwrap();
        c.observe(70).unwrap();
        assert_eq!(c.ema, 70);
    }

    #[test]
    fn deadline_never_decreases() {
        let mut c = clock();
        let mut last = c.deadline;
        for amount in [1u64, 5_000, 3, 9_999_999, 42, 1, 1, 700_000] {
            c.observe(amount).unwrap();
            assert!(c.deadline >= last);
            last = c.deadline;
        }
        assert_eq!(c.observe(0).unwrap(), 0);
        assert_eq!(c.deadline, last);
    }
}
