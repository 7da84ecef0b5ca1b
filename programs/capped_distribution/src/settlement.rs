use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::DistributionError;
use crate::utils::{mul_div, to_u64};

/// Progress of the descending bucket settlement.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum SettlementCursor {
    Unsettled,
    /// Every bucket `>= bucket` has settled.
    Through { bucket: u8 },
    /// No standing funds left below the last settled bucket.
    Exhausted,
}

impl SettlementCursor {
    /// 101 while unsettled, `b` once buckets `>= b` settled, -1 when exhausted.
    pub fn last_settled_bucket(&self) -> i16 {
        match self {
            Self::Unsettled => NO_BUCKET_SETTLED,
            Self::Through { bucket } => *bucket as i16,
            Self::Exhausted => ALL_BUCKETS_SETTLED,
        }
    }

    pub fn has_started(&self) -> bool {
        !matches!(self, Self::Unsettled)
    }

    pub fn is_settled(&self, bucket: u8) -> bool {
        match self {
            Self::Unsettled => false,
            Self::Through { bucket: through } => bucket >= *through,
            Self::Exhausted => true,
        }
    }

    /// Highest bucket the next settlement may look at, if any.
    pub fn scan_start(&self) -> Option<u8> {
        match self {
            Self::Unsettled => Some(MAX_BUCKET),
            Self::Through { bucket } => bucket.checked_sub(1),
            Self::Exhausted => None,
        }
    }
}

/// `w[0] = PRIORITY_WEIGHT_SCALE`, `w[b + 1] = w[b] * (10_000 + growth) / 10_000`.
pub fn priority_weights(growth_bps: u16) -> Result<[u128; BUCKET_COUNT]> {
    require!(
        growth_bps <= MAX_PRIORITY_GROWTH_BPS,
        DistributionError::InvalidParams
    );
    let factor = BPS_DENOMINATOR + growth_bps as u128;
    let mut weights = [0u128; BUCKET_COUNT];
    weights[0] = PRIORITY_WEIGHT_SCALE;
    for b in 1..BUCKET_COUNT {
        weights[b] = weights[b - 1]
            .checked_mul(factor)
            .ok_or(DistributionError::MathOverflow)?
            / BPS_DENOMINATOR;
    }
    Ok(weights)
}

/// First bucket at or below `from` with standing funds.
pub fn next_outstanding_bucket(given: &[u64; BUCKET_COUNT], from: u8) -> Option<u8> {
    (0..=from.min(MAX_BUCKET))
        .rev()
        .find(|&b| given[b as usize] > 0)
}

/// Lamports admitted from `bucket` out of the `remaining` cap.
///
/// The bucket gets its weighted share of the remaining cap against every
/// bucket still waiting at or below it, capped at what it holds. The last
/// non-empty bucket therefore takes `min(given, remaining)`.
pub fn admission(
    given: &[u64; BUCKET_COUNT],
    weights: &[u128; BUCKET_COUNT],
    bucket: u8,
    remaining: u64,
) -> Result<u64> {
    let b = bucket as usize;
    require!(b < BUCKET_COUNT, DistributionError::BucketOutOfRange);

    let standing = given[b];
    if standing == 0 || remaining == 0 {
        return Ok(0);
    }

    let mut pool: u128 = 0;
    for c in 0..=b {
        let weighted = (given[c] as u128)
            .checked_mul(weights[c])
            .ok_or(DistributionError::MathOverflow)?;
        pool = pool
            .checked_add(weighted)
            .ok_or(DistributionError::MathOverflow)?;
    }
    let own = (standing as u128)
        .checked_mul(weights[b])
        .ok_or(DistributionError::MathOverflow)?;

    let share = to_u64(mul_div(remaining, own, pool)?)?;
    Ok(share.min(standing))
}
