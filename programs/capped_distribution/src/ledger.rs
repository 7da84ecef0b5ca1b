use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::DistributionError;
use crate::settlement::{admission, next_outstanding_bucket, priority_weights, SettlementCursor};
use crate::state::{Campaign, Contribution, Contributor};
use crate::utils::{ceil_div, mul_div, to_u64};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContributionReceipt {
    /// Part that moved the EMA and the deadline.
    pub fresh: u64,
    /// Part re-contributed from an earlier escape.
    pub recycled: u64,
    pub extension: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettlementOutcome {
    Settled {
        bucket: u8,
        admitted: u64,
        /// Empty buckets passed over by this call.
        skipped: u8,
    },
    Exhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimOutcome {
    pub tokens: u64,
    /// Lamports moved to the bucket's vesting, redeemable by as many excess tokens.
    pub excess: u64,
}

impl Campaign {
    pub fn contribute(
        &mut self,
        now: i64,
        contributor: &mut Contributor,
        contribution: &mut Contribution,
        amount: u64,
        bucket: u8,
    ) -> Result<ContributionReceipt> {
        require!(amount > 0, DistributionError::ZeroAmount);
        require!(bucket <= MAX_BUCKET, DistributionError::BucketOutOfRange);
        require!(self.clock.is_open(now), DistributionError::ContributionsClosed);
        require!(
            contribution.bucket == bucket,
            DistributionError::ContributionMismatch
        );
        // an escaped pair is closed for good
        require!(!contribution.escaped, DistributionError::AlreadyEscaped);

        let b = bucket as usize;
        let recycled = amount.min(contributor.recyclable);
        let fresh = amount - recycled;

        let given = self.given[b]
            .checked_add(amount)
            .ok_or(DistributionError::MathOverflow)?;
        let total_given = self
            .total_given
            .checked_add(amount)
            .ok_or(DistributionError::MathOverflow)?;
        let standing = contribution
            .amount
            .checked_add(amount)
            .ok_or(DistributionError::MathOverflow)?;
        let contributed = contributor
            .total_contributed
            .checked_add(amount)
            .ok_or(DistributionError::MathOverflow)?;

        let mut clock = self.clock;
        let extension = clock.observe(fresh)?;

        self.clock = clock;
        self.given[b] = given;
        self.total_given = total_given;

        contributor.recyclable -= recycled;
        contributor.total_contributed = contributed;
        contribution.amount = standing;
        contribution.updated_time = now;

        Ok(ContributionReceipt {
            fresh,
            recycled,
            extension,
        })
    }

    /// Withdraws the standing contribution of an unsettled bucket.
    /// Returns the refund owed from the vault.
    pub fn escape(
        &mut self,
        now: i64,
        contributor: &mut Contributor,
        contribution: &mut Contribution,
        bucket: u8,
    ) -> Result<u64> {
        require!(bucket <= MAX_BUCKET, DistributionError::BucketOutOfRange);
        require!(
            contribution.bucket == bucket,
            DistributionError::ContributionMismatch
        );
        require!(!contribution.escaped, DistributionError::AlreadyEscaped);
        require!(
            !self.cursor.is_settled(bucket),
            DistributionError::BucketAlreadySettled
        );
        let refund = contribution.amount;
        require!(refund > 0, DistributionError::NothingToEscape);

        let b = bucket as usize;
        let given = self.given[b]
            .checked_sub(refund)
            .ok_or(DistributionError::MathOverflow)?;
        let total_given = self
            .total_given
            .checked_sub(refund)
            .ok_or(DistributionError::MathOverflow)?;
        let total_escaped = self
            .total_escaped
            .checked_add(refund)
            .ok_or(DistributionError::MathOverflow)?;

        self.given[b] = given;
        self.total_given = total_given;
        self.total_escaped = total_escaped;

        contribution.amount = 0;
        contribution.escaped = true;
        contribution.updated_time = now;

        if self.clock.is_open(now) {
            contributor.recyclable = contributor
                .recyclable
                .checked_add(refund)
                .ok_or(DistributionError::MathOverflow)?;
        }

        Ok(refund)
    }

    /// Settles the highest bucket below the cursor that still holds funds.
    pub fn close_next_bucket(&mut self, now: i64) -> Result<SettlementOutcome> {
        require!(
            !self.clock.is_open(now),
            DistributionError::DeadlineNotReached
        );
        let start = self
            .cursor
            .scan_start()
            .ok_or(DistributionError::NothingToSettle)?;
        if !self.cursor.has_started() {
            require!(
                self.total_given >= self.target,
                DistributionError::TargetNotReached
            );
        }

        let Some(bucket) = next_outstanding_bucket(&self.given, start) else {
            self.cursor = SettlementCursor::Exhausted;
            return Ok(SettlementOutcome::Exhausted);
        };

        let weights = priority_weights(self.priority_growth_bps)?;
        let remaining = self
            .cap
            .checked_sub(self.total_accepted)
            .ok_or(DistributionError::MathOverflow)?;
        let admitted = admission(&self.given, &weights, bucket, remaining)?;
        let total_accepted = self
            .total_accepted
            .checked_add(admitted)
            .ok_or(DistributionError::MathOverflow)?;
        require!(total_accepted <= self.cap, DistributionError::MathOverflow);

        self.accepted[bucket as usize] = admitted;
        self.total_accepted = total_accepted;
        self.cap_remainder = self.cap - total_accepted;
        self.cursor = SettlementCursor::Through { bucket };

        Ok(SettlementOutcome::Settled {
            bucket,
            admitted,
            skipped: start - bucket,
        })
    }

    /// Splits a settled contribution into distribution tokens and excess.
    /// Tokens round down; the accepted share rounds up, so excess rounds down.
    pub fn claim(&self, contribution: &mut Contribution, bucket: u8) -> Result<ClaimOutcome> {
        require!(bucket <= MAX_BUCKET, DistributionError::BucketOutOfRange);
        require!(
            contribution.bucket == bucket,
            DistributionError::ContributionMismatch
        );
        require!(
            self.cursor.is_settled(bucket),
            DistributionError::BucketNotSettled
        );
        require!(!contribution.claimed, DistributionError::AlreadyClaimed);
        let amount = contribution.amount;
        require!(amount > 0, DistributionError::NothingToClaim);

        let b = bucket as usize;
        let given = self.given[b] as u128;
        let accepted = self.accepted[b] as u128;

        let minted_per_given = accepted
            .checked_mul(self.tokens_per_lamport as u128)
            .ok_or(DistributionError::MathOverflow)?;
        let tokens = to_u64(mul_div(amount, minted_per_given, given)?)?;

        let accepted_share = ceil_div(accepted * amount as u128, given)?;
        let excess = amount
            .checked_sub(to_u64(accepted_share)?)
            .ok_or(DistributionError::MathOverflow)?;

        contribution.claimed = true;
        contribution.tokens_minted = tokens;
        contribution.excess_minted = excess;

        Ok(ClaimOutcome { tokens, excess })
    }
}
