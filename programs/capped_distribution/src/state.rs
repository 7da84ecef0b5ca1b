use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::constants::*;
use crate::deadline::{ClockParams, DeadlineClock};
use crate::errors::DistributionError;
use crate::settlement::SettlementCursor;

/// Run-time tunables supplied to `initialize_campaign`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CampaignParams {
    pub target: u64,
    pub cap: u64,
    pub duration_secs: i64,
    pub tokens_per_lamport: u64,
    pub clock: ClockParams,
    pub priority_growth_bps: u16,
}

impl CampaignParams {
    pub fn new(target: u64, cap: u64, duration_secs: i64) -> Self {
        Self {
            target,
            cap,
            duration_secs,
            tokens_per_lamport: DEFAULT_TOKENS_PER_LAMPORT,
            clock: ClockParams::default(),
            priority_growth_bps: DEFAULT_PRIORITY_GROWTH_BPS,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require!(self.cap > 0, DistributionError::InvalidParams);
        require!(self.duration_secs > 0, DistributionError::InvalidParams);
        require!(self.tokens_per_lamport > 0, DistributionError::InvalidParams);
        // whole distribution supply must fit a token amount
        require!(
            self.cap.checked_mul(self.tokens_per_lamport).is_some(),
            DistributionError::InvalidParams
        );
        require!(
            self.priority_growth_bps <= MAX_PRIORITY_GROWTH_BPS,
            DistributionError::InvalidParams
        );
        self.clock.validate()
    }
}

/// Addresses and bumps fixed when a campaign is created.
#[derive(Clone, Copy, Debug)]
pub struct CampaignKeys {
    pub creator: Pubkey,
    pub campaign_id: u64,
    pub bump: u8,
    pub vault: Pubkey,
    pub vault_bump: u8,
    pub distribution_mint: Pubkey,
    pub distribution_mint_bump: u8,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CampaignPhase {
    /// Accepting contributions.
    Open,
    /// Deadline passed, target met, nothing settled yet.
    AwaitingSettlement,
    Settling,
    Settled,
    /// Deadline passed with the target unmet, or settlement finished
    /// without accepting anything.
    Failed,
}

#[account]
#[derive(InitSpace)]
pub struct Campaign {
    pub creator: Pubkey,
    pub campaign_id: u64,
    pub bump: u8,

    // System-owned PDA vault (holds lamports, no data)
    pub vault: Pubkey,
    pub vault_bump: u8,

    // Distribution SPL mint, authority = this campaign PDA
    pub distribution_mint: Pubkey,
    pub distribution_mint_bump: u8,

    pub target: u64,
    pub cap: u64,
    pub tokens_per_lamport: u64,
    pub priority_growth_bps: u16,
    pub created_time: i64,

    pub clock: DeadlineClock,

    pub total_given: u64,
    pub total_escaped: u64,
    pub total_accepted: u64,
    pub cap_remainder: u64,

    pub cursor: SettlementCursor,
    pub given: [u64; BUCKET_COUNT],
    pub accepted: [u64; BUCKET_COUNT],

    pub version: u16,
}

impl Campaign {
    pub fn new(keys: CampaignKeys, params: &CampaignParams, now: i64) -> Result<Self> {
        params.validate()?;
        let clock = DeadlineClock::start(now, params.duration_secs, params.clock)?;

        Ok(Self {
            creator: keys.creator,
            campaign_id: keys.campaign_id,
            bump: keys.bump,
            vault: keys.vault,
            vault_bump: keys.vault_bump,
            distribution_mint: keys.distribution_mint,
            distribution_mint_bump: keys.distribution_mint_bump,
            target: params.target,
            cap: params.cap,
            tokens_per_lamport: params.tokens_per_lamport,
            priority_growth_bps: params.priority_growth_bps,
            created_time: now,
            clock,
            total_given: 0,
            total_escaped: 0,
            total_accepted: 0,
            cap_remainder: params.cap,
            cursor: SettlementCursor::Unsettled,
            given: [0; BUCKET_COUNT],
            accepted: [0; BUCKET_COUNT],
            version: INITIAL_VERSION,
        })
    }

    pub fn deadline(&self) -> i64 {
        self.clock.deadline
    }

    pub fn ema_of_contribution(&self) -> u64 {
        self.clock.ema
    }

    pub fn last_settled_bucket(&self) -> i16 {
        self.cursor.last_settled_bucket()
    }

    pub fn wei_given_to_bucket(&self, bucket: u8) -> Result<u64> {
        require!(bucket <= MAX_BUCKET, DistributionError::BucketOutOfRange);
        Ok(self.given[bucket as usize])
    }

    pub fn wei_accepted_from_bucket(&self, bucket: u8) -> Result<u64> {
        require!(bucket <= MAX_BUCKET, DistributionError::BucketOutOfRange);
        Ok(self.accepted[bucket as usize])
    }

    pub fn is_bucket_settled(&self, bucket: u8) -> bool {
        self.cursor.is_settled(bucket)
    }

    pub fn phase(&self, now: i64) -> CampaignPhase {
        match self.cursor {
            SettlementCursor::Exhausted | SettlementCursor::Through { bucket: 0 } => {
                if self.total_accepted == 0 {
                    CampaignPhase::Failed
                } else {
                    CampaignPhase::Settled
                }
            }
            SettlementCursor::Through { .. } => CampaignPhase::Settling,
            SettlementCursor::Unsettled => {
                if self.clock.is_open(now) {
                    CampaignPhase::Open
                } else if self.total_given < self.target {
                    CampaignPhase::Failed
                } else {
                    CampaignPhase::AwaitingSettlement
                }
            }
        }
    }

    pub fn has_succeeded(&self) -> bool {
        self.cursor.has_started() && self.total_accepted > 0
    }

    pub fn has_failed(&self, now: i64) -> bool {
        self.phase(now) == CampaignPhase::Failed
    }
}

/// `contributions(account, bucket)`.
#[account]
#[derive(InitSpace)]
pub struct Contribution {
    pub campaign: Pubkey,
    pub contributor: Pubkey,
    pub bucket: u8,
    pub bump: u8,

    /// Standing amount; zeroed by escape.
    pub amount: u64,
    pub escaped: bool,
    pub claimed: bool,

    pub tokens_minted: u64,
    pub excess_minted: u64,

    pub created_time: i64,
    pub updated_time: i64,
}

impl Contribution {
    pub fn new(campaign: Pubkey, contributor: Pubkey, bucket: u8, bump: u8, now: i64) -> Self {
        Self {
            campaign,
            contributor,
            bucket,
            bump,
            amount: 0,
            escaped: false,
            claimed: false,
            tokens_minted: 0,
            excess_minted: 0,
            created_time: now,
            updated_time: now,
        }
    }
}

/// Per-account bookkeeping across buckets.
#[account]
#[derive(InitSpace)]
pub struct Contributor {
    pub campaign: Pubkey,
    pub contributor: Pubkey,
    pub bump: u8,

    /// Escaped before the deadline and not yet contributed again.
    pub recyclable: u64,
    pub total_contributed: u64,
}

impl Contributor {
    pub fn new(campaign: Pubkey, contributor: Pubkey, bump: u8) -> Self {
        Self {
            campaign,
            contributor,
            bump,
            recyclable: 0,
            total_contributed: 0,
        }
    }
}

/// Token balance and delegation of the account presented to a burn-for-lamports swap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HolderApproval {
    pub balance: u64,
    pub delegate: Option<Pubkey>,
    pub delegated_amount: u64,
}

impl From<&TokenAccount> for HolderApproval {
    fn from(account: &TokenAccount) -> Self {
        Self {
            balance: account.amount,
            delegate: account.delegate.into(),
            delegated_amount: account.delegated_amount,
        }
    }
}

impl HolderApproval {
    pub fn allows(&self, spender: &Pubkey, amount: u64) -> bool {
        self.delegate.as_ref() == Some(spender) && self.delegated_amount >= amount
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VestingState {
    Locked,
    Unlocked,
}

/// Lamports held back until `unlock_time`, redeemable 1:1 for `token_mint`.
#[account]
#[derive(InitSpace)]
pub struct ExcessVesting {
    pub token_mint: Pubkey,
    pub bump: u8,
    pub creator: Pubkey,

    /// Set for the per-bucket instance created by a claim.
    pub campaign: Option<Pubkey>,
    pub bucket: Option<u8>,

    pub unlock_time: i64,

    pub total_deposited: u64,
    pub total_withdrawn: u64,
}

impl ExcessVesting {
    pub fn standalone(
        token_mint: Pubkey,
        creator: Pubkey,
        bump: u8,
        unlock_time: i64,
    ) -> Result<Self> {
        require!(unlock_time > 0, DistributionError::InvalidUnlockTime);
        Ok(Self {
            token_mint,
            bump,
            creator,
            campaign: None,
            bucket: None,
            unlock_time,
            total_deposited: 0,
            total_withdrawn: 0,
        })
    }

    /// Unlocks `bucket` weeks after the campaign deadline.
    pub fn for_bucket(
        campaign_key: Pubkey,
        campaign: &Campaign,
        bucket: u8,
        token_mint: Pubkey,
        bump: u8,
    ) -> Result<Self> {
        require!(bucket <= MAX_BUCKET, DistributionError::BucketOutOfRange);
        let lock = SECONDS_PER_WEEK
            .checked_mul(bucket as i64)
            .ok_or(DistributionError::MathOverflow)?;
        let unlock_time = campaign
            .deadline()
            .checked_add(lock)
            .ok_or(DistributionError::MathOverflow)?;
        Ok(Self {
            token_mint,
            bump,
            creator: campaign_key,
            campaign: Some(campaign_key),
            bucket: Some(bucket),
            unlock_time,
            total_deposited: 0,
            total_withdrawn: 0,
        })
    }

    pub fn state(&self, now: i64) -> VestingState {
        if now >= self.unlock_time {
            VestingState::Unlocked
        } else {
            VestingState::Locked
        }
    }

    /// Lamports owed to `holder` for burning its whole balance.
    /// Zero balance is a successful zero payout.
    pub fn withdrawable(
        &self,
        now: i64,
        holder: &HolderApproval,
        spender: &Pubkey,
        spare_lamports: u64,
    ) -> Result<u64> {
        require!(
            self.state(now) == VestingState::Unlocked,
            DistributionError::VestingLocked
        );
        let amount = holder.balance;
        if amount == 0 {
            return Ok(0);
        }
        require!(
            holder.allows(spender, amount),
            DistributionError::InsufficientAllowance
        );
        require!(
            spare_lamports >= amount,
            DistributionError::InsufficientVestingFunds
        );
        Ok(amount)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrizeAward {
    pub amount: u64,
    pub tokens_burned: u64,
}

/// Winner-take-all side pool of a campaign.
#[account]
#[derive(InitSpace)]
pub struct PrizePot {
    pub campaign: Pubkey,
    pub beneficiary: Pubkey,
    pub bump: u8,

    pub total_funded: u64,
    pub total_paid: u64,
    pub winner: Option<Pubkey>,
    pub cancelled: bool,
}

impl PrizePot {
    pub fn new(campaign_key: Pubkey, campaign: &Campaign, bump: u8) -> Self {
        Self {
            campaign: campaign_key,
            beneficiary: campaign.creator,
            bump,
            total_funded: 0,
            total_paid: 0,
            winner: None,
            cancelled: false,
        }
    }

    /// Refund of the whole `balance` once the campaign has failed.
    pub fn cancel_payout(&self, campaign: &Campaign, now: i64, balance: u64) -> Result<u64> {
        require!(campaign.has_failed(now), DistributionError::CampaignNotFailed);
        Ok(balance)
    }

    /// Whole `balance` to a holder of distribution tokens who approved the pot
    /// for some of them; the approved tokens are burned. A drained pot pays
    /// zero and burns nothing.
    pub fn prize_payout(
        &self,
        campaign: &Campaign,
        holder: &HolderApproval,
        spender: &Pubkey,
        balance: u64,
    ) -> Result<PrizeAward> {
        require!(
            campaign.has_succeeded(),
            DistributionError::CampaignNotSucceeded
        );
        if balance == 0 {
            return Ok(PrizeAward::default());
        }
        require!(holder.balance > 0, DistributionError::NoParticipationTokens);
        let burn = holder.balance.min(holder.delegated_amount);
        require!(
            burn > 0 && holder.allows(spender, burn),
            DistributionError::InsufficientAllowance
        );
        Ok(PrizeAward {
            amount: balance,
            tokens_burned: burn,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::assert_error;

    const T0: i64 = 1_700_000_000;
    const DURATION: i64 = 30 * SECONDS_PER_DAY;

    fn keys() -> CampaignKeys {
        CampaignKeys {
            creator: Pubkey::new_unique(),
            campaign_id: 7,
            bump: 255,
            vault: Pubkey::new_unique(),
            vault_bump: 254,
            distribution_mint: Pubkey::new_unique(),
            distribution_mint_bump: 253,
        }
    }

    fn campaign(target: u64, cap: u64) -> Campaign {
        Campaign::new(keys(), &CampaignParams::new(target, cap, DURATION), T0).unwrap()
    }

    fn approved(balance: u64, spender: Pubkey, delegated_amount: u64) -> HolderApproval {
        HolderApproval {
            balance,
            delegate: Some(spender),
            delegated_amount,
        }
    }

    #[test]
    fn new_campaign_starts_open_and_unsettled() {
        let c = campaign(900, 1_000);
        assert_eq!(c.deadline(), T0 + DURATION);
        assert_eq!(c.cap_remainder, 1_000);
        assert_eq!(c.last_settled_bucket(), NO_BUCKET_SETTLED);
        assert_eq!(c.ema_of_contribution(), 0);
        assert_eq!(c.phase(T0), CampaignPhase::Open);
        assert!(!c.has_succeeded());
        assert!(c.wei_given_to_bucket(100).is_ok());
        assert_error(c.wei_given_to_bucket(101), DistributionError::BucketOutOfRange);
        assert_error(
            c.wei_accepted_from_bucket(101),
            DistributionError::BucketOutOfRange,
        );
    }

    #[test]
    fn invalid_params_are_rejected() {
        let mut p = CampaignParams::new(0, 0, DURATION);
        assert_error(p.validate(), DistributionError::InvalidParams);
        p.cap = 10;
        p.tokens_per_lamport = 0;
        assert_error(p.validate(), DistributionError::InvalidParams);
        p.tokens_per_lamport = u64::MAX;
        assert_error(p.validate(), DistributionError::InvalidParams);
        p.tokens_per_lamport = 1;
        p.duration_secs = 0;
        assert_error(p.validate(), DistributionError::InvalidParams);
        p.duration_secs = 1;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn phase_follows_deadline_target_and_cursor() {
        let mut c = campaign(900, 1_000);
        let after = c.deadline();
        assert_eq!(c.phase(after), CampaignPhase::Failed);
        assert!(c.has_failed(after));

        c.total_given = 900;
        assert_eq!(c.phase(after), CampaignPhase::AwaitingSettlement);
        assert!(!c.has_failed(after));

        c.cursor = SettlementCursor::Through { bucket: 5 };
        c.total_accepted = 10;
        assert_eq!(c.phase(after), CampaignPhase::Settling);
        assert!(c.has_succeeded());

        c.cursor = SettlementCursor::Through { bucket: 0 };
        assert_eq!(c.phase(after), CampaignPhase::Settled);
        c.cursor = SettlementCursor::Exhausted;
        assert_eq!(c.phase(after), CampaignPhase::Settled);
    }

    #[test]
    fn bucket_vesting_unlocks_after_lock_weeks() {
        let c = campaign(0, 1_000);
        let v = ExcessVesting::for_bucket(Pubkey::new_unique(), &c, 100, Pubkey::new_unique(), 1)
            .unwrap();
        assert_eq!(v.unlock_time, c.deadline() + 100 * SECONDS_PER_WEEK);
        assert_eq!(v.bucket, Some(100));
        assert_eq!(v.state(v.unlock_time - 1), VestingState::Locked);
        assert_eq!(v.state(v.unlock_time), VestingState::Unlocked);

        let zero = ExcessVesting::for_bucket(Pubkey::new_unique(), &c, 0, Pubkey::new_unique(), 1)
            .unwrap();
        assert_eq!(zero.unlock_time, c.deadline());
    }

    #[test]
    fn withdraw_gate_checks_lock_allowance_and_funds() {
        let v = ExcessVesting::standalone(Pubkey::new_unique(), Pubkey::new_unique(), 1, T0)
            .unwrap();
        let me = Pubkey::new_unique();
        let holder = approved(500, me, 500);

        assert_error(
            v.withdrawable(T0 - 1, &holder, &me, 1_000),
            DistributionError::VestingLocked,
        );
        assert_eq!(v.withdrawable(T0, &holder, &me, 1_000).unwrap(), 500);

        let short = approved(500, me, 499);
        assert_error(
            v.withdrawable(T0, &short, &me, 1_000),
            DistributionError::InsufficientAllowance,
        );
        let wrong_delegate = approved(500, Pubkey::new_unique(), 500);
        assert_error(
            v.withdrawable(T0, &wrong_delegate, &me, 1_000),
            DistributionError::InsufficientAllowance,
        );
        assert_error(
            v.withdrawable(T0, &holder, &me, 499),
            DistributionError::InsufficientVestingFunds,
        );

        let empty = HolderApproval {
            balance: 0,
            delegate: None,
            delegated_amount: 0,
        };
        assert_eq!(v.withdrawable(T0, &empty, &me, 0).unwrap(), 0);
    }

    #[test]
    fn standalone_vesting_needs_positive_unlock_time() {
        assert_error(
            ExcessVesting::standalone(Pubkey::new_unique(), Pubkey::new_unique(), 1, 0)
                .map(|_| ()),
            DistributionError::InvalidUnlockTime,
        );
    }

    #[test]
    fn prize_pot_refunds_only_failed_campaigns() {
        let mut c = campaign(900, 1_000);
        let pot = PrizePot::new(Pubkey::new_unique(), &c, 1);
        assert_eq!(pot.beneficiary, c.creator);

        assert_error(
            pot.cancel_payout(&c, T0, 5_000),
            DistributionError::CampaignNotFailed,
        );
        let after = c.deadline();
        assert_eq!(pot.cancel_payout(&c, after, 5_000).unwrap(), 5_000);
        assert_eq!(pot.cancel_payout(&c, after, 0).unwrap(), 0);

        c.total_given = 900;
        assert_error(
            pot.cancel_payout(&c, after, 5_000),
            DistributionError::CampaignNotFailed,
        );
    }

    #[test]
    fn prize_goes_to_approved_token_holder_of_successful_campaign() {
        let mut c = campaign(0, 1_000);
        let pot_key = Pubkey::new_unique();
        let pot = PrizePot::new(Pubkey::new_unique(), &c, 1);
        let holder = approved(1_000, pot_key, 1_000);

        assert_error(
            pot.prize_payout(&c, &holder, &pot_key, 5_000),
            DistributionError::CampaignNotSucceeded,
        );

        c.cursor = SettlementCursor::Through { bucket: 0 };
        c.total_accepted = 1_000;
        assert_eq!(
            pot.prize_payout(&c, &holder, &pot_key, 5_000).unwrap(),
            PrizeAward {
                amount: 5_000,
                tokens_burned: 1_000
            }
        );

        // drained pot: nothing is checked or burned
        let nobody = HolderApproval {
            balance: 0,
            delegate: None,
            delegated_amount: 0,
        };
        assert_eq!(
            pot.prize_payout(&c, &nobody, &pot_key, 0).unwrap(),
            PrizeAward::default()
        );

        assert_error(
            pot.prize_payout(&c, &nobody, &pot_key, 5_000),
            DistributionError::NoParticipationTokens,
        );
        let unapproved = approved(1_000, pot_key, 0);
        assert_error(
            pot.prize_payout(&c, &unapproved, &pot_key, 5_000),
            DistributionError::InsufficientAllowance,
        );
        let elsewhere = approved(1_000, Pubkey::new_unique(), 1_000);
        assert_error(
            pot.prize_payout(&c, &elsewhere, &pot_key, 5_000),
            DistributionError::InsufficientAllowance,
        );
    }

    #[test]
    fn partial_approval_wins_the_prize_and_burns_only_approved_tokens() {
        let mut c = campaign(0, 1_000);
        c.cursor = SettlementCursor::Through { bucket: 0 };
        c.total_accepted = 1_000;
        let pot_key = Pubkey::new_unique();
        let pot = PrizePot::new(Pubkey::new_unique(), &c, 1);

        let one = approved(1_000_000, pot_key, 1);
        assert_eq!(
            pot.prize_payout(&c, &one, &pot_key, 5_000).unwrap(),
            PrizeAward {
                amount: 5_000,
                tokens_burned: 1
            }
        );
        // approval above the balance burns the balance
        let over = approved(300, pot_key, 1_000);
        assert_eq!(
            pot.prize_payout(&c, &over, &pot_key, 5_000)
                .unwrap()
                .tokens_burned,
            300
        );
    }

    #[test]
    fn settled_but_empty_campaign_counts_as_failed() {
        let mut c = campaign(0, 1_000);
        c.cursor = SettlementCursor::Exhausted;
        assert!(!c.has_succeeded());
        let after = c.deadline();
        assert_eq!(c.phase(after), CampaignPhase::Failed);
        assert!(c.has_failed(after));

        let pot = PrizePot::new(Pubkey::new_unique(), &c, 1);
        assert_eq!(pot.cancel_payout(&c, after, 5_000).unwrap(), 5_000);

        c.total_accepted = 1;
        assert!(!c.has_failed(after));
        assert!(c.has_succeeded());
    }
}
