use anchor_lang::prelude::*;

pub mod constants;
pub mod contexts;
pub mod deadline;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod settlement;
pub mod state;
pub mod utils;

pub use constants::*;
pub use contexts::*;
pub use deadline::{ClockParams, DeadlineClock};
pub use errors::*;
pub use instructions::*;
pub use settlement::SettlementCursor;
pub use state::*;
pub use utils::*;

#[cfg(not(feature = "no-entrypoint"))]
use solana_security_txt::security_txt;

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    // Required fields
    name: "Capped Distribution",
    project_url: "https://example.com/capped-distribution",
    contacts: "email:security@example.com",
    policy: "https://example.com/capped-distribution/SECURITY.md",

    // Optional fields
    preferred_languages: "en"
}

declare_id!("4PhK4N6yvDqak1UPgaky9AmVdsJo88qvSRg9C8FSdGvX");

#[program]
pub mod capped_distribution {
    use super::*;
    use crate::instructions::{admin, deposit, lifecycle, prize, reward, vesting};

    // ----------------------------
    // Campaign lifecycle
    // ----------------------------
    pub fn initialize_campaign(
        ctx: Context<InitializeCampaign>,
        campaign_id: u64,
        params: CampaignParams,
    ) -> Result<()> {
        admin::initialize_campaign(ctx, campaign_id, params)
    }

    pub fn contribute(ctx: Context<Contribute>, amount: u64, bucket: u8) -> Result<()> {
        deposit::contribute(ctx, amount, bucket)
    }

    pub fn escape(ctx: Context<Escape>, bucket: u8) -> Result<()> {
        deposit::escape(ctx, bucket)
    }

    /// Permissionless: settles the next bucket in descending order.
    pub fn close_next_bucket(ctx: Context<CloseNextBucket>) -> Result<()> {
        lifecycle::close_next_bucket(ctx)
    }

    pub fn claim_tokens(ctx: Context<ClaimTokens>, bucket: u8) -> Result<()> {
        reward::claim_tokens(ctx, bucket)
    }

    // ----------------------------
    // Excess vesting
    // ----------------------------
    pub fn create_vesting(ctx: Context<CreateVesting>, unlock_time: i64) -> Result<()> {
        vesting::create_vesting(ctx, unlock_time)
    }

    pub fn fund_vesting(ctx: Context<FundVesting>, amount: u64) -> Result<()> {
        vesting::fund_vesting(ctx, amount)
    }

    pub fn withdraw_excess(ctx: Context<WithdrawExcess>) -> Result<()> {
        vesting::withdraw_excess(ctx)
    }

    // ----------------------------
    // Prize pot
    // ----------------------------
    pub fn initialize_prize_pot(ctx: Context<InitializePrizePot>) -> Result<()> {
        prize::initialize_prize_pot(ctx)
    }

    pub fn fund_prize_pot(ctx: Context<FundPrizePot>, amount: u64) -> Result<()> {
        prize::fund_prize_pot(ctx, amount)
    }

    pub fn cancel_prize_pot(ctx: Context<CancelPrizePot>) -> Result<()> {
        prize::cancel_prize_pot(ctx)
    }

    pub fn claim_prize(ctx: Context<ClaimPrize>) -> Result<()> {
        prize::claim_prize(ctx)
    }
}
