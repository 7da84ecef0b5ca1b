use anchor_lang::prelude::*;

use crate::events::CampaignInitialized;
use crate::state::{Campaign, CampaignKeys, CampaignParams};
use crate::InitializeCampaign;

pub fn initialize_campaign(
    ctx: Context<InitializeCampaign>,
    campaign_id: u64,
    params: CampaignParams,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let keys = CampaignKeys {
        creator: ctx.accounts.creator.key(),
        campaign_id,
        bump: ctx.bumps.campaign,
        vault: ctx.accounts.vault.key(),
        vault_bump: ctx.bumps.vault,
        distribution_mint: ctx.accounts.distribution_mint.key(),
        distribution_mint_bump: ctx.bumps.distribution_mint,
    };
    let campaign = Campaign::new(keys, &params, now)?;
    let deadline = campaign.deadline();
    ctx.accounts.campaign.set_inner(campaign);

    emit!(CampaignInitialized {
        campaign: ctx.accounts.campaign.key(),
        creator: keys.creator,
        campaign_id,
        distribution_mint: keys.distribution_mint,
        target: params.target,
        cap: params.cap,
        deadline,
    });

    msg!(
        "campaign {} initialized: target={} cap={} deadline={}",
        campaign_id,
        params.target,
        params.cap,
        deadline
    );

    Ok(())
}
