use anchor_lang::prelude::*;

use crate::events::{Contributed, DeadlineExtended, Escaped};
use crate::state::{Contribution, Contributor};
use crate::utils::{transfer_from_vault, transfer_lamports_in};
use crate::{Contribute, Escape};

pub fn contribute(ctx: Context<Contribute>, amount: u64, bucket: u8) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let campaign_key = ctx.accounts.campaign.key();
    let contributor_key = ctx.accounts.contributor.key();

    // fresh PDAs from init_if_needed are all-zero
    let record = &mut ctx.accounts.contributor_record;
    if record.contributor == Pubkey::default() {
        record.set_inner(Contributor::new(
            campaign_key,
            contributor_key,
            ctx.bumps.contributor_record,
        ));
    }
    let contribution = &mut ctx.accounts.contribution;
    if contribution.contributor == Pubkey::default() {
        contribution.set_inner(Contribution::new(
            campaign_key,
            contributor_key,
            bucket,
            ctx.bumps.contribution,
            now,
        ));
    }

    let campaign = &mut ctx.accounts.campaign;
    let receipt = campaign.contribute(now, record, contribution, amount, bucket)?;

    transfer_lamports_in(
        &ctx.accounts.contributor.to_account_info(),
        &ctx.accounts.vault.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
        amount,
    )?;

    emit!(Contributed {
        campaign: campaign_key,
        contributor: contributor_key,
        bucket,
        amount,
        recycled: receipt.recycled,
        total_given: campaign.total_given,
    });
    if receipt.extension > 0 {
        emit!(DeadlineExtended {
            campaign: campaign_key,
            extension_secs: receipt.extension,
            deadline: campaign.deadline(),
            ema_of_contribution: campaign.ema_of_contribution(),
        });
    }

    Ok(())
}

pub fn escape(ctx: Context<Escape>, bucket: u8) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let campaign_key = ctx.accounts.campaign.key();

    let campaign = &mut ctx.accounts.campaign;
    let refund = campaign.escape(
        now,
        &mut ctx.accounts.contributor_record,
        &mut ctx.accounts.contribution,
        bucket,
    )?;
    let vault_bump = campaign.vault_bump;

    transfer_from_vault(
        &ctx.accounts.vault.to_account_info(),
        &ctx.accounts.contributor.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
        &campaign_key,
        vault_bump,
        refund,
    )?;

    emit!(Escaped {
        campaign: campaign_key,
        contributor: ctx.accounts.contributor.key(),
        bucket,
        refund,
    });

    Ok(())
}
