use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn};

use crate::errors::DistributionError;
use crate::events::{PrizeClaimed, PrizePotCancelled, PrizePotFunded, PrizePotInitialized};
use crate::state::{HolderApproval, PrizePot};
use crate::utils::{pay_from_program_account, spare_lamports, transfer_lamports_in};
use crate::{CancelPrizePot, ClaimPrize, FundPrizePot, InitializePrizePot};

const PRIZE_POT_SPACE: usize = 8 + PrizePot::INIT_SPACE;

pub fn initialize_prize_pot(ctx: Context<InitializePrizePot>) -> Result<()> {
    let campaign_key = ctx.accounts.campaign.key();
    let pot = PrizePot::new(campaign_key, &ctx.accounts.campaign, ctx.bumps.prize_pot);
    let beneficiary = pot.beneficiary;
    ctx.accounts.prize_pot.set_inner(pot);

    emit!(PrizePotInitialized {
        campaign: campaign_key,
        prize_pot: ctx.accounts.prize_pot.key(),
        beneficiary,
    });

    Ok(())
}

pub fn fund_prize_pot(ctx: Context<FundPrizePot>, amount: u64) -> Result<()> {
    require!(amount > 0, DistributionError::ZeroAmount);

    let pot = &mut ctx.accounts.prize_pot;
    pot.total_funded = pot
        .total_funded
        .checked_add(amount)
        .ok_or(DistributionError::MathOverflow)?;

    transfer_lamports_in(
        &ctx.accounts.funder.to_account_info(),
        &pot.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
        amount,
    )?;

    emit!(PrizePotFunded {
        prize_pot: pot.key(),
        funder: ctx.accounts.funder.key(),
        amount,
    });

    Ok(())
}

/// Failed campaign: the whole pot goes back to the campaign creator.
pub fn cancel_prize_pot(ctx: Context<CancelPrizePot>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let pot_info = ctx.accounts.prize_pot.to_account_info();
    let balance = spare_lamports(&pot_info, PRIZE_POT_SPACE)?;

    let pot = &mut ctx.accounts.prize_pot;
    let amount = pot.cancel_payout(&ctx.accounts.campaign, now, balance)?;

    pot.total_paid = pot
        .total_paid
        .checked_add(amount)
        .ok_or(DistributionError::MathOverflow)?;
    pot.cancelled = true;

    if amount == 0 {
        msg!("prize pot empty; nothing refunded");
    }
    pay_from_program_account(
        &pot_info,
        &ctx.accounts.beneficiary.to_account_info(),
        amount,
    )?;

    emit!(PrizePotCancelled {
        prize_pot: pot_info.key(),
        beneficiary: ctx.accounts.beneficiary.key(),
        amount,
    });

    Ok(())
}

/// Successful campaign: a distribution-token holder burns the tokens it
/// approved for the whole pot.
pub fn claim_prize(ctx: Context<ClaimPrize>) -> Result<()> {
    let pot_key = ctx.accounts.prize_pot.key();
    let pot_info = ctx.accounts.prize_pot.to_account_info();
    let balance = spare_lamports(&pot_info, PRIZE_POT_SPACE)?;
    let holder = HolderApproval::from(&**ctx.accounts.winner_token_account);

    let pot = &mut ctx.accounts.prize_pot;
    let award = pot.prize_payout(&ctx.accounts.campaign, &holder, &pot_key, balance)?;
    let amount = award.amount;
    if amount == 0 {
        msg!("prize pot empty; nothing to claim");
        return Ok(());
    }

    let winner = ctx.accounts.winner.key();
    pot.total_paid = pot
        .total_paid
        .checked_add(amount)
        .ok_or(DistributionError::MathOverflow)?;
    pot.winner = Some(winner);

    let campaign_key = pot.campaign;
    let signer_seeds: &[&[&[u8]]] = &[&[
        crate::PRIZE_POT_SEED,
        campaign_key.as_ref(),
        &[pot.bump],
    ]];

    token::burn(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Burn {
                mint: ctx.accounts.distribution_mint.to_account_info(),
                from: ctx.accounts.winner_token_account.to_account_info(),
                authority: pot_info.clone(),
            },
            signer_seeds,
        ),
        award.tokens_burned,
    )?;

    pay_from_program_account(&pot_info, &ctx.accounts.winner.to_account_info(), amount)?;

    emit!(PrizeClaimed {
        prize_pot: pot_key,
        winner,
        tokens_burned: award.tokens_burned,
        amount,
    });

    Ok(())
}
