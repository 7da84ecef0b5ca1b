use anchor_lang::prelude::*;
use anchor_spl::token::{self, MintTo};

use crate::errors::DistributionError;
use crate::events::{TokensClaimed, VestingCreated};
use crate::state::ExcessVesting;
use crate::utils::transfer_from_vault;
use crate::ClaimTokens;

/// Anyone may claim on behalf of `player`; tokens always land in the player's ATAs.
pub fn claim_tokens(ctx: Context<ClaimTokens>, bucket: u8) -> Result<()> {
    let campaign_key = ctx.accounts.campaign.key();
    let player_key = ctx.accounts.player.key();

    // first claim of the bucket sets up its vesting
    let vesting = &mut ctx.accounts.excess_vesting;
    if vesting.token_mint == Pubkey::default() {
        vesting.set_inner(ExcessVesting::for_bucket(
            campaign_key,
            &ctx.accounts.campaign,
            bucket,
            ctx.accounts.excess_mint.key(),
            ctx.bumps.excess_vesting,
        )?);

        emit!(VestingCreated {
            vesting: vesting.key(),
            token_mint: vesting.token_mint,
            campaign: vesting.campaign,
            bucket: vesting.bucket,
            unlock_time: vesting.unlock_time,
        });
    }

    let campaign = &ctx.accounts.campaign;
    let outcome = campaign.claim(&mut ctx.accounts.contribution, bucket)?;

    vesting.total_deposited = vesting
        .total_deposited
        .checked_add(outcome.excess)
        .ok_or(DistributionError::MathOverflow)?;

    let creator = campaign.creator;
    let id_le = campaign.campaign_id.to_le_bytes();
    let signer_seeds: &[&[&[u8]]] = &[&[
        crate::CAMPAIGN_SEED,
        creator.as_ref(),
        &id_le,
        &[campaign.bump],
    ]];

    if outcome.tokens > 0 {
        token::mint_to(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                MintTo {
                    mint: ctx.accounts.distribution_mint.to_account_info(),
                    to: ctx.accounts.player_distribution_ata.to_account_info(),
                    authority: campaign.to_account_info(),
                },
                signer_seeds,
            ),
            outcome.tokens,
        )?;
    }

    if outcome.excess > 0 {
        transfer_from_vault(
            &ctx.accounts.vault.to_account_info(),
            &vesting.to_account_info(),
            &ctx.accounts.system_program.to_account_info(),
            &campaign_key,
            campaign.vault_bump,
            outcome.excess,
        )?;

        token::mint_to(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                MintTo {
                    mint: ctx.accounts.excess_mint.to_account_info(),
                    to: ctx.accounts.player_excess_ata.to_account_info(),
                    authority: campaign.to_account_info(),
                },
                signer_seeds,
            ),
            outcome.excess,
        )?;
    }

    emit!(TokensClaimed {
        campaign: campaign_key,
        player: player_key,
        bucket,
        tokens: outcome.tokens,
        excess: outcome.excess,
    });

    Ok(())
}
