// programs/capped_distribution/src/contexts.rs

use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{DISTRIBUTION_DECIMALS, EXCESS_DECIMALS};
use crate::errors::DistributionError;
use crate::state::{Campaign, Contribution, Contributor, ExcessVesting, PrizePot};

// ----------------------------
// Campaign
// ----------------------------

#[derive(Accounts)]
#[instruction(campaign_id: u64)]
pub struct InitializeCampaign<'info> {
    #[account(
        init,
        payer = creator,
        space = 8 + Campaign::INIT_SPACE,
        seeds = [crate::CAMPAIGN_SEED, creator.key().as_ref(), campaign_id.to_le_bytes().as_ref()],
        bump
    )]
    pub campaign: Box<Account<'info, Campaign>>,

    /// CHECK: system-owned vault PDA, holds lamports, no data
    #[account(
        init,
        payer = creator,
        space = 0,
        owner = anchor_lang::solana_program::system_program::ID,
        seeds = [crate::VAULT_SEED, campaign.key().as_ref()],
        bump
    )]
    pub vault: UncheckedAccount<'info>,

    #[account(
        init,
        payer = creator,
        mint::decimals = DISTRIBUTION_DECIMALS,
        mint::authority = campaign,
        seeds = [crate::DISTRIBUTION_MINT_SEED, campaign.key().as_ref()],
        bump
    )]
    pub distribution_mint: Box<Account<'info, Mint>>,

    #[account(mut)]
    pub creator: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
#[instruction(amount: u64, bucket: u8)]
pub struct Contribute<'info> {
    #[account(
        mut,
        seeds = [crate::CAMPAIGN_SEED, campaign.creator.as_ref(), campaign.campaign_id.to_le_bytes().as_ref()],
        bump = campaign.bump
    )]
    pub campaign: Box<Account<'info, Campaign>>,

    /// CHECK: System-owned PDA used only as a lamport vault. Address is enforced by seeds/bump.
    #[account(
        mut,
        seeds = [crate::VAULT_SEED, campaign.key().as_ref()],
        bump = campaign.vault_bump
    )]
    pub vault: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = contributor,
        space = 8 + Contributor::INIT_SPACE,
        seeds = [crate::CONTRIBUTOR_SEED, campaign.key().as_ref(), contributor.key().as_ref()],
        bump
    )]
    pub contributor_record: Account<'info, Contributor>,

    #[account(
        init_if_needed,
        payer = contributor,
        space = 8 + Contribution::INIT_SPACE,
        seeds = [
            crate::CONTRIBUTION_SEED,
            campaign.key().as_ref(),
            contributor.key().as_ref(),
            bucket.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub contribution: Account<'info, Contribution>,

    #[account(mut)]
    pub contributor: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(bucket: u8)]
pub struct Escape<'info> {
    #[account(
        mut,
        seeds = [crate::CAMPAIGN_SEED, campaign.creator.as_ref(), campaign.campaign_id.to_le_bytes().as_ref()],
        bump = campaign.bump
    )]
    pub campaign: Box<Account<'info, Campaign>>,

    /// CHECK: System-owned PDA used only as a lamport vault. Address is enforced by seeds/bump.
    #[account(
        mut,
        seeds = [crate::VAULT_SEED, campaign.key().as_ref()],
        bump = campaign.vault_bump
    )]
    pub vault: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [crate::CONTRIBUTOR_SEED, campaign.key().as_ref(), contributor.key().as_ref()],
        bump = contributor_record.bump
    )]
    pub contributor_record: Account<'info, Contributor>,

    #[account(
        mut,
        seeds = [
            crate::CONTRIBUTION_SEED,
            campaign.key().as_ref(),
            contributor.key().as_ref(),
            bucket.to_le_bytes().as_ref()
        ],
        bump = contribution.bump
    )]
    pub contribution: Account<'info, Contribution>,

    #[account(mut)]
    pub contributor: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Permissionless crank; admitted lamports go to the campaign creator.
#[derive(Accounts)]
pub struct CloseNextBucket<'info> {
    #[account(
        mut,
        seeds = [crate::CAMPAIGN_SEED, campaign.creator.as_ref(), campaign.campaign_id.to_le_bytes().as_ref()],
        bump = campaign.bump
    )]
    pub campaign: Box<Account<'info, Campaign>>,

    /// CHECK: System-owned PDA used only as a lamport vault. Address is enforced by seeds/bump.
    #[account(
        mut,
        seeds = [crate::VAULT_SEED, campaign.key().as_ref()],
        bump = campaign.vault_bump
    )]
    pub vault: UncheckedAccount<'info>,

    #[account(mut, address = campaign.creator @ DistributionError::Unauthorized)]
    pub beneficiary: SystemAccount<'info>,

    pub cranker: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(bucket: u8)]
pub struct ClaimTokens<'info> {
    #[account(
        seeds = [crate::CAMPAIGN_SEED, campaign.creator.as_ref(), campaign.campaign_id.to_le_bytes().as_ref()],
        bump = campaign.bump
    )]
    pub campaign: Box<Account<'info, Campaign>>,

    /// CHECK: System-owned PDA used only as a lamport vault. Address is enforced by seeds/bump.
    #[account(
        mut,
        seeds = [crate::VAULT_SEED, campaign.key().as_ref()],
        bump = campaign.vault_bump
    )]
    pub vault: UncheckedAccount<'info>,

    /// CHECK: owner of the contribution being claimed; only receives tokens
    pub player: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [
            crate::CONTRIBUTION_SEED,
            campaign.key().as_ref(),
            player.key().as_ref(),
            bucket.to_le_bytes().as_ref()
        ],
        bump = contribution.bump
    )]
    pub contribution: Box<Account<'info, Contribution>>,

    #[account(mut, address = campaign.distribution_mint @ DistributionError::MintMismatch)]
    pub distribution_mint: Box<Account<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = payer,
        associated_token::mint = distribution_mint,
        associated_token::authority = player
    )]
    pub player_distribution_ata: Box<Account<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = payer,
        mint::decimals = EXCESS_DECIMALS,
        mint::authority = campaign,
        seeds = [crate::EXCESS_MINT_SEED, campaign.key().as_ref(), bucket.to_le_bytes().as_ref()],
        bump
    )]
    pub excess_mint: Box<Account<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + ExcessVesting::INIT_SPACE,
        seeds = [crate::EXCESS_VESTING_SEED, excess_mint.key().as_ref()],
        bump
    )]
    pub excess_vesting: Box<Account<'info, ExcessVesting>>,

    #[account(
        init_if_needed,
        payer = payer,
        associated_token::mint = excess_mint,
        associated_token::authority = player
    )]
    pub player_excess_ata: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

// ----------------------------
// Excess vesting
// ----------------------------

/// Standalone vesting for a mint the signer controls.
#[derive(Accounts)]
pub struct CreateVesting<'info> {
    #[account(
        constraint = token_mint.mint_authority == COption::Some(creator.key())
            @ DistributionError::Unauthorized
    )]
    pub token_mint: Box<Account<'info, Mint>>,

    #[account(
        init,
        payer = creator,
        space = 8 + ExcessVesting::INIT_SPACE,
        seeds = [crate::EXCESS_VESTING_SEED, token_mint.key().as_ref()],
        bump
    )]
    pub excess_vesting: Box<Account<'info, ExcessVesting>>,

    #[account(mut)]
    pub creator: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct FundVesting<'info> {
    #[account(
        mut,
        seeds = [crate::EXCESS_VESTING_SEED, excess_vesting.token_mint.as_ref()],
        bump = excess_vesting.bump
    )]
    pub excess_vesting: Box<Account<'info, ExcessVesting>>,

    #[account(mut)]
    pub funder: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct WithdrawExcess<'info> {
    #[account(
        mut,
        seeds = [crate::EXCESS_VESTING_SEED, token_mint.key().as_ref()],
        bump = excess_vesting.bump
    )]
    pub excess_vesting: Box<Account<'info, ExcessVesting>>,

    #[account(mut, address = excess_vesting.token_mint @ DistributionError::MintMismatch)]
    pub token_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        token::mint = token_mint,
        token::authority = holder
    )]
    pub holder_token_account: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub holder: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

// ----------------------------
// Prize pot
// ----------------------------

#[derive(Accounts)]
pub struct InitializePrizePot<'info> {
    #[account(
        seeds = [crate::CAMPAIGN_SEED, campaign.creator.as_ref(), campaign.campaign_id.to_le_bytes().as_ref()],
        bump = campaign.bump
    )]
    pub campaign: Box<Account<'info, Campaign>>,

    #[account(
        init,
        payer = payer,
        space = 8 + PrizePot::INIT_SPACE,
        seeds = [crate::PRIZE_POT_SEED, campaign.key().as_ref()],
        bump
    )]
    pub prize_pot: Account<'info, PrizePot>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct FundPrizePot<'info> {
    #[account(
        mut,
        seeds = [crate::PRIZE_POT_SEED, prize_pot.campaign.as_ref()],
        bump = prize_pot.bump
    )]
    pub prize_pot: Account<'info, PrizePot>,

    #[account(mut)]
    pub funder: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct CancelPrizePot<'info> {
    #[account(
        seeds = [crate::CAMPAIGN_SEED, campaign.creator.as_ref(), campaign.campaign_id.to_le_bytes().as_ref()],
        bump = campaign.bump
    )]
    pub campaign: Box<Account<'info, Campaign>>,

    #[account(
        mut,
        seeds = [crate::PRIZE_POT_SEED, campaign.key().as_ref()],
        bump = prize_pot.bump,
        has_one = campaign,
        has_one = beneficiary @ DistributionError::Unauthorized
    )]
    pub prize_pot: Account<'info, PrizePot>,

    #[account(mut)]
    pub beneficiary: SystemAccount<'info>,

    pub caller: Signer<'info>,
}

#[derive(Accounts)]
pub struct ClaimPrize<'info> {
    #[account(
        seeds = [crate::CAMPAIGN_SEED, campaign.creator.as_ref(), campaign.campaign_id.to_le_bytes().as_ref()],
        bump = campaign.bump
    )]
    pub campaign: Box<Account<'info, Campaign>>,

    #[account(
        mut,
        seeds = [crate::PRIZE_POT_SEED, campaign.key().as_ref()],
        bump = prize_pot.bump,
        has_one = campaign
    )]
    pub prize_pot: Account<'info, PrizePot>,

    #[account(mut, address = campaign.distribution_mint @ DistributionError::MintMismatch)]
    pub distribution_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        token::mint = distribution_mint,
        token::authority = winner
    )]
    pub winner_token_account: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub winner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}
