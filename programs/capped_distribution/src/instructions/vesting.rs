use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn};

use crate::errors::DistributionError;
use crate::events::{ExcessWithdrawn, VestingCreated, VestingFunded};
use crate::state::{ExcessVesting, HolderApproval};
use crate::utils::{pay_from_program_account, spare_lamports, transfer_lamports_in};
use crate::{CreateVesting, FundVesting, WithdrawExcess};

pub fn create_vesting(ctx: Context<CreateVesting>, unlock_time: i64) -> Result<()> {
    let vesting = ExcessVesting::standalone(
        ctx.accounts.token_mint.key(),
        ctx.accounts.creator.key(),
        ctx.bumps.excess_vesting,
        unlock_time,
    )?;
    ctx.accounts.excess_vesting.set_inner(vesting);

    emit!(VestingCreated {
        vesting: ctx.accounts.excess_vesting.key(),
        token_mint: ctx.accounts.token_mint.key(),
        campaign: None,
        bucket: None,
        unlock_time,
    });

    Ok(())
}

pub fn fund_vesting(ctx: Context<FundVesting>, amount: u64) -> Result<()> {
    require!(amount > 0, DistributionError::ZeroAmount);

    let vesting = &mut ctx.accounts.excess_vesting;
    vesting.total_deposited = vesting
        .total_deposited
        .checked_add(amount)
        .ok_or(DistributionError::MathOverflow)?;

    transfer_lamports_in(
        &ctx.accounts.funder.to_account_info(),
        &vesting.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
        amount,
    )?;

    emit!(VestingFunded {
        vesting: vesting.key(),
        funder: ctx.accounts.funder.key(),
        amount,
    });

    Ok(())
}

/// Burns the holder's whole excess-token balance for the same number of lamports.
pub fn withdraw_excess(ctx: Context<WithdrawExcess>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let vesting_key = ctx.accounts.excess_vesting.key();
    let vesting_info = ctx.accounts.excess_vesting.to_account_info();

    let holder = HolderApproval::from(&**ctx.accounts.holder_token_account);
    let spare = spare_lamports(&vesting_info, 8 + ExcessVesting::INIT_SPACE)?;

    let vesting = &mut ctx.accounts.excess_vesting;
    let amount = vesting.withdrawable(now, &holder, &vesting_key, spare)?;
    if amount == 0 {
        msg!("nothing to withdraw");
        return Ok(());
    }

    vesting.total_withdrawn = vesting
        .total_withdrawn
        .checked_add(amount)
        .ok_or(DistributionError::MathOverflow)?;

    let mint_key = vesting.token_mint;
    let signer_seeds: &[&[&[u8]]] = &[&[
        crate::EXCESS_VESTING_SEED,
        mint_key.as_ref(),
        &[vesting.bump],
    ]];

    token::burn(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Burn {
                mint: ctx.accounts.token_mint.to_account_info(),
                from: ctx.accounts.holder_token_account.to_account_info(),
                authority: vesting_info.clone(),
            },
            signer_seeds,
        ),
        amount,
    )?;

    pay_from_program_account(
        &vesting_info,
        &ctx.accounts.holder.to_account_info(),
        amount,
    )?;

    emit!(ExcessWithdrawn {
        vesting: vesting_key,
        holder: ctx.accounts.holder.key(),
        amount,
    });

    Ok(())
}
