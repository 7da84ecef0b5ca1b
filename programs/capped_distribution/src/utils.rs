use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    program::{invoke, invoke_signed},
    system_instruction,
};

use crate::errors::DistributionError;

// -----------------
// Seeds / constants
// -----------------
pub const CAMPAIGN_SEED: &[u8] = b"campaign_v1";
pub const VAULT_SEED: &[u8] = b"vault_v1";
pub const DISTRIBUTION_MINT_SEED: &[u8] = b"distribution_mint_v1";
pub const CONTRIBUTION_SEED: &[u8] = b"contribution_v1";
pub const CONTRIBUTOR_SEED: &[u8] = b"contributor_v1";
pub const EXCESS_MINT_SEED: &[u8] = b"excess_mint_v1";
pub const EXCESS_VESTING_SEED: &[u8] = b"excess_vesting_v1";
pub const PRIZE_POT_SEED: &[u8] = b"prize_pot_v1";

// -------------------------
// Address derivation (read-only queries)
// -------------------------
pub fn campaign_address(creator: &Pubkey, campaign_id: u64) -> Pubkey {
    Pubkey::find_program_address(
        &[CAMPAIGN_SEED, creator.as_ref(), &campaign_id.to_le_bytes()],
        &crate::ID,
    )
    .0
}

pub fn vault_address(campaign: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[VAULT_SEED, campaign.as_ref()], &crate::ID).0
}

pub fn distribution_mint_address(campaign: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[DISTRIBUTION_MINT_SEED, campaign.as_ref()], &crate::ID).0
}

/// Address of `contributions(account, bucket)`.
pub fn contribution_address(campaign: &Pubkey, contributor: &Pubkey, bucket: u8) -> Pubkey {
    Pubkey::find_program_address(
        &[
            CONTRIBUTION_SEED,
            campaign.as_ref(),
            contributor.as_ref(),
            &bucket.to_le_bytes(),
        ],
        &crate::ID,
    )
    .0
}

pub fn contributor_address(campaign: &Pubkey, contributor: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[CONTRIBUTOR_SEED, campaign.as_ref(), contributor.as_ref()],
        &crate::ID,
    )
    .0
}

/// Excess-claim token of a bucket.
pub fn excess_mint_address(campaign: &Pubkey, bucket: u8) -> Pubkey {
    Pubkey::find_program_address(
        &[EXCESS_MINT_SEED, campaign.as_ref(), &bucket.to_le_bytes()],
        &crate::ID,
    )
    .0
}

/// Vesting that redeems `token_mint`; one per mint.
pub fn vesting_address_for_mint(token_mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[EXCESS_VESTING_SEED, token_mint.as_ref()], &crate::ID).0
}

/// Excess vesting of a bucket.
pub fn excess_vesting_address(campaign: &Pubkey, bucket: u8) -> Pubkey {
    vesting_address_for_mint(&excess_mint_address(campaign, bucket))
}

pub fn prize_pot_address(campaign: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[PRIZE_POT_SEED, campaign.as_ref()], &crate::ID).0
}

// -------------------------
// Integer math
// -------------------------

/// Limb bound for `mul_div` operands: keeps `(r << 8) + byte * b` below 2^127.
const MUL_DIV_OPERAND_LIMIT: u128 = 1 << 118;

/// Exact `floor(a * b / d)` without a 256-bit intermediate.
///
/// Processes `a` one byte at a time, keeping `prefix(a) * b == q * d + r`
/// with `r < d`, so every intermediate stays below 2^127.
pub fn mul_div(a: u64, b: u128, d: u128) -> Result<u128> {
    require!(d != 0, DistributionError::MathOverflow);
    require!(
        b < MUL_DIV_OPERAND_LIMIT && d < MUL_DIV_OPERAND_LIMIT,
        DistributionError::MathOverflow
    );

    let mut q: u128 = 0;
    let mut r: u128 = 0;
    for byte in a.to_be_bytes() {
        let t = (r << 8) + (byte as u128) * b;
        q = q
            .checked_mul(256)
            .and_then(|q| q.checked_add(t / d))
            .ok_or_else(|| error!(DistributionError::MathOverflow))?;
        r = t % d;
    }
    Ok(q)
}

pub fn ceil_div(n: u128, d: u128) -> Result<u128> {
    require!(d != 0, DistributionError::MathOverflow);
    let q = n / d;
    Ok(if n % d == 0 { q } else { q + 1 })
}

pub fn to_u64(v: u128) -> Result<u64> {
    u64::try_from(v).map_err(|_| error!(DistributionError::MathOverflow))
}

// -------------------------
// Lamport movement
// -------------------------

/// Contributor -> vault (or any funder -> program account), signed by `from`.
pub fn transfer_lamports_in<'info>(
    from: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    let ix = system_instruction::transfer(from.key, to.key, amount);
    invoke(&ix, &[from.clone(), to.clone(), system_program.clone()])?;
    Ok(())
}

/// Out of the system-owned campaign vault; the vault PDA signs.
pub fn transfer_from_vault<'info>(
    vault: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    campaign: &Pubkey,
    vault_bump: u8,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    let rent_floor = Rent::get()?.minimum_balance(0);
    require!(
        vault.lamports() >= amount.saturating_add(rent_floor),
        DistributionError::InsufficientVaultFunds
    );

    let ix = system_instruction::transfer(vault.key, to.key, amount);
    let signer_seeds: &[&[u8]] = &[VAULT_SEED, campaign.as_ref(), &[vault_bump]];
    invoke_signed(
        &ix,
        &[vault.clone(), to.clone(), system_program.clone()],
        &[signer_seeds],
    )?;
    Ok(())
}

/// Lamports above the rent-exempt floor of a program-owned account.
pub fn spare_lamports(info: &AccountInfo, data_len: usize) -> Result<u64> {
    let rent_floor = Rent::get()?.minimum_balance(data_len);
    Ok(info.lamports().saturating_sub(rent_floor))
}

/// Debit a program-owned account directly (vesting, prize pot).
pub fn pay_from_program_account(from: &AccountInfo, to: &AccountInfo, amount: u64) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    let remaining = from
        .lamports()
        .checked_sub(amount)
        .ok_or_else(|| error!(DistributionError::InsufficientVestingFunds))?;
    let credited = to
        .lamports()
        .checked_add(amount)
        .ok_or_else(|| error!(DistributionError::MathOverflow))?;

    **from.try_borrow_mut_lamports()? = remaining;
    **to.try_borrow_mut_lamports()? = credited;
    Ok(())
}
