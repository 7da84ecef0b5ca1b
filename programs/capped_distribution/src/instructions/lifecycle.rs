use anchor_lang::prelude::*;

use crate::events::{BucketSettled, SettlementExhausted};
use crate::ledger::SettlementOutcome;
use crate::utils::transfer_from_vault;
use crate::CloseNextBucket;

pub fn close_next_bucket(ctx: Context<CloseNextBucket>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let campaign_key = ctx.accounts.campaign.key();

    let campaign = &mut ctx.accounts.campaign;
    let outcome = campaign.close_next_bucket(now)?;

    match outcome {
        SettlementOutcome::Settled {
            bucket,
            admitted,
            skipped,
        } => {
            if skipped > 0 {
                msg!("skipped {} empty buckets above {}", skipped, bucket);
            }

            transfer_from_vault(
                &ctx.accounts.vault.to_account_info(),
                &ctx.accounts.beneficiary.to_account_info(),
                &ctx.accounts.system_program.to_account_info(),
                &campaign_key,
                campaign.vault_bump,
                admitted,
            )?;

            emit!(BucketSettled {
                campaign: campaign_key,
                bucket,
                given: campaign.given[bucket as usize],
                accepted: admitted,
                cap_remainder: campaign.cap_remainder,
            });
        }
        SettlementOutcome::Exhausted => {
            msg!("no standing funds below the last settled bucket");
            emit!(SettlementExhausted {
                campaign: campaign_key,
                total_accepted: campaign.total_accepted,
            });
        }
    }

    Ok(())
}
