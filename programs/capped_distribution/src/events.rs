use anchor_lang::prelude::*;

#[event]
pub struct CampaignInitialized {
    pub campaign: Pubkey,
    pub creator: Pubkey,
    pub campaign_id: u64,
    pub distribution_mint: Pubkey,
    pub target: u64,
    pub cap: u64,
    pub deadline: i64,
}

#[event]
pub struct Contributed {
    pub campaign: Pubkey,
    pub contributor: Pubkey,
    pub bucket: u8,
    pub amount: u64,
    pub recycled: u64,
    pub total_given: u64,
}

#[event]
pub struct DeadlineExtended {
    pub campaign: Pubkey,
    pub extension_secs: i64,
    pub deadline: i64,
    pub ema_of_contribution: u64,
}

#[event]
pub struct Escaped {
    pub campaign: Pubkey,
    pub contributor: Pubkey,
    pub bucket: u8,
    pub refund: u64,
}

#[event]
pub struct BucketSettled {
    pub campaign: Pubkey,
    pub bucket: u8,
    pub given: u64,
    pub accepted: u64,
    pub cap_remainder: u64,
}

#[event]
pub struct SettlementExhausted {
    pub campaign: Pubkey,
    pub total_accepted: u64,
}

#[event]
pub struct TokensClaimed {
    pub campaign: Pubkey,
    pub player: Pubkey,
    pub bucket: u8,
    pub tokens: u64,
    pub excess: u64,
}

#[event]
pub struct VestingCreated {
    pub vesting: Pubkey,
    pub token_mint: Pubkey,
    pub campaign: Option<Pubkey>,
    pub bucket: Option<u8>,
    pub unlock_time: i64,
}

#[event]
pub struct VestingFunded {
    pub vesting: Pubkey,
    pub funder: Pubkey,
    pub amount: u64,
}

#[event]
pub struct ExcessWithdrawn {
    pub vesting: Pubkey,
    pub holder: Pubkey,
    pub amount: u64,
}

#[event]
pub struct PrizePotInitialized {
    pub campaign: Pubkey,
    pub prize_pot: Pubkey,
    pub beneficiary: Pubkey,
}

#[event]
pub struct PrizePotFunded {
    pub prize_pot: Pubkey,
    pub funder: Pubkey,
    pub amount: u64,
}

#[event]
pub struct PrizePotCancelled {
    pub prize_pot: Pubkey,
    pub beneficiary: Pubkey,
    pub amount: u64,
}

#[event]
pub struct PrizeClaimed {
    pub prize_pot: Pubkey,
    pub winner: Pubkey,
    pub tokens_burned: u64,
    pub amount: u64,
}
