use anchor_lang::prelude::*;

#[error_code]
pub enum DistributionError {
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Invalid campaign parameters")]
    InvalidParams,

    // -----------------
    // Contributions
    // -----------------
    #[msg("Contribution amount must be positive")]
    ZeroAmount,
    #[msg("Bucket must be in 0..=100")]
    BucketOutOfRange,
    #[msg("Contributions are closed: deadline passed")]
    ContributionsClosed,
    #[msg("Contribution does not belong to this campaign or bucket")]
    ContributionMismatch,

    // -----------------
    // Escape
    // -----------------
    #[msg("Already escaped from this bucket")]
    AlreadyEscaped,
    #[msg("Bucket already settled")]
    BucketAlreadySettled,
    #[msg("Nothing to escape")]
    NothingToEscape,

    // -----------------
    // Settlement
    // -----------------
    #[msg("Deadline not reached")]
    DeadlineNotReached,
    #[msg("Target not reached: campaign failed")]
    TargetNotReached,
    #[msg("Every bucket has settled")]
    NothingToSettle,

    // -----------------
    // Claims
    // -----------------
    #[msg("Bucket not settled yet")]
    BucketNotSettled,
    #[msg("Already claimed")]
    AlreadyClaimed,
    #[msg("Nothing to claim")]
    NothingToClaim,
    #[msg("Mint does not match campaign")]
    MintMismatch,

    // -----------------
    // Excess vesting
    // -----------------
    #[msg("Vesting still locked")]
    VestingLocked,
    #[msg("Unlock time must be positive")]
    InvalidUnlockTime,
    #[msg("Token allowance below balance")]
    InsufficientAllowance,
    #[msg("Insufficient vesting funds")]
    InsufficientVestingFunds,

    // -----------------
    // Prize pot
    // -----------------
    #[msg("Campaign has not failed")]
    CampaignNotFailed,
    #[msg("Campaign has not succeeded")]
    CampaignNotSucceeded,
    #[msg("Caller holds no distribution tokens")]
    NoParticipationTokens,

    #[msg("Insufficient vault funds")]
    InsufficientVaultFunds,
    #[msg("Math overflow")]
    MathOverflow,
}

#[cfg(test)]
pub fn assert_error<T: std::fmt::Debug>(result: Result<T>, expected: DistributionError) {
    match result.unwrap_err() {
        Error::AnchorError(err) => {
            assert_eq!(err.error_code_number, u32::from(expected), "{}", err.error_name)
        }
        other => panic!("expected {expected:?}, got {other:?}"),
    }
}
