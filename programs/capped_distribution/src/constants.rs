// Centralized Protocol Constants

// Buckets
// =======

/// Highest lock index a contribution may pick (weeks).
pub const MAX_BUCKET: u8 = 100;

/// Number of lock buckets, `0..=MAX_BUCKET`.
pub const BUCKET_COUNT: usize = MAX_BUCKET as usize + 1;

/// Cursor value reported while no bucket has settled yet.
pub const NO_BUCKET_SETTLED: i16 = BUCKET_COUNT as i16;

/// Cursor value reported once every bucket has settled.
pub const ALL_BUCKETS_SETTLED: i16 = -1;

// Time
// ====

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
pub const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;

// Deadline clock defaults
// =======================

/// EMA smoothing divisor `k`: `ema += (amount - ema) / k`.
pub const DEFAULT_SMOOTHING_DIVISOR: u64 = 8;

/// Extension granted to a contribution exactly the size of the EMA.
pub const DEFAULT_EXTENSION_UNIT_SECS: i64 = SECONDS_PER_DAY;

/// Upper bound on the extension granted by a single contribution.
pub const DEFAULT_MAX_EXTENSION_SECS: i64 = SECONDS_PER_DAY;

// Settlement priority
// ===================

/// Fixed-point scale of bucket priority weights (`w[0]`).
pub const PRIORITY_WEIGHT_SCALE: u128 = 1_000_000;

pub const BPS_DENOMINATOR: u128 = 10_000;

/// Weekly growth of the priority weight. 700 bps = x1.07 per week of lock.
pub const DEFAULT_PRIORITY_GROWTH_BPS: u16 = 700;

/// Keeps `w[100]` well inside the limb bound of `utils::mul_div`.
pub const MAX_PRIORITY_GROWTH_BPS: u16 = 2_000;

// Tokens
// ======

/// Distribution tokens minted per accepted lamport.
pub const DEFAULT_TOKENS_PER_LAMPORT: u64 = 1_000;

pub const DISTRIBUTION_DECIMALS: u8 = 9;

/// Excess-claim tokens redeem 1:1 for lamports.
pub const EXCESS_DECIMALS: u8 = 9;

/// Initial version for account structures.
pub const INITIAL_VERSION: u16 = 1;
