pub mod admin;
pub mod deposit;
pub mod lifecycle;
pub mod prize;
pub mod reward;
pub mod vesting;
