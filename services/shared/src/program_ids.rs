//! Solana program IDs used by the submitter
//!
//! Centralizes all program ID constants to ensure consistency
//! and make it easier to update when needed.

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// Transfer program invoked by the submitted instruction
pub const TRANSFER_PROGRAM_ID: &str = "6pJaNqhR3nq7ZhTgEfjZB2N9XFvSeuyqRHeq5jFEqqs6";

/// System program (passed read-only so the target program can CPI into it)
pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";

/// Get the default transfer program as Pubkey
pub fn transfer_program_id() -> Pubkey {
    Pubkey::from_str(TRANSFER_PROGRAM_ID)
        .expect("TRANSFER_PROGRAM_ID is a valid constant")
}

/// Get the system program as Pubkey
pub fn system_program_id() -> Pubkey {
    solana_sdk::system_program::ID
}
