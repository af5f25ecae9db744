//! Solana instruction builders

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use shared::program_ids::system_program_id;

/// Build the transfer instruction for the target program
///
/// The program takes no instruction data; it reads the sender, the recipient
/// and the system program (for its CPI) from the account list, in that order.
pub fn build_transfer_instruction(program_id: &Pubkey, sender: &Pubkey, recipient: &Pubkey) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*sender, true),                        // from (signer)
            AccountMeta::new(*recipient, false),                    // to
            AccountMeta::new_readonly(system_program_id(), false),  // system_program
        ],
        data: vec![],
    }
}
