//! Instruction definitions for the Binary Market Program

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};
use spl_associated_token_account::get_associated_token_address;

use crate::state::{
    find_market_address, find_no_mint_address, find_vault_address, find_yes_mint_address, Side,
};

/// All instructions supported by the Binary Market Program
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub enum MarketInstruction {
    /// Create a new binary market
    ///
    /// Runs exactly once per market PDA: initializes the market state,
    /// mints the YES/NO share tokens with the market PDA as sole authority,
    /// and opens the settlement vault. A repeat call is rejected.
    ///
    /// Accounts:
    /// 0. `[signer, writable]` Creator (pays rent)
    /// 1. `[writable]` Market PDA
    /// 2. `[writable]` YES Share Mint PDA
    /// 3. `[writable]` NO Share Mint PDA
    /// 4. `[writable]` Market Vault PDA
    /// 5. `[]` Settlement Currency Mint
    /// 6. `[]` Token Program
    /// 7. `[]` System Program
    /// 8. `[]` Rent Sysvar
    CreateMarket(CreateMarketArgs),

    /// Buy YES or NO shares during the open trading window
    ///
    /// The deposit travels inside this instruction: settlement currency
    /// moves from the buyer's token account into the market vault, and the
    /// side's share tokens are minted 1:1 to the buyer's associated token
    /// account. Shares issued are reported via return data (u64 LE).
    ///
    /// Accounts:
    /// 0. `[signer]` Buyer
    /// 1. `[writable]` Market PDA
    /// 2. `[writable]` Share Mint (YES or NO per args)
    /// 3. `[writable]` Buyer's Share Token Account (ATA for the side mint)
    /// 4. `[writable]` Buyer's Settlement Currency Account (deposit source)
    /// 5. `[writable]` Market Vault
    /// 6. `[]` Token Program
    BuyShares(BuySharesArgs),

    /// Record the market outcome (resolver only, after the close)
    ///
    /// Accounts:
    /// 0. `[signer]` Resolver
    /// 1. `[writable]` Market PDA
    ResolveMarket(ResolveMarketArgs),

    /// Claim winnings from a resolved market
    ///
    /// Burns the claimant's entire winning-side balance, then pays out the
    /// same amount of settlement currency from the vault. The payout is
    /// reported via return data (u64 LE). The market account itself is
    /// never mutated; a repeat claim fails because the balance is zero.
    ///
    /// Accounts:
    /// 0. `[signer]` Claimant
    /// 1. `[]` Market PDA
    /// 2. `[writable]` Winning Share Mint
    /// 3. `[writable]` Claimant's Winning Share Token Account (ATA)
    /// 4. `[writable]` Market Vault
    /// 5. `[writable]` Claimant's Settlement Currency Account (payout target)
    /// 6. `[]` Token Program
    ClaimWinnings,
}

// ============================================================================
// Argument Structs
// ============================================================================

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct CreateMarketArgs {
    /// Instance discriminant; one market per (creator, seed) pair
    pub market_seed: u64,
    /// Market question text (1-128 bytes)
    pub question: String,
    /// Unix timestamp after which trading stops; must be strictly future
    pub close_ts: i64,
    /// Identity authorized to record the outcome
    pub resolver: Pubkey,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct BuySharesArgs {
    /// Which side to back
    pub side: Side,
    /// Deposit in smallest settlement-currency units; shares issued 1:1
    pub amount: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct ResolveMarketArgs {
    /// 1 = YES wins, 0 = NO wins
    pub outcome: u8,
}

// ============================================================================
// Instruction Builders
// ============================================================================

/// Build a `CreateMarket` instruction; derives the market, mint, and vault
/// PDAs from the creator and instance seed
pub fn create_market(
    program_id: &Pubkey,
    creator: &Pubkey,
    settlement_mint: &Pubkey,
    args: CreateMarketArgs,
) -> Instruction {
    let (market, _) = find_market_address(program_id, creator, args.market_seed);
    let (yes_mint, _) = find_yes_mint_address(program_id, &market);
    let (no_mint, _) = find_no_mint_address(program_id, &market);
    let (vault, _) = find_vault_address(program_id, &market);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*creator, true),
            AccountMeta::new(market, false),
            AccountMeta::new(yes_mint, false),
            AccountMeta::new(no_mint, false),
            AccountMeta::new(vault, false),
            AccountMeta::new_readonly(*settlement_mint, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data: MarketInstruction::CreateMarket(args).try_to_vec().unwrap(),
    }
}

/// Build a `BuyShares` instruction; the share destination is the buyer's
/// associated token account for the side mint
pub fn buy_shares(
    program_id: &Pubkey,
    buyer: &Pubkey,
    market: &Pubkey,
    buyer_settlement_account: &Pubkey,
    args: BuySharesArgs,
) -> Instruction {
    let (share_mint, _) = match args.side {
        Side::Yes => find_yes_mint_address(program_id, market),
        Side::No => find_no_mint_address(program_id, market),
    };
    let (vault, _) = find_vault_address(program_id, market);
    let share_account = get_associated_token_address(buyer, &share_mint);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*buyer, true),
            AccountMeta::new(*market, false),
            AccountMeta::new(share_mint, false),
            AccountMeta::new(share_account, false),
            AccountMeta::new(*buyer_settlement_account, false),
            AccountMeta::new(vault, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data: MarketInstruction::BuyShares(args).try_to_vec().unwrap(),
    }
}

/// Build a `ResolveMarket` instruction
pub fn resolve_market(
    program_id: &Pubkey,
    resolver: &Pubkey,
    market: &Pubkey,
    args: ResolveMarketArgs,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*resolver, true),
            AccountMeta::new(*market, false),
        ],
        data: MarketInstruction::ResolveMarket(args).try_to_vec().unwrap(),
    }
}

/// Build a `ClaimWinnings` instruction for the given winning side
pub fn claim_winnings(
    program_id: &Pubkey,
    claimant: &Pubkey,
    market: &Pubkey,
    winning_side: Side,
    claimant_settlement_account: &Pubkey,
) -> Instruction {
    let (share_mint, _) = match winning_side {
        Side::Yes => find_yes_mint_address(program_id, market),
        Side::No => find_no_mint_address(program_id, market),
    };
    let (vault, _) = find_vault_address(program_id, market);
    let share_account = get_associated_token_address(claimant, &share_mint);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*claimant, true),
            AccountMeta::new_readonly(*market, false),
            AccountMeta::new(share_mint, false),
            AccountMeta::new(share_account, false),
            AccountMeta::new(vault, false),
            AccountMeta::new(*claimant_settlement_account, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data: MarketInstruction::ClaimWinnings.try_to_vec().unwrap(),
    }
}

// ============================================================================
// Tests
// ============================================================================
