//! State definitions for the Binary Market Program
//!
//! A single `Market` account per deployed market instance. Everything a
//! market needs to settle lives here; per-user holdings are token balances
//! in the SPL ledger, never program state.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use crate::error::MarketError;
use crate::utils::safe_add_u64;

// ============================================================================
// Discriminators
// ============================================================================

pub const MARKET_DISCRIMINATOR: u64 = 0x4D41524B45545F5F; // "MARKET__"

// ============================================================================
// PDA Seeds
// ============================================================================

pub const MARKET_SEED: &[u8] = b"market";
pub const YES_MINT_SEED: &[u8] = b"yes_mint";
pub const NO_MINT_SEED: &[u8] = b"no_mint";
pub const MARKET_VAULT_SEED: &[u8] = b"market_vault";

// ============================================================================
// Constants
// ============================================================================

/// Maximum length of market question (bytes)
pub const MAX_QUESTION_LEN: usize = 128;

/// Basis-point denominator for the implied-probability query
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Implied probability reported before any deposit exists (50.00%)
pub const EVEN_ODDS_BPS: u64 = 5_000;

/// Share mint decimals, matching the settlement currency (e6)
pub const SHARE_DECIMALS: u8 = 6;

// ============================================================================
// Enums
// ============================================================================

/// Market side (YES/NO)
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Yes = 0,
    No = 1,
}

// ============================================================================
// Account Structures
// ============================================================================

/// A single binary prediction market
///
/// PDA Seeds: ["market", creator, market_seed.to_le_bytes()]
///
/// The market PDA is the mint and freeze authority of both share mints and
/// the owner of the settlement vault; no other identity ever holds
/// administrative control over them.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct Market {
    /// Account discriminator
    pub discriminator: u64,

    /// Creator-chosen instance discriminant (part of the PDA derivation)
    pub market_seed: u64,

    /// Market creator (deployer)
    pub creator: Pubkey,

    /// Identity authorized to record the outcome
    pub resolver: Pubkey,

    /// Market question text (1-128 bytes)
    pub question: String,

    /// Settlement currency mint accepted for deposits and paid on claims
    pub settlement_mint: Pubkey,

    /// YES share mint (authority = market PDA)
    pub yes_mint: Pubkey,

    /// NO share mint (authority = market PDA)
    pub no_mint: Pubkey,

    /// Settlement currency vault (owner = market PDA)
    pub vault: Pubkey,

    /// Unix timestamp after which trading stops; non-zero once created
    pub close_ts: i64,

    /// Cumulative deposits backing YES
    pub yes_reserve: u64,

    /// Cumulative deposits backing NO
    pub no_reserve: u64,

    /// Has the outcome been recorded?
    pub resolved: bool,

    /// Winning side; None until resolved
    pub outcome: Option<Side>,

    /// Market creation timestamp
    pub created_at: i64,

    /// PDA bump
    pub bump: u8,

    /// Reserved for future use
    pub reserved: [u8; 32],
}

impl Market {
    pub const SIZE: usize = 8   // discriminator
        + 8   // market_seed
        + 32  // creator
        + 32  // resolver
        + 4 + MAX_QUESTION_LEN // question (borsh string, max length)
        + 32  // settlement_mint
        + 32  // yes_mint
        + 32  // no_mint
        + 32  // vault
        + 8   // close_ts
        + 8   // yes_reserve
        + 8   // no_reserve
        + 1   // resolved
        + 1 + 1 // outcome (Option<Side>)
        + 8   // created_at
        + 1   // bump
        + 32; // reserved

    /// PDA seeds
    pub fn seeds(creator: &Pubkey, market_seed: u64) -> Vec<Vec<u8>> {
        vec![
            MARKET_SEED.to_vec(),
            creator.to_bytes().to_vec(),
            market_seed.to_le_bytes().to_vec(),
        ]
    }

    // ------------------------------------------------------------------------
    // Guard predicates
    // ------------------------------------------------------------------------

    /// True once creation has run; `close_ts` doubles as the init flag
    pub fn is_initialized(&self) -> bool {
        self.close_ts != 0
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Trading is open while unresolved and strictly before the close
    pub fn trading_open(&self, now: i64) -> bool {
        !self.resolved && now < self.close_ts
    }

    /// The close has been reached (required before resolution)
    pub fn past_close(&self, now: i64) -> bool {
        now >= self.close_ts
    }

    pub fn ensure_trading_open(&self, now: i64) -> Result<(), ProgramError> {
        if !self.trading_open(now) {
            return Err(MarketError::TradingClosed.into());
        }
        Ok(())
    }

    pub fn ensure_not_resolved(&self) -> Result<(), ProgramError> {
        if self.resolved {
            return Err(MarketError::AlreadyResolved.into());
        }
        Ok(())
    }

    pub fn ensure_resolved(&self) -> Result<(), ProgramError> {
        if !self.resolved {
            return Err(MarketError::NotResolved.into());
        }
        Ok(())
    }

    pub fn ensure_past_close(&self, now: i64) -> Result<(), ProgramError> {
        if !self.past_close(now) {
            return Err(MarketError::MarketNotExpired.into());
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Reserve accounting
    // ------------------------------------------------------------------------

    /// Record a deposit against one side and return the shares to issue.
    ///
    /// Requires an open trading window and a positive amount. Issuance is
    /// linear 1:1: shares == deposited amount, no rounding, no fee.
    pub fn record_deposit(&mut self, side: Side, amount: u64, now: i64) -> Result<u64, ProgramError> {
        self.ensure_trading_open(now)?;
        if amount == 0 {
            return Err(MarketError::InvalidAmount.into());
        }
        match side {
            Side::Yes => self.yes_reserve = safe_add_u64(self.yes_reserve, amount)?,
            Side::No => self.no_reserve = safe_add_u64(self.no_reserve, amount)?,
        }
        Ok(amount)
    }

    /// Implied YES probability in basis points:
    /// `yes_reserve * 10_000 / (yes_reserve + no_reserve)`, truncating.
    /// Reports even odds (5000) while both reserves are zero.
    /// Informational only; issuance and settlement never read it.
    pub fn implied_probability_bps(&self) -> u64 {
        let total = (self.yes_reserve as u128) + (self.no_reserve as u128);
        if total == 0 {
            return EVEN_ODDS_BPS;
        }
        ((self.yes_reserve as u128) * (BPS_DENOMINATOR as u128) / total) as u64
    }

    // ------------------------------------------------------------------------
    // Settlement queries
    // ------------------------------------------------------------------------

    /// Winning side, once resolved
    pub fn winning_side(&self) -> Option<Side> {
        self.outcome
    }

    /// Mint of the winning share token, once resolved
    pub fn winning_mint(&self) -> Option<Pubkey> {
        match self.outcome? {
            Side::Yes => Some(self.yes_mint),
            Side::No => Some(self.no_mint),
        }
    }

    /// Mint of the requested side's share token
    pub fn side_mint(&self, side: Side) -> Pubkey {
        match side {
            Side::Yes => self.yes_mint,
            Side::No => self.no_mint,
        }
    }
}

// ============================================================================
// PDA derivation helpers
// ============================================================================

/// Derive the market PDA for a creator and instance seed
pub fn find_market_address(
    program_id: &Pubkey,
    creator: &Pubkey,
    market_seed: u64,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[MARKET_SEED, creator.as_ref(), &market_seed.to_le_bytes()],
        program_id,
    )
}

/// Derive the YES share mint PDA for a market
pub fn find_yes_mint_address(program_id: &Pubkey, market: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[YES_MINT_SEED, market.as_ref()], program_id)
}

/// Derive the NO share mint PDA for a market
pub fn find_no_mint_address(program_id: &Pubkey, market: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[NO_MINT_SEED, market.as_ref()], program_id)
}

/// Derive the settlement vault PDA for a market
pub fn find_vault_address(program_id: &Pubkey, market: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[MARKET_VAULT_SEED, market.as_ref()], program_id)
}

// ============================================================================
// Tests
// ============================================================================
