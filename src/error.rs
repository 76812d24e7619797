//! Error types for the Binary Market Program

use num_derive::FromPrimitive;
use solana_program::{decode_error::DecodeError, program_error::ProgramError};
use thiserror::Error;

/// Errors that may be returned by the Binary Market Program
#[derive(Clone, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum MarketError {
    // === General Errors (0-99) ===

    #[error("Invalid instruction")]
    InvalidInstruction = 0,

    #[error("Invalid account data")]
    InvalidAccountData = 1,

    #[error("Account not initialized")]
    AccountNotInitialized = 2,

    #[error("Already initialized")]
    AlreadyInitialized = 3,

    #[error("Invalid signer")]
    InvalidSigner = 4,

    #[error("Unauthorized")]
    Unauthorized = 5,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow = 6,

    #[error("Invalid PDA")]
    InvalidPDA = 7,

    #[error("Invalid amount")]
    InvalidAmount = 8,

    // === Market Lifecycle Errors (100-199) ===

    #[error("Invalid question length")]
    InvalidQuestionLength = 100,

    #[error("Close timestamp must be in the future")]
    InvalidCloseTimestamp = 101,

    #[error("Market trading window closed")]
    TradingClosed = 102,

    #[error("Market not expired yet")]
    MarketNotExpired = 103,

    #[error("Market already resolved")]
    AlreadyResolved = 104,

    #[error("Market not resolved")]
    NotResolved = 105,

    #[error("Outcome must be 0 or 1")]
    InvalidOutcome = 106,

    // === Settlement Errors (200-299) ===

    #[error("Invalid settlement mint")]
    InvalidSettlementMint = 200,

    #[error("Invalid share mint")]
    InvalidShareMint = 201,

    #[error("Invalid market vault")]
    InvalidMarketVault = 202,

    #[error("Token account owner mismatch")]
    InvalidTokenAccountOwner = 203,

    #[error("Invalid share token account")]
    InvalidShareAccount = 204,

    #[error("No winning tokens held")]
    NoWinningHolding = 205,
}

impl From<MarketError> for ProgramError {
    fn from(e: MarketError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for MarketError {
    fn type_of() -> &'static str {
        "MarketError"
    }
}
