//! Binary Market Program
//!
//! On-chain logic for binary (YES/NO) prediction markets on Solana.
//!
//! ## Architecture
//!
//! One market per PDA, created once and never destroyed:
//! - `CreateMarket` mints the YES/NO share tokens and the settlement vault,
//!   all under the market PDA's authority
//! - `BuyShares` accepts a settlement-currency deposit and issues share
//!   tokens 1:1 during the open trading window
//! - `ResolveMarket` records the authoritative outcome (resolver only)
//! - `ClaimWinnings` burns a winner's share balance and pays out an equal
//!   amount of settlement currency from the vault

pub mod cpi;
pub mod error;
pub mod instruction;
pub mod processor;
pub mod state;
pub mod utils;

#[cfg(not(feature = "no-entrypoint"))]
pub mod entrypoint;

// Re-export commonly used items
pub use error::MarketError;
pub use instruction::MarketInstruction;
pub use state::*;

solana_program::declare_id!("BiMkt111111111111111111111111111111111111111");
