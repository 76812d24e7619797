//! CPI (Cross-Program Invocation) helpers for the Binary Market Program
//!
//! All settlement against the external SPL Token ledger funnels through
//! this module: the deposit leg of a trade, share issuance, the claim-time
//! reclaim (burn), and the settlement-currency payout. Every call either
//! fully succeeds or aborts the enclosing instruction; errors from the
//! token program propagate verbatim.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed},
};

/// Move a deposit from the payer's settlement-currency account into the
/// market vault. Authorized by the payer's signature on the enclosing
/// transaction.
pub fn transfer_deposit<'a>(
    token_program: &AccountInfo<'a>,
    source: &AccountInfo<'a>,
    vault: &AccountInfo<'a>,
    payer: &AccountInfo<'a>,
    amount: u64,
) -> ProgramResult {
    msg!("CPI: Deposit {} into market vault", amount);

    invoke(
        &spl_token::instruction::transfer(
            token_program.key,
            source.key,
            vault.key,
            payer.key,
            &[],
            amount,
        )?,
        &[
            source.clone(),
            vault.clone(),
            payer.clone(),
            token_program.clone(),
        ],
    )
}

/// Issue share tokens to a recipient, signed by the market PDA (the mint
/// authority). Called at most once per trade; fails if the recipient
/// account cannot receive the asset.
pub fn issue_shares<'a>(
    token_program: &AccountInfo<'a>,
    share_mint: &AccountInfo<'a>,
    recipient: &AccountInfo<'a>,
    market: &AccountInfo<'a>,
    amount: u64,
    market_seeds: &[&[u8]],
) -> ProgramResult {
    msg!("CPI: Issue {} shares", amount);

    invoke_signed(
        &spl_token::instruction::mint_to(
            token_program.key,
            share_mint.key,
            recipient.key,
            market.key,
            &[],
            amount,
        )?,
        &[
            share_mint.clone(),
            recipient.clone(),
            market.clone(),
            token_program.clone(),
        ],
        &[market_seeds],
    )
}

/// Reclaim (burn) a holder's share tokens during claim settlement so the
/// same holding can never be paid twice. The burn precedes the payout
/// inside the same instruction.
pub fn reclaim_shares<'a>(
    token_program: &AccountInfo<'a>,
    share_account: &AccountInfo<'a>,
    share_mint: &AccountInfo<'a>,
    holder: &AccountInfo<'a>,
    amount: u64,
) -> ProgramResult {
    msg!("CPI: Reclaim {} shares", amount);

    invoke(
        &spl_token::instruction::burn(
            token_program.key,
            share_account.key,
            share_mint.key,
            holder.key,
            &[],
            amount,
        )?,
        &[
            share_account.clone(),
            share_mint.clone(),
            holder.clone(),
            token_program.clone(),
        ],
    )
}

/// Pay settlement currency out of the market vault, signed by the market
/// PDA (the vault owner). Only claim settlement debits the vault.
pub fn pay_out<'a>(
    token_program: &AccountInfo<'a>,
    vault: &AccountInfo<'a>,
    recipient: &AccountInfo<'a>,
    market: &AccountInfo<'a>,
    amount: u64,
    market_seeds: &[&[u8]],
) -> ProgramResult {
    msg!("CPI: Pay out {} from market vault", amount);

    invoke_signed(
        &spl_token::instruction::transfer(
            token_program.key,
            vault.key,
            recipient.key,
            market.key,
            &[],
            amount,
        )?,
        &[
            vault.clone(),
            recipient.clone(),
            market.clone(),
            token_program.clone(),
        ],
        &[market_seeds],
    )
}
