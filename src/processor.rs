//! Instruction processor for the Binary Market Program

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, set_return_data},
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
};
use spl_associated_token_account::get_associated_token_address;

use crate::cpi;
use crate::error::MarketError;
use crate::instruction::{BuySharesArgs, CreateMarketArgs, MarketInstruction, ResolveMarketArgs};
use crate::state::{
    Market, Side, MARKET_DISCRIMINATOR, MARKET_SEED, MARKET_VAULT_SEED, MAX_QUESTION_LEN,
    NO_MINT_SEED, SHARE_DECIMALS, YES_MINT_SEED,
};
use crate::utils::{check_signer, create_pda_account, deserialize_account, get_current_timestamp};

/// Process an instruction
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = MarketInstruction::try_from_slice(instruction_data)
        .map_err(|_| MarketError::InvalidInstruction)?;

    match instruction {
        MarketInstruction::CreateMarket(args) => {
            msg!("Instruction: CreateMarket");
            process_create_market(program_id, accounts, args)
        }
        MarketInstruction::BuyShares(args) => {
            msg!("Instruction: BuyShares");
            process_buy_shares(program_id, accounts, args)
        }
        MarketInstruction::ResolveMarket(args) => {
            msg!("Instruction: ResolveMarket");
            process_resolve_market(program_id, accounts, args)
        }
        MarketInstruction::ClaimWinnings => {
            msg!("Instruction: ClaimWinnings");
            process_claim_winnings(program_id, accounts)
        }
    }
}

fn process_create_market(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: CreateMarketArgs,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Creator (signer, pays rent)
    let creator_info = next_account_info(account_info_iter)?;
    check_signer(creator_info)?;

    // Account 1: Market PDA (writable)
    let market_info = next_account_info(account_info_iter)?;

    // Account 2: YES Share Mint PDA (writable)
    let yes_mint_info = next_account_info(account_info_iter)?;

    // Account 3: NO Share Mint PDA (writable)
    let no_mint_info = next_account_info(account_info_iter)?;

    // Account 4: Market Vault PDA (writable)
    let vault_info = next_account_info(account_info_iter)?;

    // Account 5: Settlement Currency Mint
    let settlement_mint_info = next_account_info(account_info_iter)?;

    // Account 6: Token Program
    let token_program_info = next_account_info(account_info_iter)?;

    // Account 7: System Program
    let system_program_info = next_account_info(account_info_iter)?;

    // Account 8: Rent Sysvar
    let rent_info = next_account_info(account_info_iter)?;

    let market_seed_bytes = args.market_seed.to_le_bytes();

    // Verify Market PDA
    let (market_pda, market_bump) = Pubkey::find_program_address(
        &[MARKET_SEED, creator_info.key.as_ref(), &market_seed_bytes],
        program_id,
    );
    if *market_info.key != market_pda {
        msg!("Error: Invalid Market PDA");
        return Err(MarketError::InvalidPDA.into());
    }

    // Creation runs exactly once per market instance
    if !market_info.data_is_empty() {
        msg!("Error: Market already initialized");
        return Err(MarketError::AlreadyInitialized.into());
    }

    // Validate market parameters
    let question_len = args.question.as_bytes().len();
    if question_len == 0 || question_len > MAX_QUESTION_LEN {
        msg!("Error: Question must be 1-{} bytes", MAX_QUESTION_LEN);
        return Err(MarketError::InvalidQuestionLength.into());
    }

    let current_time = get_current_timestamp()?;
    if args.close_ts <= current_time {
        msg!("Error: Close timestamp must be in the future");
        return Err(MarketError::InvalidCloseTimestamp.into());
    }

    // Verify YES Mint PDA
    let (yes_mint_pda, yes_mint_bump) =
        Pubkey::find_program_address(&[YES_MINT_SEED, market_pda.as_ref()], program_id);
    if *yes_mint_info.key != yes_mint_pda {
        msg!("Error: Invalid YES Mint PDA");
        return Err(MarketError::InvalidPDA.into());
    }

    // Verify NO Mint PDA
    let (no_mint_pda, no_mint_bump) =
        Pubkey::find_program_address(&[NO_MINT_SEED, market_pda.as_ref()], program_id);
    if *no_mint_info.key != no_mint_pda {
        msg!("Error: Invalid NO Mint PDA");
        return Err(MarketError::InvalidPDA.into());
    }

    // Verify Market Vault PDA
    let (vault_pda, vault_bump) =
        Pubkey::find_program_address(&[MARKET_VAULT_SEED, market_pda.as_ref()], program_id);
    if *vault_info.key != vault_pda {
        msg!("Error: Invalid Market Vault PDA");
        return Err(MarketError::InvalidPDA.into());
    }

    // Create Market account
    create_pda_account(
        creator_info,
        market_info,
        Market::SIZE,
        program_id,
        system_program_info,
        &[
            MARKET_SEED,
            creator_info.key.as_ref(),
            &market_seed_bytes,
            &[market_bump],
        ],
    )?;

    // Create YES Share Mint (authority = Market PDA)
    create_pda_account(
        creator_info,
        yes_mint_info,
        spl_token::state::Mint::LEN,
        token_program_info.key,
        system_program_info,
        &[YES_MINT_SEED, market_pda.as_ref(), &[yes_mint_bump]],
    )?;

    invoke(
        &spl_token::instruction::initialize_mint(
            token_program_info.key,
            yes_mint_info.key,
            market_info.key,       // mint_authority
            Some(market_info.key), // freeze_authority
            SHARE_DECIMALS,
        )?,
        &[yes_mint_info.clone(), rent_info.clone()],
    )?;

    // Create NO Share Mint (authority = Market PDA)
    create_pda_account(
        creator_info,
        no_mint_info,
        spl_token::state::Mint::LEN,
        token_program_info.key,
        system_program_info,
        &[NO_MINT_SEED, market_pda.as_ref(), &[no_mint_bump]],
    )?;

    invoke(
        &spl_token::instruction::initialize_mint(
            token_program_info.key,
            no_mint_info.key,
            market_info.key,       // mint_authority
            Some(market_info.key), // freeze_authority
            SHARE_DECIMALS,
        )?,
        &[no_mint_info.clone(), rent_info.clone()],
    )?;

    // Create Market Vault (settlement-currency token account, owner = Market PDA)
    create_pda_account(
        creator_info,
        vault_info,
        spl_token::state::Account::LEN,
        token_program_info.key,
        system_program_info,
        &[MARKET_VAULT_SEED, market_pda.as_ref(), &[vault_bump]],
    )?;

    invoke(
        &spl_token::instruction::initialize_account(
            token_program_info.key,
            vault_info.key,
            settlement_mint_info.key,
            market_info.key, // owner
        )?,
        &[
            vault_info.clone(),
            settlement_mint_info.clone(),
            market_info.clone(),
            rent_info.clone(),
        ],
    )?;

    // Initialize Market data
    let market = Market {
        discriminator: MARKET_DISCRIMINATOR,
        market_seed: args.market_seed,
        creator: *creator_info.key,
        resolver: args.resolver,
        question: args.question,
        settlement_mint: *settlement_mint_info.key,
        yes_mint: *yes_mint_info.key,
        no_mint: *no_mint_info.key,
        vault: *vault_info.key,
        close_ts: args.close_ts,
        yes_reserve: 0,
        no_reserve: 0,
        resolved: false,
        outcome: None,
        created_at: current_time,
        bump: market_bump,
        reserved: [0u8; 32],
    };

    market.serialize(&mut *market_info.data.borrow_mut())?;

    msg!("Market created successfully");
    msg!("Creator: {}", creator_info.key);
    msg!("Resolver: {}", market.resolver);
    msg!("YES Mint: {}", yes_mint_info.key);
    msg!("NO Mint: {}", no_mint_info.key);
    msg!("Market Vault: {}", vault_info.key);
    msg!("Close Timestamp: {}", market.close_ts);

    Ok(())
}

fn process_buy_shares(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: BuySharesArgs,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Buyer (signer)
    let buyer_info = next_account_info(account_info_iter)?;
    check_signer(buyer_info)?;

    // Account 1: Market (writable)
    let market_info = next_account_info(account_info_iter)?;

    // Account 2: Share Mint (writable)
    let share_mint_info = next_account_info(account_info_iter)?;

    // Account 3: Buyer's Share Token Account (writable)
    let share_account_info = next_account_info(account_info_iter)?;

    // Account 4: Buyer's Settlement Currency Account (writable, deposit source)
    let deposit_source_info = next_account_info(account_info_iter)?;

    // Account 5: Market Vault (writable, deposit destination)
    let vault_info = next_account_info(account_info_iter)?;

    // Account 6: Token Program
    let token_program_info = next_account_info(account_info_iter)?;
    if *token_program_info.key != spl_token::id() {
        return Err(ProgramError::IncorrectProgramId);
    }

    // Load and validate market
    if market_info.owner != program_id {
        return Err(MarketError::InvalidAccountData.into());
    }
    let mut market = deserialize_account::<Market>(&market_info.data.borrow())?;
    if market.discriminator != MARKET_DISCRIMINATOR {
        return Err(MarketError::InvalidAccountData.into());
    }

    // Verify the side's share mint
    let expected_mint = market.side_mint(args.side);
    if *share_mint_info.key != expected_mint {
        msg!("Error: Share mint does not match requested side");
        return Err(MarketError::InvalidShareMint.into());
    }

    // The deposit destination must be the market custody
    if *vault_info.key != market.vault {
        msg!("Error: Deposit must go to the market vault");
        return Err(MarketError::InvalidMarketVault.into());
    }

    // The deposit source must belong to the caller and hold the settlement currency
    let deposit_source = spl_token::state::Account::unpack(&deposit_source_info.data.borrow())?;
    if deposit_source.owner != *buyer_info.key {
        msg!("Error: Deposit source must belong to the buyer");
        return Err(MarketError::InvalidTokenAccountOwner.into());
    }
    if deposit_source.mint != market.settlement_mint {
        msg!("Error: Deposit must be in the settlement currency");
        return Err(MarketError::InvalidSettlementMint.into());
    }

    // Shares land in the buyer's associated token account for the side mint;
    // the buyer must have created it beforehand
    let expected_share_account = get_associated_token_address(buyer_info.key, &expected_mint);
    if *share_account_info.key != expected_share_account {
        msg!("Error: Invalid share token account");
        return Err(MarketError::InvalidShareAccount.into());
    }
    if share_account_info.data_is_empty() {
        msg!("Error: Buyer has no token account for the share mint");
        return Err(MarketError::AccountNotInitialized.into());
    }

    let current_time = get_current_timestamp()?;

    // Guards + reserve accounting; shares are issued 1:1 against the deposit
    let shares = market.record_deposit(args.side, args.amount, current_time)?;

    // Pull the deposit into the vault, then issue shares
    cpi::transfer_deposit(
        token_program_info,
        deposit_source_info,
        vault_info,
        buyer_info,
        args.amount,
    )?;

    let market_seed_bytes = market.market_seed.to_le_bytes();
    let market_seeds: &[&[u8]] = &[
        MARKET_SEED,
        market.creator.as_ref(),
        &market_seed_bytes,
        &[market.bump],
    ];

    cpi::issue_shares(
        token_program_info,
        share_mint_info,
        share_account_info,
        market_info,
        shares,
        market_seeds,
    )?;

    market.serialize(&mut *market_info.data.borrow_mut())?;

    set_return_data(&shares.to_le_bytes());

    msg!("Bought {} shares on {:?}", shares, args.side);
    msg!("Buyer: {}", buyer_info.key);
    msg!(
        "Reserves: YES={} NO={}",
        market.yes_reserve,
        market.no_reserve
    );

    Ok(())
}

fn process_resolve_market(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: ResolveMarketArgs,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Resolver (signer)
    let resolver_info = next_account_info(account_info_iter)?;
    check_signer(resolver_info)?;

    // Account 1: Market (writable)
    let market_info = next_account_info(account_info_iter)?;

    // Load and validate market
    if market_info.owner != program_id {
        return Err(MarketError::InvalidAccountData.into());
    }
    let mut market = deserialize_account::<Market>(&market_info.data.borrow())?;
    if market.discriminator != MARKET_DISCRIMINATOR {
        return Err(MarketError::InvalidAccountData.into());
    }

    // Only the stored resolver may record the outcome
    if *resolver_info.key != market.resolver {
        msg!("Error: Only the resolver may record the outcome");
        return Err(MarketError::Unauthorized.into());
    }

    market.ensure_not_resolved()?;

    let current_time = get_current_timestamp()?;
    market.ensure_past_close(current_time)?;

    let outcome = match args.outcome {
        1 => Side::Yes,
        0 => Side::No,
        _ => {
            msg!("Error: Outcome must be 0 or 1");
            return Err(MarketError::InvalidOutcome.into());
        }
    };

    // Irreversible
    market.resolved = true;
    market.outcome = Some(outcome);

    market.serialize(&mut *market_info.data.borrow_mut())?;

    msg!("Market resolved");
    msg!("Outcome: {:?} wins", outcome);

    Ok(())
}

fn process_claim_winnings(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Claimant (signer)
    let claimant_info = next_account_info(account_info_iter)?;
    check_signer(claimant_info)?;

    // Account 1: Market
    let market_info = next_account_info(account_info_iter)?;

    // Account 2: Winning Share Mint (writable)
    let share_mint_info = next_account_info(account_info_iter)?;

    // Account 3: Claimant's Winning Share Token Account (writable)
    let share_account_info = next_account_info(account_info_iter)?;

    // Account 4: Market Vault (writable)
    let vault_info = next_account_info(account_info_iter)?;

    // Account 5: Claimant's Settlement Currency Account (writable, payout target)
    let payout_account_info = next_account_info(account_info_iter)?;

    // Account 6: Token Program
    let token_program_info = next_account_info(account_info_iter)?;
    if *token_program_info.key != spl_token::id() {
        return Err(ProgramError::IncorrectProgramId);
    }

    // Load and validate market; the Market account is only read here
    if market_info.owner != program_id {
        return Err(MarketError::InvalidAccountData.into());
    }
    let market = deserialize_account::<Market>(&market_info.data.borrow())?;
    if market.discriminator != MARKET_DISCRIMINATOR {
        return Err(MarketError::InvalidAccountData.into());
    }

    market.ensure_resolved()?;
    let winning_mint = market.winning_mint().ok_or(MarketError::NotResolved)?;

    if *share_mint_info.key != winning_mint {
        msg!("Error: Share mint is not the winning mint");
        return Err(MarketError::InvalidShareMint.into());
    }

    if *vault_info.key != market.vault {
        msg!("Error: Invalid market vault");
        return Err(MarketError::InvalidMarketVault.into());
    }

    // The winning holding lives in the claimant's associated token account;
    // an account that was never created is an empty holding
    let expected_share_account = get_associated_token_address(claimant_info.key, &winning_mint);
    if *share_account_info.key != expected_share_account {
        msg!("Error: Invalid share token account");
        return Err(MarketError::InvalidShareAccount.into());
    }
    if share_account_info.data_is_empty() {
        msg!("Error: Claimant holds no winning-side account");
        return Err(MarketError::NoWinningHolding.into());
    }

    let share_account = spl_token::state::Account::unpack(&share_account_info.data.borrow())?;
    let payout = share_account.amount;
    if payout == 0 {
        msg!("Error: Zero winning tokens held");
        return Err(MarketError::NoWinningHolding.into());
    }

    // The payout target must belong to the claimant and hold the settlement currency
    let payout_account = spl_token::state::Account::unpack(&payout_account_info.data.borrow())?;
    if payout_account.owner != *claimant_info.key {
        msg!("Error: Payout account must belong to the claimant");
        return Err(MarketError::InvalidTokenAccountOwner.into());
    }
    if payout_account.mint != market.settlement_mint {
        msg!("Error: Payout account must hold the settlement currency");
        return Err(MarketError::InvalidSettlementMint.into());
    }

    // Reclaim the full winning balance first, then pay out 1:1; a repeat
    // claim finds a zero balance and is rejected above
    cpi::reclaim_shares(
        token_program_info,
        share_account_info,
        share_mint_info,
        claimant_info,
        payout,
    )?;

    let market_seed_bytes = market.market_seed.to_le_bytes();
    let market_seeds: &[&[u8]] = &[
        MARKET_SEED,
        market.creator.as_ref(),
        &market_seed_bytes,
        &[market.bump],
    ];

    cpi::pay_out(
        token_program_info,
        vault_info,
        payout_account_info,
        market_info,
        payout,
        market_seeds,
    )?;

    set_return_data(&payout.to_le_bytes());

    msg!("Claimed {} winnings", payout);
    msg!("Claimant: {}", claimant_info.key);

    Ok(())
}
