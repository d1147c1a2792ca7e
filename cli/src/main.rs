//! pairswap CLI - local harness for the constant-product pair engine
//!
//! Drives an exchange persisted as a JSON snapshot: create pairs, credit
//! test tokens, and run mint/burn/swap/sync against them. Each invocation
//! is one "transaction": the state file is rewritten only when the
//! operation succeeds.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use pair_engine::{sort_tokens, AccountId, Exchange, TokenId};

mod config;
mod store;

use config::Config;

#[derive(Parser)]
#[command(name = "pairswap")]
#[command(about = "Constant-product pair engine - local exchange harness", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the exchange state file (default: ~/.pairswap/state.json)
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Block timestamp in seconds (default: current system time)
    #[arg(short, long)]
    timestamp: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the unique pair for two tokens
    CreatePair {
        token_a: String,
        token_b: String,
    },

    /// Credit test tokens to an account
    Faucet {
        account: String,
        token: String,
        amount: u128,
    },

    /// Deposit both tokens and mint liquidity to the sender
    Mint {
        sender: String,
        token_a: String,
        amount_a: u128,
        token_b: String,
        amount_b: u128,
    },

    /// Redeem liquidity for both underlying tokens
    Burn {
        sender: String,
        token_a: String,
        token_b: String,
        liquidity: u128,
        /// Recipient of the underlying tokens (default: sender)
        #[arg(long)]
        to: Option<String>,
    },

    /// Trade against a pair
    Swap {
        sender: String,
        token_in: String,
        amount_in: u128,
        token_out: String,
        /// Exact output to request (default: the quoted maximum)
        #[arg(long)]
        amount_out: Option<u128>,
        /// Recipient of the output tokens (default: sender)
        #[arg(long)]
        to: Option<String>,
    },

    /// Quote the output for a given input without trading
    Quote {
        token_in: String,
        amount_in: u128,
        token_out: String,
    },

    /// Force a reserve/price refresh with no balance change
    Sync {
        token_a: String,
        token_b: String,
    },

    /// Print a pair's state snapshot
    State {
        token_a: String,
        token_b: String,
    },

    /// Set or clear the protocol-fee collector for a pair
    SetFeeCollector {
        token_a: String,
        token_b: String,
        /// Collector account; omit to disable the protocol fee
        collector: Option<String>,
    },
}

/// 64-char hex parses as a raw id; anything else is a deterministic seed.
fn token(arg: &str) -> TokenId {
    arg.parse().unwrap_or_else(|_| TokenId::from_seed(arg))
}

fn account(arg: &str) -> AccountId {
    arg.parse().unwrap_or_else(|_| AccountId::from_seed(arg))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default()
            .default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    let config = Config::resolve(cli.state)?;
    let now = match cli.timestamp {
        Some(ts) => ts,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock is before the epoch")?
            .as_secs(),
    };

    let mut exchange = store::load(&config.state_path)?;
    run(&mut exchange, &cli.command, now)?;
    store::save(&config.state_path, &exchange)?;
    Ok(())
}

fn run(exchange: &mut Exchange, command: &Commands, now: u64) -> Result<()> {
    match command {
        Commands::CreatePair { token_a, token_b } => {
            let pair = exchange.create_pair(token(token_a), token(token_b))?;
            println!("{} pair {}", "created".green().bold(), pair.account());
            println!("  token0: {}", pair.token0());
            println!("  token1: {}", pair.token1());
        }
        Commands::Faucet {
            account: acct,
            token: tok,
            amount,
        } => {
            exchange.faucet(account(acct), token(tok), *amount);
            println!("{} {} of {} to {}", "credited".green().bold(), amount, token(tok), account(acct));
        }
        Commands::Mint {
            sender,
            token_a,
            amount_a,
            token_b,
            amount_b,
        } => {
            let event = exchange.mint(
                account(sender),
                token(token_a),
                *amount_a,
                token(token_b),
                *amount_b,
                now,
            )?;
            println!("{} {}", "mint".green().bold(), serde_json::to_string_pretty(&event)?);
        }
        Commands::Burn {
            sender,
            token_a,
            token_b,
            liquidity,
            to,
        } => {
            let sender = account(sender);
            let to = to.as_deref().map(account).unwrap_or(sender);
            let event = exchange.burn(sender, to, token(token_a), token(token_b), *liquidity, now)?;
            println!("{} {}", "burn".green().bold(), serde_json::to_string_pretty(&event)?);
        }
        Commands::Swap {
            sender,
            token_in,
            amount_in,
            token_out,
            amount_out,
            to,
        } => {
            let sender = account(sender);
            let to = to.as_deref().map(account).unwrap_or(sender);
            let amount_out = match amount_out {
                Some(amount) => *amount,
                None => quote_out(exchange, token(token_in), *amount_in, token(token_out))?,
            };
            let event = exchange.swap(
                sender,
                to,
                token(token_in),
                *amount_in,
                token(token_out),
                amount_out,
                now,
            )?;
            println!("{} {}", "swap".green().bold(), serde_json::to_string_pretty(&event)?);
        }
        Commands::Quote {
            token_in,
            amount_in,
            token_out,
        } => {
            let out = quote_out(exchange, token(token_in), *amount_in, token(token_out))?;
            println!("{} {} out for {} in", "quote".cyan().bold(), out, amount_in);
        }
        Commands::Sync { token_a, token_b } => {
            let event = exchange.sync(token(token_a), token(token_b), now)?;
            println!("{} {}", "sync".green().bold(), serde_json::to_string_pretty(&event)?);
        }
        Commands::State { token_a, token_b } => {
            let pair = exchange.pair(token(token_a), token(token_b))?;
            let state = pair.fetch_state();
            println!("{} {}", "pair".cyan().bold(), pair.account());
            println!("  token0:                 {}", pair.token0());
            println!("  token1:                 {}", pair.token1());
            println!("  reserve0:               {}", state.reserve0);
            println!("  reserve1:               {}", state.reserve1);
            println!("  total_supply:           {}", state.total_supply);
            println!("  block_timestamp_last:   {}", state.block_timestamp_last);
            println!("  price0_cumulative_last: {}", state.price0_cumulative_last);
            println!("  price1_cumulative_last: {}", state.price1_cumulative_last);
            println!("  k_last:                 {}", state.k_last);
            match pair.fee_collector() {
                Some(collector) => println!("  fee_collector:          {collector}"),
                None => println!("  fee_collector:          (off)"),
            }
        }
        Commands::SetFeeCollector {
            token_a,
            token_b,
            collector,
        } => {
            let collector = collector.as_deref().map(account);
            exchange.set_fee_collector(token(token_a), token(token_b), collector)?;
            match collector {
                Some(c) => println!("{} collector {}", "fee on".green().bold(), c),
                None => println!("{}", "fee off".yellow().bold()),
            }
        }
    }
    Ok(())
}

/// Quote against the pair's current reserves, oriented by `token_in`.
fn quote_out(
    exchange: &Exchange,
    token_in: TokenId,
    amount_in: u128,
    token_out: TokenId,
) -> Result<u128> {
    let pair = exchange.pair(token_in, token_out)?;
    let state = pair.fetch_state();
    let (reserve_in, reserve_out) = if sort_tokens(token_in, token_out).0 == token_in {
        (state.reserve0, state.reserve1)
    } else {
        (state.reserve1, state.reserve0)
    };
    if reserve_in == 0 || reserve_out == 0 {
        bail!("pair has no liquidity");
    }
    Ok(pair_model::pricing::get_amount_out(amount_in, reserve_in, reserve_out)
        .map_err(pair_engine::EngineError::from)?)
}
