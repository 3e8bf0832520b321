#![forbid(unsafe_code)]
//! Inspect a Stacks account through the hosted API

use clap::{Parser, Subcommand};
use colored::*;
use comfy_table::{Cell, Color as TableColor};
use stacks_basics::address::{get_address_from_private_key, StacksAddress};
use stacks_basics::api::models::{Pagination, TransactionInfo, TransactionStatus};
use stacks_basics::cli::{
    format_stx, format_timestamp, header_table, init_tracing, key_value_table, print_section,
    shorten,
};
use stacks_basics::config::load_config;
use stacks_basics::crypto::StacksPrivateKey;
use stacks_basics::flows::AccountQueryFlow;
use stacks_basics::network::StacksNetwork;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Account to query instead of the configured one
    #[arg(long, global = true)]
    address: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Balance, locked amount and nonce from the node
    Info {
        /// Ask the node to leave out the MARF proofs
        #[arg(long)]
        no_proof: bool,
    },
    /// One page of transaction history
    History {
        /// Page size (the API caps this at 50)
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// STX and token balances
    Balance,
    /// STX balance details only
    Stx,
    /// Request testnet STX from the faucet
    Faucet,
    /// Generate a fresh key pair and print its address
    Generate {
        #[arg(long)]
        mainnet: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    if let Some(Commands::Generate { mainnet }) = &cli.command {
        generate(*mainnet);
        return Ok(());
    }

    let config = load_config()?;
    let address: StacksAddress = match &cli.address {
        Some(address) => address.parse()?,
        None => config.account_address()?,
    };
    let flow = AccountQueryFlow::new(&config.api_configuration()?, address)?;

    println!(
        "{} {} {}",
        "Account".bright_cyan().bold(),
        flow.address().to_string().bright_white(),
        format!("via {}", config.api_url()).dimmed()
    );

    match cli.command {
        None => {
            info(&flow, false).await?;
            balance(&flow).await?;
        }
        Some(Commands::Info { no_proof }) => info(&flow, no_proof).await?,
        Some(Commands::History { limit, offset }) => {
            let page = match (limit, offset) {
                (None, None) => None,
                _ => Some(Pagination { limit, offset }),
            };
            history(&flow, page).await?;
        }
        Some(Commands::Balance) => balance(&flow).await?,
        Some(Commands::Stx) => stx(&flow).await?,
        Some(Commands::Faucet) => faucet(&flow).await?,
        // handled before the config is loaded
        Some(Commands::Generate { .. }) => {}
    }

    Ok(())
}

async fn info(flow: &AccountQueryFlow, no_proof: bool) -> Result<(), Box<dyn std::error::Error>> {
    let info = if no_proof {
        flow.get_account_info_without_proof().await?
    } else {
        flow.get_account_info().await?
    };

    print_section("Account info");
    let table = key_value_table(&[
        ("Balance", format_stx(info.balance)),
        ("Locked", format_stx(info.locked)),
        ("Unlock height", info.unlock_height.to_string()),
        ("Nonce", info.nonce.to_string()),
        (
            "Proofs",
            if info.has_proof() {
                "included".to_string()
            } else {
                "omitted".to_string()
            },
        ),
    ]);
    println!("{}", table);
    Ok(())
}

async fn history(
    flow: &AccountQueryFlow,
    page: Option<Pagination>,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = flow.get_account_transactions(page).await?;

    print_section("Transaction history");
    if page.results.is_empty() {
        println!("{}", "No transactions in this page.".yellow());
        return Ok(());
    }

    let mut table = header_table(&["Txid", "Type", "Status", "Block", "Fee", "Details", "Time"]);
    for tx in &page.results {
        table.add_row(vec![
            Cell::new(shorten(&tx.tx_id.to_string(), 8)).fg(TableColor::White),
            Cell::new(&tx.tx_type).fg(TableColor::Magenta),
            Cell::new(format!("{:?}", tx.tx_status)).fg(status_color(tx.tx_status)),
            Cell::new(
                tx.block_height
                    .map(|h| format!("#{}", h))
                    .unwrap_or_else(|| "mempool".to_string()),
            ),
            Cell::new(format_stx(tx.fee_rate)),
            Cell::new(transfer_details(tx)),
            Cell::new(
                tx.burn_block_time
                    .or(tx.receipt_time)
                    .map(format_timestamp)
                    .unwrap_or_default(),
            )
            .fg(TableColor::Grey),
        ]);
    }
    println!("{}", table);
    println!(
        "{}",
        format!(
            "Showing {} from offset {} of {} total",
            page.results.len(),
            page.offset,
            page.total
        )
        .dimmed()
    );
    Ok(())
}

async fn balance(flow: &AccountQueryFlow) -> Result<(), Box<dyn std::error::Error>> {
    let balance = flow.get_account_balance().await?;

    print_section("Balances");
    println!(
        "{}",
        key_value_table(&[
            ("STX", format_stx(balance.stx.balance)),
            ("Locked", format_stx(balance.stx.locked)),
            ("Fungible tokens", balance.fungible_tokens.len().to_string()),
            (
                "Non-fungible tokens",
                balance.non_fungible_tokens.len().to_string()
            ),
        ])
    );

    if !balance.fungible_tokens.is_empty() {
        let mut tokens = header_table(&["Token", "Balance"]);
        for (token, holding) in &balance.fungible_tokens {
            tokens.add_row(vec![token.clone(), holding.balance.to_string()]);
        }
        println!("{}", tokens);
    }
    Ok(())
}

async fn stx(flow: &AccountQueryFlow) -> Result<(), Box<dyn std::error::Error>> {
    let stx = flow.get_stx_balance().await?;

    print_section("STX balance");
    println!(
        "{}",
        key_value_table(&[
            ("Balance", format_stx(stx.balance)),
            ("Total sent", format_stx(stx.total_sent)),
            ("Total received", format_stx(stx.total_received)),
            ("Fees paid", format_stx(stx.total_fees_sent)),
            ("Miner rewards", format_stx(stx.total_miner_rewards_received)),
            ("Locked", format_stx(stx.locked)),
            ("Burnchain unlock height", stx.burnchain_unlock_height.to_string()),
        ])
    );
    Ok(())
}

async fn faucet(flow: &AccountQueryFlow) -> Result<(), Box<dyn std::error::Error>> {
    let receipt = flow.request_faucet_funds().await?;

    print_section("Faucet");
    if receipt.success {
        println!("{}", "Faucet request accepted.".green().bold());
    } else {
        println!("{}", "Faucet request was not successful.".red().bold());
    }
    if let Some(txid) = receipt.tx_id {
        println!("Txid: {}", txid.to_string().bright_white());
    }
    Ok(())
}

fn generate(mainnet: bool) {
    let network = if mainnet {
        StacksNetwork::Mainnet
    } else {
        StacksNetwork::Testnet
    };
    let key = StacksPrivateKey::generate();
    let address = get_address_from_private_key(&key, network);

    print_section(&format!("New {} key", network));
    println!(
        "{}",
        key_value_table(&[
            ("Address", address.to_string()),
            ("Public key", key.public_key().to_hex()),
            ("Private key", key.to_hex()),
        ])
    );
    println!(
        "{}",
        "Keep the private key secret; anyone holding it controls the account.".yellow()
    );
}

fn transfer_details(tx: &TransactionInfo) -> String {
    match &tx.token_transfer {
        Some(transfer) => {
            let mut details = format!(
                "{} -> {}",
                format_stx(transfer.amount),
                shorten(&transfer.recipient_address, 6)
            );
            if let Some(memo) = transfer.memo_text().filter(|m| !m.is_empty()) {
                details.push_str(&format!(" \"{}\"", memo));
            }
            details
        }
        None => String::new(),
    }
}

fn status_color(status: TransactionStatus) -> TableColor {
    match status {
        TransactionStatus::Success => TableColor::Green,
        TransactionStatus::Pending => TableColor::Yellow,
        TransactionStatus::Unknown => TableColor::Grey,
        _ => TableColor::Red,
    }
}
