#![forbid(unsafe_code)]
//! Build, sign and broadcast STX token transfers

use clap::{Args, Parser, Subcommand};
use colored::*;
use stacks_basics::address::{get_address_from_private_key, PrincipalData, StacksAddress};
use stacks_basics::cli::{format_stx, format_timestamp, init_tracing, key_value_table, print_section};
use stacks_basics::config::{load_config, Config};
use stacks_basics::crypto::StacksPrivateKey;
use stacks_basics::flows::{TransferFlow, TransferLookup};
use stacks_basics::network::StacksNetwork;
use stacks_basics::transaction::{SignedTransaction, StacksTransaction, Txid};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build, sign and broadcast a transfer
    Send(TransferArgs),
    /// Build and sign a transfer, print its hex without broadcasting
    Sign(TransferArgs),
    /// Look up a transaction by id
    Status {
        /// Transaction id, with or without 0x
        txid: String,
    },
    /// Next nonce for an address (defaults to the sender)
    Nonce { address: Option<String> },
    /// Decode a serialized transaction
    Decode {
        /// Hex-encoded transaction bytes
        hex: String,
    },
}

#[derive(Args)]
struct TransferArgs {
    /// Recipient principal (address or address.contract)
    #[arg(long)]
    recipient: Option<String>,
    /// Amount in micro-STX
    #[arg(long)]
    amount: Option<u64>,
    /// Fee in micro-STX
    #[arg(long, conflicts_with = "estimate_fee")]
    fee: Option<u64>,
    /// Use the node's fee rate times the transaction length
    #[arg(long)]
    estimate_fee: bool,
    #[arg(long, conflicts_with = "fetch_nonce")]
    nonce: Option<u64>,
    /// Ask the node for the sender's next nonce
    #[arg(long)]
    fetch_nonce: bool,
    #[arg(long)]
    memo: Option<String>,
    /// Read the sender key from the terminal instead of the config
    #[arg(long)]
    prompt_key: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config()?;

    match cli.command {
        Commands::Send(args) => {
            let (flow, signed) = prepare(&config, &args).await?;
            if flow.network() == StacksNetwork::Mainnet {
                println!("{}", "Broadcasting to MAINNET.".yellow().bold());
            }
            let txid = flow.broadcast(&signed).await?;
            println!();
            println!("{}", "Transaction broadcast.".green().bold());
            println!("Txid: {}", txid.to_string().bright_white());
        }
        Commands::Sign(args) => {
            let (flow, signed) = prepare(&config, &args).await?;
            println!();
            println!("{}", "Serialized transaction:".bright_green().underline());
            println!("{}", flow.serialize_hex(&signed));
        }
        Commands::Status { txid } => {
            let txid: Txid = txid.parse()?;
            let lookup = TransferLookup::new(&config.api_configuration()?)?;
            status(&lookup, &txid).await?;
        }
        Commands::Nonce { address } => {
            // only the sender's own nonce needs the key
            let address: StacksAddress = match address {
                Some(address) => address.parse()?,
                None => get_address_from_private_key(&config.sender_key()?, config.network()),
            };
            let lookup = TransferLookup::new(&config.api_configuration()?)?;
            let nonce = lookup.fetch_nonce(&address).await?;
            println!("{} {}", address.to_string().bright_white(), nonce.to_string().bold());
        }
        Commands::Decode { hex } => decode(&hex)?,
    }

    Ok(())
}

fn transfer_flow(
    config: &Config,
    sender_key: StacksPrivateKey,
    recipient: PrincipalData,
) -> Result<TransferFlow, Box<dyn std::error::Error>> {
    Ok(TransferFlow::new(
        &config.api_configuration()?,
        config.network(),
        sender_key,
        recipient,
    )?)
}

/// Builds the request from config plus flags, settles nonce and fee, signs.
async fn prepare(
    config: &Config,
    args: &TransferArgs,
) -> Result<(TransferFlow, SignedTransaction), Box<dyn std::error::Error>> {
    let sender_key = if args.prompt_key {
        let key = rpassword::prompt_password("Sender private key: ")?;
        StacksPrivateKey::from_hex(key.trim())?
    } else {
        config.sender_key()?
    };
    let recipient = match &args.recipient {
        Some(recipient) => recipient.parse()?,
        None => config.recipient()?,
    };
    let flow = transfer_flow(config, sender_key, recipient)?;
    let sender = flow.sender_address();

    let nonce = if args.fetch_nonce {
        flow.fetch_nonce(&sender).await?
    } else {
        args.nonce.unwrap_or(config.transfer.nonce)
    };

    let mut request = flow.build_transfer_request(
        args.amount.unwrap_or(config.transfer.amount),
        args.fee.unwrap_or(config.transfer.fee),
        nonce,
        args.memo.as_deref().unwrap_or(&config.transfer.memo),
    )?;

    if args.estimate_fee {
        let estimate = flow.estimate_fee(&request).await?;
        request = request.with_fee(estimate.fee);
    }

    let signed = flow.sign(&request);

    print_section("Transfer");
    println!(
        "{}",
        key_value_table(&[
            ("Network", flow.network().to_string()),
            ("From", sender.to_string()),
            ("To", flow.recipient().to_string()),
            ("Amount", format_stx(u128::from(request.amount))),
            ("Fee", format_stx(u128::from(request.fee))),
            ("Nonce", request.nonce.to_string()),
            ("Memo", signed.memo()),
            ("Size", format!("{} bytes", flow.serialize(&signed).len())),
            ("Txid", signed.txid().to_string()),
        ])
    );

    Ok((flow, signed))
}

async fn status(lookup: &TransferLookup, txid: &Txid) -> Result<(), Box<dyn std::error::Error>> {
    let info = lookup.get_transaction_status(txid).await?;

    print_section("Transaction status");
    let mut rows = vec![
        ("Txid", info.tx_id.to_string()),
        ("Status", format!("{:?}", info.tx_status)),
        ("Type", info.tx_type.clone()),
        ("Nonce", info.nonce.to_string()),
        ("Fee", format_stx(info.fee_rate)),
    ];
    if let Some(sender) = &info.sender_address {
        rows.push(("Sender", sender.clone()));
    }
    if let Some(height) = info.block_height {
        rows.push(("Block", format!("#{}", height)));
    }
    if let Some(time) = info.burn_block_time.or(info.receipt_time) {
        rows.push(("Time", format_timestamp(time)));
    }
    if let Some(transfer) = &info.token_transfer {
        rows.push(("Recipient", transfer.recipient_address.clone()));
        rows.push(("Amount", format_stx(transfer.amount)));
        if let Some(memo) = transfer.memo_text() {
            rows.push(("Memo", memo));
        }
    }
    println!("{}", key_value_table(&rows));

    if !info.tx_status.is_final() {
        println!("{}", "Not yet confirmed.".yellow());
    }
    Ok(())
}

fn decode(hex_str: &str) -> Result<(), Box<dyn std::error::Error>> {
    let tx = StacksTransaction::from_hex(hex_str)?;

    print_section("Decoded transaction");
    println!(
        "{}",
        key_value_table(&[
            ("Network", tx.network().to_string()),
            ("Chain id", format!("0x{:08x}", tx.chain_id)),
            ("Signer", hex::encode(tx.auth.signer)),
            ("Nonce", tx.nonce().to_string()),
            ("Fee", format_stx(u128::from(tx.fee()))),
            ("Recipient", tx.payload.recipient.to_string()),
            ("Amount", format_stx(u128::from(tx.payload.amount))),
            ("Memo", tx.memo()),
            ("Txid", tx.txid().to_string()),
        ])
    );

    if !tx.is_signed() {
        println!("{}", "Unsigned.".yellow());
    } else {
        match tx.validate() {
            Ok(()) => println!("{}", "Signature and network fields valid.".green().bold()),
            Err(e) => println!("{} {}", "Validation failed:".red().bold(), e),
        }
    }
    Ok(())
}
