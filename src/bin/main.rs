#![forbid(unsafe_code)]

use colored::*;

fn main() {
    println!("{}", "stacks-basics".bright_cyan().bold());
    println!("{}", "-------------".bright_cyan());
    println!();
    println!(
        "{}",
        "Functionality lives in the separate binaries listed below.".yellow()
    );
    println!(
        "{}",
        "Use 'cargo run --bin <binary_name>' to run a specific command.".yellow()
    );
    println!();
    println!("{}", "Available binaries:".bright_green().underline());
    println!(
        "  - {}  {}",
        "stacks-accounts".bright_white(),
        "account info, history, balances, testnet faucet, key generation".dimmed()
    );
    println!(
        "  - {}      {}",
        "stacks-send".bright_white(),
        "build, sign, broadcast and look up STX transfers".dimmed()
    );
    println!();
    println!("{}", "Configuration:".bright_green().underline());
    println!(
        "  {} in the working directory, or {}",
        "stacks-basics.toml".bright_white(),
        "~/.stacks-basics/config.toml".bright_white()
    );
    println!(
        "  {} and {} override the file",
        "STACKS_API_URL".bright_white(),
        "STACKS_SENDER_KEY".bright_white()
    );
    println!();
    println!("{}", "Example:".bright_green().underline());
    println!("{}", "  cargo run --bin stacks-accounts -- history --limit 50".italic());
}
