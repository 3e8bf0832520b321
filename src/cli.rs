//! Shared helpers for the command-line binaries

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};
use tracing_subscriber::EnvFilter;

/// micro-STX per STX
pub const MICRO_STX_PER_STX: u128 = 1_000_000;

/// Installs the fmt subscriber; `RUST_LOG` wins over the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // a second init in the same process is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// `1500000` -> `"1.500000 STX"`
pub fn format_stx(micro_stx: u128) -> String {
    format!(
        "{}.{:06} STX",
        micro_stx / MICRO_STX_PER_STX,
        micro_stx % MICRO_STX_PER_STX
    )
}

pub fn format_timestamp(timestamp: i64) -> String {
    use chrono::DateTime;

    match DateTime::from_timestamp(timestamp, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "Invalid".to_string(),
    }
}

/// Keeps the head and tail of long identifiers. Counts chars, not bytes.
pub fn shorten(s: &str, keep: usize) -> String {
    let len = s.chars().count();
    if len <= keep * 2 + 3 {
        return s.to_string();
    }
    let head: String = s.chars().take(keep).collect();
    let tail: String = s.chars().skip(len - keep).collect();
    format!("{}...{}", head, tail)
}

pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("── {} ──", title).bright_cyan().bold());
}

/// A two-column table of labelled values.
pub fn key_value_table(rows: &[(&str, String)]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for (label, value) in rows {
        table.add_row(vec![
            Cell::new(label)
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new(value).fg(TableColor::White),
        ]);
    }
    table
}

/// A table with a bold cyan header row.
pub fn header_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| {
                    Cell::new(h)
                        .fg(TableColor::Cyan)
                        .add_attribute(Attribute::Bold)
                })
                .collect::<Vec<_>>(),
        );
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_stx() {
        assert_eq!(format_stx(0), "0.000000 STX");
        assert_eq!(format_stx(1_000_000), "1.000000 STX");
        assert_eq!(format_stx(1_500_042), "1.500042 STX");
        assert_eq!(format_stx(180), "0.000180 STX");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00");
        assert_eq!(format_timestamp(i64::MAX), "Invalid");
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("abc", 4), "abc");
        assert_eq!(
            shorten("0x51e5aaaa6e56ea9edbc135858f1bb5c9", 6),
            "0x51e5...1bb5c9"
        );
    }

    #[test]
    fn test_shorten_multibyte() {
        // memos are free text and may hold non-ASCII
        assert_eq!(shorten("ééééééééééé", 2), "éé...éé");
        assert_eq!(shorten("a→b→c→d→e→f", 3), "a→b...e→f");
        assert_eq!(shorten("héllo", 1), "héllo");
    }

    #[test]
    fn test_tables_render_rows() {
        let table = key_value_table(&[("Nonce", "3".to_string())]);
        let rendered = table.to_string();
        assert!(rendered.contains("Nonce"));
        assert!(rendered.contains('3'));

        let mut history = header_table(&["Txid", "Status"]);
        history.add_row(vec!["0xabc", "success"]);
        assert!(history.to_string().contains("Status"));
    }
}
