//! CLI argument definitions for ferrosignal.
//!
//! # Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--symbol` | `IUSA.L` | Instrument ticker |
//! | `--interval` | `1h` | Bar interval |
//! | `--period` | per interval | Lookback period (`60d` for 1h, `6mo` for 1d) |
//! | `--preset` | `combined` | Decision preset |
//! | `--config` | none | TOML config file |
//! | `--no-news` | `false` | Skip the sentiment stage |
//! | `--mock` | `false` | Use deterministic offline prices, no network |
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | config | Per-page news timeout |
//! | `-v` | warn | Log verbosity on stderr |
//!
//! # Examples
//!
//! ```bash
//! ferrosignal --pretty
//! ferrosignal --interval 1d --preset confirmed --format table
//! ferrosignal --mock --no-news
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

/// Buy/sell/hold signal for a single ETF from technical indicators and news sentiment.
#[derive(Debug, Parser)]
#[command(name = "ferrosignal", author, version)]
pub struct Cli {
    /// Instrument ticker, exchange suffix included.
    #[arg(long)]
    pub symbol: Option<String>,

    /// Bar interval (1m, 5m, 15m, 1h, 1d, 1wk).
    #[arg(long)]
    pub interval: Option<String>,

    /// Lookback period (e.g. 60d, 6mo, 1y, max).
    #[arg(long)]
    pub period: Option<String>,

    /// Decision preset (technical, combined, confirmed, rsi_macd, macd_cross,
    /// moving_average, rsi_sentiment).
    #[arg(long)]
    pub preset: Option<String>,

    /// Optional TOML configuration file; flags override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip news scraping and sentiment scoring.
    #[arg(long)]
    pub no_news: bool,

    /// Use deterministic synthetic prices and no network access.
    #[arg(long)]
    pub mock: bool,

    /// Per-page news request timeout in milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Increase log verbosity (-v info, -vv debug). Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}
