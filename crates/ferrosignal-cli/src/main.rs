mod cli;
mod error;
mod output;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ferrosignal_core::{
    DecisionPreset, HttpClient, HttpNewsSource, Interval, LookbackPeriod, NewsSource, Pipeline,
    PriceSource, ReqwestHttpClient, SignalConfig, StaticNewsSource, Symbol, SyntheticSource,
    YahooChartSource,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::CliError;

/// Headlines served to every configured news URL under `--mock`.
const MOCK_NEWS_PAGE: &str = "<html><body>\
    <h1>Stocks rally as tech earnings beat forecasts</h1>\
    <h2>Bond yields steady ahead of central bank minutes</h2>\
    <h3>Analysts see modest growth for European equities</h3>\
    </body></html>";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    // Ignore the error: a subscriber may already be installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let config = resolve_config(cli)?;
    debug!(?config, "resolved configuration");

    let prices: Arc<dyn PriceSource>;
    let news: Arc<dyn NewsSource>;
    if cli.mock {
        prices = Arc::new(SyntheticSource::default());
        news = Arc::new(
            config
                .news
                .urls
                .iter()
                .fold(StaticNewsSource::new(), |news, url| {
                    news.with_page(url.clone(), MOCK_NEWS_PAGE)
                }),
        );
    } else {
        let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
        prices = Arc::new(YahooChartSource::new(http.clone()));
        news = Arc::new(HttpNewsSource::new(http));
    }

    let report = Pipeline::new(config, prices, news).run().await?;
    output::render(&report, cli.format, cli.pretty)
}

/// Defaults, then the config file, then flags.
fn resolve_config(cli: &Cli) -> Result<SignalConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => SignalConfig::load(path)?,
        None => SignalConfig::default(),
    };

    if let Some(symbol) = &cli.symbol {
        config.symbol = Symbol::parse(symbol)?;
    }
    if let Some(interval) = &cli.interval {
        config.interval = interval.parse::<Interval>()?;
        // An interval flag without a period flag selects that interval's default window.
        config.period = None;
    }
    if let Some(period) = &cli.period {
        config.period = Some(period.parse::<LookbackPeriod>()?);
    }
    if let Some(preset) = &cli.preset {
        config.decision.preset = preset.parse::<DecisionPreset>()?;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.news.timeout_ms = timeout_ms;
    }
    if cli.no_news {
        config.news.enabled = false;
    }

    config.validate()?;
    Ok(config)
}
