use std::io::{self, Write};

use ferrosignal_core::SignalReport;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(report: &SignalReport, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(report)?
            } else {
                serde_json::to_string(report)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => write_table(&mut out, report)?,
    }
    Ok(())
}

fn write_table(out: &mut impl Write, report: &SignalReport) -> Result<(), CliError> {
    writeln!(out, "run_id      : {}", report.meta.run_id)?;
    writeln!(out, "generated_at: {}", report.meta.generated_at)?;
    writeln!(out, "source      : {}", report.meta.source)?;
    writeln!(out, "latency_ms  : {}", report.meta.latency_ms)?;
    writeln!(
        out,
        "instrument  : {} ({}, {})",
        report.symbol, report.interval, report.period
    )?;
    writeln!(
        out,
        "latest      : {:.2} at {} ({} bars)",
        report.latest_price, report.latest_timestamp, report.bar_count
    )?;

    writeln!(out, "indicators:")?;
    let snapshot = &report.indicators;
    for (name, value) in [
        ("RSI", snapshot.rsi),
        ("MACD", snapshot.macd),
        ("Signal", snapshot.macd_signal),
        ("MA fast", snapshot.ma_fast),
        ("MA slow", snapshot.ma_slow),
    ] {
        writeln!(out, "  {name:<8}: {}", format_value(value))?;
    }

    match &report.sentiment {
        Some(sentiment) => {
            writeln!(
                out,
                "sentiment   : {:.2} ({}), triggers {}, pages {}/{} ok",
                sentiment.score,
                sentiment.label,
                sentiment.trigger_count,
                sentiment.pages_attempted.saturating_sub(sentiment.pages_failed),
                sentiment.pages_attempted
            )?;
            for sample in &sentiment.samples {
                writeln!(
                    out,
                    "  - [{}] {} ({:.2})",
                    sample.source, sample.headline, sample.polarity
                )?;
            }
        }
        None => writeln!(out, "sentiment   : n/a")?,
    }

    writeln!(out, "pattern     : {}", report.pattern)?;
    writeln!(out, "technical   : {}", report.decision.technical)?;
    writeln!(
        out,
        "signal      : {} (preset {})",
        report.decision.action, report.decision.preset
    )?;

    if !report.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &report.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }
    Ok(())
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("n/a"), |value| format!("{value:.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_render_as_not_available() {
        assert_eq!(format_value(None), "n/a");
        assert_eq!(format_value(Some(49.996)), "50.00");
    }
}
