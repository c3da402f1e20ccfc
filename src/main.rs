// =============================================================================
// fade-signals — Command-line runner
// =============================================================================
//
// Reads a JSON array of daily bars, runs the full pipeline and prints the
// report as JSON on stdout.  Logs go to stderr so stdout stays parseable.
//
//   fade-signals <bars.json> [SYMBOL]
//
// Environment:
//   FADE_CONFIG  path of the rule config JSON (default: rule_config.json)
//   RUST_LOG     tracing filter (default: info)
// =============================================================================

use anyhow::{bail, Context};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fade_signals::{Bar, BarSeries, Pipeline, RuleConfig};

fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path =
        std::env::var("FADE_CONFIG").unwrap_or_else(|_| "rule_config.json".into());
    let config = RuleConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuleConfig::default()
    });

    let mut args = std::env::args().skip(1);
    let Some(bars_path) = args.next() else {
        bail!("usage: fade-signals <bars.json> [SYMBOL]");
    };
    let symbol = args.next().unwrap_or_else(|| "QQQ".to_string());

    // ── 2. Ingest ────────────────────────────────────────────────────────
    let content = std::fs::read_to_string(&bars_path)
        .with_context(|| format!("failed to read bars from {bars_path}"))?;
    let bars: Vec<Bar> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse bars from {bars_path}"))?;

    let series = BarSeries::new(symbol, bars).context("bar series rejected")?;
    info!(symbol = series.symbol(), bars = series.len(), "bars loaded");

    // ── 3. Run ───────────────────────────────────────────────────────────
    let report = Pipeline::new(series, config)
        .and_then(Pipeline::run)
        .context("signal pipeline aborted")?;

    for line in report.stats.to_string().lines().filter(|l| !l.is_empty()) {
        info!("{line}");
    }

    // ── 4. Emit ──────────────────────────────────────────────────────────
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to serialise report")?
    );

    Ok(())
}
