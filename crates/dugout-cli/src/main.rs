// Dugout entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so stdout stays clean JSON)
// 2. Load config
// 3. Resolve the card pool path and metric (CLI args override config)
// 4. Load the card pool
// 5. Build and validate the roster
// 6. Write the roster JSON

use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};

use dugout_baseball::pool::loader;
use dugout_baseball::{build_roster, EngineOptions, ScoringMetric};
use dugout_core::config;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("dugout starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: metric={}, shortlist cap {}, bullpen shortlist {}",
        config.engine.metric, config.engine.shortlist_cap, config.engine.bullpen_shortlist
    );

    // 3. Resolve inputs: `dugout [cards-path] [metric]`
    let mut args = std::env::args().skip(1);
    let cards_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&config.data_paths.cards));
    let metric_name = args.next().unwrap_or_else(|| config.engine.metric.clone());
    let metric: ScoringMetric = metric_name
        .parse()
        .with_context(|| format!("invalid scoring metric '{metric_name}'"))?;

    // 4. Load the card pool
    let cards = loader::load_cards(&cards_path)
        .with_context(|| format!("failed to load cards from {}", cards_path.display()))?;

    // 5. Build and validate the roster
    let options = EngineOptions::from(&config.engine);
    let roster = build_roster(&cards, metric, &options);
    for violation in roster.validate() {
        warn!("roster check failed: {}", violation);
    }

    // 6. Write the roster JSON
    let json = serde_json::to_string_pretty(&roster).context("failed to serialize roster")?;
    match &config.output.path {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("failed to write roster to {}", path.display()))?;
            info!("Roster written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("dugout=info,dugout_baseball=info,dugout_core=info,warn")
            }),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
