use anyhow::Context;
use clap::Parser;
use endurance_core::config::EnduranceCfg;
use endurance_core::{estimator, report};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Estimate battery life from current draw and daily usage.
///
/// Keys can also be set through ENDURANCE_<KEY> environment variables;
/// command-line overrides take precedence.
#[derive(Parser, Debug)]
#[command(name = "endurance")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct CliArgs {
    /// Print the full estimate as JSON
    #[arg(long)]
    json: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    show_config: bool,

    /// Config overrides, e.g. daily_usage_hours=12
    #[arg(value_name = "KEY=VALUE")]
    overrides: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Tracing: JSON lines on stderr when RUST_LOG is set, stdout stays clean
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    }

    let mut cfg = EnduranceCfg::from_env_vars(std::env::vars());
    for pair in &args.overrides {
        cfg.apply_override(pair)
            .with_context(|| format!("bad override {pair:?}"))?;
    }
    tracing::info!(overrides = args.overrides.len(), "configuration loaded");

    if args.show_config {
        println!("{}", report::render_config(&cfg));
        return Ok(());
    }

    let estimate = estimator::evaluate(&cfg.hardware(), &cfg.usage())
        .context("cannot estimate battery life")?;

    if args.json {
        println!("{}", report::render_json(&estimate)?);
    } else {
        println!("{}", report::render_text(&estimate.life));
    }
    Ok(())
}
