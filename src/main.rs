use clap::Parser;
use perp_watch::cli::{Cli, Commands};
use perp_watch::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        // Return a default config for now
        toml::from_str(include_str!("../config.toml.example")).expect("Invalid default config")
    });

    // Initialize telemetry
    let _guard = perp_watch::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting monitor");
            args.execute(config).await?;
        }
        Commands::Check(args) => {
            tracing::info!("Running single cycle check");
            args.execute(config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Market: {} ({} mode, every {}m)",
                config.market.symbol, config.market.mode, config.market.refresh_minutes
            );
            println!("  Data: {}", config.data.base_url);
            println!(
                "  Webhook: {}",
                config.webhook.url.as_deref().unwrap_or("(not set)")
            );
            println!(
                "  Telegram: {}",
                if config.telegram.bot_token.is_some() && config.telegram.chat_id.is_some() {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            println!(
                "  Thresholds: price>={}%, oi>={}%, liqs>={}, volume>={}x",
                config.thresholds.price_move_pct,
                config.thresholds.oi_delta_pct,
                config.thresholds.big_liqs_count,
                config.thresholds.volume_spike_ratio
            );
        }
    }

    Ok(())
}
