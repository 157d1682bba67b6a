//! Check command implementation

use crate::config::Config;
use crate::market::{BinanceConfig, BinanceFuturesClient, MarketData};
use crate::signal::TriggerEvaluator;
use clap::Args;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Override the configured symbol
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    /// Fetch one snapshot, evaluate it, and print the outcome without
    /// dispatching any notification
    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        if let Some(symbol) = &self.symbol {
            config.market.symbol = symbol.clone();
        }
        config.validate()?;

        let client = BinanceFuturesClient::with_config(BinanceConfig::from(&config.data));
        let evaluator = TriggerEvaluator::new(config.thresholds.clone());

        let snapshot = client
            .fetch(&config.market.symbol, &config.market.mode)
            .await?;
        let result = evaluator.evaluate(&snapshot);

        if self.json {
            let output = serde_json::json!({
                "symbol": snapshot.symbol,
                "lastPrice": snapshot.last_price(),
                "trigger": result,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!(
                "{} last price: {}",
                snapshot.symbol,
                snapshot.last_price()
            );
            println!("  price_move_5m: {}%", result.price_move_5m_pct);
            println!("  oi_delta: {}%", result.oi_delta_pct);
            println!("  big_liqs: {}", result.big_liqs_count);
            println!("  volume_spike: {}", result.volume_spike);
            if result.fired {
                println!("  trigger: FIRED ({})", result.reasons.join(", "));
            } else {
                println!("  trigger: quiet");
            }
        }

        Ok(())
    }
}
