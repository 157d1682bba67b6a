//! Run command implementation

use crate::config::Config;
use crate::market::{BinanceConfig, BinanceFuturesClient};
use crate::monitor::Monitor;
use crate::notify::Dispatcher;
use crate::signal::TriggerEvaluator;
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override the configured symbol
    #[arg(short, long)]
    pub symbol: Option<String>,
}

impl RunArgs {
    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        if let Some(symbol) = &self.symbol {
            config.market.symbol = symbol.clone();
        }
        config.validate()?;

        let source = Arc::new(BinanceFuturesClient::with_config(BinanceConfig::from(
            &config.data,
        )));
        let sink = Arc::new(Dispatcher::from_config(&config));
        let evaluator = TriggerEvaluator::new(config.thresholds.clone());
        let monitor = Monitor::new(&config.market, source, evaluator, sink);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                    let _ = shutdown_tx.send(true);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to listen for shutdown signal");
                    // Keep the sender alive so a dropped channel does not stop the loop
                    std::future::pending::<()>().await;
                }
            }
        });

        monitor.run(shutdown_rx).await;
        Ok(())
    }
}
