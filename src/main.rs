use balance_watch::{
    init_tracing, AlertRouter, ChainSources, Config, Gateway, Scheduler, SimplePriceOracle,
};
use eyre::Result;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config_path =
        std::env::var("BALANCE_WATCH_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    // Missing settings are not fatal; run on defaults
    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default settings");
        Config::default()
    });

    let timeout = config.fetch_timeout();
    let sources = ChainSources::new(timeout)?;
    let prices = SimplePriceOracle::new(&config.price.base_url, timeout)?;
    let gateway = Gateway::from_config(&config.notifications, timeout)?;
    let router = AlertRouter::new(gateway, &config.notifications);

    let loader = config.network_loader();
    tracing::info!(
        networks = %loader.path().display(),
        interval_secs = config.interval_secs,
        merge = ?config.merge_strategy,
        "balance monitoring started"
    );

    let mut scheduler = Scheduler::new(
        loader,
        sources,
        prices,
        router,
        config.merge_strategy,
        config.interval(),
    );
    scheduler.run().await;

    Ok(())
}
