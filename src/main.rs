mod api;
mod config;
mod domain;
mod error;
mod poller;
mod report;

use envconfig::Envconfig;
use poller::Poller;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();
    let config = config::Config::init_from_env()?;

    log::info!(
        "Polling channel {} at {} every {}s",
        config.channel_id,
        config.api_base_url,
        config.poll_interval_secs
    );

    let client = api::init_client(&config)?;
    let mut poller = Poller::new(client, std::io::stdout(), config.feed_results);
    poller
        .run(config.poll_interval(), config.max_polls)
        .await?;

    log::info!(
        "Stopped with watermark {:?}",
        poller.watermark().value()
    );
    Ok(())
}
