use ideaport_api::setup;
use ideaport_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    setup::init_tracing();

    let config = Config::from_env()?;

    let (_state, router, worker) = setup::initialize_app(config.clone()).await?;

    setup::server::start_server(&config, router).await?;

    worker.shutdown().await;

    Ok(())
}
