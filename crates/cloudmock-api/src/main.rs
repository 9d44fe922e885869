use cloudmock_api::setup::{initialize_app, server::start_server};
use cloudmock_core::Config;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let (_state, app) = initialize_app(config.clone()).await?;

    start_server(&config, app).await
}
