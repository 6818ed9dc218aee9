use imgpress_core::Config;

// Use mimalloc as the global allocator for lower fragmentation under large image buffers,
// especially on musl-based container images.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let (state, router) = imgpress_api::setup::initialize_app(config.clone()).await?;

    imgpress_api::setup::server::start_server(&config, router).await?;

    state.compressed().drain().await;
    tracing::info!("Pending output writes finished");

    Ok(())
}
