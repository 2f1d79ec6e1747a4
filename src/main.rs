use orderslot::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting orderslot");

    // Load configuration
    let config = startup::load_config().await?;

    // Resolve the order time for this session
    startup::run(config).await
}
