use comanda_server::{Config, Server, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env();
    init_logger_with_file(None, config.log_dir.as_deref());

    tracing::info!("Comanda server starting (env: {})", config.environment);

    let server = Server::new(config);
    server.run().await?;

    Ok(())
}
