mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "colletta={level},server={level},ledger={level}",
            level = settings.level
        ))
        .init();

    let ledger = ledger::Ledger::open(settings.data_dir)?;
    tracing::info!("Ledger data directory: {}", ledger.data_dir().display());

    let addr = format!("{}:{}", settings.bind, settings.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    server::run_with_listener(ledger, settings.admin_password, listener).await?;

    Ok(())
}
