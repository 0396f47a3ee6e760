/**
 * Sample Server Entry Point
 *
 * Serves the canned household list on `/api/items`.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config_path = std::env::var("HEARTHLIST_CONFIG").unwrap_or_else(|_| "hearthlist.toml".to_string());
    let config = hearthlist::shared::AppConfig::load(&config_path)?;
    config.validate()?;

    let app = hearthlist::backend::create_app();

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Starting sample server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin hearthlist-sample-server --features ssr");
    std::process::exit(1);
}
