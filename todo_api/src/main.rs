use tokio::net::TcpListener;
use todo_api::config::AppConfig;
use todo_api::server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    server::init_tracing(&config.log_filter);

    let db = server::connect(&config.database_url).await?;
    let app = server::build_router(db, config.request_timeout).await?;

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Todo API listening");
    server::serve(listener, app).await?;
    Ok(())
}
