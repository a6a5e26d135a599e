use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use mock_server::ServerConfig;
use tokio::{net::TcpListener, sync::RwLock};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mock_server=info")))
        .init();

    let config = ServerConfig::from_env();
    let db = if config.seed_demo {
        mock_server::demo_db(Utc::now())
    } else {
        Arc::new(RwLock::new(HashMap::new()))
    };

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, seed_demo = config.seed_demo, "listening");
    mock_server::run_with_db(listener, db).await
}
