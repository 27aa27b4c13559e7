use tokio::net::TcpListener;
use tracing::{error, info};

use tripcheck_server::{logging, serve, AppState, DbState, ServerConfig};

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env();
    logging::init_tracing(config.log_json);

    let db_state = match DbState::open(&config.db_path) {
        Ok(db) => db,
        Err(e) => {
            error!(path = %config.db_path.display(), "failed to open database: {}", e);
            std::process::exit(1);
        }
    };
    info!(path = %config.db_path.display(), "database ready");

    let listener = match TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, "failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for shutdown signal: {}", e);
        }
        info!("shutting down");
    };

    if let Err(e) = serve(listener, AppState::new(db_state), shutdown).await {
        error!("server error: {}", e);
        std::process::exit(1);
    }
}
