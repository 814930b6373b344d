#![cfg(feature = "server")]

use std::net::SocketAddr;

use marslink::config::RelayConfig;
use marslink::server::telemetry::{init_telemetry, shutdown_telemetry};
use marslink::server::{create_game_route, Relay};

#[tokio::main]
pub async fn main() {
    init_telemetry()
        .await
        .expect("failed to initialize tracing");

    let config = RelayConfig::from_env();
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let relay = Relay::new();
    let app = create_game_route(relay, config);

    tracing::info!("relay listening on ws://{}/game", addr);

    // Unrecoverable transport setup failure is the one fatal error here.
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind relay port");
    axum::serve(listener, app)
        .await
        .expect("relay server stopped");

    shutdown_telemetry();
}
