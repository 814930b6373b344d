use crate::config::RelayConfig;
use crate::server::{websocket_listener, Relay};
use axum::extract::WebSocketUpgrade;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{routing::get, Router};
use tracing::warn;

pub fn create_game_route(relay: Relay, config: RelayConfig) -> Router {
    Router::new().route(
        "/game",
        get(move |ws: WebSocketUpgrade, headers: HeaderMap| {
            let relay = relay.clone();
            let config = config.clone();
            async move {
                let origin = headers
                    .get(header::ORIGIN)
                    .and_then(|value| value.to_str().ok());
                if !config.origin_allowed(origin) {
                    warn!(?origin, "rejecting upgrade from disallowed origin");
                    return StatusCode::FORBIDDEN.into_response();
                }
                websocket_listener::handle_websocket(ws, relay)
                    .await
                    .into_response()
            }
        }),
    )
}
