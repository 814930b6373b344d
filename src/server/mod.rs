mod connection;
mod error;
mod registry;
mod relay;
pub mod route;
pub mod telemetry;
pub mod websocket_listener;

pub use connection::Connection;
pub use error::RelayError;
pub use registry::RoleRegistry;
pub use relay::{Relay, RelayHandler};
pub use route::create_game_route;
