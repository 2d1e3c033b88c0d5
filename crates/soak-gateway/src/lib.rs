//! Push-gateway publisher.
//!
//! Every run pushes the full snapshot under its own job, `<job><run>`, so the gateway keeps
//! one group per run instead of overwriting a single one.

mod config;
pub use config::GatewayConfig;

mod push;
pub use push::Gateway;
