//! Target discovery.
//!
//! Lists a directory once at startup and turns each entry into a [`soak_model::Target`].
//! Files become targets named after their stem (`login.spec` -> `login`), directories keep their full name.

mod config;
pub use config::DiscoverConfig;

mod errors;
pub use errors::DiscoverError;

mod scan;
pub use scan::{discover, resolve};
