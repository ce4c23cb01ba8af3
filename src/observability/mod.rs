//! Observability
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the binary. Store calls are logged at INFO on the `docbridge::store`
//! target with these fields:
//!
//! - `collection`: target collection
//! - `call`: store primitive (`count`, `find`, ...)
//! - `selector`, `options`, `update`: JSON request documents, when sent
//!
//! The event message is the console form built by [`store_call_message`].

mod events;

pub use events::{store_call_message, StoreCall};

use tracing_subscriber::EnvFilter;

/// Installs a JSON subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `filter`. A second call is a no-op.
pub fn init(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
