//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging once per process.
//!
//! ## What Gets Traced
//!
//! - **Store actor**: startup (with the hydrated size), shutdown, every
//!   Create/Update/Delete with the order ID, and rollbacks after failed writes
//! - **Lookups**: one span per search, with the base URL and result count
//! - **Controller**: placements, rejected placements, and the *cause* of every
//!   failure the user only sees a generic message for
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info meal-orders       # Placements and store mutations
//! RUST_LOG=debug meal-orders      # Full payloads and every request
//! ```
//!
//! Logs go to stderr so they never interleave with the rendered order list on stdout.
//!
//! **With `RUST_LOG=info`**, placing one order reads:
//!
//! ```text
//! INFO Actor started entity_type="Order" key="mealOrders" size=0
//! INFO place_order: Order placed input="chicken" id=1718000000000 meal=Chicken Curry
//! INFO place_order:append: Created entity_type="Order" id=1718000000000 size=1
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (e.g. `"warn"`) applies.
/// Calling it again is harmless: later calls leave the first subscriber in place.
pub fn setup_tracing(default_directive: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false) // entity_type and span names carry the context
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
