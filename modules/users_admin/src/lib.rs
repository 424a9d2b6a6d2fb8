// === PUBLIC CONTRACT ===
// Transport-agnostic models, errors and the client trait other crates consume
pub mod contract;

pub use contract::{client, error, model};

// === CONFIGURATION ===
pub mod config;
pub use config::UsersAdminConfig;

// === VIEW CORE ===
// Client-side state machines driving the users page (list, cache, modal workflow)
pub mod view;

// === INTERNAL MODULES ===
// Exposed for wiring in the server binary and for integration tests.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
