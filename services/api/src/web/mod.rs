pub mod rest;
pub mod state;

// Re-export the router builder to make it easily accessible to the binary
// that serves the application and to the integration tests.
pub use rest::{api_router, ApiDoc};
