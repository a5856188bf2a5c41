//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use medilog_core::ports::RecordStore;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
///
/// The store is held behind the `RecordStore` port, so handlers never know
/// which storage engine is serving them.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub config: Arc<Config>,
}
