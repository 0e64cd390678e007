// Application state module
// Shared, read-only state handed to every connection

use std::sync::Arc;

use super::types::Config;
use crate::continent::ContinentTable;

/// Application state
///
/// Built once before the listener starts; request handling only reads it.
pub struct AppState {
    pub config: Config,
    pub continents: Arc<ContinentTable>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            continents: Arc::new(ContinentTable::new()),
        }
    }
}
