// Application router and pages

mod app;
mod home;
mod not_found;

pub use app::{App, AppState};
pub use home::{Home, SEED_RECORDS};
pub use not_found::NotFound;

use crate::platform::{History, Timers};
use crate::state::DataStore;

/// Shared services handed to the router and every page
#[derive(Debug, Clone)]
pub struct AppContext {
    pub store: DataStore,
    pub timers: Timers,
    pub history: History,
}

impl AppContext {
    /// Fresh store and timers with the history starting at `initial_path`
    pub fn new(initial_path: &str) -> Self {
        Self {
            store: DataStore::new(),
            timers: Timers::new(),
            history: History::new(initial_path),
        }
    }
}
