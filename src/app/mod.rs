//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Page fetches are the only blocking work. The event loop hands each
//! ticket to a short-lived worker thread and applies the result when it
//! comes back over a channel.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Direction, FOOTER_ROWS, Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;
use std::sync::Arc;

use crate::gallery::{PaginationCoordinator, ScrollTrigger};
use crate::source::{DEFAULT_PER_PAGE, DEFAULT_QUERY, ImageSource};

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    source: Arc<dyn ImageSource>,
    query: String,
    per_page: u32,
    trigger: ScrollTrigger,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application fetching from `source`.
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self {
            source,
            query: DEFAULT_QUERY.to_string(),
            per_page: DEFAULT_PER_PAGE,
            trigger: ScrollTrigger::default(),
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Set the initial search query.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Set how many images each page requests.
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Configure the breakpoint, forced column mode and look-ahead.
    pub const fn with_trigger(mut self, trigger: ScrollTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }

    /// The model the event loop starts from.
    pub fn initial_model(&self, terminal_size: (u16, u16)) -> Model {
        let session = PaginationCoordinator::new(self.query.clone(), self.per_page);
        let mut model = Model::new(session, self.trigger, terminal_size);
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        model
    }
}
