//! Page components with client-side navigation

use log::debug;

use super::{Component, Host};
use crate::platform::History;

/// A component that can navigate the application
pub trait Page: Component {
    /// Session history the page navigates in
    fn history(&self) -> &History;
}

impl<C: Page> Host<C> {
    /// Push `path` onto the history and signal the location change.
    ///
    /// Whatever listens for location changes (normally the app router)
    /// decides what to render next.
    pub fn navigate(&self, path: &str) {
        debug!("<{}> navigating to {}", C::TAG, path);
        let history = self.component().history();
        history.push_state(path);
        history.notify_location_change();
    }
}
