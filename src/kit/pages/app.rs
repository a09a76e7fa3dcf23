use std::cell::Cell;

use log::{debug, error};

use super::{AppContext, Home, NotFound};
use crate::component::{Component, ComponentError, Host, Page};
use crate::html;
use crate::kit::theme::HOST_VARIABLES;
use crate::platform::{History, ListenerId};

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Path being shown; `None` until the router is attached
    pub route: Option<String>,
}

/// Top-level router: shows the home page at `/`, the 404 page elsewhere
#[derive(Debug)]
pub struct App {
    context: AppContext,
    listener: Cell<Option<ListenerId>>,
}

impl App {
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            listener: Cell::new(None),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    fn mount_page(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        if cx.mount_child(Home::TAG, Home::new(self.context.clone()))?.is_none() {
            cx.mount_child(NotFound::TAG, NotFound::new(self.context.history.clone()))?;
        }
        Ok(())
    }
}

impl Component for App {
    type State = AppState;

    const TAG: &'static str = "app-app";

    fn styles(&self) -> &'static str {
        HOST_VARIABLES
    }

    fn init(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        let route = self.context.history.location();
        cx.set_state(move |state: &mut AppState| state.route = Some(route))?;

        let app = cx.downgrade();
        let id = self.context.history.on_location_change(move |path| {
            let Some(app) = app.upgrade() else {
                return;
            };
            debug!("Route changed to {}", path);
            let route = path.to_string();
            if let Err(err) = app.set_state(move |state: &mut AppState| state.route = Some(route)) {
                error!("Failed to route to {}: {}", path, err);
            }
        });
        self.listener.set(Some(id));
        Ok(())
    }

    fn render(&self, state: &AppState) -> Result<String, ComponentError> {
        let page = match state.route.as_deref() {
            Some("/") => html!("<app-page-home></app-page-home>")?,
            _ => html!("<app-page-not-found></app-page-not-found>")?,
        };
        Ok(page)
    }

    fn after_render_first(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        self.mount_page(cx)
    }

    fn after_render(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        self.mount_page(cx)
    }

    fn after_deleted(&self, _cx: &Host<Self>) -> Result<(), ComponentError> {
        if let Some(id) = self.listener.take() {
            self.context.history.remove_listener(id);
        }
        Ok(())
    }
}

impl Page for App {
    fn history(&self) -> &History {
        &self.context.history
    }
}
