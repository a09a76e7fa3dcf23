use crate::component::{Component, ComponentError, Host, Page};
use crate::events::{Event, Handler};
use crate::platform::History;
use crate::{handler, handlers, html};

/// Shown for unknown routes; its button navigates home
#[derive(Debug)]
pub struct NotFound {
    history: History,
}

impl NotFound {
    pub fn new(history: History) -> Self {
        Self { history }
    }

    fn click_handler(&self, cx: &Host<Self>, _event: &Event) -> anyhow::Result<()> {
        cx.navigate("/");
        Ok(())
    }
}

impl Component for NotFound {
    type State = ();

    const TAG: &'static str = "app-page-not-found";

    fn handlers() -> Vec<Handler<Self>> {
        handlers![Self::click_handler]
    }

    fn render(&self, _state: &()) -> Result<String, ComponentError> {
        Ok(html!(
            "<div>"
                "<p>404 - Page Not Found</p>"
                "<button @click=" {handler!(Self::click_handler)} ">go home</button>"
            "</div>"
        )?)
    }
}

impl Page for NotFound {
    fn history(&self) -> &History {
        &self.history
    }
}
