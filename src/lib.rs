// Core module of the Dataview framework
pub mod component;
pub mod dom;
pub mod events;
pub mod parser;
pub mod platform;
pub mod state;
pub mod style;
pub mod template;

pub mod kit; // Widgets and the demo application

/// Version of the Dataview framework
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export of common types for convenience
pub mod prelude {
    pub use crate::component::{
        Component, ComponentError, Host, LifecyclePhase, Page, StateMap, StatePatch,
    };
    pub use crate::dom::ElementRef;
    pub use crate::events::{DataSignal, Event, EventType, Handler, PropagationPhase};
    pub use crate::platform::{History, Timers};
    pub use crate::state::{DataStore, Record, StoreError};
    pub use crate::style::{css, style_map};
    pub use crate::template::{render_list, try_render_list, Value};
    pub use crate::{handler, handlers, html};
}

/// Mount `app` as the top-level component
pub fn mount<C: component::Component>(app: C) -> Result<component::Host<C>, Error> {
    let host = component::Host::new(app);
    host.attach()?;
    Ok(host)
}

/// Errors that can occur in the Dataview framework
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Store error: {0}")]
    Store(#[from] state::StoreError),

    #[error("Template error: {0}")]
    Template(#[from] template::TemplateError),

    #[error("Selector error: {0}")]
    Selector(#[from] dom::SelectorError),

    #[error("Component error: {0}")]
    Component(#[from] component::ComponentError),
}
