//! Component model for Dataview
//!
//! A [`Component`] describes markup, styles, named handlers and lifecycle
//! hooks. A [`Host`] owns one instance together with its state and its
//! [`IsolatedRoot`], drives the lifecycle, commits renders and routes
//! delegated events to handlers by the name found in the target element's
//! `@<event>` attribute.

mod error;
mod host;
mod lifecycle;
mod page;
mod root;
mod state;

#[cfg(test)]
mod tests;

pub use error::ComponentError;
pub use host::{Host, WeakHost};
pub use lifecycle::LifecyclePhase;
pub use page::Page;
pub use root::IsolatedRoot;
pub use state::{StateMap, StatePatch};

use crate::events::{Event, Handler};

/// A renderable, isolated UI unit
///
/// The component value itself is immutable configuration. Everything that
/// changes over time lives in [`Component::State`] and is only mutated
/// through [`Host::set_state`].
pub trait Component: Sized + 'static {
    /// Component-owned state
    type State: Clone + Default + 'static;

    /// Element name of the component, e.g. `app-bar-chart`
    const TAG: &'static str;

    /// Stylesheet scoped to this component's root
    fn styles(&self) -> &'static str {
        ""
    }

    /// Attribute names whose changes are reported to
    /// [`Component::attribute_changed`]
    fn observed_attributes() -> &'static [&'static str] {
        &[]
    }

    /// Handlers that markup may bind with `@event="name"`
    fn handlers() -> Vec<Handler<Self>> {
        Vec::new()
    }

    /// Runs on attachment, before listeners are installed and before the
    /// first render
    fn init(&self, _cx: &Host<Self>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Produce the markup for `state`
    fn render(&self, state: &Self::State) -> Result<String, ComponentError>;

    /// Runs once after the first render
    fn after_render_first(&self, _cx: &Host<Self>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Runs after every `set_state` render
    fn after_render(&self, _cx: &Host<Self>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Runs on detachment, before listeners are removed
    fn after_deleted(&self, _cx: &Host<Self>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// An observed attribute changed value
    fn attribute_changed(
        &self,
        _cx: &Host<Self>,
        _name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Result<(), ComponentError> {
        Ok(())
    }
}

/// Read the `data-<name>` attribute of the event's target element
pub fn target_data<C: Component>(cx: &Host<C>, event: &Event, name: &str) -> Option<String> {
    let target = event.target()?;
    cx.with_element(target, |element| element.data(name).map(str::to_string))
        .flatten()
}
