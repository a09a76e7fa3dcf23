//! Component host: lifecycle, render commits and event routing

use std::any::Any;
use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use log::{debug, error, trace, warn};

use super::{Component, ComponentError, IsolatedRoot, LifecyclePhase, StatePatch};
use crate::dom::{ElementData, ElementRef, NodeKind, Selector, SelectorError};
use crate::events::{
    Event, EventEmitter, HandlerFn, HandlerTable, ListenerSet, PropagationPhase,
};
use crate::parser::parse_markup;
use crate::state::{DataStore, Record, SubscriptionId};
use crate::template::EVENT_PREFIX;

/// Form controls contributing to [`Host::form_data`]
const FORM_CONTROLS: &[&str] = &["input", "select", "textarea"];

/// A child component mounted into a placeholder element of its parent
trait ChildHost {
    fn tag(&self) -> &'static str;
    fn detach_from_parent(&self);
    fn as_any(&self) -> &dyn Any;
}

impl<C: Component> ChildHost for Host<C> {
    fn tag(&self) -> &'static str {
        C::TAG
    }

    fn detach_from_parent(&self) {
        if !self.phase().is_live() {
            return;
        }
        if let Err(err) = self.detach() {
            error!("Failed to detach <{}>: {}", C::TAG, err);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct HostInner<C: Component> {
    component: C,
    state: RefCell<C::State>,
    phase: Cell<LifecyclePhase>,
    root: RefCell<IsolatedRoot>,
    handlers: HandlerTable<C>,
    signals: EventEmitter<C>,
    attributes: RefCell<Vec<(String, String)>>,
    subscriptions: RefCell<Vec<(DataStore, SubscriptionId)>>,
    children: RefCell<Vec<Box<dyn ChildHost>>>,
}

/// Shared handle to a component instance and everything it owns
pub struct Host<C: Component> {
    inner: Rc<HostInner<C>>,
}

/// Non-owning handle to a [`Host`]
pub struct WeakHost<C: Component> {
    inner: Weak<HostInner<C>>,
}

impl<C: Component> Clone for Host<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C: Component> Clone for WeakHost<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<C: Component> WeakHost<C> {
    pub fn upgrade(&self) -> Option<Host<C>> {
        self.inner.upgrade().map(|inner| Host { inner })
    }
}

impl<C: Component> fmt::Debug for Host<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("tag", &C::TAG)
            .field("phase", &self.phase())
            .field("handlers", &self.inner.handlers)
            .field("children", &self.inner.children.borrow().len())
            .finish()
    }
}

impl<C: Component> Host<C> {
    /// Wrap `component` in a new, unattached host
    pub fn new(component: C) -> Self {
        let root = IsolatedRoot::new(component.styles());
        Self {
            inner: Rc::new(HostInner {
                component,
                state: RefCell::new(C::State::default()),
                phase: Cell::new(LifecyclePhase::Unattached),
                root: RefCell::new(root),
                handlers: HandlerTable::new(C::handlers()),
                signals: EventEmitter::new(),
                attributes: RefCell::new(Vec::new()),
                subscriptions: RefCell::new(Vec::new()),
                children: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakHost<C> {
        WeakHost {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn component(&self) -> &C {
        &self.inner.component
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.inner.phase.get()
    }

    /// Current state. Do not hold the borrow across `set_state`.
    pub fn state(&self) -> Ref<'_, C::State> {
        self.inner.state.borrow()
    }

    /// The isolated root. Do not hold the borrow across `set_state`.
    pub fn root(&self) -> Ref<'_, IsolatedRoot> {
        self.inner.root.borrow()
    }

    /// Serialized root content
    pub fn to_html(&self) -> String {
        self.inner.root.borrow().to_html()
    }

    fn transition(&self, next: LifecyclePhase) {
        let current = self.phase();
        if !current.can_transition_to(next) {
            warn!("<{}> unexpected transition {:?} -> {:?}", C::TAG, current, next);
        }
        trace!("<{}> {:?} -> {:?}", C::TAG, current, next);
        self.inner.phase.set(next);
    }

    /// Attach to a live tree: `init`, install listeners, first render,
    /// then `after_render_first`
    pub fn attach(&self) -> Result<(), ComponentError> {
        let phase = self.phase();
        if phase != LifecyclePhase::Unattached {
            return Err(ComponentError::InvalidLifecycleTransition(
                phase,
                "attach".to_string(),
            ));
        }

        debug!("Attaching <{}>", C::TAG);
        self.transition(LifecyclePhase::Initializing);

        let result = self.inner.component.init(self).and_then(|()| {
            {
                let mut root = self.inner.root.borrow_mut();
                root.add_listener(ListenerSet::bubbling());
                root.add_listener(ListenerSet::capturing());
            }
            self.commit_render()
        });

        if let Err(err) = result {
            self.release();
            self.transition(LifecyclePhase::Unattached);
            return Err(err);
        }

        self.transition(LifecyclePhase::Rendered);
        self.inner.component.after_render_first(self)
    }

    /// Detach from the tree: `after_deleted`, remove listeners, drop store
    /// subscriptions and children
    pub fn detach(&self) -> Result<(), ComponentError> {
        let phase = self.phase();
        if !phase.is_live() {
            return Err(ComponentError::InvalidLifecycleTransition(
                phase,
                "detach".to_string(),
            ));
        }

        debug!("Detaching <{}>", C::TAG);
        let hook = self.inner.component.after_deleted(self);
        self.release();
        self.transition(LifecyclePhase::Detached);
        hook
    }

    /// Drop everything wired up since `init`: listeners, store
    /// subscriptions, children and signal listeners
    fn release(&self) {
        {
            let mut root = self.inner.root.borrow_mut();
            root.remove_listener(PropagationPhase::Bubbling);
            root.remove_listener(PropagationPhase::Capturing);
        }

        let subscriptions = std::mem::take(&mut *self.inner.subscriptions.borrow_mut());
        for (store, id) in subscriptions {
            store.unsubscribe(id);
        }

        self.detach_children();
        self.inner.signals.clear();
    }

    /// Merge `patch` into the state and re-render.
    ///
    /// Before the first render the patch is only merged. After detachment
    /// the call is rejected and the state is left untouched. If the render
    /// fails, the state and the committed markup stay as they were.
    pub fn set_state(&self, patch: impl StatePatch<C::State>) -> Result<(), ComponentError> {
        let phase = self.phase();
        if phase == LifecyclePhase::Detached {
            warn!("Ignoring set_state on detached <{}>", C::TAG);
            return Err(ComponentError::InvalidLifecycleTransition(
                phase,
                "set_state".to_string(),
            ));
        }

        if !phase.is_live() {
            patch.apply(&mut self.inner.state.borrow_mut());
            return Ok(());
        }

        let previous = self.inner.state.borrow().clone();
        patch.apply(&mut self.inner.state.borrow_mut());

        self.transition(LifecyclePhase::Rerendering);
        if let Err(err) = self.commit_render() {
            warn!("<{}> render failed, keeping previous state: {}", C::TAG, err);
            *self.inner.state.borrow_mut() = previous;
            self.transition(phase);
            return Err(err);
        }
        let result = self.inner.component.after_render(self);

        if self.phase() == LifecyclePhase::Rerendering {
            self.transition(phase);
        }
        result
    }

    /// Mutate the state without rendering
    pub fn with_state_mut<R>(&self, f: impl FnOnce(&mut C::State) -> R) -> R {
        f(&mut self.inner.state.borrow_mut())
    }

    fn commit_render(&self) -> Result<(), ComponentError> {
        let markup = {
            let state = self.inner.state.borrow();
            self.inner.component.render(&state)?
        };

        let tree = parse_markup(markup.trim());
        self.detach_children();
        self.inner.root.borrow_mut().install(tree);
        trace!(
            "<{}> committed render {}",
            C::TAG,
            self.inner.root.borrow().generation()
        );
        Ok(())
    }

    /// Route a delegated event to the handler named by the target's
    /// `@<event>` attribute.
    ///
    /// Returns whether a handler ran. Missing targets, unknown handler
    /// names and handler errors are logged and never propagate.
    pub fn dispatch(&self, event: &Event) -> bool {
        let event_type = event.event_type();
        let Some(target) = event.target() else {
            warn!("Cannot find target for event - {}", event_type);
            return false;
        };

        let name = {
            let root = self.inner.root.borrow();
            if root.listener_for(event_type).is_none() {
                trace!("<{}> does not listen for {}", C::TAG, event_type);
                return false;
            }
            let Some(node) = root.resolve(target) else {
                warn!("Cannot find target for event - {}", event_type);
                return false;
            };
            let attribute = format!("{}{}", EVENT_PREFIX, event_type);
            match root
                .tree()
                .element(node)
                .and_then(|element| element.attribute(&attribute))
            {
                Some(name) => name.to_string(),
                None => return false,
            }
        };

        let Some(handler) = self.inner.handlers.get(&name) else {
            debug!("<{}> has no handler named '{}'", C::TAG, name);
            return false;
        };
        self.run_handler(&name, handler, event);
        true
    }

    fn run_handler(&self, name: &str, handler: HandlerFn<C>, event: &Event) {
        if let Err(err) = handler(&self.inner.component, self, event) {
            error!("Error in handler '{}': {:#}", name, err);
        }
    }

    /// Register `handler` for the custom signal `name`
    pub fn listen(&self, name: &str, handler: HandlerFn<C>) {
        self.inner.signals.on(name, handler);
    }

    /// Deliver a custom signal to the handlers registered with
    /// [`Host::listen`]. Returns how many ran.
    pub fn emit(&self, event: &Event) -> usize {
        let name = event.event_type().as_str();
        let handlers = self.inner.signals.listeners_for(name);
        for handler in &handlers {
            self.run_handler(name, *handler, event);
        }
        handlers.len()
    }

    /// Subscribe to `store` for the lifetime of this host.
    ///
    /// The subscription is dropped on detachment. `on_change` is invoked
    /// right away with the current snapshot.
    pub fn subscribe<F>(&self, store: &DataStore, on_change: F) -> SubscriptionId
    where
        F: Fn(&Host<C>, &[Record]) -> Result<(), ComponentError> + 'static,
    {
        let host = self.downgrade();
        let id = store.subscribe(move |records| {
            let Some(host) = host.upgrade() else {
                return;
            };
            if let Err(err) = on_change(&host, records) {
                error!("<{}> failed to apply store update: {}", C::TAG, err);
            }
        });
        self.inner
            .subscriptions
            .borrow_mut()
            .push((store.clone(), id));
        id
    }

    /// Host attribute value
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner
            .attributes
            .borrow()
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.clone())
    }

    /// Set (`Some`) or remove (`None`) a host attribute.
    ///
    /// Changes to observed attributes are reported to the component, also
    /// before attachment.
    pub fn set_attribute(&self, name: &str, value: Option<&str>) -> Result<(), ComponentError> {
        let old = {
            let mut attributes = self.inner.attributes.borrow_mut();
            let position = attributes.iter().position(|(attr, _)| attr == name);
            let old = position.map(|index| attributes[index].1.clone());
            match (position, value) {
                (Some(index), Some(value)) => attributes[index].1 = value.to_string(),
                (Some(index), None) => {
                    attributes.remove(index);
                }
                (None, Some(value)) => attributes.push((name.to_string(), value.to_string())),
                (None, None) => {}
            }
            old
        };

        if old.as_deref() == value || !C::observed_attributes().contains(&name) {
            return Ok(());
        }
        self.inner
            .component
            .attribute_changed(self, name, old.as_deref(), value)
    }

    /// First element of this root matching `selector`
    pub fn query(&self, selector: &str) -> Result<Option<ElementRef>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.inner.root.borrow().query(&selector))
    }

    /// All elements of this root matching `selector`
    pub fn query_all(&self, selector: &str) -> Result<Vec<ElementRef>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.inner.root.borrow().query_all(&selector))
    }

    /// Read an element of the current render; `None` if it is gone
    pub fn with_element<R>(&self, element: ElementRef, f: impl FnOnce(&ElementData) -> R) -> Option<R> {
        let root = self.inner.root.borrow();
        let node = root.resolve(element)?;
        root.tree().element(node).map(f)
    }

    /// Modify an element of the current render; `None` if it is gone
    pub fn with_element_mut<R>(
        &self,
        element: ElementRef,
        f: impl FnOnce(&mut ElementData) -> R,
    ) -> Option<R> {
        let mut root = self.inner.root.borrow_mut();
        let node = root.resolve(element)?;
        root.tree_mut().element_mut(node).map(f)
    }

    pub fn text_content(&self, element: ElementRef) -> Option<String> {
        let root = self.inner.root.borrow();
        let node = root.resolve(element)?;
        Some(root.tree().text_content(node))
    }

    /// Replace the element's children by `text`; `false` if it is gone
    pub fn set_text_content(&self, element: ElementRef, text: &str) -> bool {
        let mut root = self.inner.root.borrow_mut();
        match root.resolve(element) {
            Some(node) => {
                root.tree_mut().set_text_content(node, text);
                true
            }
            None => false,
        }
    }

    /// Named control values below `form`, in document order
    pub fn form_data(&self, form: ElementRef) -> Vec<(String, String)> {
        let root = self.inner.root.borrow();
        let Some(form) = root.resolve(form) else {
            return Vec::new();
        };

        let tree = root.tree();
        tree.descendants_of(form)
            .into_iter()
            .filter_map(|node| {
                let Some(NodeKind::Element(element)) = tree.kind(node) else {
                    return None;
                };
                if !FORM_CONTROLS.contains(&element.tag()) {
                    return None;
                }
                let name = element.attribute("name")?;
                let value = match element.tag() {
                    "textarea" => tree.text_content(node),
                    _ => element.attribute("value").unwrap_or_default().to_string(),
                };
                Some((name.to_string(), value))
            })
            .collect()
    }

    /// Mount `child` into the placeholder element matching `selector`.
    ///
    /// The placeholder's attributes are copied onto the child before it is
    /// attached. The child lives until this host re-renders or detaches.
    /// Returns `None` if no placeholder exists in the current render.
    pub fn mount_child<D: Component>(
        &self,
        selector: &str,
        child: D,
    ) -> Result<Option<Host<D>>, ComponentError> {
        let Some(placeholder) = self.query(selector)? else {
            return Ok(None);
        };
        let attributes = self
            .with_element(placeholder, |element| element.attributes().to_vec())
            .unwrap_or_default();

        let host = Host::new(child);
        for (name, value) in &attributes {
            host.set_attribute(name, Some(value))?;
        }
        host.attach()?;

        self.inner.children.borrow_mut().push(Box::new(host.clone()));
        Ok(Some(host))
    }

    /// Mounted children of type `D`
    pub fn children_of<D: Component>(&self) -> Vec<Host<D>> {
        self.inner
            .children
            .borrow()
            .iter()
            .filter_map(|child| child.as_any().downcast_ref::<Host<D>>().cloned())
            .collect()
    }

    /// Tags of all mounted children
    pub fn child_tags(&self) -> Vec<&'static str> {
        self.inner
            .children
            .borrow()
            .iter()
            .map(|child| child.tag())
            .collect()
    }

    fn detach_children(&self) {
        let children = std::mem::take(&mut *self.inner.children.borrow_mut());
        for child in children {
            child.detach_from_parent();
        }
    }
}
