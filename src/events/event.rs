//! Event values delivered to component handlers

use std::cell::Cell;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dom::ElementRef;
use crate::state::Record;

/// Name of the signal a parent widget uses to hand data to a child chart
pub const UPDATE_DATA: &str = "update-data";

/// Kind of a UI event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    Submit,
    Input,
    Change,
    Keydown,
    Mouseover,
    Mouseout,
    Focus,
    Blur,
    Scroll,
    Load,
    Unload,
    Slotchange,
    /// Any other, application-defined event name
    Custom(String),
}

impl EventType {
    /// DOM name of the event, as used after the `@` of a binding
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Click => "click",
            EventType::Submit => "submit",
            EventType::Input => "input",
            EventType::Change => "change",
            EventType::Keydown => "keydown",
            EventType::Mouseover => "mouseover",
            EventType::Mouseout => "mouseout",
            EventType::Focus => "focus",
            EventType::Blur => "blur",
            EventType::Scroll => "scroll",
            EventType::Load => "load",
            EventType::Unload => "unload",
            EventType::Slotchange => "slotchange",
            EventType::Custom(name) => name,
        }
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        match name {
            "click" => EventType::Click,
            "submit" => EventType::Submit,
            "input" => EventType::Input,
            "change" => EventType::Change,
            "keydown" => EventType::Keydown,
            "mouseover" => EventType::Mouseover,
            "mouseout" => EventType::Mouseout,
            "focus" => EventType::Focus,
            "blur" => EventType::Blur,
            "scroll" => EventType::Scroll,
            "load" => EventType::Load,
            "unload" => EventType::Unload,
            "slotchange" => EventType::Slotchange,
            other => EventType::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event fired at an element of a component's render tree
#[derive(Debug, Clone)]
pub struct Event {
    event_type: EventType,
    target: Option<ElementRef>,
    detail: serde_json::Value,
    default_prevented: Cell<bool>,
}

impl Event {
    /// Create an event without a target
    pub fn new(event_type: impl Into<EventType>) -> Self {
        Self {
            event_type: event_type.into(),
            target: None,
            detail: serde_json::Value::Null,
            default_prevented: Cell::new(false),
        }
    }

    /// Create a custom signal carrying `detail`
    pub fn custom(name: &str, detail: serde_json::Value) -> Self {
        Self::new(name).with_detail(detail)
    }

    /// Set the element the event is fired at
    pub fn with_target(mut self, target: ElementRef) -> Self {
        self.target = Some(target);
        self
    }

    /// Attach a JSON payload
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = detail;
        self
    }

    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    pub fn target(&self) -> Option<ElementRef> {
        self.target
    }

    pub fn detail(&self) -> &serde_json::Value {
        &self.detail
    }

    /// Mark the default action (e.g. a form submission) as handled
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Payload of the [`UPDATE_DATA`] signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSignal {
    #[serde(rename = "allData")]
    pub all_data: Vec<Record>,
}

impl DataSignal {
    pub fn new(all_data: Vec<Record>) -> Self {
        Self { all_data }
    }

    /// Wrap the payload into an [`UPDATE_DATA`] event
    pub fn into_event(self) -> Result<Event, serde_json::Error> {
        Ok(Event::custom(UPDATE_DATA, serde_json::to_value(self)?))
    }

    /// Read the payload back from an event's detail
    pub fn from_event(event: &Event) -> Result<Self, serde_json::Error> {
        Self::deserialize(event.detail())
    }
}
