// Raw JSON editor widget

use std::sync::OnceLock;

use log::error;
use regex::Regex;

use crate::component::{Component, ComponentError, Host};
use crate::events::{Event, Handler};
use crate::state::DataStore;
use crate::template::{cached_regex, escape_text, TemplateError};
use crate::{handler, handlers, html};

type CachedRegex = OnceLock<Result<Regex, regex::Error>>;

fn bare_key() -> Result<&'static Regex, regex::Error> {
    static RE: CachedRegex = OnceLock::new();
    cached_regex(&RE, r"([{,]\s*)([a-zA-Z0-9_]+)(\s*:)")
}

fn whitespace() -> Result<&'static Regex, regex::Error> {
    static RE: CachedRegex = OnceLock::new();
    cached_regex(&RE, r"\s+")
}

/// Quote bare object keys so hand-typed `{ key: "Jan" }` parses as JSON
pub fn quote_bare_keys(input: &str) -> Result<String, regex::Error> {
    Ok(bare_key()?.replace_all(input, r#"$1"$2"$3"#).into_owned())
}

/// Escape pretty JSON and wrap its keys, string values and number values
/// in highlighting spans
pub fn highlight_json(json: &str) -> Result<String, regex::Error> {
    static KEY: CachedRegex = OnceLock::new();
    static STRING: CachedRegex = OnceLock::new();
    static NUMBER: CachedRegex = OnceLock::new();

    let escaped = escape_text(json);

    let keyed = cached_regex(&KEY, r#""([^"]+)"\s*:"#)?
        .replace_all(&escaped, r#"<span class="key">"$1"</span>:"#);
    let strings = cached_regex(&STRING, r#":\s*"([^"]*)""#)?
        .replace_all(&keyed, r#": <span class="string">"$1"</span>"#);
    let numbers = cached_regex(&NUMBER, r":\s*(-?\d+(\.\d+)?)")?
        .replace_all(&strings, r#": <span class="number">$1</span>"#);
    Ok(numbers.into_owned())
}

#[derive(Debug, Clone, Default)]
pub struct RawEditorState {
    /// Pretty JSON of the last store snapshot
    pub raw_json: String,
    /// What the user has typed; equals `raw_json` until edited
    pub typed_json: String,
    pub error: Option<String>,
}

impl RawEditorState {
    /// Whether the typed text differs from the snapshot, ignoring whitespace
    pub fn is_dirty(&self) -> Result<bool, regex::Error> {
        let re = whitespace()?;
        Ok(re.replace_all(&self.raw_json, "") != re.replace_all(&self.typed_json, ""))
    }
}

/// Shows the whole store as editable JSON and replaces it on submit
#[derive(Debug)]
pub struct RawEditor {
    store: DataStore,
}

impl RawEditor {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }

    fn reset(&self, cx: &Host<Self>, _event: &Event) -> anyhow::Result<()> {
        cx.set_state(|state: &mut RawEditorState| {
            state.typed_json = state.raw_json.clone();
            state.error = None;
        })?;
        Ok(())
    }

    fn submit_handler(&self, cx: &Host<Self>, event: &Event) -> anyhow::Result<()> {
        event.prevent_default();

        let typed = cx.state().typed_json.clone();
        let result = quote_bare_keys(&typed)
            .map_err(anyhow::Error::from)
            .and_then(|json| Ok(serde_json::from_str::<serde_json::Value>(&json)?))
            .and_then(|batch| Ok(self.store.set_json(&batch)?));

        if let Err(err) = result {
            error!("Rejected raw JSON: {:#}", err);
            let message = format!("Invalid JSON format: {}", err);
            cx.set_state(move |state: &mut RawEditorState| {
                state.error = Some(message);
                state.typed_json = state.raw_json.clone();
            })?;
        }
        Ok(())
    }

    fn input_handler(&self, cx: &Host<Self>, event: &Event) -> anyhow::Result<()> {
        let Some(target) = event.target() else {
            return Ok(());
        };
        let Some(text) = cx.text_content(target) else {
            return Ok(());
        };

        let dirty = cx.with_state_mut(|state| {
            state.typed_json = text.trim().to_string();
            state.is_dirty()
        })?;

        if let Some(actions) = cx.query(".actions")? {
            cx.with_element_mut(actions, |element| {
                if dirty {
                    element.add_class("changed");
                } else {
                    element.remove_class("changed");
                }
            });
        }
        Ok(())
    }
}

impl Component for RawEditor {
    type State = RawEditorState;

    const TAG: &'static str = "app-raw-editor";

    fn styles(&self) -> &'static str {
        STYLES
    }

    fn handlers() -> Vec<Handler<Self>> {
        handlers![Self::reset, Self::submit_handler, Self::input_handler]
    }

    fn init(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        cx.subscribe(&self.store, |cx, records| {
            let raw_json = serde_json::to_string_pretty(records)?;
            cx.set_state(move |state: &mut RawEditorState| {
                state.typed_json = raw_json.clone();
                state.raw_json = raw_json;
                state.error = None;
            })
        });
        Ok(())
    }

    fn render(&self, state: &RawEditorState) -> Result<String, ComponentError> {
        let error = match &state.error {
            Some(message) => html!("<p class=\"error\">" {escape_text(message)} "</p>")?,
            None => String::new(),
        };
        let highlighted =
            highlight_json(&state.typed_json).map_err(TemplateError::from)?;

        Ok(html!(
            "<form @submit=" {handler!(Self::submit_handler)} ">"
                "<div class=\"actions\">"
                    "<button type=\"button\" @click=" {handler!(Self::reset)} " class=\"reset-btn\">Reset</button>"
                    "<button class=\"apply-btn\">Apply</button>"
                "</div>"
                {error}
                "<pre class=\"json-editor\" contenteditable=\"true\" @input=" {handler!(Self::input_handler)} ">"
                    {highlighted}
                "</pre>"
            "</form>"
        )?)
    }
}

const STYLES: &str = r#"
  .actions {
    display: flex;
    align-items: center;
    justify-content: end;
    height: 40px;
    gap: 6px;
    opacity: 0;
    pointer-events: none;
  }

  .actions.changed {
    opacity: 1;
    pointer-events: initial;
  }

  .error {
    color: var(--raspberry-punch);
    padding: 12px 0;
  }

  .json-editor {
    width: 100%;
    max-height: 400px;
    overflow-y: auto;
    padding: 12px;
    border-radius: 12px;
    border: none;
    resize: vertical;
    font-family: monospace;
    font-size: 14px;
    background-color: #fff;
    box-shadow: inset 0 4px 12px rgba(0, 0, 0, 0.05);
    color: #333;
    white-space: pre-wrap;
    overflow-wrap: break-word;
    outline: none;
  }

  .key {
    color: #10b981;
  }

  .string {
    color: var(--amber-flame);
  }

  .number {
    color: var(--blue);
  }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_bare_keys() {
        assert_eq!(
            quote_bare_keys(r#"[{key: "Jan", val: 12}]"#).unwrap(),
            r#"[{"key": "Jan", "val": 12}]"#
        );
        assert_eq!(
            quote_bare_keys(r#"[{"key": "a"}]"#).unwrap(),
            r#"[{"key": "a"}]"#
        );
    }

    #[test]
    fn test_highlight_json() {
        let highlighted = highlight_json("{\n  \"key\": \"Jan\",\n  \"val\": -76\n}").unwrap();

        assert!(highlighted.contains(r#"<span class="key">"key"</span>: <span class="string">"Jan"</span>"#));
        assert!(highlighted.contains(r#"<span class="key">"val"</span>: <span class="number">-76</span>"#));
    }

    #[test]
    fn test_dirty_ignores_whitespace() {
        let mut state = RawEditorState {
            raw_json: "[\n  {\"key\": \"a\"}\n]".to_string(),
            typed_json: "[{\"key\":\"a\"}]".to_string(),
            error: None,
        };
        assert!(!state.is_dirty().unwrap());

        state.typed_json = "[]".to_string();
        assert!(state.is_dirty().unwrap());
    }
}
