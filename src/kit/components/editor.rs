// Editor widget: form that adds one record to the store

use crate::component::{Component, ComponentError, Host};
use crate::events::{Event, Handler};
use crate::kit::utils::parse_int;
use crate::state::DataStore;
use crate::template::{escape_text, try_render_list};
use crate::{handler, handlers, html};

/// A field of the editor form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputField {
    pub name: &'static str,
    pub kind: &'static str,
    pub placeholder: &'static str,
    pub label: &'static str,
    pub required: bool,
}

/// Fields of the editor form, in display order
pub const INPUTS: &[InputField] = &[
    InputField {
        name: "id",
        kind: "text",
        placeholder: "ID",
        label: "Id",
        required: false,
    },
    InputField {
        name: "val",
        kind: "number",
        placeholder: "VAL",
        label: "Value",
        required: true,
    },
];

#[derive(Debug, Clone, Default)]
pub struct EditorState {
    /// Message of the last failed submission
    pub error: Option<String>,
}

/// Adds records to the store; an empty id gets a generated key
#[derive(Debug)]
pub struct Editor {
    store: DataStore,
}

impl Editor {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }

    fn submit_handler(&self, cx: &Host<Self>, event: &Event) -> anyhow::Result<()> {
        event.prevent_default();
        let Some(form) = event.target() else {
            return Ok(());
        };

        let data = cx.form_data(form);
        let field = |name: &str| {
            data.iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value.as_str())
                .unwrap_or_default()
        };
        let id = field("id").trim().to_string();
        let val = parse_int(field("val"));

        let error = match self.store.add(&id, val) {
            Ok(_) => None,
            Err(err) => Some(err.to_string()),
        };
        cx.set_state(move |state: &mut EditorState| state.error = error)?;
        Ok(())
    }
}

impl Component for Editor {
    type State = EditorState;

    const TAG: &'static str = "app-editor";

    fn styles(&self) -> &'static str {
        STYLES
    }

    fn handlers() -> Vec<Handler<Self>> {
        handlers![Self::submit_handler]
    }

    fn render(&self, state: &EditorState) -> Result<String, ComponentError> {
        let fields = try_render_list(INPUTS, |input, _| {
            html!(
                "<div class=\"" {input.name} "-container\">"
                    "<input name=" {input.name}
                    " type=" {input.kind}
                    " placeholder=" {input.placeholder}
                    " ?required=" {input.required} " />"
                    "<div style=\"height: 4px\"></div>"
                    "<label>" {input.label} "</label>"
                "</div>"
            )
        })?;

        let error = match &state.error {
            Some(message) => html!(
                "<div style=\"height:10px\"></div>"
                "<p class=\"error\">" {escape_text(message)} "</p>"
            )?,
            None => String::new(),
        };

        Ok(html!(
            "<section>"
                "<form @submit=" {handler!(Self::submit_handler)} ">"
                    {fields}
                    "<button type=\"submit\">Add</button>"
                "</form>"
                {error}
            "</section>"
        )?)
    }
}

const STYLES: &str = r#"
  form {
    display: flex;
    align-items: flex-end;
    gap: 8px;
  }

  div {
    display: flex;
    flex-direction: column-reverse
  }

  .id-container {
    width: 120px;
  }

  .val-container {
    flex: 1;
  }

  label {
    color: var(--black);
    font-size: 14px;
    padding: 0 4px;
  }

  input {
    width: 100%;
    background-color: var(--white);
    padding: 12px 16px;
    border-radius: 10px;
    border: solid var(--stone-gray) 1px;
  }

  input:required + div + label::after {
    content: " *";
    font-size: 16px;
    color: var(--raspberry-punch);
    font-weight: bold;
  }

  button {
    cursor: pointer;
    padding: 10px 16px;
    background-color: var(--blue);
    color: var(--white);
    font-size: 14px;
    font-weight: bold;
    border-radius: 10px;
  }

  .error {
    color: var(--raspberry-punch);
    font-size: 14px;
    padding: 0 6px;
  }
"#;
