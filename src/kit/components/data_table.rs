// Data table widget with staged value edits and removals

use std::collections::{BTreeMap, BTreeSet};

use crate::component::{target_data, Component, ComponentError, Host};
use crate::events::{Event, Handler};
use crate::state::{DataStore, Record};
use crate::template::{escape_text, try_render_list};
use crate::{handler, handlers, html};

#[derive(Debug, Clone, Default)]
pub struct DataTableState {
    /// Last snapshot received from the store
    pub all_data: Vec<Record>,
    /// Edited values by key, not yet applied
    pub value_changes: BTreeMap<String, f64>,
    /// Keys marked for removal, not yet applied
    pub removed: BTreeSet<String>,
}

impl DataTableState {
    /// Value shown for `record`, including a pending edit
    pub fn current_value(&self, record: &Record) -> f64 {
        self.value_changes
            .get(&record.key)
            .copied()
            .unwrap_or(record.val)
    }

    /// Whether any pending edit differs from the stored value
    pub fn is_value_changed(&self) -> bool {
        self.all_data.iter().any(|record| {
            self.value_changes
                .get(&record.key)
                .is_some_and(|val| *val != record.val)
        })
    }

    /// Whether any stored record is marked for removal
    pub fn is_remove_changed(&self) -> bool {
        self.all_data
            .iter()
            .any(|record| self.removed.contains(&record.key))
    }

    /// The records that applying all pending changes would produce
    pub fn pending_records(&self) -> Vec<Record> {
        self.all_data
            .iter()
            .filter(|record| !self.removed.contains(&record.key))
            .map(|record| Record::new(record.key.clone(), self.current_value(record)))
            .collect()
    }
}

/// Editable table of the store's records
///
/// Edits and removals are staged in the component state and written to the
/// store in one bulk replace by "Apply All".
#[derive(Debug)]
pub struct DataTable {
    store: DataStore,
}

impl DataTable {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }

    fn reset_all_values(&self, cx: &Host<Self>, _event: &Event) -> anyhow::Result<()> {
        cx.set_state(|state: &mut DataTableState| state.value_changes.clear())?;
        Ok(())
    }

    fn reset_all_remove(&self, cx: &Host<Self>, _event: &Event) -> anyhow::Result<()> {
        cx.set_state(|state: &mut DataTableState| state.removed.clear())?;
        Ok(())
    }

    fn reset_item(&self, cx: &Host<Self>, event: &Event) -> anyhow::Result<()> {
        let Some(key) = target_data(cx, event, "key") else {
            return Ok(());
        };
        cx.set_state(move |state: &mut DataTableState| {
            state.value_changes.remove(&key);
        })?;
        Ok(())
    }

    fn remove_item(&self, cx: &Host<Self>, event: &Event) -> anyhow::Result<()> {
        let Some(key) = target_data(cx, event, "key") else {
            return Ok(());
        };
        cx.set_state(move |state: &mut DataTableState| {
            state.removed.insert(key);
        })?;
        Ok(())
    }

    fn apply_all(&self, cx: &Host<Self>, _event: &Event) -> anyhow::Result<()> {
        let records = cx.state().pending_records();
        self.store.set(records)?;

        cx.set_state(|state: &mut DataTableState| {
            state.value_changes.clear();
            state.removed.clear();
        })?;
        Ok(())
    }

    fn change_handler(&self, cx: &Host<Self>, event: &Event) -> anyhow::Result<()> {
        let Some(target) = event.target() else {
            return Ok(());
        };
        let Some((key, value)) = cx
            .with_element(target, |input| {
                let key = input.data("key")?.to_string();
                let value = input.attribute("value").unwrap_or_default().trim().to_string();
                Some((key, value))
            })
            .flatten()
        else {
            return Ok(());
        };

        // An empty field counts as zero; anything else must be numeric.
        let val = if value.is_empty() {
            0.0
        } else {
            match value.parse::<f64>() {
                Ok(val) if !val.is_nan() => val,
                _ => return Ok(()),
            }
        };

        cx.set_state(move |state: &mut DataTableState| {
            state.value_changes.insert(key, val);
        })?;
        Ok(())
    }

    fn render_actions(&self, state: &DataTableState) -> Result<String, ComponentError> {
        let value_changed = state.is_value_changed();
        let remove_changed = state.is_remove_changed();

        if !value_changed && !remove_changed {
            return Ok(html!("<p>no change</p>")?);
        }

        let restore = if remove_changed {
            html!(
                "<button @click=" {handler!(Self::reset_all_remove)} " class=\"reset-btn\">"
                    "Restore Removed"
                "</button>"
            )?
        } else {
            String::new()
        };
        let reset = if value_changed {
            html!(
                "<button @click=" {handler!(Self::reset_all_values)} " class=\"reset-btn\">"
                    "Reset Values"
                "</button>"
            )?
        } else {
            String::new()
        };

        Ok(html!(
            {restore}
            {reset}
            "<button @click=" {handler!(Self::apply_all)} " class=\"apply-btn\">Apply All</button>"
        )?)
    }

    fn render_rows(&self, state: &DataTableState) -> Result<String, ComponentError> {
        if state.all_data.is_empty() {
            return Ok(html!(
                "<tr><td style=\"grid-column: 1/4\">No data available</td></tr>"
            )?);
        }

        Ok(try_render_list(&state.all_data, |record, _| {
            if state.removed.contains(&record.key) {
                return Ok(String::new());
            }

            let current = state.current_value(record);
            let changed = current != record.val;
            let reset = if changed {
                html!(
                    "<button data-key=" {&record.key} " @click=" {handler!(Self::reset_item)}
                    " class=\"reset-btn\">Reset</button>"
                )?
            } else {
                String::new()
            };

            html!(
                "<tr>"
                    "<td>" {escape_text(&record.key)} "</td>"
                    "<td>"
                        "<input class=" {if changed { "changed" } else { "" }}
                        " data-key=" {&record.key}
                        " value=" {current}
                        " type=\"number\" @change=" {handler!(Self::change_handler)} " />"
                    "</td>"
                    "<td>"
                        {reset}
                        "<button data-key=" {&record.key} " @click=" {handler!(Self::remove_item)}
                        " class=\"remove-btn\">Remove</button>"
                    "</td>"
                "</tr>"
            )
        })?)
    }
}

impl Component for DataTable {
    type State = DataTableState;

    const TAG: &'static str = "app-data-table";

    fn styles(&self) -> &'static str {
        STYLES
    }

    fn handlers() -> Vec<Handler<Self>> {
        handlers![
            Self::reset_all_values,
            Self::reset_all_remove,
            Self::reset_item,
            Self::remove_item,
            Self::apply_all,
            Self::change_handler,
        ]
    }

    fn init(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        cx.subscribe(&self.store, |cx, records| {
            let all_data = records.to_vec();
            cx.set_state(move |state: &mut DataTableState| state.all_data = all_data)
        });
        Ok(())
    }

    fn render(&self, state: &DataTableState) -> Result<String, ComponentError> {
        Ok(html!(
            "<div>"
                "<div class=\"actions\">" {self.render_actions(state)?} "</div>"
                "<div style=\"height: 12px\"></div>"
                "<table>"
                    "<thead><tr><th>Key</th><th>Value</th><th></th></tr></thead>"
                    "<tbody>" {self.render_rows(state)?} "</tbody>"
                "</table>"
            "</div>"
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
  }

  .actions p {
    font-size: 14px;
    color: var(--stone-gray);
  }

  table {
    width: 100%;
    border-collapse: collapse;
    border-top: 1px solid var(--silver-dust);
  }

  tbody {
    display: block;
    max-height: 360px;
    overflow-y: auto;
  }

  thead tr,
  tbody tr {
    display: grid;
    grid-template-columns: 120px 1fr 160px;
    gap: 8px;
  }

  th, td {
    padding: 12px 6px;
    text-align: center;
    display: flex;
    align-items: center;
    justify-content: center;
  }

  th {
    font-weight: bold;
  }

  tr {
    border-bottom: 1px solid var(--silver-dust);
  }

  th:not(:last-child) {
    border-right: 1px solid var(--silver-dust);
  }

  tbody td:last-child {
    display: flex;
    justify-content: flex-end;
    gap: 4px;
  }

  input {
    width: 100%;
    padding: 12px 16px;
    border-radius: 10px;
    cursor: pointer;
    background-color: var(--soft-mist);
  }

  input:hover,
  input:focus,
  input.changed {
    box-shadow: inset 0 0 0 1px var(--stone-gray);
    background-color: var(--white);
  }
"#;
