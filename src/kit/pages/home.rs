use log::debug;

use super::AppContext;
use crate::component::{Component, ComponentError, Host, Page};
use crate::html;
use crate::kit::components::{DataTable, Editor, Graph, RawEditor};
use crate::platform::History;
use crate::state::Record;

/// Records the home page loads into the store when first shown
pub const SEED_RECORDS: &[(&str, f64)] = &[
    ("Jan", 12.0),
    ("Feb", -76.0),
    ("Mar", 32.0),
    ("Apr", 123.0),
    ("May", 23.0),
];

/// Dashboard with the graph, the table and both editors
#[derive(Debug)]
pub struct Home {
    context: AppContext,
}

impl Home {
    pub fn new(context: AppContext) -> Self {
        Self { context }
    }

    fn mount_widgets(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        let AppContext { store, timers, .. } = &self.context;
        cx.mount_child(Graph::TAG, Graph::new(store.clone(), timers.clone()))?;
        cx.mount_child(DataTable::TAG, DataTable::new(store.clone()))?;
        cx.mount_child(Editor::TAG, Editor::new(store.clone()))?;
        cx.mount_child(RawEditor::TAG, RawEditor::new(store.clone()))?;
        Ok(())
    }
}

impl Component for Home {
    type State = ();

    const TAG: &'static str = "app-page-home";

    fn styles(&self) -> &'static str {
        STYLES
    }

    fn render(&self, _state: &()) -> Result<String, ComponentError> {
        Ok(html!(
            "<div class=\"home\">"
                "<div class=\"contents\">"
                    "<section class=\"container\">"
                        "<h3 class=\"container-title\">Graph UI</h3>"
                        "<app-graph chart-type-list=\"bar\"></app-graph>"
                    "</section>"
                    "<section class=\"container\">"
                        "<h3 class=\"container-title\">Modify Data via Editor</h3>"
                        "<div class=\"table-container\">"
                            "<app-data-table></app-data-table>"
                        "</div>"
                        "<footer><app-editor></app-editor></footer>"
                    "</section>"
                    "<section class=\"container\">"
                        "<h3 class=\"container-title\">Modify Data via Raw Editor</h3>"
                        "<app-raw-editor></app-raw-editor>"
                    "</section>"
                "</div>"
            "</div>"
        )?)
    }

    fn after_render_first(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        self.mount_widgets(cx)?;

        debug!("Seeding store with {} records", SEED_RECORDS.len());
        let records = SEED_RECORDS
            .iter()
            .map(|(key, val)| Record::new(*key, *val))
            .collect();
        self.context.store.set(records)?;
        Ok(())
    }

    fn after_render(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        self.mount_widgets(cx)
    }
}

impl Page for Home {
    fn history(&self) -> &History {
        &self.context.history
    }
}

const STYLES: &str = r#"
  .home {
    max-width: var(--screen-xl);
    margin: auto;
    padding: 48px;
  }

  .contents {
    display: grid;
    grid-template-columns: 50%;
    gap: 24px;
  }

  .contents .container:last-child {
    grid-column: 1/3;
  }

  .container {
    display: flex;
    flex-direction: column;
    gap: 16px;
  }

  .container-title {
    font-weight: bold;
    font-size: 20px;
  }

  .table-container {
    padding: 48px 18px;
    border-radius: 12px;
    background-color: var(--white);
  }

  @media (max-width: 1100px) {
    .contents {
      display: flex;
      flex-direction: column;
      gap: 16px;
    }
  }
"#;
