// Graph widget: chart type switcher around a data-driven chart

use crate::component::{target_data, Component, ComponentError, Host};
use crate::events::{DataSignal, Event, Handler};
use crate::kit::components::bar_chart::BarChart;
use crate::platform::Timers;
use crate::state::{DataStore, Record};
use crate::template::{escape_text, try_render_list};
use crate::{handler, handlers, html};

/// Attribute holding the comma-separated chart types
pub const CHART_TYPE_LIST: &str = "chart-type-list";

/// Kind of chart the graph can show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartType {
    Bar,
    Line,
    Other(String),
}

impl ChartType {
    pub fn as_str(&self) -> &str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Other(name) => name,
        }
    }
}

impl From<&str> for ChartType {
    fn from(name: &str) -> Self {
        match name {
            "bar" => ChartType::Bar,
            "line" => ChartType::Line,
            other => ChartType::Other(other.to_string()),
        }
    }
}

/// Parse a `chart-type-list` attribute value
pub fn parse_chart_types(value: Option<&str>) -> Vec<ChartType> {
    match value {
        Some(value) if !value.is_empty() => value
            .split(',')
            .map(|name| ChartType::from(name.trim()))
            .collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct GraphState {
    pub all_data: Vec<Record>,
    pub current_type_index: usize,
    pub chart_type_list: Vec<ChartType>,
}

/// Shows the store's records in the selected chart type
#[derive(Debug)]
pub struct Graph {
    store: DataStore,
    timers: Timers,
}

impl Graph {
    pub fn new(store: DataStore, timers: Timers) -> Self {
        Self { store, timers }
    }

    fn click_handler(&self, cx: &Host<Self>, event: &Event) -> anyhow::Result<()> {
        let Some(index) = target_data(cx, event, "index") else {
            return Ok(());
        };
        let index: usize = index.parse()?;

        cx.set_state(move |state: &mut GraphState| state.current_type_index = index)?;
        Ok(())
    }

    fn render_chart(&self, state: &GraphState) -> Result<String, ComponentError> {
        let chart = match state.chart_type_list.get(state.current_type_index) {
            Some(ChartType::Bar) => html!("<app-bar-chart class=\"chart\"></app-bar-chart>")?,
            Some(ChartType::Line) => html!(
                "<div style=\"width: 100%; height: 100%; display: flex; align-items: center; \
                 justify-content: center; color: var(--raspberry-punch);\">"
                    "This chart is not supported yet"
                "</div>"
            )?,
            _ => String::new(),
        };
        Ok(chart)
    }

    /// Mount a fresh chart into the placeholder and hand it the records
    fn forward_data(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        let all_data = cx.state().all_data.clone();
        let Some(chart) = cx.mount_child(".chart", BarChart::new(self.timers.clone()))? else {
            return Ok(());
        };
        chart.emit(&DataSignal::new(all_data).into_event()?);
        Ok(())
    }
}

impl Component for Graph {
    type State = GraphState;

    const TAG: &'static str = "app-graph";

    fn styles(&self) -> &'static str {
        STYLES
    }

    fn observed_attributes() -> &'static [&'static str] {
        &[CHART_TYPE_LIST]
    }

    fn handlers() -> Vec<Handler<Self>> {
        handlers![Self::click_handler]
    }

    fn attribute_changed(
        &self,
        cx: &Host<Self>,
        name: &str,
        _old: Option<&str>,
        new: Option<&str>,
    ) -> Result<(), ComponentError> {
        if name != CHART_TYPE_LIST {
            return Ok(());
        }
        let chart_type_list = parse_chart_types(new);
        cx.set_state(move |state: &mut GraphState| {
            state.chart_type_list = chart_type_list;
            state.current_type_index = 0;
        })
    }

    fn init(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        cx.subscribe(&self.store, |cx, records| {
            let all_data = records.to_vec();
            cx.set_state(move |state: &mut GraphState| state.all_data = all_data)
        });
        Ok(())
    }

    fn render(&self, state: &GraphState) -> Result<String, ComponentError> {
        let items = try_render_list(&state.chart_type_list, |chart_type, index| {
            let selected = if index == state.current_type_index {
                ""
            } else {
                "unselect"
            };
            html!(
                "<li class=\"button reset-btn " {selected} "\" data-index=" {index}
                " @click=" {handler!(Self::click_handler)} ">"
                    {escape_text(chart_type.as_str())}
                "</li>"
            )
        })?;

        Ok(html!(
            "<section>"
                "<div class=\"container\">" {self.render_chart(state)?} "</div>"
                "<div>"
                    "<h4>Chart Types</h4>"
                    "<div style=\"height: 12px\"></div>"
                    "<ul>" {items} "</ul>"
                "</div>"
            "</section>"
        )?)
    }

    fn after_render_first(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        self.forward_data(cx)
    }

    fn after_render(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        self.forward_data(cx)
    }
}

const STYLES: &str = r#"
  section {
    background-color: var(--white);
    padding: 72px 48px;
    border-radius: 16px;
    display: flex;
    flex-direction: column;
    gap: 16px;
  }

  .container {
    height: 400px;
  }

  ul {
    display: flex;
    gap: 4px;
  }

  li {
    width: fit-content;
  }

  li.unselect {
    background-color: var(--stone-gray);
  }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chart_types() {
        assert_eq!(
            parse_chart_types(Some("bar, line,pie")),
            vec![
                ChartType::Bar,
                ChartType::Line,
                ChartType::Other("pie".to_string())
            ]
        );
        assert!(parse_chart_types(Some("")).is_empty());
        assert!(parse_chart_types(None).is_empty());
    }
}
