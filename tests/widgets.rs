//! Integration tests for the data widgets

use std::time::Duration;

use dataview::component::{Host, LifecyclePhase};
use dataview::events::Event;
use dataview::kit::components::graph::CHART_TYPE_LIST;
use dataview::kit::components::{BarChart, DataTable, Editor, Graph, RawEditor};
use dataview::platform::Timers;
use dataview::state::{DataStore, Record};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn months() -> Vec<Record> {
    vec![Record::new("Jan", 12.0), Record::new("Feb", -76.0)]
}

fn seeded_store() -> DataStore {
    let store = DataStore::new();
    store.set(months()).unwrap();
    store
}

fn fire<C: dataview::component::Component>(host: &Host<C>, event: &str, selector: &str) -> bool {
    let target = host
        .query(selector)
        .unwrap()
        .unwrap_or_else(|| panic!("no element matches {selector}"));
    host.dispatch(&Event::new(event).with_target(target))
}

fn set_value<C: dataview::component::Component>(host: &Host<C>, selector: &str, value: &str) {
    let target = host.query(selector).unwrap().unwrap();
    host.with_element_mut(target, |element| element.set_attribute("value", value))
        .unwrap();
}

fn attached_graph(store: &DataStore, timers: &Timers, types: &str) -> Host<Graph> {
    let graph = Host::new(Graph::new(store.clone(), timers.clone()));
    graph.set_attribute(CHART_TYPE_LIST, Some(types)).unwrap();
    graph.attach().unwrap();
    graph
}

#[test]
fn test_graph_hands_store_snapshot_to_bar_chart() {
    init_logging();
    let store = seeded_store();
    let graph = attached_graph(&store, &Timers::new(), "bar,line");

    let charts = graph.children_of::<BarChart>();
    assert_eq!(charts.len(), 1);

    let state = charts[0].state();
    assert_eq!(state.all_data, months());
    assert_eq!(state.scale.max_value, 12.0);
    assert_eq!(state.scale.min_value, -76.0);
    assert_eq!(state.scale.bar_top(), "-87%");
    assert_eq!(state.colors.len(), 2);
}

#[test]
fn test_graph_replaces_chart_on_store_change() {
    let store = seeded_store();
    let graph = attached_graph(&store, &Timers::new(), "bar");
    let first = graph.children_of::<BarChart>().remove(0);

    store.add("Mar", 32.0).unwrap();

    assert_eq!(first.phase(), LifecyclePhase::Detached);
    let current = graph.children_of::<BarChart>().remove(0);
    assert_eq!(current.state().all_data.len(), 3);
    assert_eq!(current.query_all(".bar").unwrap().len(), 3);
}

#[test]
fn test_graph_switches_chart_type() {
    let store = seeded_store();
    let graph = attached_graph(&store, &Timers::new(), "bar,line");

    assert!(fire(&graph, "click", "li[data-index=\"1\"]"));

    assert_eq!(graph.state().current_type_index, 1);
    assert!(graph.children_of::<BarChart>().is_empty());
    assert!(graph.to_html().contains("This chart is not supported yet"));

    graph.set_attribute(CHART_TYPE_LIST, Some("bar")).unwrap();
    assert_eq!(graph.state().current_type_index, 0);
    assert_eq!(graph.children_of::<BarChart>().len(), 1);
}

#[test]
fn test_bar_animation_runs_on_timers() {
    let store = seeded_store();
    let timers = Timers::new();
    let graph = attached_graph(&store, &timers, "bar");
    let chart = graph.children_of::<BarChart>().remove(0);

    let bar_style = |property: &str| {
        let bar = chart.query(".bar[data-index=\"1\"]").unwrap().unwrap();
        chart.with_element(bar, |element| element.style(property)).flatten()
    };
    assert_eq!(bar_style("height").as_deref(), Some("0px"));
    assert_eq!(bar_style("top").as_deref(), Some("-87%"));
    assert_eq!(bar_style("transform").as_deref(), Some("translateY(100%)"));

    timers.advance(Duration::from_millis(100));
    let expected = chart.state().scale.bar_height(-76.0);
    assert_eq!(bar_style("height"), Some(expected));
    assert_eq!(bar_style("transition").as_deref(), Some("ease 800ms"));

    timers.run_until_idle();
    assert_eq!(bar_style("transition"), None);
    assert_eq!(timers.pending(), 0);
}

#[test]
fn test_pending_animation_is_dropped_with_chart() {
    let store = seeded_store();
    let timers = Timers::new();
    let graph = attached_graph(&store, &timers, "bar");
    let first = graph.children_of::<BarChart>().remove(0);

    graph.detach().unwrap();
    assert_eq!(first.phase(), LifecyclePhase::Detached);

    timers.run_until_idle();
    let bar = first.query(".bar").unwrap().unwrap();
    let height = first
        .with_element(bar, |element| element.style("height"))
        .flatten();
    assert_eq!(height.as_deref(), Some("0px"));
}

#[test]
fn test_bar_hover_toggles_class() {
    let store = seeded_store();
    let graph = attached_graph(&store, &Timers::new(), "bar");
    let chart = graph.children_of::<BarChart>().remove(0);
    let hovered = || {
        let bar = chart.query(".bar[data-index=\"0\"]").unwrap().unwrap();
        chart.with_element(bar, |element| element.has_class("hover")).unwrap()
    };

    assert!(fire(&chart, "mouseover", "p[data-index=\"0\"]"));
    assert!(hovered());
    assert!(fire(&chart, "mouseout", "p[data-index=\"0\"]"));
    assert!(!hovered());
}

#[test]
fn test_data_table_applies_staged_changes() {
    let store = seeded_store();
    let table = Host::new(DataTable::new(store.clone()));
    table.attach().unwrap();
    assert!(table.to_html().contains("no change"));

    set_value(&table, "input[data-key=\"Jan\"]", "5");
    assert!(fire(&table, "change", "input[data-key=\"Jan\"]"));
    assert!(table.query("input.changed").unwrap().is_some());
    assert_eq!(store.get("Jan").unwrap().val, 12.0);

    assert!(fire(&table, "click", ".remove-btn[data-key=\"Feb\"]"));
    assert!(table.query("input[data-key=\"Feb\"]").unwrap().is_none());

    assert!(fire(&table, "click", ".apply-btn"));
    assert_eq!(store.get_all(), vec![Record::new("Jan", 5.0)]);
    assert!(table.state().value_changes.is_empty());
    assert!(table.state().removed.is_empty());
}

#[test]
fn test_data_table_resets_staged_changes() {
    let store = seeded_store();
    let table = Host::new(DataTable::new(store.clone()));
    table.attach().unwrap();

    set_value(&table, "input[data-key=\"Feb\"]", "abc");
    assert!(fire(&table, "change", "input[data-key=\"Feb\"]"));
    assert!(table.state().value_changes.is_empty());

    set_value(&table, "input[data-key=\"Feb\"]", "");
    assert!(fire(&table, "change", "input[data-key=\"Feb\"]"));
    assert_eq!(table.state().value_changes.get("Feb"), Some(&0.0));

    assert!(fire(&table, "click", ".reset-btn[data-key=\"Feb\"]"));
    assert!(table.state().value_changes.is_empty());
    assert!(table.to_html().contains("no change"));
    assert_eq!(store.get_all(), months());
}

#[test]
fn test_data_table_keeps_markup_characters_in_keys() {
    let store = DataStore::new();
    store.add("a\"b", 1.0).unwrap();
    store.add("x<y&z", 2.0).unwrap();
    let table = Host::new(DataTable::new(store.clone()));
    table.attach().unwrap();

    let buttons = table.query_all(".remove-btn").unwrap();
    let keys: Vec<String> = buttons
        .iter()
        .filter_map(|button| {
            table
                .with_element(*button, |element| element.data("key").map(str::to_string))
                .flatten()
        })
        .collect();
    assert_eq!(keys, vec!["a\"b".to_string(), "x<y&z".to_string()]);

    let rows = table.query_all("tbody tr").unwrap();
    assert_eq!(table.text_content(rows[1]).as_deref(), Some("x<y&zRemove"));
    assert!(table.to_html().contains("<td>x&lt;y&amp;z</td>"));

    assert!(table.dispatch(&Event::new("click").with_target(buttons[0])));
    assert!(fire(&table, "click", ".apply-btn"));
    assert_eq!(store.get_all(), vec![Record::new("x<y&z", 2.0)]);
}

#[test]
fn test_editor_adds_records() {
    let store = DataStore::new();
    let editor = Host::new(Editor::new(store.clone()));
    editor.attach().unwrap();

    set_value(&editor, "input[name=\"id\"]", " Jun ");
    set_value(&editor, "input[name=\"val\"]", "42");
    assert!(fire(&editor, "submit", "form"));
    assert_eq!(store.get("Jun"), Some(Record::new("Jun", 42.0)));
    assert!(editor.query(".error").unwrap().is_none());

    set_value(&editor, "input[name=\"id\"]", "Jun");
    set_value(&editor, "input[name=\"val\"]", "1");
    assert!(fire(&editor, "submit", "form"));
    assert_eq!(store.len(), 1);
    assert!(editor.state().error.is_some());
    assert!(editor.query(".error").unwrap().is_some());
}

#[test]
fn test_editor_generates_missing_keys() {
    let store = DataStore::new();
    let editor = Host::new(Editor::new(store.clone()));
    editor.attach().unwrap();

    set_value(&editor, "input[name=\"val\"]", "7");
    assert!(fire(&editor, "submit", "form"));

    let records = store.get_all();
    assert_eq!(records.len(), 1);
    assert!(!records[0].key.is_empty());
    assert_eq!(records[0].val, 7.0);
}

#[test]
fn test_raw_editor_imports_json() {
    let store = seeded_store();
    let editor = Host::new(RawEditor::new(store.clone()));
    editor.attach().unwrap();
    assert_eq!(
        editor.state().raw_json,
        serde_json::to_string_pretty(&months()).unwrap()
    );

    let pre = editor.query(".json-editor").unwrap().unwrap();
    assert!(editor.set_text_content(pre, r#"[{key: "Mar", val: 32}]"#));
    assert!(fire(&editor, "input", ".json-editor"));
    assert!(editor.query(".actions.changed").unwrap().is_some());

    assert!(fire(&editor, "submit", "form"));
    assert_eq!(store.get_all(), vec![Record::new("Mar", 32.0)]);
    assert!(editor.state().error.is_none());
    assert!(editor.query(".actions.changed").unwrap().is_none());
}

#[test]
fn test_raw_editor_rejects_invalid_json() {
    init_logging();
    let store = seeded_store();
    let editor = Host::new(RawEditor::new(store.clone()));
    editor.attach().unwrap();

    let pre = editor.query(".json-editor").unwrap().unwrap();
    editor.set_text_content(pre, r#"[{key: "Mar", val: "x"}]"#);
    fire(&editor, "input", ".json-editor");
    fire(&editor, "submit", "form");

    let state = editor.state();
    assert!(state
        .error
        .as_deref()
        .is_some_and(|message| message.starts_with("Invalid JSON format")));
    assert_eq!(state.typed_json, state.raw_json);
    assert_eq!(store.get_all(), months());
}

#[test]
fn test_raw_editor_reset_restores_snapshot() {
    let store = seeded_store();
    let editor = Host::new(RawEditor::new(store.clone()));
    editor.attach().unwrap();

    let pre = editor.query(".json-editor").unwrap().unwrap();
    editor.set_text_content(pre, "[]");
    fire(&editor, "input", ".json-editor");
    assert_eq!(editor.state().typed_json, "[]");

    assert!(fire(&editor, "click", ".reset-btn"));
    assert_eq!(editor.state().typed_json, editor.state().raw_json);
}
