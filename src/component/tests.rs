//! Tests for the component host

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::json;

use crate::component::{Component, ComponentError, Host, LifecyclePhase, StateMap};
use crate::events::{DataSignal, Event, Handler, UPDATE_DATA};
use crate::state::{DataStore, Record};
use crate::template::{self, Value};
use crate::{handler, handlers, html};

type Log = Rc<RefCell<Vec<&'static str>>>;

// A counter that records every hook it goes through
#[derive(Debug, Default)]
struct Counter {
    log: Log,
}

fn count_of(state: &StateMap) -> i64 {
    state
        .get("count")
        .and_then(serde_json::Value::as_i64)
        .unwrap_or(0)
}

impl Counter {
    fn increment(&self, cx: &Host<Self>, _event: &Event) -> anyhow::Result<()> {
        let count = count_of(&cx.state()) + 1;
        cx.set_state(StateMap::try_from(json!({ "count": count }))?)?;
        Ok(())
    }

    fn fail(&self, _cx: &Host<Self>, _event: &Event) -> anyhow::Result<()> {
        anyhow::bail!("handler failed on purpose")
    }
}

impl Component for Counter {
    type State = StateMap;

    const TAG: &'static str = "test-counter";

    fn handlers() -> Vec<Handler<Self>> {
        handlers![Self::increment, Self::fail]
    }

    fn init(&self, _cx: &Host<Self>) -> Result<(), ComponentError> {
        self.log.borrow_mut().push("init");
        Ok(())
    }

    fn render(&self, state: &StateMap) -> Result<String, ComponentError> {
        self.log.borrow_mut().push("render");
        Ok(html!(
            "<div>"
                "<button id=\"inc\" @click=" {handler!(Self::increment)} ">+</button>"
                "<button id=\"fail\" @click=" {handler!(Self::fail)} ">!</button>"
                "<button id=\"bogus\" @click=\"missing\">?</button>"
                "<span class=\"count\">" {count_of(state)} "</span>"
            "</div>"
        )?)
    }

    fn after_render_first(&self, _cx: &Host<Self>) -> Result<(), ComponentError> {
        self.log.borrow_mut().push("after_render_first");
        Ok(())
    }

    fn after_render(&self, _cx: &Host<Self>) -> Result<(), ComponentError> {
        self.log.borrow_mut().push("after_render");
        Ok(())
    }

    fn after_deleted(&self, _cx: &Host<Self>) -> Result<(), ComponentError> {
        self.log.borrow_mut().push("after_deleted");
        Ok(())
    }
}

fn counter() -> (Host<Counter>, Log) {
    let log = Log::default();
    let host = Host::new(Counter { log: log.clone() });
    (host, log)
}

fn click(host: &Host<Counter>, selector: &str) -> bool {
    let target = host.query(selector).unwrap().unwrap();
    host.dispatch(&Event::new("click").with_target(target))
}

fn shown_count(host: &Host<Counter>) -> String {
    let count = host.query(".count").unwrap().unwrap();
    host.text_content(count).unwrap()
}

#[test]
fn test_lifecycle_hook_order() {
    let (host, log) = counter();
    assert_eq!(host.phase(), LifecyclePhase::Unattached);

    host.attach().unwrap();
    assert_eq!(host.phase(), LifecyclePhase::Rendered);
    assert_eq!(*log.borrow(), vec!["init", "render", "after_render_first"]);

    log.borrow_mut().clear();
    host.set_state(StateMap::try_from(json!({ "count": 5 })).unwrap())
        .unwrap();
    assert_eq!(*log.borrow(), vec!["render", "after_render"]);
    assert_eq!(host.phase(), LifecyclePhase::Rendered);

    log.borrow_mut().clear();
    host.detach().unwrap();
    assert_eq!(*log.borrow(), vec!["after_deleted"]);
    assert_eq!(host.phase(), LifecyclePhase::Detached);
    assert!(host.root().listeners().is_empty());
}

#[test]
fn test_attach_twice_is_rejected() {
    let (host, _log) = counter();
    host.attach().unwrap();

    let err = host.attach().unwrap_err();
    assert!(matches!(
        err,
        ComponentError::InvalidLifecycleTransition(LifecyclePhase::Rendered, _)
    ));
}

#[test]
fn test_set_state_is_a_shallow_merge() {
    let (host, _log) = counter();
    host.set_state(StateMap::try_from(json!({ "count": 1, "label": "a" })).unwrap())
        .unwrap();
    host.set_state(StateMap::try_from(json!({ "label": "b" })).unwrap())
        .unwrap();

    assert_eq!(
        host.state().to_value(),
        json!({ "count": 1, "label": "b" })
    );
}

#[test]
fn test_set_state_before_attach_only_merges() {
    let (host, log) = counter();
    host.set_state(StateMap::try_from(json!({ "count": 3 })).unwrap())
        .unwrap();

    assert!(log.borrow().is_empty());
    assert_eq!(host.phase(), LifecyclePhase::Unattached);

    host.attach().unwrap();
    assert_eq!(shown_count(&host), "3");
}

#[test]
fn test_set_state_after_detach_is_rejected() {
    let (host, log) = counter();
    host.attach().unwrap();
    host.detach().unwrap();
    log.borrow_mut().clear();

    let err = host
        .set_state(StateMap::try_from(json!({ "count": 9 })).unwrap())
        .unwrap_err();
    assert!(matches!(
        err,
        ComponentError::InvalidLifecycleTransition(LifecyclePhase::Detached, _)
    ));
    assert_eq!(count_of(&host.state()), 0);
    assert!(log.borrow().is_empty());
}

#[test]
fn test_state_patch_must_be_an_object() {
    let err = StateMap::try_from(json!([1, 2])).unwrap_err();
    assert!(matches!(err, ComponentError::InvalidStatePatch(_)));
}

#[test]
fn test_dispatch_runs_named_handler() {
    let (host, _log) = counter();
    host.attach().unwrap();

    assert!(click(&host, "#inc"));
    assert!(click(&host, "#inc"));
    assert_eq!(shown_count(&host), "2");
}

#[test]
fn test_unknown_handler_name_is_ignored() {
    let (host, log) = counter();
    host.attach().unwrap();
    log.borrow_mut().clear();

    assert!(!click(&host, "#bogus"));
    assert!(log.borrow().is_empty());
    assert_eq!(host.phase(), LifecyclePhase::Rendered);
}

#[test]
fn test_event_without_target_is_ignored() {
    let (host, _log) = counter();
    host.attach().unwrap();

    assert!(!host.dispatch(&Event::new("click")));
}

#[test]
fn test_handler_error_does_not_propagate() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (host, _log) = counter();
    host.attach().unwrap();

    assert!(click(&host, "#fail"));
    assert_eq!(host.phase(), LifecyclePhase::Rendered);
    assert!(click(&host, "#inc"));
    assert_eq!(shown_count(&host), "1");
}

#[test]
fn test_detached_host_does_not_dispatch() {
    let (host, _log) = counter();
    host.attach().unwrap();
    let target = host.query("#inc").unwrap().unwrap();
    host.detach().unwrap();

    assert!(!host.dispatch(&Event::new("click").with_target(target)));
}

#[test]
fn test_element_refs_expire_on_render() {
    let (host, _log) = counter();
    host.attach().unwrap();

    let stale = host.query("#inc").unwrap().unwrap();
    assert!(click(&host, "#inc"));

    assert!(host.with_element(stale, |element| element.id().map(str::to_string)).is_none());
    assert!(!host.dispatch(&Event::new("click").with_target(stale)));
    assert_eq!(shown_count(&host), "1");
}

#[test]
fn test_element_refs_do_not_cross_roots() {
    let (first, _) = counter();
    let (second, _) = counter();
    first.attach().unwrap();
    second.attach().unwrap();

    let foreign = second.query("#inc").unwrap().unwrap();
    assert!(!first.dispatch(&Event::new("click").with_target(foreign)));
    assert!(first.with_element(foreign, |_| ()).is_none());
    assert_eq!(shown_count(&first), "0");

    assert!(second.dispatch(&Event::new("click").with_target(foreign)));
    assert_eq!(shown_count(&second), "1");
}

#[test]
fn test_queries_are_scoped_to_own_root() {
    let (counter, _log) = counter();
    counter.attach().unwrap();
    let greeter = Host::new(Greeter);
    greeter.attach().unwrap();

    assert!(counter.query(".greeting").unwrap().is_none());
    assert!(greeter.query(".count").unwrap().is_none());
    assert_eq!(greeter.query_all("p").unwrap().len(), 1);
    assert!(counter.query("[").is_err());
}

#[test]
fn test_markup_includes_scoped_styles() {
    let host = Host::new(Greeter);
    host.attach().unwrap();

    let markup = host.to_html();
    assert!(markup.starts_with("<style>"));
    assert!(markup.contains(".greeting { color: red; }"));
    assert!(markup.ends_with("<p class=\"greeting\">hello</p>"));
}

// A static component without handlers
#[derive(Debug)]
struct Greeter;

impl Component for Greeter {
    type State = ();

    const TAG: &'static str = "test-greeter";

    fn styles(&self) -> &'static str {
        ".greeting { color: red; }"
    }

    fn render(&self, _state: &()) -> Result<String, ComponentError> {
        Ok(html!("<p class=\"greeting\">hello</p>")?)
    }
}

// Reports observed attribute changes and listens for data signals
#[derive(Debug)]
struct Watcher {
    store: Option<DataStore>,
}

#[derive(Debug, Clone, Default)]
struct WatcherState {
    changes: Vec<(String, Option<String>, Option<String>)>,
    records: Vec<Record>,
}

impl Watcher {
    fn on_data(&self, cx: &Host<Self>, event: &Event) -> anyhow::Result<()> {
        let signal = DataSignal::from_event(event)?;
        cx.set_state(move |state: &mut WatcherState| state.records = signal.all_data)?;
        Ok(())
    }
}

impl Component for Watcher {
    type State = WatcherState;

    const TAG: &'static str = "test-watcher";

    fn observed_attributes() -> &'static [&'static str] {
        &["mode"]
    }

    fn attribute_changed(
        &self,
        cx: &Host<Self>,
        name: &str,
        old: Option<&str>,
        new: Option<&str>,
    ) -> Result<(), ComponentError> {
        let change = (name.to_string(), old.map(str::to_string), new.map(str::to_string));
        cx.set_state(move |state: &mut WatcherState| state.changes.push(change))
    }

    fn init(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        cx.listen(UPDATE_DATA, Self::on_data);
        if let Some(store) = &self.store {
            cx.subscribe(store, |cx, records| {
                let records = records.to_vec();
                cx.set_state(move |state: &mut WatcherState| state.records = records)
            });
        }
        Ok(())
    }

    fn render(&self, state: &WatcherState) -> Result<String, ComponentError> {
        Ok(html!("<p>" {state.records.len()} "</p>")?)
    }
}

#[test]
fn test_observed_attribute_changes_are_reported() {
    let host = Host::new(Watcher { store: None });
    host.set_attribute("mode", Some("bar")).unwrap();
    host.attach().unwrap();
    host.set_attribute("mode", Some("bar")).unwrap();
    host.set_attribute("other", Some("x")).unwrap();
    host.set_attribute("mode", None).unwrap();

    assert_eq!(
        host.state().changes,
        vec![
            ("mode".to_string(), None, Some("bar".to_string())),
            ("mode".to_string(), Some("bar".to_string()), None),
        ]
    );
    assert_eq!(host.attribute("other").as_deref(), Some("x"));
    assert_eq!(host.attribute("mode"), None);
}

#[test]
fn test_emit_reaches_signal_listeners() {
    let host = Host::new(Watcher { store: None });
    host.attach().unwrap();

    let event = DataSignal::new(vec![Record::new("Jan", 12.0)])
        .into_event()
        .unwrap();
    assert_eq!(host.emit(&event), 1);
    assert_eq!(host.state().records, vec![Record::new("Jan", 12.0)]);

    host.detach().unwrap();
    assert_eq!(host.emit(&event), 0);
}

#[test]
fn test_store_subscription_ends_on_detach() {
    let store = DataStore::new();
    let host = Host::new(Watcher {
        store: Some(store.clone()),
    });
    host.attach().unwrap();
    assert_eq!(store.subscriber_count(), 1);

    store.add("Jan", 12.0).unwrap();
    assert_eq!(host.state().records.len(), 1);

    host.detach().unwrap();
    assert_eq!(store.subscriber_count(), 0);
    store.add("Feb", 1.0).unwrap();
    assert_eq!(host.state().records.len(), 1);
}

// Mounts a child component into its placeholder after every render
#[derive(Debug)]
struct Parent;

impl Component for Parent {
    type State = i64;

    const TAG: &'static str = "test-parent";

    fn render(&self, state: &i64) -> Result<String, ComponentError> {
        Ok(html!(
            "<div>"
                "<span>" {*state} "</span>"
                "<test-greeter class=\"slot\" data-x=\"1\"></test-greeter>"
            "</div>"
        )?)
    }

    fn after_render_first(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        cx.mount_child(".slot", Greeter)?;
        Ok(())
    }

    fn after_render(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        cx.mount_child(".slot", Greeter)?;
        Ok(())
    }
}

#[test]
fn test_children_are_replaced_on_render() {
    let parent = Host::new(Parent);
    parent.attach().unwrap();

    let first = parent.children_of::<Greeter>();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].phase(), LifecyclePhase::Rendered);
    assert_eq!(first[0].attribute("data-x").as_deref(), Some("1"));
    assert_eq!(parent.child_tags(), vec!["test-greeter"]);

    parent.set_state(|state: &mut i64| *state += 1).unwrap();
    assert_eq!(first[0].phase(), LifecyclePhase::Detached);

    let second = parent.children_of::<Greeter>();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].phase(), LifecyclePhase::Rendered);

    parent.detach().unwrap();
    assert_eq!(second[0].phase(), LifecyclePhase::Detached);
    assert!(parent.child_tags().is_empty());
}

#[test]
fn test_mount_child_without_placeholder() {
    let parent = Host::new(Parent);
    parent.attach().unwrap();

    assert!(parent.mount_child(".missing", Greeter).unwrap().is_none());
}

// Subscribes and listens in init; renders an error while `broken` is set
#[derive(Debug)]
struct Flaky {
    store: DataStore,
    broken: Rc<Cell<bool>>,
}

impl Flaky {
    fn on_data(&self, _cx: &Host<Self>, _event: &Event) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Component for Flaky {
    type State = i64;

    const TAG: &'static str = "test-flaky";

    fn init(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        cx.listen(UPDATE_DATA, Self::on_data);
        cx.subscribe(&self.store, |cx, records| {
            let len = records.len() as i64;
            cx.set_state(move |state: &mut i64| *state = len)
        });
        Ok(())
    }

    fn render(&self, state: &i64) -> Result<String, ComponentError> {
        if self.broken.get() {
            return Ok(template::html(&["<a @click=", "></a>"], &[Value::Handler("")])?);
        }
        Ok(html!(
            "<div>"
                "<span>" {*state} "</span>"
                "<test-greeter class=\"slot\"></test-greeter>"
            "</div>"
        )?)
    }

    fn after_render_first(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        cx.mount_child(".slot", Greeter)?;
        Ok(())
    }

    fn after_render(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        cx.mount_child(".slot", Greeter)?;
        Ok(())
    }
}

fn flaky(store: &DataStore, broken: bool) -> (Host<Flaky>, Rc<Cell<bool>>) {
    let broken = Rc::new(Cell::new(broken));
    let host = Host::new(Flaky {
        store: store.clone(),
        broken: broken.clone(),
    });
    (host, broken)
}

#[test]
fn test_failed_attach_releases_everything_from_init() {
    let store = DataStore::new();
    let (host, broken) = flaky(&store, true);
    let signal = DataSignal::new(Vec::new()).into_event().unwrap();

    assert!(matches!(host.attach(), Err(ComponentError::Template(_))));
    assert_eq!(host.phase(), LifecyclePhase::Unattached);
    assert_eq!(store.subscriber_count(), 0);
    assert_eq!(host.emit(&signal), 0);
    assert!(host.root().listeners().is_empty());

    broken.set(false);
    host.attach().unwrap();
    assert_eq!(host.phase(), LifecyclePhase::Rendered);
    assert_eq!(store.subscriber_count(), 1);
    assert_eq!(host.emit(&signal), 1);
}

#[test]
fn test_failed_render_keeps_state_and_children() {
    let store = DataStore::new();
    let (host, broken) = flaky(&store, false);
    host.attach().unwrap();
    let child = host.children_of::<Greeter>().remove(0);
    let span = host.query("span").unwrap().unwrap();

    broken.set(true);
    assert!(host.set_state(|state: &mut i64| *state = 7).is_err());

    assert_eq!(*host.state(), 0);
    assert_eq!(host.phase(), LifecyclePhase::Rendered);
    assert_eq!(child.phase(), LifecyclePhase::Rendered);
    assert_eq!(host.child_tags(), vec!["test-greeter"]);
    assert_eq!(host.text_content(span).as_deref(), Some("0"));

    broken.set(false);
    host.set_state(|state: &mut i64| *state = 7).unwrap();
    assert_eq!(child.phase(), LifecyclePhase::Detached);
    let span = host.query("span").unwrap().unwrap();
    assert_eq!(host.text_content(span).as_deref(), Some("7"));
}

// Keeps bumping its own state from `after_render` until it reaches `limit`
#[derive(Debug)]
struct Stepper {
    limit: i64,
    renders: Rc<Cell<u32>>,
}

impl Component for Stepper {
    type State = i64;

    const TAG: &'static str = "test-stepper";

    fn render(&self, state: &i64) -> Result<String, ComponentError> {
        self.renders.set(self.renders.get() + 1);
        Ok(html!("<span>" {*state} "</span>")?)
    }

    fn after_render(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        let current = *cx.state();
        if current < self.limit {
            cx.set_state(move |state: &mut i64| *state = current + 1)?;
        }
        Ok(())
    }
}

#[test]
fn test_set_state_from_after_render_settles() {
    let renders = Rc::new(Cell::new(0));
    let host = Host::new(Stepper {
        limit: 3,
        renders: renders.clone(),
    });
    host.attach().unwrap();
    assert_eq!(renders.get(), 1);

    host.set_state(|state: &mut i64| *state = 1).unwrap();

    assert_eq!(renders.get(), 4);
    assert_eq!(*host.state(), 3);
    assert_eq!(host.phase(), LifecyclePhase::Rendered);
    let span = host.query("span").unwrap().unwrap();
    assert_eq!(host.text_content(span).as_deref(), Some("3"));
}
