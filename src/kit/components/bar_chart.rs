// Bar chart widget driven by `update-data` signals

use std::collections::BTreeMap;
use std::time::Duration;

use crate::component::{target_data, Component, ComponentError, Host, WeakHost};
use crate::events::{DataSignal, Event, Handler, UPDATE_DATA};
use crate::kit::utils::{color_by_key, range};
use crate::platform::Timers;
use crate::state::Record;
use crate::style::style_map;
use crate::template::{escape_text, try_render_list};
use crate::{handler, handlers, html};

/// Number of y-axis intervals when none is configured
pub const DEFAULT_TICK_COUNT: u32 = 10;

/// Delay between the start of two consecutive bar animations
const BAR_STAGGER: Duration = Duration::from_millis(100);

/// Length of one bar's grow transition
const BAR_TRANSITION: Duration = Duration::from_millis(800);

/// Signed value range of a chart
///
/// The range always includes zero, so negative and positive bars share one
/// baseline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartScale {
    /// Largest value, at least 0
    pub max_value: f64,
    /// Smallest value, at most 0
    pub min_value: f64,
    /// Distance between two y-axis ticks
    pub tick_step: f64,
    /// Share of the height below the zero line
    pub zero_top_ratio: f64,
}

impl ChartScale {
    /// Compute the scale of `records` for `tick_count` intervals
    pub fn from_records(records: &[Record], tick_count: u32) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let actual_max = records.iter().map(|r| r.val).fold(f64::MIN, f64::max);
        let actual_min = records.iter().map(|r| r.val).fold(f64::MAX, f64::min);
        let max_value = actual_max.max(0.0);
        let min_value = actual_min.min(0.0);
        let total = max_value.abs() + min_value.abs();

        let zero_top_ratio = if min_value == 0.0 {
            0.0
        } else {
            min_value.abs() / total
        };
        let tick_step = if tick_count == 0 {
            0.0
        } else {
            (total / f64::from(tick_count)).ceil()
        };

        Self {
            max_value,
            min_value,
            tick_step,
            zero_top_ratio,
        }
    }

    /// Length of the whole value range
    pub fn total(&self) -> f64 {
        self.max_value.abs() + self.min_value.abs()
    }

    /// Value shown at y-axis tick `index`
    pub fn tick_value(&self, index: usize) -> f64 {
        self.min_value + index as f64 * self.tick_step
    }

    /// CSS height of a bar for `val`
    pub fn bar_height(&self, val: f64) -> String {
        let total = self.total();
        if total == 0.0 {
            return "0%".to_string();
        }
        format!("{}%", (val.abs() / total * 100.0).ceil())
    }

    /// CSS offset that moves every bar's base onto the zero line
    pub fn bar_top(&self) -> String {
        format!("-{}%", (self.zero_top_ratio * 100.0).ceil())
    }
}

#[derive(Debug, Clone, Default)]
pub struct BarChartState {
    pub all_data: Vec<Record>,
    pub colors: BTreeMap<String, String>,
    pub scale: ChartScale,
}

/// Bar chart fed through the `update-data` signal
#[derive(Debug)]
pub struct BarChart {
    timers: Timers,
    tick_count: u32,
}

impl BarChart {
    pub fn new(timers: Timers) -> Self {
        Self::with_tick_count(timers, DEFAULT_TICK_COUNT)
    }

    pub fn with_tick_count(timers: Timers, tick_count: u32) -> Self {
        Self {
            timers,
            tick_count: tick_count.max(1),
        }
    }

    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    fn update_data(&self, cx: &Host<Self>, event: &Event) -> anyhow::Result<()> {
        let DataSignal { all_data } = DataSignal::from_event(event)?;

        let colors = all_data
            .iter()
            .map(|record| (record.key.clone(), color_by_key(&record.key).to_string()))
            .collect();
        let scale = ChartScale::from_records(&all_data, self.tick_count);

        cx.set_state(move |state: &mut BarChartState| {
            state.all_data = all_data;
            state.colors = colors;
            state.scale = scale;
        })?;
        Ok(())
    }

    fn mouseenter_handler(&self, cx: &Host<Self>, event: &Event) -> anyhow::Result<()> {
        Self::set_hover(cx, event, true)
    }

    fn mouseleave_handler(&self, cx: &Host<Self>, event: &Event) -> anyhow::Result<()> {
        Self::set_hover(cx, event, false)
    }

    fn set_hover(cx: &Host<Self>, event: &Event, hover: bool) -> anyhow::Result<()> {
        let Some(index) = target_data(cx, event, "index") else {
            return Ok(());
        };
        let Some(bar) = cx.query(&bar_selector(&index))? else {
            return Ok(());
        };

        cx.with_element_mut(bar, |element| {
            if hover {
                element.add_class("hover");
            } else {
                element.remove_class("hover");
            }
        });
        Ok(())
    }

    /// Reset every bar to zero height, then grow them one after another.
    ///
    /// Each delayed step looks its bar up again, so a step that outlives
    /// the render it was scheduled for does nothing once the bar is gone.
    fn animate_bars(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        let (scale, values) = {
            let state = cx.state();
            let values: Vec<f64> = state.all_data.iter().map(|record| record.val).collect();
            (state.scale.clone(), values)
        };
        let top = scale.bar_top();

        for bar in cx.query_all(".bar")? {
            let index = cx
                .with_element(bar, |element| element.data("index").map(str::to_string))
                .flatten();
            let Some(index) = index else {
                continue;
            };
            let Some(val) = index.parse::<usize>().ok().and_then(|i| values.get(i).copied()) else {
                continue;
            };

            let flip = if val < 0.0 { "translateY(100%)" } else { "" };
            cx.with_element_mut(bar, |element| {
                element.set_style("height", "0px");
                element.set_style("top", &top);
                element.set_style("transform", flip);
            });

            let position = index.parse::<u32>().unwrap_or_default();
            let height = scale.bar_height(val);
            let host = cx.downgrade();
            let timers = self.timers.clone();
            let selector = bar_selector(&index);

            self.timers.set_timeout(BAR_STAGGER * position, move || {
                let grown = restyle(
                    &host,
                    &selector,
                    &[("transition", "ease 800ms"), ("height", height.as_str())],
                );
                if grown {
                    timers.set_timeout(BAR_TRANSITION, move || {
                        restyle(&host, &selector, &[("transition", "")]);
                    });
                }
            });
        }

        let tick_count = self.tick_count;
        for tick in cx.query_all(".y-tick")? {
            cx.with_element_mut(tick, |element| {
                let index: u32 = element
                    .data("index")
                    .and_then(|index| index.parse().ok())
                    .unwrap_or_default();
                let bottom = f64::from(index) * 100.0 / f64::from(tick_count);
                element.set_style("bottom", &format!("{bottom}%"));
                element.set_style("transform", "translateY(50%)");
            });
        }
        Ok(())
    }
}

fn bar_selector(index: &str) -> String {
    format!(".bar[data-index=\"{index}\"]")
}

/// Apply inline styles to the element matching `selector` in the host's
/// current render. Returns `false` if the host or the element is gone.
fn restyle(host: &WeakHost<BarChart>, selector: &str, styles: &[(&str, &str)]) -> bool {
    let Some(host) = host.upgrade() else {
        return false;
    };
    if !host.phase().is_live() {
        return false;
    }
    let Ok(Some(bar)) = host.query(selector) else {
        return false;
    };

    host.with_element_mut(bar, |element| {
        for (property, value) in styles {
            element.set_style(property, value);
        }
    })
    .is_some()
}

impl Component for BarChart {
    type State = BarChartState;

    const TAG: &'static str = "app-bar-chart";

    fn styles(&self) -> &'static str {
        STYLES
    }

    fn handlers() -> Vec<Handler<Self>> {
        handlers![Self::mouseenter_handler, Self::mouseleave_handler]
    }

    fn init(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        cx.listen(UPDATE_DATA, Self::update_data);
        Ok(())
    }

    fn render(&self, state: &BarChartState) -> Result<String, ComponentError> {
        let ticks = range(0, i64::from(self.tick_count) + 1, 1);
        let y_axis = try_render_list(&ticks, |_, index| {
            html!(
                "<div class=\"y-tick\" data-index=" {index} ">"
                    {state.scale.tick_value(index)}
                "</div>"
            )
        })?;

        let bars = try_render_list(&state.all_data, |record, index| {
            let color = state
                .colors
                .get(&record.key)
                .map(String::as_str)
                .unwrap_or_default();
            html!(
                "<div class=\"bar-container\">"
                    "<div class=\"bar\" data-index=" {index}
                    " style=" {style_map(&[("backgroundColor", color)])} ">"
                        "<div class=\"label\">" {record.val} "</div>"
                    "</div>"
                "</div>"
            )
        })?;

        let labels = try_render_list(&state.all_data, |record, index| {
            html!(
                "<p data-index=" {index}
                " @mouseover=" {handler!(Self::mouseenter_handler)}
                " @mouseout=" {handler!(Self::mouseleave_handler)}
                ">" {escape_text(&record.key)} "</p>"
            )
        })?;

        Ok(html!(
            "<div class=\"chart-container\">"
                "<!-- Y-Axis -->"
                "<div class=\"y-axis\">" {y_axis} "</div>"
                "<!-- Chart -->"
                "<div class=\"chart\">" {bars} "</div>"
                "<!-- X-Axis -->"
                "<div class=\"x-axis\">" {labels} "</div>"
            "</div>"
        )?)
    }

    fn after_render(&self, cx: &Host<Self>) -> Result<(), ComponentError> {
        self.animate_bars(cx)
    }
}

const STYLES: &str = r#"
  .chart-container {
    display: grid;
    grid-template-columns: auto 1fr;
    grid-template-rows: 1fr auto;
    height: 100%;
    gap: 16px;
  }

  .y-axis {
    position: relative;
    height: 100%;
    font-size: 14px;
    color: #555;
    width: 40px;
    border-right: 1px solid #333;
  }

  .y-tick {
    position: absolute;
    bottom: 0;
    right: 0;
    display: flex;
    align-items: center;
    justify-content: center;
    gap: 2px;
  }

  .y-tick::after {
    content: "";
    display: block;
    width: 10px;
    height: 1px;
    background-color: #333;
  }

  .chart {
    display: flex;
    align-items: flex-end;
    gap: 10px;
    height: 100%;
    position: relative;
  }

  .bar-container {
    height: 100%;
    flex: 1;
    display: flex;
    flex-direction: column;
    align-items: center;
    justify-content: flex-end;
  }

  .bar {
    position: relative;
    width: 100%;
    border-radius: 10px;
    color: #000;
    font-weight: bold;
    transition: color 0.25s, background-color 0.3s;
  }

  .bar.hover {
    color: #fff;
    background-color: #333 !important;
  }

  .label {
    position: absolute;
    top: 50%;
    left: 50%;
    transform: translate(-50%, -50%);
  }

  .x-axis {
    grid-column: 2/3;
    display: flex;
    gap: 10px;
    justify-content: space-between;
    padding: 0 4px;
    margin-top: 8px;
    border-top: 1px solid #333;
  }

  .x-axis p {
    flex: 1;
    text-align: center;
    font-size: 12px;
    color: #555;
    margin: 8px 0;
    overflow: hidden;
    text-overflow: ellipsis;
    white-space: nowrap;
    padding: 4px 2px;
    transition: color 0.25s, background-color 0.3s;
  }

  .x-axis p:hover {
    color: #fff;
    background-color: #333;
    border-radius: 4px;
  }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn records(values: &[(&str, f64)]) -> Vec<Record> {
        values
            .iter()
            .map(|(key, val)| Record::new(*key, *val))
            .collect()
    }

    #[test]
    fn test_scale_spans_zero() {
        let scale = ChartScale::from_records(&records(&[("Jan", 12.0), ("Feb", -76.0)]), 10);

        assert_eq!(scale.max_value, 12.0);
        assert_eq!(scale.min_value, -76.0);
        assert_eq!(scale.tick_step, 9.0);
        assert!((scale.zero_top_ratio - 76.0 / 88.0).abs() < 1e-12);
        assert_eq!(scale.bar_top(), "-87%");
        assert_eq!(scale.bar_height(-76.0), "87%");
        assert_eq!(scale.tick_value(10), 14.0);
    }

    #[test]
    fn test_scale_of_positive_values() {
        let scale = ChartScale::from_records(&records(&[("a", 5.0), ("b", 20.0)]), 10);

        assert_eq!(scale.max_value, 20.0);
        assert_eq!(scale.min_value, 0.0);
        assert_eq!(scale.zero_top_ratio, 0.0);
        assert_eq!(scale.tick_step, 2.0);
        assert_eq!(scale.bar_height(5.0), "25%");
    }

    #[test]
    fn test_empty_scale() {
        let scale = ChartScale::from_records(&[], 10);
        assert_eq!(scale, ChartScale::default());
        assert_eq!(scale.bar_height(3.0), "0%");
        assert_eq!(scale.bar_top(), "-0%");
    }

    #[test]
    fn test_tick_count_is_at_least_one() {
        let chart = BarChart::with_tick_count(Timers::new(), 0);
        assert_eq!(chart.tick_count(), 1);
    }
}
