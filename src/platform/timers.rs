//! Virtual-clock timer queue
//!
//! Animation steps are scheduled here instead of on a real event loop. Time
//! only moves when [`Timers::advance`] or [`Timers::run_until_idle`] is
//! called, which keeps staged animations deterministic.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use log::{trace, warn};

/// Upper bound on callbacks run by one `run_until_idle` call
const MAX_IDLE_RUNS: usize = 10_000;

/// Identifier of a scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

struct Timer {
    id: TimerId,
    due: Duration,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct TimersInner {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    queue: RefCell<Vec<Timer>>,
}

/// Shared handle to a timer queue
#[derive(Clone, Default)]
pub struct Timers {
    inner: Rc<TimersInner>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.inner.now.get()
    }

    /// Number of callbacks waiting to run
    pub fn pending(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    /// Run `callback` once `delay` has elapsed
    pub fn set_timeout<F>(&self, delay: Duration, callback: F) -> TimerId
    where
        F: FnOnce() + 'static,
    {
        let id = TimerId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner.queue.borrow_mut().push(Timer {
            id,
            due: self.now() + delay,
            callback: Box::new(callback),
        });
        id
    }

    /// Cancel a pending callback. Returns whether it was still pending.
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        let mut queue = self.inner.queue.borrow_mut();
        let before = queue.len();
        queue.retain(|timer| timer.id != id);
        queue.len() != before
    }

    /// Move the clock forward by `elapsed`, running every callback that
    /// falls due on the way, in due order. Callbacks scheduled while
    /// advancing run too if they fall due in the window.
    ///
    /// Returns the number of callbacks run.
    pub fn advance(&self, elapsed: Duration) -> usize {
        let target = self.now() + elapsed;
        let mut ran = 0;
        while let Some(timer) = self.pop_due(Some(target)) {
            self.fire(timer);
            ran += 1;
        }
        self.inner.now.set(target);
        ran
    }

    /// Run callbacks until the queue is empty, advancing the clock to each
    /// one's due time. Returns the number of callbacks run.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while let Some(timer) = self.pop_due(None) {
            self.fire(timer);
            ran += 1;
            if ran >= MAX_IDLE_RUNS {
                warn!("Timer queue still busy after {} callbacks", ran);
                break;
            }
        }
        ran
    }

    fn pop_due(&self, limit: Option<Duration>) -> Option<Timer> {
        let mut queue = self.inner.queue.borrow_mut();
        let index = queue
            .iter()
            .enumerate()
            .filter(|(_, timer)| limit.map_or(true, |limit| timer.due <= limit))
            .min_by_key(|(_, timer)| (timer.due, timer.id))
            .map(|(index, _)| index)?;
        Some(queue.remove(index))
    }

    fn fire(&self, timer: Timer) {
        if timer.due > self.now() {
            self.inner.now.set(timer.due);
        }
        trace!("Firing timer {:?} at {:?}", timer.id, timer.due);
        (timer.callback)();
    }
}

impl fmt::Debug for Timers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timers")
            .field("now", &self.now())
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::Timers;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_callbacks_run_in_due_order() {
        let timers = Timers::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (delay, label) in [(200, "b"), (100, "a"), (200, "c")] {
            let log = Rc::clone(&log);
            timers.set_timeout(ms(delay), move || log.borrow_mut().push(label));
        }

        assert_eq!(timers.advance(ms(150)), 1);
        assert_eq!(*log.borrow(), vec!["a"]);
        assert_eq!(timers.now(), ms(150));

        assert_eq!(timers.advance(ms(50)), 2);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_nested_timeouts_within_window() {
        let timers = Timers::new();
        let fired = Rc::new(RefCell::new(Vec::new()));

        let inner_timers = timers.clone();
        let sink = Rc::clone(&fired);
        timers.set_timeout(ms(100), move || {
            sink.borrow_mut().push(inner_timers.now());
            let sink = Rc::clone(&sink);
            let clock = inner_timers.clone();
            inner_timers.set_timeout(ms(800), move || sink.borrow_mut().push(clock.now()));
        });

        timers.advance(ms(500));
        assert_eq!(*fired.borrow(), vec![ms(100)]);

        timers.run_until_idle();
        assert_eq!(*fired.borrow(), vec![ms(100), ms(900)]);
    }

    #[test]
    fn test_clear_timeout() {
        let timers = Timers::new();
        let id = timers.set_timeout(ms(10), || panic!("cleared timer fired"));
        assert!(timers.clear_timeout(id));
        assert!(!timers.clear_timeout(id));
        assert_eq!(timers.run_until_idle(), 0);
    }
}
