// Platform services for the Dataview components
//
// Components never touch a browser directly. Navigation goes through a
// session [`History`] and delayed work through a virtual-clock [`Timers`]
// queue, both constructed explicitly and handed to the components that
// need them.

mod history;
mod timers;

pub use history::{History, ListenerId};
pub use timers::{TimerId, Timers};
