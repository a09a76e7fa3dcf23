//! Application data for the Dataview framework
//!
//! The whole application shares one [`DataStore`]: an ordered list of
//! uniquely keyed [`Record`]s that notifies subscribers on every mutation.
//! The store is created once at startup and handed to whatever needs it;
//! clones are cheap handles onto the same data.

mod error;
mod record;
mod store;


pub use error::StoreError;
pub use record::Record;
pub use store::{DataStore, SubscriptionId};
