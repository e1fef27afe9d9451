mod event_types;
mod hub;

pub use event_types::*;
pub use hub::{NotificationHub, Subscription};
