//! Match engine: the delivery transition and innings/match lifecycle.

pub mod delivery;

pub use delivery::{decide_result, process_delivery, process_delivery_with_event, DeliveryEvent};
