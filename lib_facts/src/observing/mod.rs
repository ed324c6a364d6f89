//! # Observing Module
//!
//! Publish/subscribe for presentation state.
//!
//! - **`reactive_value`**: `ReactiveValue<T>`, a value holder with weakly-owned subscribers.
//! - **`delivery`**: `DeliveryContext`, the single serialized task all notifications run on.

#![forbid(unsafe_code)]

/// The serialized delivery task.
pub mod delivery;
/// The observable value container.
pub mod reactive_value;

pub use delivery::DeliveryContext;
pub use reactive_value::{ReactiveValue, SubscriptionHandle};
