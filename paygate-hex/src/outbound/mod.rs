//! Outbound adapters.

mod notifier;

pub use notifier::HttpNotifier;
