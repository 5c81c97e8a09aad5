use chrono::{DateTime, Utc};

/// Domain event contract.
///
/// Events are immutable facts; `event_type` is a stable dotted name used in
/// logs and over the wire.
pub trait Event: Clone + core::fmt::Debug {
    fn event_type(&self) -> &'static str;

    /// Schema version of the event payload.
    fn version(&self) -> u32;

    fn occurred_at(&self) -> DateTime<Utc>;
}
