//! Fire-and-forget notification requests.

pub mod types;

pub use types::{NotificationKind, NotificationRequest, NotificationSink};
