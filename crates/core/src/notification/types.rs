//! Notification request types.
//!
//! Notifications are a fire-and-forget sink: the engine requests that a
//! record be created and never reads it back. The metadata map is opaque
//! and passed through unchanged.

use serde::{Deserialize, Serialize};
use spendra_shared::types::UserId;

/// Kind of notification the engine can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A budget's utilization crossed its alert threshold.
    BudgetAlert,
    /// An expense awaits approval.
    ApprovalRequest,
    /// An expense was approved.
    ExpenseApproved,
    /// An expense was rejected.
    ExpenseRejected,
}

impl NotificationKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BudgetAlert => "budget_alert",
            Self::ApprovalRequest => "approval_request",
            Self::ExpenseApproved => "expense_approved",
            Self::ExpenseRejected => "expense_rejected",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request to enqueue a notification for delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Recipients.
    pub user_ids: Vec<UserId>,
    /// Notification kind.
    pub kind: NotificationKind,
    /// Short title.
    pub title: String,
    /// Human-readable message.
    pub message: String,
    /// Opaque structured payload for the delivery layer.
    pub metadata: serde_json::Value,
}

/// Outbound sink for notification requests.
///
/// Implemented by the delivery layer (email, push). Enqueueing is
/// fire-and-forget: no return value is consumed and failures are the
/// sink's concern, not the engine's.
pub trait NotificationSink: Send + Sync {
    /// Enqueues a notification for delivery.
    fn enqueue(&self, request: NotificationRequest)
    -> impl std::future::Future<Output = ()> + Send;
}
