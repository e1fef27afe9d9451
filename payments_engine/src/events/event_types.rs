use serde::{Deserialize, Serialize};

use crate::db_types::{DeletedPayment, Payment};

/// The events pushed to subscribers of the [`NotificationHub`](super::NotificationHub).
///
/// On the wire, each event is a JSON object with an `event` name and a `data` payload, e.g.
/// `{"event":"paymentDeleted","data":{"id":4}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum PaymentEvent {
    /// The full set of payments. Replaces whatever the subscriber currently holds.
    PaymentsUpdated(Vec<Payment>),
    PaymentCreated(Payment),
    PaymentUpdated(Payment),
    PaymentDeleted(DeletedPayment),
}

impl PaymentEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PaymentsUpdated(_) => "paymentsUpdated",
            Self::PaymentCreated(_) => "paymentCreated",
            Self::PaymentUpdated(_) => "paymentUpdated",
            Self::PaymentDeleted(_) => "paymentDeleted",
        }
    }
}
