use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

//--------------------------------------        Payment       ---------------------------------------------------------
/// A stored payment record. The `id` is assigned by the store when the payment is created and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: i64,
    /// No domain validation is applied. Negative amounts are accepted.
    pub amount: f64,
    /// A short currency code. Any string is accepted.
    pub currency: String,
}

impl Payment {
    pub fn new<S: Into<String>>(id: i64, amount: f64, currency: S) -> Self {
        Self { id, amount, currency: currency.into() }
    }

    pub fn from_new_payment(id: i64, payment: NewPayment) -> Self {
        Self { id, amount: payment.amount, currency: payment.currency }
    }
}

impl Display for Payment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Payment #{} ({} {})", self.id, self.amount, self.currency)
    }
}

//--------------------------------------       NewPayment     ---------------------------------------------------------
/// The mutable fields of a payment. Used both to create a payment and to overwrite an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPayment {
    pub amount: f64,
    pub currency: String,
}

impl NewPayment {
    pub fn new<S: Into<String>>(amount: f64, currency: S) -> Self {
        Self { amount, currency: currency.into() }
    }
}

//--------------------------------------     DeletedPayment   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedPayment {
    pub id: i64,
}
