use thiserror::Error;

use crate::db_types::{NewPayment, Payment};

#[derive(Debug, Clone, Error)]
pub enum PaymentStoreError {
    #[error("The payment store is unavailable. {0}")]
    StoreUnavailable(String),
    #[error("Could not write to the payment store. {0}")]
    StoreWriteError(String),
    #[error("Could not prepare the payment store schema. {0}")]
    MigrationError(String),
}

impl PaymentStoreError {
    pub fn unavailable<E: std::fmt::Display>(e: E) -> Self {
        Self::StoreUnavailable(e.to_string())
    }

    pub fn write_failed<E: std::fmt::Display>(e: E) -> Self {
        Self::StoreWriteError(e.to_string())
    }
}

/// The record store for payments.
///
/// Each operation is atomic at the single-row level. No operation spans more than one record, so backends do not need
/// to open transactions.
#[allow(async_fn_in_trait)]
pub trait PaymentStore {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Fetches every payment, ordered by id. The order is stable across repeated reads if there are no mutations in
    /// between.
    async fn fetch_payments(&self) -> Result<Vec<Payment>, PaymentStoreError>;

    /// Fetches the payment with the given id. If there is no such payment, `None` is returned.
    async fn fetch_payment(&self, id: i64) -> Result<Option<Payment>, PaymentStoreError>;

    /// Stores a new payment and returns the id that the store assigned to it.
    async fn insert_payment(&self, payment: NewPayment) -> Result<i64, PaymentStoreError>;

    /// Overwrites the amount and currency of the payment with the given id. Returns the number of records affected,
    /// i.e. 0 if the payment does not exist, or 1 otherwise.
    async fn update_payment(&self, id: i64, payment: NewPayment) -> Result<u64, PaymentStoreError>;

    /// Removes the payment with the given id. Returns the number of records affected (0 or 1).
    async fn delete_payment(&self, id: i64) -> Result<u64, PaymentStoreError>;

    /// Releases the resources held by the backend. The store must not be used after calling this method.
    async fn close(&self) -> Result<(), PaymentStoreError>;
}
