//! # Storage backend contract
//!
//! This module defines the behaviour that a database backend needs to expose in order to act as the record store for
//! the payments engine.
//!
//! * [`PaymentStore`] provides the create, read, update and delete operations over the payments table.
//!
//! Backends never treat a missing record as an error. Lookups return `Option`, and updates and deletes report the
//! number of affected rows. It is up to the caller to decide what a miss means.
mod payment_store;

pub use payment_store::{PaymentStore, PaymentStoreError};
