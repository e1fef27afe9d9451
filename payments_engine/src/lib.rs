//! Payments Engine
//!
//! The payments engine is the backend for a small record-management service that keeps a single table of payments
//! (an amount and a currency code) and keeps every interested party in sync with it.
//!
//! The library is divided into the following sections:
//! 1. The storage backend contract ([`mod@traits`]) and its SQLite implementation ([`SqliteDatabase`]). You should not
//!    need to call the backend directly. Use [`PaymentsApi`] instead. The data types stored by the backend live in
//!    [`mod@db_types`].
//! 2. The [`mirror`] module, which writes a pretty-printed JSON snapshot of the whole table to a side file. The file is a
//!    disposable convenience copy; the database is always the source of truth.
//! 3. The [`events`] module, containing the [`NotificationHub`](events::NotificationHub) that fans payment events out to
//!    every connected subscriber.
//! 4. The [`PaymentsApi`], which runs every mutation through the same pipeline: write to the store, re-read the full
//!    set, refresh the mirror and broadcast the change.
pub mod db_types;
pub mod events;
pub mod mirror;
mod payments_api;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use payments_api::{PaymentApiError, PaymentsApi};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{PaymentStore, PaymentStoreError};
