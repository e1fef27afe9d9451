//! `SqliteDatabase` is a concrete implementation of a payments engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements the [`PaymentStore`] trait.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate, SqlitePool};

use super::db::{new_pool, payments};
use crate::{
    db_types::{NewPayment, Payment},
    traits::{PaymentStore, PaymentStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl PaymentStore for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch_payments(&self) -> Result<Vec<Payment>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await.map_err(PaymentStoreError::unavailable)?;
        payments::fetch_payments(&mut conn).await.map_err(PaymentStoreError::unavailable)
    }

    async fn fetch_payment(&self, id: i64) -> Result<Option<Payment>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await.map_err(PaymentStoreError::unavailable)?;
        payments::fetch_payment(id, &mut conn).await.map_err(PaymentStoreError::unavailable)
    }

    async fn insert_payment(&self, payment: NewPayment) -> Result<i64, PaymentStoreError> {
        let mut conn = self.pool.acquire().await.map_err(PaymentStoreError::unavailable)?;
        let id = payments::insert_payment(payment, &mut conn).await.map_err(PaymentStoreError::write_failed)?;
        debug!("🗃️ Payment #{id} has been saved in the DB");
        Ok(id)
    }

    async fn update_payment(&self, id: i64, payment: NewPayment) -> Result<u64, PaymentStoreError> {
        let mut conn = self.pool.acquire().await.map_err(PaymentStoreError::unavailable)?;
        trace!("🗃️ Payment #{id} updating with new values: {payment:?}");
        let rows = payments::update_payment(id, payment, &mut conn).await.map_err(PaymentStoreError::write_failed)?;
        debug!("🗃️ Update of payment #{id} affected {rows} row(s)");
        Ok(rows)
    }

    async fn delete_payment(&self, id: i64) -> Result<u64, PaymentStoreError> {
        let mut conn = self.pool.acquire().await.map_err(PaymentStoreError::unavailable)?;
        let rows = payments::delete_payment(id, &mut conn).await.map_err(PaymentStoreError::write_failed)?;
        debug!("🗃️ Delete of payment #{id} affected {rows} row(s)");
        Ok(rows)
    }

    async fn close(&self) -> Result<(), PaymentStoreError> {
        self.pool.close().await;
        info!("🗃️ Database connection pool closed");
        Ok(())
    }
}

impl SqliteDatabase {
    /// Opens (creating it if necessary) the database at `url` and brings the schema up to date.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, PaymentStoreError> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await.map_err(PaymentStoreError::unavailable)?;
        migrate!("./src/sqlite/migrations")
            .run(&pool)
            .await
            .map_err(|e| PaymentStoreError::MigrationError(e.to_string()))?;
        debug!("🗃️ Database schema is up to date");
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
