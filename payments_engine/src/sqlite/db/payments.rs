use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::{NewPayment, Payment};

pub async fn fetch_payments(conn: &mut SqliteConnection) -> Result<Vec<Payment>, sqlx::Error> {
    let payments = sqlx::query_as("SELECT id, amount, currency FROM payments ORDER BY id").fetch_all(conn).await?;
    Ok(payments)
}

pub async fn fetch_payment(id: i64, conn: &mut SqliteConnection) -> Result<Option<Payment>, sqlx::Error> {
    let payment = sqlx::query_as("SELECT id, amount, currency FROM payments WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(payment)
}

/// Inserts a new payment and returns the id assigned to it by the database.
pub async fn insert_payment(payment: NewPayment, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let id = sqlx::query("INSERT INTO payments (amount, currency) VALUES ($1, $2)")
        .bind(payment.amount)
        .bind(payment.currency)
        .execute(conn)
        .await?
        .last_insert_rowid();
    trace!("📝️ Payment inserted with id {id}");
    Ok(id)
}

pub async fn update_payment(id: i64, payment: NewPayment, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query("UPDATE payments SET amount = $1, currency = $2 WHERE id = $3")
        .bind(payment.amount)
        .bind(payment.currency)
        .bind(id)
        .execute(conn)
        .await?
        .rows_affected();
    Ok(rows)
}

pub async fn delete_payment(id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM payments WHERE id = $1").bind(id).execute(conn).await?.rows_affected();
    Ok(rows)
}
