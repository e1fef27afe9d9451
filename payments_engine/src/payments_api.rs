//! `PaymentsApi` is the primary API for reading and mutating payments.
//!
//! Every mutation goes through the same pipeline:
//! 1. The store operation is executed.
//! 2. On success, the full payment set is re-read once from the store.
//! 3. The mirror file is overwritten with that set.
//! 4. A targeted event (created, updated or deleted) is published, followed by a full-set event built from the same
//!    read.
//!
//! Mutations are serialised by a single write lock that is held for the whole pipeline. Subscribers therefore observe
//! events in exactly the order the mutations were applied, and the mirror and full-set event always reflect the state
//! directly after the mutation that triggered them.
//!
//! Mirror failures are logged and otherwise ignored. They never undo a mutation that the store has already committed.
use std::fmt::Debug;

use log::*;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    db_types::{DeletedPayment, NewPayment, Payment},
    events::{NotificationHub, PaymentEvent, Subscription},
    mirror::MirrorWriter,
    traits::{PaymentStore, PaymentStoreError},
};

#[derive(Debug, Clone, Error)]
pub enum PaymentApiError {
    #[error("Payment #{0} does not exist")]
    PaymentNotFound(i64),
    #[error("{0}")]
    Store(#[from] PaymentStoreError),
}

pub struct PaymentsApi<B> {
    db: B,
    mirror: Option<MirrorWriter>,
    hub: NotificationHub,
    write_lock: Mutex<()>,
}

impl<B: Debug> Debug for PaymentsApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentsApi ({:?}, mirror: {:?})", self.db, self.mirror)
    }
}

impl<B> PaymentsApi<B> {
    pub fn new(db: B, mirror: Option<MirrorWriter>, hub: NotificationHub) -> Self {
        Self { db, mirror, hub, write_lock: Mutex::new(()) }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn hub(&self) -> &NotificationHub {
        &self.hub
    }
}

impl<B> PaymentsApi<B>
where B: PaymentStore
{
    pub async fn list_payments(&self) -> Result<Vec<Payment>, PaymentApiError> {
        let payments = self.db.fetch_payments().await?;
        Ok(payments)
    }

    /// Fetches a single payment. A missing payment is not an error, and `None` is returned.
    pub async fn fetch_payment(&self, id: i64) -> Result<Option<Payment>, PaymentApiError> {
        let payment = self.db.fetch_payment(id).await?;
        Ok(payment)
    }

    /// Stores a new payment, then refreshes the mirror and notifies subscribers. Returns the stored payment, including
    /// its newly assigned id.
    pub async fn create_payment(&self, payment: NewPayment) -> Result<Payment, PaymentApiError> {
        let _guard = self.write_lock.lock().await;
        let id = self.db.insert_payment(payment.clone()).await?;
        let payment = Payment::from_new_payment(id, payment);
        info!("💸️ {payment} created");
        self.after_mutation(PaymentEvent::PaymentCreated(payment.clone())).await;
        Ok(payment)
    }

    /// Overwrites the amount and currency of an existing payment. If the payment does not exist, nothing is changed and
    /// no notifications are sent.
    pub async fn update_payment(&self, id: i64, update: NewPayment) -> Result<Payment, PaymentApiError> {
        let _guard = self.write_lock.lock().await;
        let rows = self.db.update_payment(id, update.clone()).await?;
        if rows == 0 {
            debug!("💸️ Cannot update payment #{id}. It does not exist");
            return Err(PaymentApiError::PaymentNotFound(id));
        }
        let payment = Payment::from_new_payment(id, update);
        info!("💸️ {payment} updated");
        self.after_mutation(PaymentEvent::PaymentUpdated(payment.clone())).await;
        Ok(payment)
    }

    /// Removes a payment. If the payment does not exist, nothing is changed and no notifications are sent.
    pub async fn delete_payment(&self, id: i64) -> Result<(), PaymentApiError> {
        let _guard = self.write_lock.lock().await;
        let rows = self.db.delete_payment(id).await?;
        if rows == 0 {
            debug!("💸️ Cannot delete payment #{id}. It does not exist");
            return Err(PaymentApiError::PaymentNotFound(id));
        }
        info!("💸️ Payment #{id} deleted");
        self.after_mutation(PaymentEvent::PaymentDeleted(DeletedPayment { id })).await;
        Ok(())
    }

    /// Registers a new subscriber and returns it together with the current payment set.
    ///
    /// No mutation can complete between the subscription and the read, so the snapshot followed by the subscription's
    /// events is a gap-free history.
    pub async fn subscribe(&self) -> Result<(Subscription, Vec<Payment>), PaymentApiError> {
        let _guard = self.write_lock.lock().await;
        let subscription = self.hub.subscribe();
        let payments = self.db.fetch_payments().await?;
        Ok((subscription, payments))
    }

    pub async fn close(&self) -> Result<(), PaymentApiError> {
        self.db.close().await?;
        Ok(())
    }

    // Must be called while holding the write lock.
    async fn after_mutation(&self, event: PaymentEvent) {
        let snapshot = match self.db.fetch_payments().await {
            Ok(payments) => Some(payments),
            Err(e) => {
                error!("💸️ Could not re-read payments after a mutation. The mirror and full-set event are skipped. {e}");
                None
            },
        };
        if let (Some(mirror), Some(payments)) = (&self.mirror, &snapshot) {
            if let Err(e) = mirror.write_snapshot(payments).await {
                error!("🪞️ Mirror could not be refreshed. The store is unaffected. {e}");
            }
        }
        self.hub.publish(event);
        if let Some(payments) = snapshot {
            self.hub.publish(PaymentEvent::PaymentsUpdated(payments));
        }
    }
}
