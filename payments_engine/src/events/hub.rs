//! Fan-out notification hub
//!
//! The hub keeps track of every connected subscriber and delivers each published [`PaymentEvent`] to all of them, in
//! publication order. It is backed by a `tokio` broadcast channel, so publishing never waits on a slow subscriber.
//!
//! A subscriber that falls more than `capacity` events behind loses the oldest events. This is logged, and the
//! subscriber simply carries on with the next event it has not missed. Since every mutation is followed by a full-set
//! event, the subscriber catches up with the store at the next mutation at the latest.
//!
//! Subscribers are removed from the hub by dropping their [`Subscription`].
use std::sync::{
    atomic::{AtomicU64, AtomicUsize, Ordering},
    Arc,
};

use log::*;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use super::PaymentEvent;

#[derive(Debug, Clone)]
pub struct NotificationHub {
    sender: broadcast::Sender<PaymentEvent>,
    next_id: Arc<AtomicU64>,
    subscribers: Arc<AtomicUsize>,
}

impl NotificationHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender, next_id: Arc::new(AtomicU64::new(1)), subscribers: Arc::new(AtomicUsize::new(0)) }
    }

    /// Adds a new subscriber to the hub. The subscriber receives every event published after this call.
    pub fn subscribe(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let receiver = self.sender.subscribe();
        let count = self.subscribers.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("📬️ Subscriber #{id} joined. {count} subscriber(s) connected");
        Subscription { id, receiver, subscribers: Arc::clone(&self.subscribers) }
    }

    /// Delivers the event to every current subscriber. Returns the number of subscribers the event was queued for.
    pub fn publish(&self, event: PaymentEvent) -> usize {
        let name = event.name();
        match self.sender.send(event) {
            Ok(n) => {
                trace!("📬️ {name} queued for {n} subscriber(s)");
                n
            },
            Err(_) => {
                trace!("📬️ {name} not sent. There are no subscribers");
                0
            },
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.load(Ordering::SeqCst)
    }
}

/// A single subscriber's view of the hub.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    receiver: broadcast::Receiver<PaymentEvent>,
    subscribers: Arc<AtomicUsize>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Waits for the next event. Returns `None` once the hub has been dropped.
    pub async fn recv(&mut self) -> Option<PaymentEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(n)) => {
                    warn!("📬️ Subscriber #{} fell behind and missed {n} event(s)", self.id);
                },
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next event if one is already queued, without waiting.
    pub fn try_recv(&mut self) -> Option<PaymentEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(n)) => {
                    warn!("📬️ Subscriber #{} fell behind and missed {n} event(s)", self.id);
                },
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let remaining = self.subscribers.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        debug!("📬️ Subscriber #{} left. {remaining} subscriber(s) connected", self.id);
    }
}
