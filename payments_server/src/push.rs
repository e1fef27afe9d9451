//! WebSocket push channel
//!
//! Clients connect to `/ws` to be told about every change to the payments table. Each message is a JSON text frame of
//! the form `{"event": <name>, "data": <payload>}`, where the events are
//! * `paymentsUpdated`: the full list of payments. Always sent first, straight after connecting, and again after every
//!   change.
//! * `paymentCreated`, `paymentUpdated`: the affected payment.
//! * `paymentDeleted`: `{"id": <id>}`.
//!
//! The channel is one-way. Pings are answered, and anything else the client sends is ignored. Delivery is best-effort:
//! if a send fails the session is closed and nothing is retried.
use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::{Message, MessageStream, Session};
use futures::StreamExt;
use log::*;
use payments_engine::{
    db_types::Payment,
    events::{PaymentEvent, Subscription},
    PaymentStore,
    PaymentsApi,
};

use crate::errors::ServerError;

/// Route handler for the push channel. Upgrades the connection, registers the client with the notification hub and
/// hands the session over to a background task.
pub async fn push_channel<B: PaymentStore>(
    req: HttpRequest,
    body: web::Payload,
    api: web::Data<PaymentsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (response, session, msg_stream) = actix_ws::handle(&req, body).map_err(|e| {
        debug!("🔌️ Could not upgrade connection to a WebSocket. {e}");
        ServerError::PushChannelError(e.to_string())
    })?;
    let (subscription, snapshot) = api.subscribe().await?;
    let peer = req.connection_info().peer_addr().unwrap_or("unknown").to_string();
    info!("🔌️ Push client #{} connected from {peer}", subscription.id());
    actix_web::rt::spawn(run_session(session, msg_stream, subscription, snapshot));
    Ok(response)
}

async fn run_session(
    mut session: Session,
    mut msg_stream: MessageStream,
    mut subscription: Subscription,
    snapshot: Vec<Payment>,
) {
    let id = subscription.id();
    if send_event(&mut session, &PaymentEvent::PaymentsUpdated(snapshot)).await.is_ok() {
        loop {
            tokio::select! {
                msg = msg_stream.next() => match msg {
                    Some(Ok(Message::Ping(bytes))) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    },
                    Some(Ok(Message::Close(reason))) => {
                        debug!("🔌️ Push client #{id} closed the connection. {reason:?}");
                        break;
                    },
                    Some(Ok(_)) => trace!("🔌️ Ignoring message from push client #{id}"),
                    Some(Err(e)) => {
                        debug!("🔌️ Protocol error on push client #{id}. {e}");
                        break;
                    },
                    None => break,
                },
                event = subscription.recv() => match event {
                    Some(event) => {
                        if send_event(&mut session, &event).await.is_err() {
                            break;
                        }
                    },
                    None => break,
                },
            }
        }
    }
    if session.close(None).await.is_err() {
        trace!("🔌️ Session for push client #{id} was already closed");
    }
    info!("🔌️ Push client #{id} disconnected");
}

async fn send_event(session: &mut Session, event: &PaymentEvent) -> Result<(), ()> {
    let json = serde_json::to_string(event).map_err(|e| {
        error!("🔌️ Could not serialize {} event. {e}", event.name());
    })?;
    session.text(json).await.map_err(|_| {
        debug!("🔌️ Could not deliver {} event. The session is closed", event.name());
    })
}
