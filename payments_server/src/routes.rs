//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module (see [`crate::push`]). Keep this module neat
//! and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every store, mirror and broadcast operation is therefore expressed as
//! an async function. Async handlers get executed concurrently by worker threads and thus don’t block execution.
//!
//! Mutations are serialised inside [`PaymentsApi`], so concurrent requests against the same payment cannot interleave
//! their store write with another request's mirror refresh or broadcast.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use payments_engine::{db_types::NewPayment, PaymentStore, PaymentsApi};

use crate::{data_objects::JsonResponse, errors::ServerError};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Payments  ----------------------------------------------------
route!(list_payments => Get "/payments" impl PaymentStore);
/// Route handler for `GET /payments`. Returns every payment as a JSON array.
pub async fn list_payments<B: PaymentStore>(api: web::Data<PaymentsApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET payments");
    let payments = api.list_payments().await?;
    Ok(HttpResponse::Ok().json(payments))
}

route!(payment_by_id => Get "/payments/{id}" impl PaymentStore);
pub async fn payment_by_id<B: PaymentStore>(
    path: web::Path<i64>,
    api: web::Data<PaymentsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET payment #{id}");
    let payment = api.fetch_payment(id).await?.ok_or(ServerError::NoRecordFound(id))?;
    Ok(HttpResponse::Ok().json(payment))
}

route!(create_payment => Post "/payments" impl PaymentStore);
/// Route handler for `POST /payments`.
///
/// The body must contain a numeric `amount` and a string `currency`. No further validation is done, so negative
/// amounts and unknown currency codes are accepted. On success, the response carries the id assigned to the new
/// payment, and the mirror and push subscribers have already been updated.
pub async fn create_payment<B: PaymentStore>(
    body: web::Json<NewPayment>,
    api: web::Data<PaymentsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let payment = body.into_inner();
    debug!("💻️ POST new payment of {} {}", payment.amount, payment.currency);
    let payment = api.create_payment(payment).await?;
    Ok(HttpResponse::Created().json(JsonResponse::created(payment.id, "Payment created successfully")))
}

route!(update_payment => Put "/payments/{id}" impl PaymentStore);
pub async fn update_payment<B: PaymentStore>(
    path: web::Path<i64>,
    body: web::Json<NewPayment>,
    api: web::Data<PaymentsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ PUT payment #{id}");
    api.update_payment(id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Payment updated successfully")))
}

route!(delete_payment => Delete "/payments/{id}" impl PaymentStore);
pub async fn delete_payment<B: PaymentStore>(
    path: web::Path<i64>,
    api: web::Data<PaymentsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE payment #{id}");
    api.delete_payment(id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Payment deleted successfully")))
}

//----------------------------------------------   Push channel  ----------------------------------------------------
route!(push_channel => Get "/ws" impl PaymentStore);
pub use crate::push::push_channel;

/// Registers the JSON and path extractor error handlers, so that malformed requests get the same `{"error": ...}` body
/// as every other failure.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        debug!("💻️ Rejecting request body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        debug!("💻️ Rejecting request path. {err}");
        ServerError::InvalidRequestPath(err.to_string()).into()
    }));
}
