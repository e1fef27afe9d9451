use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
    web,
    web::ServiceConfig,
};
use log::debug;
use payments_engine::{events::NotificationHub, mirror::MirrorWriter, PaymentStore, PaymentsApi, SqliteDatabase};
use tempfile::TempDir;

use crate::routes::{
    configure_extractors,
    health,
    CreatePaymentRoute,
    DeletePaymentRoute,
    ListPaymentsRoute,
    PaymentByIdRoute,
    PushChannelRoute,
    UpdatePaymentRoute,
};

pub const MIRROR_FILE: &str = "payments.json";

/// Creates a fresh database and mirror location in a temporary directory. Keep the `TempDir` alive for the duration of
/// the test.
pub async fn sqlite_api() -> (TempDir, web::Data<PaymentsApi<SqliteDatabase>>) {
    let _ = env_logger::try_init();
    let dir = tempfile::tempdir().expect("Error creating temp dir");
    let url = format!("sqlite://{}", dir.path().join("payments.db").display());
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
    let mirror = MirrorWriter::new(dir.path().join(MIRROR_FILE));
    let api = PaymentsApi::new(db, Some(mirror), NotificationHub::new(32));
    (dir, web::Data::new(api))
}

pub fn configure<B: PaymentStore + 'static>(api: web::Data<PaymentsApi<B>>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(api)
            .configure(configure_extractors)
            .service(health)
            .service(ListPaymentsRoute::<B>::new())
            .service(PaymentByIdRoute::<B>::new())
            .service(CreatePaymentRoute::<B>::new())
            .service(UpdatePaymentRoute::<B>::new())
            .service(DeletePaymentRoute::<B>::new())
            .service(PushChannelRoute::<B>::new());
    }
}

pub async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, String)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    debug!("Making request");
    let res = test::call_service(app, req).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}
