use actix_web::{http::StatusCode, test, web, App};
use payments_engine::{
    db_types::Payment,
    events::{NotificationHub, PaymentEvent},
    PaymentStoreError,
    PaymentsApi,
};
use serde_json::json;

use super::{
    helpers::{configure, send},
    mocks::MockStore,
};

fn mock_api(store: MockStore) -> web::Data<PaymentsApi<MockStore>> {
    let _ = env_logger::try_init();
    web::Data::new(PaymentsApi::new(store, None, NotificationHub::new(16)))
}

const INTERNAL_ERROR: &str = r#"{"error":"Internal Server Error"}"#;

#[actix_web::test]
async fn store_unavailable_on_read() {
    let mut store = MockStore::new();
    store
        .expect_fetch_payments()
        .returning(|| Err(PaymentStoreError::StoreUnavailable("database is locked".into())));
    store.expect_fetch_payment().returning(|_| Err(PaymentStoreError::StoreUnavailable("disk I/O error".into())));
    let app = test::init_service(App::new().configure(configure(mock_api(store)))).await;

    let req = test::TestRequest::get().uri("/payments").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, INTERNAL_ERROR);

    let req = test::TestRequest::get().uri("/payments/3").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, INTERNAL_ERROR);
}

#[actix_web::test]
async fn failed_writes_publish_nothing() {
    let mut store = MockStore::new();
    store.expect_insert_payment().returning(|_| Err(PaymentStoreError::StoreWriteError("readonly database".into())));
    store.expect_update_payment().returning(|_, _| Err(PaymentStoreError::StoreWriteError("readonly database".into())));
    store.expect_delete_payment().returning(|_| Err(PaymentStoreError::StoreWriteError("readonly database".into())));
    store.expect_fetch_payments().never();
    let api = mock_api(store);
    let mut subscription = api.hub().subscribe();
    let app = test::init_service(App::new().configure(configure(api))).await;

    let req = test::TestRequest::post().uri("/payments").set_json(json!({"amount": 1.0, "currency": "USD"})).to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, INTERNAL_ERROR);

    let req = test::TestRequest::put().uri("/payments/1").set_json(json!({"amount": 1.0, "currency": "USD"})).to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let req = test::TestRequest::delete().uri("/payments/1").to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    assert!(subscription.try_recv().is_none());
}

#[actix_web::test]
async fn update_of_missing_payment_skips_refresh() {
    let mut store = MockStore::new();
    store.expect_update_payment().times(1).returning(|_, _| Ok(0));
    store.expect_fetch_payments().never();
    let app = test::init_service(App::new().configure(configure(mock_api(store)))).await;
    let req =
        test::TestRequest::put().uri("/payments/42").set_json(json!({"amount": 1.0, "currency": "USD"})).to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"Payment not found"}"#);
}

#[actix_web::test]
async fn committed_write_survives_failed_refresh() {
    let mut store = MockStore::new();
    store.expect_insert_payment().times(1).returning(|_| Ok(7));
    store
        .expect_fetch_payments()
        .times(1)
        .returning(|| Err(PaymentStoreError::StoreUnavailable("connection reset".into())));
    let api = mock_api(store);
    let mut subscription = api.hub().subscribe();
    let app = test::init_service(App::new().configure(configure(api))).await;

    let req = test::TestRequest::post().uri("/payments").set_json(json!({"amount": 3.0, "currency": "JPY"})).to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, r#"{"id":7,"message":"Payment created successfully"}"#);
    assert_eq!(subscription.try_recv(), Some(PaymentEvent::PaymentCreated(Payment::new(7, 3.0, "JPY"))));
    assert!(subscription.try_recv().is_none());
}
