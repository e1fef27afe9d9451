use actix_web::{http::StatusCode, test, App};
use payments_engine::{db_types::Payment, events::PaymentEvent};
use serde_json::{json, Value};

use super::helpers::{configure, send, sqlite_api, MIRROR_FILE};

fn parse(body: &str) -> Value {
    serde_json::from_str(body).expect("Response body is not JSON")
}

#[actix_web::test]
async fn health() {
    let (_dir, api) = sqlite_api().await;
    let app = test::init_service(App::new().configure(configure(api))).await;
    let req = test::TestRequest::get().uri("/health").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn payment_lifecycle() {
    let (_dir, api) = sqlite_api().await;
    let app = test::init_service(App::new().configure(configure(api))).await;

    let req = test::TestRequest::get().uri("/payments").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!([]));

    let req =
        test::TestRequest::post().uri("/payments").set_json(json!({"amount": 100.5, "currency": "USD"})).to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(parse(&body), json!({"id": 1, "message": "Payment created successfully"}));

    let req = test::TestRequest::get().uri("/payments/1").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"id": 1, "amount": 100.5, "currency": "USD"}));

    let req = test::TestRequest::put()
        .uri("/payments/1")
        .set_json(json!({"amount": 250.75, "currency": "EUR"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"message": "Payment updated successfully"}));

    let req = test::TestRequest::get().uri("/payments/1").to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(parse(&body), json!({"id": 1, "amount": 250.75, "currency": "EUR"}));

    let req = test::TestRequest::delete().uri("/payments/1").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"message": "Payment deleted successfully"}));

    let req = test::TestRequest::get().uri("/payments/1").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body), json!({"error": "Payment not found"}));
}

#[actix_web::test]
async fn list_is_ordered_by_id() {
    let (_dir, api) = sqlite_api().await;
    let app = test::init_service(App::new().configure(configure(api))).await;
    for (amount, currency) in [(10.0, "USD"), (20.0, "ZAR"), (30.0, "XTM")] {
        let req = test::TestRequest::post()
            .uri("/payments")
            .set_json(json!({"amount": amount, "currency": currency}))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let req = test::TestRequest::get().uri("/payments").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let payments: Vec<Payment> = serde_json::from_str(&body).expect("Not a list of payments");
    assert_eq!(payments, vec![
        Payment::new(1, 10.0, "USD"),
        Payment::new(2, 20.0, "ZAR"),
        Payment::new(3, 30.0, "XTM"),
    ]);
}

#[actix_web::test]
async fn missing_payments_are_not_found() {
    let (_dir, api) = sqlite_api().await;
    let mut subscription = api.hub().subscribe();
    let app = test::init_service(App::new().configure(configure(api.clone()))).await;
    let req = test::TestRequest::post().uri("/payments").set_json(json!({"amount": 1.0, "currency": "USD"})).to_request();
    send(&app, req).await;
    while subscription.try_recv().is_some() {}

    let req =
        test::TestRequest::put().uri("/payments/999").set_json(json!({"amount": 5.0, "currency": "USD"})).to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body), json!({"error": "Payment not found"}));

    let req = test::TestRequest::delete().uri("/payments/999").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body), json!({"error": "Payment not found"}));

    assert!(subscription.try_recv().is_none());
    let payments = api.list_payments().await.expect("Error listing payments");
    assert_eq!(payments, vec![Payment::new(1, 1.0, "USD")]);
}

#[actix_web::test]
async fn no_business_validation() {
    let (_dir, api) = sqlite_api().await;
    let app = test::init_service(App::new().configure(configure(api.clone()))).await;
    let req =
        test::TestRequest::post().uri("/payments").set_json(json!({"amount": -42.25, "currency": "NOPE"})).to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let req = test::TestRequest::post().uri("/payments").set_json(json!({"amount": 0, "currency": ""})).to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let payments = api.list_payments().await.expect("Error listing payments");
    assert_eq!(payments, vec![Payment::new(1, -42.25, "NOPE"), Payment::new(2, 0.0, "")]);
}

#[actix_web::test]
async fn malformed_requests_are_rejected() {
    let (_dir, api) = sqlite_api().await;
    let app = test::init_service(App::new().configure(configure(api.clone()))).await;

    let req = test::TestRequest::post().uri("/payments").set_json(json!({"amount": 10.0})).to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err = parse(&body)["error"].as_str().expect("error is not a string").to_string();
    assert!(err.contains("missing field `currency`"), "{err}");

    let req =
        test::TestRequest::post().uri("/payments").set_json(json!({"amount": "ten", "currency": "USD"})).to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/payments/abc").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(parse(&body)["error"].is_string());

    let req =
        test::TestRequest::put().uri("/payments/1.5").set_json(json!({"amount": 1.0, "currency": "USD"})).to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(api.list_payments().await.expect("Error listing payments").is_empty());
}

#[actix_web::test]
async fn mutations_refresh_mirror_and_notify() {
    let (dir, api) = sqlite_api().await;
    let (mut subscription, snapshot) = api.subscribe().await.expect("Error subscribing");
    assert!(snapshot.is_empty());
    let app = test::init_service(App::new().configure(configure(api.clone()))).await;
    let mirror = dir.path().join(MIRROR_FILE);

    let req = test::TestRequest::post().uri("/payments").set_json(json!({"amount": 7.5, "currency": "GBP"})).to_request();
    send(&app, req).await;
    let payment = Payment::new(1, 7.5, "GBP");
    assert_eq!(subscription.try_recv(), Some(PaymentEvent::PaymentCreated(payment.clone())));
    assert_eq!(subscription.try_recv(), Some(PaymentEvent::PaymentsUpdated(vec![payment.clone()])));
    let contents = tokio::fs::read_to_string(&mirror).await.expect("Mirror was not written");
    let mirrored: Vec<Payment> = serde_json::from_str(&contents).expect("Mirror is not valid JSON");
    assert_eq!(mirrored, vec![payment]);

    let req = test::TestRequest::delete().uri("/payments/1").to_request();
    send(&app, req).await;
    assert_eq!(subscription.try_recv().map(|e| e.name()), Some("paymentDeleted"));
    assert_eq!(subscription.try_recv(), Some(PaymentEvent::PaymentsUpdated(vec![])));
    assert!(subscription.try_recv().is_none());
    let contents = tokio::fs::read_to_string(&mirror).await.expect("Mirror was not written");
    assert_eq!(parse(&contents), json!([]));
}
