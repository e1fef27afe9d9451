use std::time::Duration;

use actix_cors::Cors;
use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use payments_engine::{events::NotificationHub, mirror::MirrorWriter, PaymentsApi, SqliteDatabase};

use crate::{
    config::{CorsConfig, ServerConfig},
    errors::ServerError,
    routes::{
        configure_extractors,
        health,
        CreatePaymentRoute,
        DeletePaymentRoute,
        ListPaymentsRoute,
        PaymentByIdRoute,
        PushChannelRoute,
        UpdatePaymentRoute,
    },
};

/// Opens the store, runs the server until it is shut down (e.g. by SIGINT), and then closes the store.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.db_max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let mirror = config.mirror_path.as_ref().map(MirrorWriter::new);
    if let Some(m) = &mirror {
        info!("🚀️ Mirroring payments to {}", m.path().display());
    }
    let hub = NotificationHub::new(config.broadcast_capacity);
    let api = web::Data::new(PaymentsApi::new(db, mirror, hub));
    let srv = create_server_instance(config, api.clone())?;
    let result = srv.await;
    info!("🚀️ Server has stopped. Closing the database.");
    if let Err(e) = api.close().await {
        warn!("🚀️ Could not close the database cleanly. {e}");
    }
    result.map_err(ServerError::from)
}

pub fn create_server_instance(
    config: ServerConfig,
    api: web::Data<PaymentsApi<SqliteDatabase>>,
) -> Result<Server, ServerError> {
    let cors_config = config.cors.clone();
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&cors_config))
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %r").log_target("payments::access_log"))
            .app_data(api.clone())
            .configure(configure_extractors)
            .service(health)
            .service(ListPaymentsRoute::<SqliteDatabase>::new())
            .service(PaymentByIdRoute::<SqliteDatabase>::new())
            .service(CreatePaymentRoute::<SqliteDatabase>::new())
            .service(UpdatePaymentRoute::<SqliteDatabase>::new())
            .service(DeletePaymentRoute::<SqliteDatabase>::new())
            .service(PushChannelRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

pub fn build_cors(config: &CorsConfig) -> Cors {
    let cors = Cors::default()
        .allowed_methods(config.allowed_methods.iter().map(String::as_str))
        .allow_any_header()
        .max_age(3600);
    if config.allows_any_origin() {
        cors.allow_any_origin()
    } else {
        config.allowed_origins.iter().fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}
