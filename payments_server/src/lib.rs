//! # Payments server
//! This crate hosts the HTTP server for the payments record service. It is responsible for:
//! Exposing create, read, update and delete operations over payments as a JSON API.
//! Pushing every change to connected clients over a WebSocket, so that their views stay in sync without polling.
//!
//! The storage, JSON mirror and notification fan-out are provided by the `payments_engine` crate.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `GET /payments`: All payments.
//! * `GET /payments/{id}`: A single payment.
//! * `POST /payments`: Create a payment from an `{amount, currency}` body.
//! * `PUT /payments/{id}`: Overwrite a payment's amount and currency.
//! * `DELETE /payments/{id}`: Delete a payment.
//! * `/ws`: The push channel. Upgrades to a WebSocket that receives payment events.

pub mod config;
pub mod data_objects;
pub mod errors;
pub mod push;
pub mod routes;
pub mod server;
