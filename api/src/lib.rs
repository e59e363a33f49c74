//! HTTP surface of the SMS token service
//!
//! Exposes the signed `POST /send` and `GET /validation/{phone}/{token}`
//! endpoints over the core issuance and verification engines.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::{create_app, AppState};
