// src/lib.rs

//! Sweet Shop inventory service.
//!
//! The library exposes the inventory store, filter engine, auth services and
//! the actix-web API surface so integration tests can assemble the app the
//! same way `main.rs` does.

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod web;
