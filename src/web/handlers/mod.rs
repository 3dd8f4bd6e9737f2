// src/web/handlers/mod.rs

pub mod auth_handlers;
pub mod sweet_handlers;
