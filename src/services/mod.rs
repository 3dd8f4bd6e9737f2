// src/services/mod.rs

//! Auth collaborators: password hashing and bearer-token issue/verify.

pub mod auth_service;
pub mod token_service;
