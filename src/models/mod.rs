// src/models/mod.rs

//! Data structures representing stored entities and their input shapes.

pub mod sweet;
pub mod user;

pub use sweet::{Category, NewSweet, Sweet, SweetPatch};
pub use user::{NewUser, Role, User};
