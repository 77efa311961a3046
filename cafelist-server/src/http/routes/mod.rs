//! Route handlers

pub mod auth;
pub mod cafes;
pub mod categories;
pub mod health;
