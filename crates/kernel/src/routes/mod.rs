//! HTTP route handlers.

pub mod health;
pub mod lookup;
pub mod recipe;
