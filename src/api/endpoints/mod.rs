//! API endpoint handlers.

pub mod generation;
pub mod health;
pub mod validation;
