//! Business logic services.

pub mod auth;
pub mod dashboard;
pub mod event;
pub mod team;
pub mod ticket;
