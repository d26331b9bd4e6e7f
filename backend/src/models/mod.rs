//! Database models and DTOs for all domain entities.

pub mod event;
pub mod pagination;
pub mod team;
pub mod ticket;
pub mod user;
