//! Application layer orchestrating domain logic and infrastructure.

pub mod catalog;
pub mod extract;
pub mod report;
pub mod request;
pub mod stage;
