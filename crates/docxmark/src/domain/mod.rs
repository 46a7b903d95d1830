//! Core domain types: errors, the markup view, and placeholder models.

pub mod errors;
pub mod markup;
pub mod model;
