//! Query parameters and response payloads exchanged with the JSON API.

pub mod admin;
pub mod customers;
pub mod images;
pub mod tasks;
