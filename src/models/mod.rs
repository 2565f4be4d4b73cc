//! Database models shared across the CRM repository.

pub mod access_log;
pub mod auth;
pub mod config;
pub mod conversation_summary;
pub mod customer;
pub mod device;
pub mod image;
pub mod sms_log;
pub mod subscription;
pub mod task;
pub mod template;
