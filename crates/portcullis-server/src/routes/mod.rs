//! HTTP route modules.

pub mod auth;
pub mod proxy;
pub mod ui;
