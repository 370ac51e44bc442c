//! Headless site client: everything a UI shell needs short of rendering.

pub mod api;
pub mod auth;
pub mod cancel;
pub mod error;
pub mod notify;
pub mod router;
pub mod session;
pub mod views;
