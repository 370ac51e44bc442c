//! YEYO LAB site: the REST backend for accounts, profiles, call bookings and
//! lead-gate subscriptions, plus a headless client (session store, API
//! client, auth context, form views and router) that UI shells drive.

pub mod app;
pub mod auth;
pub mod bookings;
pub mod client;
pub mod config;
pub mod error;
pub mod profiles;
pub mod schedule;
pub mod state;
pub mod subscriptions;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;
