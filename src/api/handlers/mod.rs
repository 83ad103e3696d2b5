//! API handlers: authentication, property listings, health, and the static
//! pages the authorization gate redirects to.

pub mod auth;
pub mod health;
pub mod pages;
pub mod properties;
