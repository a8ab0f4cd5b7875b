//! Authentication gateway
//!
//! Email/password and Google sign-in behind a small JSON API, issuing signed
//! session tokens. Layered as domain, application, infrastructure and
//! HTTP adapters.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
