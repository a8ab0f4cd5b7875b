//! Application layer
//!
//! Use cases orchestrating the repository and token collaborators. They are
//! constructed per request and hold no mutable state.

pub mod auth;
