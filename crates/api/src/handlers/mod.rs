//! HTTP handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod comment;
pub mod genre;
pub mod movie;
pub mod rating;
