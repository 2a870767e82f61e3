//! Domain logic for the cinema catalog.
//!
//! Pure functions and types shared by the database and API crates. Nothing
//! in here touches the database or HTTP; callers pass in data from the
//! repository layer.

pub mod catalog;
pub mod comments;
pub mod error;
pub mod genres;
pub mod rating;
pub mod roles;
pub mod search;
pub mod types;
