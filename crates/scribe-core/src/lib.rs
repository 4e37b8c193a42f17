//! # Scribe Core
//!
//! The domain layer of the Scribe blog backend: the Post aggregate and its
//! value objects, the ports infrastructure implements, and the post use cases.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, ErrorKind};
