//! `loomcraft-core`: shared building blocks for the catalog crates.
//!
//! Pure primitives only: identifiers, the error model, the entity trait and a
//! clock abstraction. Nothing here performs IO.

pub mod clock;
pub mod entity;
pub mod error;
pub mod id;

pub use clock::{Clock, SystemClock};
pub use entity::Entity;
pub use error::DomainError;
pub use id::ProductId;
