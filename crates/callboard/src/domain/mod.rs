//! Domain Layer
//!
//! Pure domain logic without infrastructure dependencies.
//! Contains entities, value objects, call filtering, display formatting and errors.

pub mod entities;
pub mod errors;
pub mod filter;
pub mod format;
pub mod nullable;
pub mod timestamp;
pub mod value_objects;

// Re-exports for convenience
pub use entities::*;
pub use errors::*;
pub use filter::*;
pub use value_objects::*;
