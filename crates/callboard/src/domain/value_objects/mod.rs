//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod call_status;
mod date_filter;
mod outcome;
mod speaker;
mod status_filter;

pub use call_status::*;
pub use date_filter::*;
pub use outcome::*;
pub use speaker::*;
pub use status_filter::*;
