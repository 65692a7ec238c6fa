//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the dashboard core talks to the
//! outside world. The HTTP implementation lives in the CLI crate.

mod transport;

pub use transport::*;
