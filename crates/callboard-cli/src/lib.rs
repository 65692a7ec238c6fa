//! Callboard CLI library
//!
//! HTTP transport, configuration and terminal rendering used by the
//! `callboard` binary.

pub mod api;
pub mod config;
pub mod render;
