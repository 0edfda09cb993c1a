//! Typed data feeds for the display rotator.
//!
//! [`providers`] holds the async provider traits and their HTTP clients;
//! [`models`] holds the vendor-neutral records they produce.

pub mod models;
pub mod providers;
